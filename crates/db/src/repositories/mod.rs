//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Attribute snapshots and generated images
//! are append-only, so there are no update or delete methods for them.

pub mod case_record_repo;
pub mod generated_image_repo;
pub mod physical_attributes_repo;

pub use case_record_repo::CaseRecordRepo;
pub use generated_image_repo::GeneratedImageRepo;
pub use physical_attributes_repo::PhysicalAttributesRepo;
