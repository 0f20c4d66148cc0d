pub mod cases;
pub mod generation;
pub mod report;
pub mod schema;
