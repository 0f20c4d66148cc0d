//! Integration tests for the case, attribute snapshot and generated image
//! repositories.

use identikit_core::attributes::AttributeRecord;
use identikit_core::features::FeatureKey;
use identikit_db::models::case_record::CreateCaseRecord;
use identikit_db::models::generated_image::CreateGeneratedImage;
use identikit_db::repositories::{CaseRecordRepo, GeneratedImageRepo, PhysicalAttributesRepo};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_case(crime: &str) -> CreateCaseRecord {
    CreateCaseRecord {
        crime_committed: Some(crime.to_string()),
        incident_location_address: Some("12 Harbour Road".to_string()),
        incident_location_lat: Some(51.5072),
        incident_location_lng: Some(-0.1276),
        ..Default::default()
    }
}

fn description() -> AttributeRecord {
    serde_json::from_value(json!({
        "gender": "Male",
        "age": 34,
        "height_feet": 5.9,
        "facial_hair_type": "Full beard",
        "beard_color": "Brown",
        "eye_color": "Green",
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_find_case(pool: PgPool) {
    let owner = Uuid::new_v4();
    let created = CaseRecordRepo::create(&pool, owner, &new_case("Burglary"))
        .await
        .unwrap();
    assert_eq!(created.user_id, owner);
    assert_eq!(created.crime_committed.as_deref(), Some("Burglary"));

    let found = CaseRecordRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.incident_location_lat, Some(51.5072));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_owned_hides_other_users_cases(pool: PgPool) {
    let owner = Uuid::new_v4();
    let case = CaseRecordRepo::create(&pool, owner, &new_case("Robbery")).await.unwrap();

    assert!(CaseRecordRepo::find_owned(&pool, case.id, owner).await.unwrap().is_some());
    assert!(CaseRecordRepo::find_owned(&pool, case.id, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_by_user_is_scoped(pool: PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    CaseRecordRepo::create(&pool, alice, &new_case("Theft")).await.unwrap();
    CaseRecordRepo::create(&pool, alice, &new_case("Fraud")).await.unwrap();
    CaseRecordRepo::create(&pool, bob, &new_case("Arson")).await.unwrap();

    let cases = CaseRecordRepo::list_by_user(&pool, alice).await.unwrap();
    assert_eq!(cases.len(), 2);
    assert!(cases.iter().all(|c| c.user_id == alice));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_latitude_violates_check(pool: PgPool) {
    let input = CreateCaseRecord {
        incident_location_lat: Some(123.0),
        ..Default::default()
    };
    let result = CaseRecordRepo::create(&pool, Uuid::new_v4(), &input).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Attribute snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attribute_snapshot_round_trips_every_kind(pool: PgPool) {
    let case = CaseRecordRepo::create(&pool, Uuid::new_v4(), &new_case("Assault"))
        .await
        .unwrap();

    let saved = PhysicalAttributesRepo::create(&pool, case.id, &description())
        .await
        .unwrap();
    assert_eq!(saved.case_id, case.id);
    assert_eq!(saved.attributes, description());
    assert_eq!(saved.attributes.integer(FeatureKey::Age), Some(34));
    assert_eq!(saved.attributes.decimal(FeatureKey::HeightFeet), Some(5.9));
    assert!(!saved.attributes.contains(FeatureKey::NoseShape));

    let found = PhysicalAttributesRepo::find_by_id(&pool, saved.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.attributes, saved.attributes);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_snapshot_wins(pool: PgPool) {
    let case = CaseRecordRepo::create(&pool, Uuid::new_v4(), &new_case("Assault"))
        .await
        .unwrap();
    assert!(PhysicalAttributesRepo::find_latest_by_case(&pool, case.id)
        .await
        .unwrap()
        .is_none());

    PhysicalAttributesRepo::create(&pool, case.id, &description()).await.unwrap();
    let newer = AttributeRecord::new().with(FeatureKey::Gender, "Female").unwrap();
    let second = PhysicalAttributesRepo::create(&pool, case.id, &newer).await.unwrap();

    let latest = PhysicalAttributesRepo::find_latest_by_case(&pool, case.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.attributes.text(FeatureKey::Gender).as_deref(), Some("Female"));
}

// ---------------------------------------------------------------------------
// Generated images
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generated_image_links_case_and_snapshot(pool: PgPool) {
    let case = CaseRecordRepo::create(&pool, Uuid::new_v4(), &new_case("Theft"))
        .await
        .unwrap();
    let snapshot = PhysicalAttributesRepo::create(&pool, case.id, &description())
        .await
        .unwrap();

    let image = GeneratedImageRepo::create(
        &pool,
        &CreateGeneratedImage {
            case_id: case.id,
            attributes_id: Some(snapshot.id),
            image_url: "data:image/png;base64,AAAA".to_string(),
            generation_status: "completed".to_string(),
            generation_metadata: json!({ "model": "test-model", "totalImages": 3 }),
        },
    )
    .await
    .unwrap();
    assert_eq!(image.attributes_id, Some(snapshot.id));
    assert_eq!(image.generation_metadata["totalImages"], 3);

    let listed = GeneratedImageRepo::list_by_case(&pool, case.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let latest = GeneratedImageRepo::find_latest_by_case(&pool, case.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, image.id);
}
