use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::workflows::records::{
    ApplicationPayload, ClientId, EntityStore, InMemoryStore, Lease, Property, PropertyPatch,
    PropertyType, RentalApplication, StoreOp,
};

const PROPERTY: &str = "prop-200";
const APPLICATION: &str = "app-300";

fn decided_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 16, 30, 0).unwrap()
}

fn property(status: PropertyStatus) -> Property {
    Property {
        id: PROPERTY.into(),
        title: "Drake Park Bungalow".to_string(),
        address: "2701 University Ave".to_string(),
        city: "Des Moines".to_string(),
        neighbourhood: Some("Drake".to_string()),
        property_type: PropertyType::House,
        beds: 3,
        baths: 1.5,
        sqft: 1340,
        monthly_rent: 1950,
        status,
        amenities: BTreeSet::new(),
        photos: Vec::new(),
        owner_id: Some("owner-1".to_string()),
        created_date: Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
    }
}

fn payload() -> ApplicationPayload {
    ApplicationPayload {
        co_applicants: Vec::new(),
        other_occupants: Vec::new(),
        vehicles: Vec::new(),
        parking_required: false,
        parking_fee_accept: false,
        pets: Vec::new(),
        pet_policy_ack: false,
        has_been_bankrupt: false,
        bankruptcy_details: String::new(),
        has_been_evicted: false,
        eviction_details: String::new(),
        has_committed_felony: false,
        felony_details: String::new(),
        personal_references: Vec::new(),
        additional_notes: String::new(),
        desired_move_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        agrees_to_terms: true,
        pay_stubs_urls: Vec::new(),
        credit_report_url: String::new(),
        dl_front_url: String::new(),
        dl_back_url: String::new(),
        supporting_docs_urls: Vec::new(),
        monthly_income_at_application: 5200.0,
        employer_at_application: "Principal".to_string(),
    }
}

fn application(id: &str, status: ApplicationStatus) -> RentalApplication {
    RentalApplication {
        id: id.into(),
        property_id: PROPERTY.into(),
        user_id: "user-12".into(),
        payload: payload(),
        score: 6.7,
        docs_complete: 1.0,
        status,
        created_date: Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
        decision_at: None,
    }
}

fn lease(id: &str, status: LeaseStatus) -> Lease {
    Lease {
        id: id.into(),
        property_id: PROPERTY.into(),
        client_id: ClientId::from("user-4"),
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        monthly_rent: 1900,
        deposit: 1900,
        payment_day: 1,
        status,
        created_date: Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
    }
}

fn store_with(property_status: PropertyStatus) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .properties
        .seed(property(property_status))
        .expect("seed property");
    store
        .applications
        .seed(application(APPLICATION, ApplicationStatus::Pending))
        .expect("seed application");
    store
}

fn service(store: &Arc<InMemoryStore>) -> LeasingService<InMemoryStore> {
    LeasingService::new(store.clone())
}

async fn stored_application(store: &InMemoryStore) -> RentalApplication {
    store
        .applications()
        .get(&APPLICATION.into())
        .await
        .expect("application")
}

async fn stored_property(store: &InMemoryStore) -> Property {
    store
        .properties()
        .get(&PROPERTY.into())
        .await
        .expect("property")
}

#[test]
fn lease_term_starts_on_the_first_of_next_month() {
    let term = lease_term(decided_at()).expect("term");
    assert_eq!(term.start, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    assert_eq!(term.end, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());

    let december = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap();
    let term = lease_term(december).expect("term");
    assert_eq!(term.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert_eq!(term.end, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
}

#[tokio::test]
async fn approval_leases_the_unit_and_opens_a_lease() {
    let store = store_with(PropertyStatus::Available);
    let receipt = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect("approved");

    assert_eq!(receipt.application.status, ApplicationStatus::Approved);
    assert_eq!(receipt.application.decision_at, Some(decided_at()));
    assert_eq!(
        receipt.property.as_ref().map(|p| p.status),
        Some(PropertyStatus::Leased)
    );

    let lease = receipt.lease.expect("lease created");
    assert_eq!(lease.property_id.as_str(), PROPERTY);
    assert_eq!(lease.client_id.as_str(), "user-12");
    assert_eq!(lease.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    assert_eq!(lease.end_date, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    assert_eq!(lease.monthly_rent, 1950);
    assert_eq!(lease.deposit, 1950);
    assert_eq!(lease.payment_day, 1);
    assert_eq!(lease.status, LeaseStatus::Active);

    assert_eq!(stored_property(&store).await.status, PropertyStatus::Leased);
    assert_eq!(store.leases.snapshot().expect("leases").len(), 1);
}

#[tokio::test]
async fn denial_touches_only_the_application() {
    let store = store_with(PropertyStatus::Available);
    let receipt = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Denied, decided_at())
        .await
        .expect("denied");

    assert_eq!(receipt.application.status, ApplicationStatus::Denied);
    assert!(receipt.property.is_none());
    assert!(receipt.lease.is_none());
    assert_eq!(stored_property(&store).await.status, PropertyStatus::Available);
    assert!(store.leases.snapshot().expect("leases").is_empty());
}

#[tokio::test]
async fn decided_applications_cannot_be_decided_again() {
    let store = store_with(PropertyStatus::Available);
    let leasing = service(&store);
    leasing
        .decide(&APPLICATION.into(), DecisionOutcome::Denied, decided_at())
        .await
        .expect("denied");

    let error = leasing
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect_err("already decided");
    assert!(matches!(
        error,
        LeasingError::AlreadyDecided {
            status: ApplicationStatus::Denied,
            ..
        }
    ));
    assert!(store.leases.snapshot().expect("leases").is_empty());
}

#[tokio::test]
async fn approval_refuses_a_second_active_lease() {
    let store = store_with(PropertyStatus::Leased);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Active))
        .expect("seed lease");

    let error = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect_err("active lease");
    assert!(matches!(error, LeasingError::ActiveLeaseExists { .. }));

    assert_eq!(
        stored_application(&store).await.status,
        ApplicationStatus::Pending
    );
    assert_eq!(store.leases.snapshot().expect("leases").len(), 1);
}

#[tokio::test]
async fn ended_leases_do_not_block_approval() {
    let store = store_with(PropertyStatus::Available);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Ended))
        .expect("seed lease");

    let receipt = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect("approved");
    assert!(receipt.lease.is_some());
}

#[tokio::test]
async fn failed_lease_create_restores_property_and_application() {
    let store = store_with(PropertyStatus::Available);
    store.leases.arm_failure(StoreOp::Create, 0);

    let error = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect_err("lease create fails");
    assert!(matches!(
        error,
        LeasingError::RolledBack {
            stage: SagaStage::LeaseCreate,
            ..
        }
    ));

    let application = stored_application(&store).await;
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.decision_at, None);
    assert_eq!(stored_property(&store).await.status, PropertyStatus::Available);
    assert!(store.leases.snapshot().expect("leases").is_empty());
}

#[tokio::test]
async fn failed_property_update_reopens_the_application() {
    let store = store_with(PropertyStatus::Available);
    store.properties.arm_failure(StoreOp::Update, 0);

    let error = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect_err("property update fails");
    assert!(matches!(
        error,
        LeasingError::RolledBack {
            stage: SagaStage::PropertyStatus,
            ..
        }
    ));
    assert_eq!(
        stored_application(&store).await.status,
        ApplicationStatus::Pending
    );
    assert_eq!(stored_property(&store).await.status, PropertyStatus::Available);
}

#[tokio::test]
async fn failed_compensation_is_reported_as_inconsistent() {
    let store = store_with(PropertyStatus::Available);
    store.properties.arm_failure(StoreOp::Update, 0);
    // The approval write passes; the reopen after the property failure trips.
    store.applications.arm_failure(StoreOp::Update, 1);

    let error = service(&store)
        .decide(&APPLICATION.into(), DecisionOutcome::Approved, decided_at())
        .await
        .expect_err("inconsistent");
    match error {
        LeasingError::Inconsistent { stage, records, .. } => {
            assert_eq!(stage, SagaStage::PropertyStatus);
            assert_eq!(records, vec![format!("application {APPLICATION}")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn ending_a_lease_frees_the_unit() {
    let store = store_with(PropertyStatus::Leased);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Active))
        .expect("seed lease");

    let transition = service(&store)
        .end_lease(&"lease-1".into())
        .await
        .expect("ended");
    assert_eq!(transition.lease.status, LeaseStatus::Ended);
    assert_eq!(
        transition.property.map(|p| p.status),
        Some(PropertyStatus::Available)
    );
    assert_eq!(stored_property(&store).await.status, PropertyStatus::Available);
}

#[tokio::test]
async fn ending_rolls_the_lease_back_when_the_unit_cannot_be_freed() {
    let store = store_with(PropertyStatus::Leased);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Active))
        .expect("seed lease");
    store.properties.arm_failure(StoreOp::Update, 0);

    let error = service(&store)
        .end_lease(&"lease-1".into())
        .await
        .expect_err("property update fails");
    assert!(matches!(error, LeasingError::RolledBack { .. }));

    let lease = store
        .leases()
        .get(&"lease-1".into())
        .await
        .expect("lease");
    assert_eq!(lease.status, LeaseStatus::Active);
}

#[tokio::test]
async fn only_active_leases_renew_or_end() {
    let store = store_with(PropertyStatus::Leased);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Active))
        .expect("seed lease");
    let leasing = service(&store);

    let renewed = leasing
        .renew_lease(&"lease-1".into())
        .await
        .expect("renewed");
    assert_eq!(renewed.lease.status, LeaseStatus::Renewed);
    assert!(renewed.property.is_none());

    let error = leasing
        .end_lease(&"lease-1".into())
        .await
        .expect_err("renewed lease is closed");
    assert!(matches!(
        error,
        LeasingError::LeaseNotActive {
            status: LeaseStatus::Renewed,
            ..
        }
    ));
    assert_eq!(stored_property(&store).await.status, PropertyStatus::Leased);
}

#[tokio::test]
async fn waitlist_accepts_leads_only_for_leased_units() {
    let store = store_with(PropertyStatus::Available);
    let leasing = service(&store);
    let request = || WaitlistRequest {
        email: " next.tenant@example.com ".to_string(),
    };

    let error = leasing
        .join_waitlist(&PROPERTY.into(), request())
        .await
        .expect_err("unit still available");
    assert!(matches!(error, LeasingError::PropertyNotLeased { .. }));
    assert!(store.clients.snapshot().expect("clients").is_empty());

    store
        .properties()
        .update(&PROPERTY.into(), PropertyPatch::status(PropertyStatus::Leased))
        .await
        .expect("leased");
    let client = leasing
        .join_waitlist(&PROPERTY.into(), request())
        .await
        .expect("lead captured");
    assert_eq!(client.email, "next.tenant@example.com");
    assert_eq!(client.first_name, "Waitlist Lead");
    assert_eq!(client.last_name, format!("for {PROPERTY}"));
    assert_eq!(client.phone, "N/A");
    assert_eq!(
        client.prefs_text,
        "Waitlisted for property: Drake Park Bungalow (2701 University Ave)"
    );
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn decision_route_reports_conflicts_and_missing_records() {
    let store = store_with(PropertyStatus::Available);
    let router = leasing_router(Arc::new(service(&store)));
    let uri = format!("/api/v1/applications/{APPLICATION}/decision");

    let response = router
        .clone()
        .oneshot(post_json(&uri, json!({ "outcome": "approved" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["application"]["status"], "approved");
    assert_eq!(body["property"]["status"], "leased");
    assert_eq!(body["lease"]["status"], "active");

    let response = router
        .clone()
        .oneshot(post_json(&uri, json!({ "outcome": "denied" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(post_json(
            "/api/v1/applications/app-missing/decision",
            json!({ "outcome": "denied" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn decision_route_signals_rolled_back_sagas() {
    let store = store_with(PropertyStatus::Available);
    store.leases.arm_failure(StoreOp::Create, 0);
    let router = leasing_router(Arc::new(service(&store)));

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/applications/{APPLICATION}/decision"),
            json!({ "outcome": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("message")
        .starts_with("lease creation failed"));
}

#[tokio::test]
async fn lease_and_waitlist_routes() {
    let store = store_with(PropertyStatus::Leased);
    store
        .leases
        .seed(lease("lease-1", LeaseStatus::Active))
        .expect("seed lease");
    let router = leasing_router(Arc::new(service(&store)));

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/properties/{PROPERTY}/waitlist"),
            json!({ "email": "lead@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json_body(response).await["source"], "portal");

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/leases/lease-1/end")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["lease"]["status"], "ended");
    assert_eq!(body["property"]["status"], "available");

    let response = router
        .oneshot(
            Request::post("/api/v1/leases/lease-1/renew")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
