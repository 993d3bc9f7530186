use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::fixtures::{application, client, lease, property, user, PropertyFixture};
use crate::config::WorkflowConfig;
use crate::workflows::listings::{
    listings_router, ApplicationSearch, ClientStage, ListingService, PropertyFilter,
    PropertySearch,
};
use crate::workflows::records::{ApplicationStatus, InMemoryStore, LeaseStatus, PropertyStatus};

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    let rows = [
        property("prop-1", "Ingersoll Loft", 1450, 1, PropertyStatus::Leased)
            .in_neighbourhood("Ingersoll")
            .with_amenity("pets"),
        property("prop-2", "Beaverdale Cottage", 1250, 2, PropertyStatus::Available)
            .in_neighbourhood("Beaverdale"),
        property("prop-3", "Highland Park Flat", 1100, 1, PropertyStatus::Available)
            .in_neighbourhood("Highland Park")
            .with_amenity("pets"),
    ];
    for (offset, mut row) in rows.into_iter().enumerate() {
        row.created_date = now - Duration::days(10 - offset as i64);
        store.properties.seed(row).expect("seed property");
    }

    store
        .users
        .seed(user("user-1", "Priya Natarajan", "priya@example.com"))
        .expect("seed user");
    store
        .users
        .seed(user("user-2", "Sam Cole", "sam@example.com"))
        .expect("seed user");

    let applications = [
        application(
            "app-1",
            "prop-2",
            "user-1",
            7.2,
            ApplicationStatus::Pending,
            now - Duration::days(4),
        ),
        application(
            "app-2",
            "prop-3",
            "user-2",
            3.4,
            ApplicationStatus::Pending,
            now - Duration::hours(6),
        ),
        application(
            "app-3",
            "prop-1",
            "user-2",
            8.8,
            ApplicationStatus::Approved,
            now - Duration::days(20),
        ),
    ];
    for row in applications {
        store.applications.seed(row).expect("seed application");
    }

    store
        .clients
        .seed(client("client-1", "Dana", "Reyes", Some(1000), Some(1300)))
        .expect("seed client");
    store
        .clients
        .seed(client("user-2", "Sam", "Cole", None, None))
        .expect("seed client");
    store
        .leases
        .seed(lease("lease-1", "prop-1", "user-2", 1450, LeaseStatus::Active))
        .expect("seed lease");
    store
}

fn service(store: &Arc<InMemoryStore>) -> ListingService<InMemoryStore> {
    ListingService::new(store.clone(), WorkflowConfig::default())
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn property_search_applies_filter_sort_and_portal_order() {
    let store = seeded_store();
    let listings = service(&store);

    let cheapest_first = listings
        .search_properties(&PropertySearch {
            sort: Some("monthly_rent".to_string()),
            ..PropertySearch::default()
        })
        .await
        .expect("search");
    let ids: Vec<_> = cheapest_first.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["prop-3", "prop-2", "prop-1"]);

    let portal = listings
        .search_properties(&PropertySearch {
            filter: PropertyFilter {
                pets: Some(true),
                ..PropertyFilter::default()
            },
            portal: true,
            ..PropertySearch::default()
        })
        .await
        .expect("search");
    let ids: Vec<_> = portal.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["prop-3", "prop-1"]);
}

#[tokio::test]
async fn application_search_joins_and_buckets() {
    let store = seeded_store();
    let result = service(&store)
        .search_applications(
            &ApplicationSearch {
                sort: Some("-score".to_string()),
                ..ApplicationSearch::default()
            },
            Utc::now(),
        )
        .await
        .expect("search");

    assert_eq!(result.total, 3);
    let ids: Vec<_> = result
        .rows
        .iter()
        .map(|row| row.application.id.as_str())
        .collect();
    assert_eq!(ids, vec!["app-3", "app-1", "app-2"]);
    assert_eq!(result.board.pending.len(), 2);
    assert_eq!(result.board.approved.len(), 1);
    let aging: Vec<_> = result
        .rows
        .iter()
        .filter(|row| row.aging)
        .map(|row| row.application.id.as_str())
        .collect();
    assert_eq!(aging, vec!["app-1"]);
    assert_eq!(result.rows[1].applicant_name.as_deref(), Some("Priya Natarajan"));
}

#[tokio::test]
async fn client_matches_report_stage_and_budget_fits() {
    let store = seeded_store();
    let listings = service(&store);

    let dana = listings
        .client_matches(&"client-1".into())
        .await
        .expect("matches");
    assert_eq!(dana.stage, ClientStage::Lead);
    let ids: Vec<_> = dana.matches.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["prop-2", "prop-3"]);

    let sam = listings
        .client_matches(&"user-2".into())
        .await
        .expect("matches");
    assert_eq!(sam.stage, ClientStage::Leased);

    let error = listings
        .client_matches(&"client-404".into())
        .await
        .expect_err("unknown client");
    assert!(error.is_not_found());
}

#[tokio::test]
async fn dashboard_summarises_the_portfolio() {
    let store = seeded_store();
    let summary = service(&store).dashboard(Utc::now()).await.expect("dashboard");

    assert_eq!(summary.total_units, 3);
    assert_eq!(summary.leased_units, 1);
    assert_eq!(summary.available_units, 2);
    assert_eq!(summary.occupancy_rate, 33.3);
    assert_eq!(summary.applications.pending, 2);
    assert_eq!(summary.monthly_recurring_rent, 1450);
    assert_eq!(summary.aging_threshold_days, 2);
    assert_eq!(summary.aging_applications.len(), 1);
    assert_eq!(summary.recent_activity.len(), 7);
}

#[tokio::test]
async fn routes_expose_search_matches_and_dashboard() {
    let store = seeded_store();
    let router = listings_router(Arc::new(service(&store)));

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/properties/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "search": "park",
                        "bedrooms": { "mode": "at_least", "beds": 1 },
                        "status": "available"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], "prop-3");

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/applications/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "search": "sam" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["total"], 2);

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/clients/client-1/matches")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["stage"], "lead");
    assert_eq!(body["matches"][0]["id"], "prop-2");

    let response = router
        .clone()
        .oneshot(Request::get("/api/v1/clients?q=reyes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await[0]["client"]["id"], "client-1");

    let response = router
        .clone()
        .oneshot(Request::get("/api/v1/leases?q=ingersoll").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await[0]["client_name"], "Sam Cole");

    let response = router
        .oneshot(Request::get("/api/v1/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["monthly_recurring_rent"], 1450);
    assert_eq!(body["applications"]["approved"], 1);
}

#[tokio::test]
async fn oversized_aging_thresholds_flag_nothing() {
    let store = seeded_store();
    let response = listings_router(Arc::new(service(&store)))
        .oneshot(
            Request::post("/api/v1/applications/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "aging_days": u32::MAX }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["total"], 0);

    let patient = ListingService::new(
        store.clone(),
        WorkflowConfig {
            aging_days: u32::MAX,
            ..WorkflowConfig::default()
        },
    );
    let summary = patient.dashboard(Utc::now()).await.expect("dashboard");
    assert!(summary.aging_applications.is_empty());
}

#[tokio::test]
async fn unknown_clients_map_to_not_found() {
    let store = seeded_store();
    let router = listings_router(Arc::new(service(&store)));
    let response = router
        .oneshot(
            Request::get("/api/v1/clients/client-404/matches")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "store error: client client-404 not found");
}
