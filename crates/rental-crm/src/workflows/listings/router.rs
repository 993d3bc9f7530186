use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::{
    ApplicationSearch, ApplicationSearchResult, ClientMatches, DashboardSummary, LeaseRow,
    ListingService, PropertySearch,
};
use crate::error::AppError;
use crate::workflows::records::{ClientId, CrmStore, Property};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Router builder exposing the staff and portal read views.
pub fn listings_router<S>(service: Arc<ListingService<S>>) -> Router
where
    S: CrmStore + 'static,
{
    Router::new()
        .route("/api/v1/properties/search", post(property_search_handler::<S>))
        .route(
            "/api/v1/applications/search",
            post(application_search_handler::<S>),
        )
        .route("/api/v1/clients", get(client_search_handler::<S>))
        .route(
            "/api/v1/clients/:client_id/matches",
            get(client_matches_handler::<S>),
        )
        .route("/api/v1/leases", get(lease_search_handler::<S>))
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .with_state(service)
}

pub(crate) async fn property_search_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Json(search): Json<PropertySearch>,
) -> Result<Json<Vec<Property>>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.search_properties(&search).await?))
}

pub(crate) async fn application_search_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Json(search): Json<ApplicationSearch>,
) -> Result<Json<ApplicationSearchResult>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.search_applications(&search, Utc::now()).await?))
}

pub(crate) async fn client_search_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ClientMatches>>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.search_clients(&query.q).await?))
}

pub(crate) async fn client_matches_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Path(client_id): Path<String>,
) -> Result<Json<ClientMatches>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.client_matches(&ClientId(client_id)).await?))
}

pub(crate) async fn lease_search_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<LeaseRow>>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.search_leases(&query.q).await?))
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<ListingService<S>>>,
) -> Result<Json<DashboardSummary>, AppError>
where
    S: CrmStore + 'static,
{
    Ok(Json(service.dashboard(Utc::now()).await?))
}
