//! Read-side views over the CRM collections: filters, joins, client matching, and the dashboard.
//!
//! Every projection here is a pure function of the loaded records. Results keep the source
//! collection's order unless a sort key is requested.

pub mod applications;
pub mod clients;
pub mod dashboard;
pub mod leases;
pub mod properties;
pub mod router;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WorkflowConfig;
use crate::workflows::records::{ClientId, CrmStore, Property, SortKey, StoreError};

pub use applications::{is_aging, join_rows, ApplicationBoard, ApplicationFilter, ApplicationRow};
pub use clients::{client_stage, matching_properties, search_clients, ClientMatches, ClientStage};
pub use dashboard::{ActivityEntry, ActivityKind, ApplicationCounts, DashboardSummary};
pub use leases::{join_leases, search_leases, LeaseRow};
pub use properties::{neighbourhoods, portal_order, BedroomFilter, PropertyFilter};
pub use router::listings_router;

/// Case-insensitive substring test of `term` against any of `fields`. A blank term matches.
pub(crate) fn matches_term<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertySearch {
    #[serde(flatten)]
    pub filter: PropertyFilter,
    /// Sort key such as `monthly_rent` or `-created_date`.
    pub sort: Option<String>,
    /// Order leased units after open ones, as the public portal shows them.
    pub portal: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationSearch {
    #[serde(flatten)]
    pub filter: ApplicationFilter,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSearchResult {
    pub total: usize,
    pub rows: Vec<ApplicationRow>,
    pub board: ApplicationBoard,
}

/// Loads collections from the store and runs the projections over them.
pub struct ListingService<S> {
    store: Arc<S>,
    workflow: WorkflowConfig,
}

impl<S> ListingService<S>
where
    S: CrmStore + 'static,
{
    pub fn new(store: Arc<S>, workflow: WorkflowConfig) -> Self {
        Self { store, workflow }
    }

    pub fn workflow(&self) -> &WorkflowConfig {
        &self.workflow
    }

    pub async fn search_properties(
        &self,
        search: &PropertySearch,
    ) -> Result<Vec<Property>, StoreError> {
        let sort = requested_sort(search.sort.as_deref());
        let properties = self.store.properties().list(sort.as_ref()).await?;
        let matched = search.filter.apply(&properties);
        debug!(
            total = properties.len(),
            matched = matched.len(),
            "property search"
        );
        Ok(if search.portal {
            portal_order(matched)
        } else {
            matched
        })
    }

    pub async fn search_applications(
        &self,
        search: &ApplicationSearch,
        now: DateTime<Utc>,
    ) -> Result<ApplicationSearchResult, StoreError> {
        let sort = requested_sort(search.sort.as_deref());
        let (applications, users, properties) = tokio::try_join!(
            self.store.applications().list(sort.as_ref()),
            self.store.users().list(None),
            self.store.properties().list(None),
        )?;
        let rows = join_rows(
            applications,
            &users,
            &properties,
            now,
            self.workflow.aging_days,
        );
        let rows = search.filter.apply(&rows, now);
        Ok(ApplicationSearchResult {
            total: rows.len(),
            board: ApplicationBoard::from_rows(rows.clone()),
            rows,
        })
    }

    pub async fn client_matches(&self, client_id: &ClientId) -> Result<ClientMatches, StoreError> {
        let (client, properties, applications, leases) = tokio::try_join!(
            self.store.clients().get(client_id),
            self.store.properties().list(None),
            self.store.applications().list(None),
            self.store.leases().list(None),
        )?;
        let stage = client_stage(&client, &applications, &leases);
        let matches = matching_properties(&client, &properties, self.workflow.match_limit);
        Ok(ClientMatches {
            stage,
            stage_label: stage.label(),
            matches,
            client,
        })
    }

    pub async fn search_clients(&self, term: &str) -> Result<Vec<ClientMatches>, StoreError> {
        let newest = SortKey::newest_first();
        let (clients, properties, applications, leases) = tokio::try_join!(
            self.store.clients().list(Some(&newest)),
            self.store.properties().list(None),
            self.store.applications().list(None),
            self.store.leases().list(None),
        )?;
        Ok(search_clients(&clients, term)
            .into_iter()
            .map(|client| {
                let stage = client_stage(&client, &applications, &leases);
                ClientMatches {
                    stage,
                    stage_label: stage.label(),
                    matches: matching_properties(&client, &properties, self.workflow.match_limit),
                    client,
                }
            })
            .collect())
    }

    pub async fn search_leases(&self, term: &str) -> Result<Vec<LeaseRow>, StoreError> {
        let newest = SortKey::newest_first();
        let (leases, properties, clients, users) = tokio::try_join!(
            self.store.leases().list(Some(&newest)),
            self.store.properties().list(None),
            self.store.clients().list(None),
            self.store.users().list(None),
        )?;
        let rows = join_leases(leases, &properties, &clients, &users);
        Ok(search_leases(&rows, term))
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary, StoreError> {
        let newest = SortKey::newest_first();
        let (properties, applications, leases) = tokio::try_join!(
            self.store.properties().list(Some(&newest)),
            self.store.applications().list(Some(&newest)),
            self.store.leases().list(Some(&newest)),
        )?;
        Ok(DashboardSummary::build(
            &properties,
            &applications,
            &leases,
            now,
            self.workflow.aging_days,
        ))
    }
}

fn requested_sort(raw: Option<&str>) -> Option<SortKey> {
    raw.and_then(SortKey::parse)
}
