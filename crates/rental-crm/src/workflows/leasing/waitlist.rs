use serde::Deserialize;
use tracing::info;

use super::{LeasingError, LeasingService};
use crate::workflows::records::{
    Client, ClientStatus, CrmStore, LeadSource, NewClient, PropertyId, PropertyStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
}

impl<S> LeasingService<S>
where
    S: CrmStore + 'static,
{
    /// Capture a portal lead for a unit that is currently leased.
    pub async fn join_waitlist(
        &self,
        property_id: &PropertyId,
        request: WaitlistRequest,
    ) -> Result<Client, LeasingError> {
        let property = self.store.properties().get(property_id).await?;
        if property.status != PropertyStatus::Leased {
            return Err(LeasingError::PropertyNotLeased {
                property_id: property.id,
                status: property.status,
            });
        }

        let client = self
            .store
            .clients()
            .create(NewClient {
                first_name: "Waitlist Lead".to_string(),
                last_name: format!("for {}", property.id),
                email: request.email.trim().to_string(),
                phone: "N/A".to_string(),
                budget_min: None,
                budget_max: None,
                prefs_text: format!(
                    "Waitlisted for property: {} ({})",
                    property.title, property.address
                ),
                notes: String::new(),
                source: LeadSource::Portal,
                status: ClientStatus::Active,
            })
            .await?;
        info!(client_id = %client.id, property_id = %property.id, "waitlist lead captured");
        Ok(client)
    }
}
