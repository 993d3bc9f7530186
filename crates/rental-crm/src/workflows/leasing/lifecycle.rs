use serde::Serialize;
use tracing::{info, warn};

use super::{LeasingError, LeasingService, SagaStage};
use crate::workflows::records::{
    CrmStore, Lease, LeaseId, LeasePatch, LeaseStatus, Property, PropertyPatch, PropertyStatus,
};

#[derive(Debug, Clone, Serialize)]
pub struct LeaseTransition {
    pub lease: Lease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
}

impl<S> LeasingService<S>
where
    S: CrmStore + 'static,
{
    /// End an active lease and put its unit back on the market.
    pub async fn end_lease(&self, lease_id: &LeaseId) -> Result<LeaseTransition, LeasingError> {
        let lease = self.active_lease(lease_id).await?;
        let ended = self
            .store
            .leases()
            .update(
                lease_id,
                LeasePatch {
                    status: Some(LeaseStatus::Ended),
                },
            )
            .await?;

        let property = match self
            .store
            .properties()
            .update(
                &lease.property_id,
                PropertyPatch::status(PropertyStatus::Available),
            )
            .await
        {
            Ok(property) => property,
            Err(source) => {
                let mut unrestored = Vec::new();
                let revert = LeasePatch {
                    status: Some(LeaseStatus::Active),
                };
                if let Err(error) = self.store.leases().update(lease_id, revert).await {
                    warn!(lease_id = %lease_id, %error, "lease status not restored");
                    unrestored.push(format!("lease {lease_id}"));
                }
                return Err(LeasingError::after_compensation(
                    SagaStage::PropertyStatus,
                    source,
                    unrestored,
                ));
            }
        };

        info!(lease_id = %ended.id, property_id = %property.id, "lease ended; unit available");
        Ok(LeaseTransition {
            lease: ended,
            property: Some(property),
        })
    }

    pub async fn renew_lease(&self, lease_id: &LeaseId) -> Result<LeaseTransition, LeasingError> {
        self.active_lease(lease_id).await?;
        let renewed = self
            .store
            .leases()
            .update(
                lease_id,
                LeasePatch {
                    status: Some(LeaseStatus::Renewed),
                },
            )
            .await?;
        info!(lease_id = %renewed.id, "lease renewed");
        Ok(LeaseTransition {
            lease: renewed,
            property: None,
        })
    }

    async fn active_lease(&self, lease_id: &LeaseId) -> Result<Lease, LeasingError> {
        let lease = self.store.leases().get(lease_id).await?;
        if lease.status != LeaseStatus::Active {
            return Err(LeasingError::LeaseNotActive {
                id: lease.id,
                status: lease.status,
            });
        }
        Ok(lease)
    }
}
