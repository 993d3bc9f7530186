use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{LeasingError, LeasingService, SagaStage};
use crate::workflows::records::{
    ApplicationId, ApplicationPatch, ApplicationStatus, ClientId, CrmStore, FieldFilter, Lease,
    LeaseStatus, NewLease, Property, PropertyPatch, PropertyStatus, RentalApplication,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    Denied,
}

impl DecisionOutcome {
    fn status(self) -> ApplicationStatus {
        match self {
            DecisionOutcome::Approved => ApplicationStatus::Approved,
            DecisionOutcome::Denied => ApplicationStatus::Denied,
        }
    }
}

/// Records touched by a decision. Denials carry only the application.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReceipt {
    pub application: RentalApplication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease: Option<Lease>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaseTerm {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One-year term starting on the first day of the month after `now`.
pub fn lease_term(now: DateTime<Utc>) -> Option<LeaseTerm> {
    let start = now
        .date_naive()
        .with_day(1)?
        .checked_add_months(Months::new(1))?;
    let end = start.checked_add_months(Months::new(12))?;
    Some(LeaseTerm { start, end })
}

impl<S> LeasingService<S>
where
    S: CrmStore + 'static,
{
    /// Apply the one decision a pending application gets.
    ///
    /// Approval writes the application, then the property, then the lease. A failed write
    /// undoes the earlier ones in reverse order.
    pub async fn decide(
        &self,
        application_id: &ApplicationId,
        outcome: DecisionOutcome,
        now: DateTime<Utc>,
    ) -> Result<DecisionReceipt, LeasingError> {
        let applications = self.store.applications();
        let application = applications.get(application_id).await?;
        if application.status != ApplicationStatus::Pending {
            return Err(LeasingError::AlreadyDecided {
                id: application.id,
                status: application.status,
            });
        }

        if outcome == DecisionOutcome::Denied {
            let application = applications
                .update(application_id, ApplicationPatch::decided(outcome.status(), now))
                .await?;
            info!(application_id = %application.id, "application denied");
            return Ok(DecisionReceipt {
                application,
                property: None,
                lease: None,
            });
        }

        let property = self.store.properties().get(&application.property_id).await?;
        let active = self
            .store
            .leases()
            .filter(
                &FieldFilter::new()
                    .eq("property_id", property.id.as_str())
                    .eq("status", LeaseStatus::Active.label()),
                None,
            )
            .await?;
        if let Some(existing) = active.into_iter().next() {
            return Err(LeasingError::ActiveLeaseExists {
                property_id: property.id,
                lease_id: existing.id,
            });
        }
        let term = lease_term(now).ok_or(LeasingError::LeaseTerm(now))?;

        let approved = applications
            .update(application_id, ApplicationPatch::decided(outcome.status(), now))
            .await?;

        let leased = match self
            .store
            .properties()
            .update(&property.id, PropertyPatch::status(PropertyStatus::Leased))
            .await
        {
            Ok(leased) => leased,
            Err(source) => {
                let mut unrestored = Vec::new();
                self.reopen_application(application_id, &mut unrestored)
                    .await;
                return Err(LeasingError::after_compensation(
                    SagaStage::PropertyStatus,
                    source,
                    unrestored,
                ));
            }
        };

        let lease = match self
            .store
            .leases()
            .create(NewLease {
                property_id: property.id.clone(),
                client_id: ClientId(approved.user_id.0.clone()),
                start_date: term.start,
                end_date: term.end,
                monthly_rent: property.monthly_rent,
                deposit: property.monthly_rent,
                payment_day: 1,
                status: LeaseStatus::Active,
            })
            .await
        {
            Ok(lease) => lease,
            Err(source) => {
                let mut unrestored = Vec::new();
                if let Err(error) = self
                    .store
                    .properties()
                    .update(&property.id, PropertyPatch::status(property.status))
                    .await
                {
                    warn!(property_id = %property.id, %error, "property status not restored");
                    unrestored.push(format!("property {}", property.id));
                }
                self.reopen_application(application_id, &mut unrestored)
                    .await;
                return Err(LeasingError::after_compensation(
                    SagaStage::LeaseCreate,
                    source,
                    unrestored,
                ));
            }
        };

        info!(
            application_id = %approved.id,
            property_id = %leased.id,
            lease_id = %lease.id,
            start = %lease.start_date,
            "application approved and lease created"
        );
        Ok(DecisionReceipt {
            application: approved,
            property: Some(leased),
            lease: Some(lease),
        })
    }

    async fn reopen_application(&self, id: &ApplicationId, unrestored: &mut Vec<String>) {
        match self
            .store
            .applications()
            .update(id, ApplicationPatch::reopen())
            .await
        {
            Ok(_) => info!(application_id = %id, "approval compensated; application pending again"),
            Err(error) => {
                warn!(application_id = %id, %error, "application decision not reverted");
                unrestored.push(format!("application {id}"));
            }
        }
    }
}
