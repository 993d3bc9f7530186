//! Application decisions, lease lifecycle, and the waitlist for leased units.
//!
//! Multi-record writes run as small sagas: each completed write is undone when a later one
//! fails, and an undo that itself fails is reported as [`LeasingError::Inconsistent`].

pub mod approval;
pub mod lifecycle;
pub mod router;
pub mod waitlist;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::records::{
    ApplicationId, ApplicationStatus, CrmStore, LeaseId, LeaseStatus, PropertyId, PropertyStatus,
    StoreError,
};

pub use approval::{lease_term, DecisionOutcome, DecisionReceipt, LeaseTerm};
pub use lifecycle::LeaseTransition;
pub use router::leasing_router;
pub use waitlist::WaitlistRequest;

/// Staff-side writes that span applications, properties, and leases.
pub struct LeasingService<S> {
    store: Arc<S>,
}

impl<S> LeasingService<S>
where
    S: CrmStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

/// The write a saga was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaStage {
    PropertyStatus,
    LeaseCreate,
}

impl fmt::Display for SagaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SagaStage::PropertyStatus => "property status update",
            SagaStage::LeaseCreate => "lease creation",
        };
        f.write_str(label)
    }
}

/// Error raised by the leasing service.
#[derive(Debug, thiserror::Error)]
pub enum LeasingError {
    #[error("application {id} is already {}", .status.label())]
    AlreadyDecided {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error("property {property_id} already has active lease {lease_id}")]
    ActiveLeaseExists {
        property_id: PropertyId,
        lease_id: LeaseId,
    },
    #[error("lease {id} is {} and can no longer change", .status.label())]
    LeaseNotActive { id: LeaseId, status: LeaseStatus },
    #[error("property {property_id} is {}; only leased units take a waitlist", .status.label())]
    PropertyNotLeased {
        property_id: PropertyId,
        status: PropertyStatus,
    },
    #[error("no lease term can start after {0}")]
    LeaseTerm(DateTime<Utc>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{stage} failed and earlier writes were undone: {source}")]
    RolledBack { stage: SagaStage, source: StoreError },
    #[error("{stage} failed and {} could not be restored: {source}", .records.join(", "))]
    Inconsistent {
        stage: SagaStage,
        records: Vec<String>,
        source: StoreError,
    },
}

impl LeasingError {
    /// Outcome of a failed saga step once compensation has been attempted.
    pub(crate) fn after_compensation(
        stage: SagaStage,
        source: StoreError,
        unrestored: Vec<String>,
    ) -> Self {
        if unrestored.is_empty() {
            LeasingError::RolledBack { stage, source }
        } else {
            LeasingError::Inconsistent {
                stage,
                records: unrestored,
                source,
            }
        }
    }
}
