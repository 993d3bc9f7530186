use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rental_crm::config::WorkflowConfig;
use rental_crm::error::AppError;
use rental_crm::workflows::applications::{ApplicationIntakeService, WizardSessions};
use rental_crm::workflows::leasing::LeasingService;
use rental_crm::workflows::listings::ListingService;
use rental_crm::workflows::records::{
    ApplicantProfile, InMemoryStore, Property, PropertyImporter, User,
};
use rental_crm::workflows::uploads::InMemoryFileStorage;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services wired over the process-local store and upload backend.
pub(crate) struct CrmServices {
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) files: Arc<InMemoryFileStorage>,
    pub(crate) intake: Arc<ApplicationIntakeService<InMemoryStore, InMemoryFileStorage>>,
    pub(crate) sessions: Arc<WizardSessions>,
    pub(crate) leasing: Arc<LeasingService<InMemoryStore>>,
    pub(crate) listings: Arc<ListingService<InMemoryStore>>,
}

impl CrmServices {
    pub(crate) fn in_memory(workflow: WorkflowConfig) -> Self {
        if let Some(folder) = workflow.drive_folder_id.as_deref() {
            warn!(folder, "drive uploads need an authenticated hub; keeping files in memory");
        }

        let store = Arc::new(InMemoryStore::new());
        let files = Arc::new(InMemoryFileStorage::default());
        Self {
            intake: Arc::new(ApplicationIntakeService::new(store.clone(), files.clone())),
            sessions: Arc::new(WizardSessions::new()),
            leasing: Arc::new(LeasingService::new(store.clone())),
            listings: Arc::new(ListingService::new(store.clone(), workflow)),
            store,
            files,
        }
    }

    /// Sign in the applicant used by wizard sessions on the in-memory backend.
    pub(crate) fn sign_in(&self, user: User) -> Result<(), AppError> {
        info!(user = %user.id, "signed in local applicant");
        self.store.sign_in(user)?;
        Ok(())
    }

    pub(crate) async fn seed_properties(&self, csv: &Path) -> Result<Vec<Property>, AppError> {
        let importer = PropertyImporter::from_path(csv)?;
        let created = importer.import(&self.store.properties).await?;
        info!(count = created.len(), path = %csv.display(), "seeded properties");
        Ok(created)
    }
}

pub(crate) fn local_applicant() -> User {
    User {
        id: "local-applicant".into(),
        email: "applicant@localhost".to_string(),
        full_name: "Local Applicant".to_string(),
        phone: String::new(),
        profile: ApplicantProfile::default(),
        created_date: Utc::now(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
