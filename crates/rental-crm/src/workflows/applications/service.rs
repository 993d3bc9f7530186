use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::documents::{DocumentBuffers, DocumentCategory, DocumentLinks, MissingDocument};
use super::draft::FinalizedDraft;
use super::scoring::applicant_score;
use super::steps::WizardStep;
use super::validation::validate_step;
use super::wizard::{ApplicationWizard, WizardError};
use crate::workflows::records::{
    CrmStore, NewApplication, Property, PropertyId, PropertyStatus, RentalApplication,
    StoreError, UserId,
};
use crate::workflows::uploads::{upload_batch, FileStorage, UploadError};

/// Service opening application wizards and turning finished ones into stored applications.
pub struct ApplicationIntakeService<S, F> {
    store: Arc<S>,
    files: Arc<F>,
}

/// One document that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub category: DocumentCategory,
    pub error: UploadError,
}

/// Whether the applicant's profile fields made it back onto their user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileSync {
    Saved,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub application: RentalApplication,
    pub profile_sync: ProfileSync,
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("property {property_id} is {} and not accepting applications", .status.label())]
    PropertyUnavailable {
        property_id: PropertyId,
        status: PropertyStatus,
    },
    #[error("applications are submitted from {}, not {}", WizardStep::LAST.title(), .step.title())]
    NotOnReviewStep { step: WizardStep },
    #[error("missing required documents: {}", describe_missing(.missing))]
    MissingDocuments { missing: Vec<MissingDocument> },
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("document upload failed, please try again")]
    UploadFailed { failures: Vec<UploadFailure> },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("submission stopped before finishing: {0}")]
    Interrupted(String),
}

fn describe_missing(missing: &[MissingDocument]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl<S, F> ApplicationIntakeService<S, F>
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
        Self { store, files }
    }

    /// Open a wizard for the signed-in applicant, prefilled from their profile.
    pub async fn start(&self, property_id: &PropertyId) -> Result<ApplicationWizard, IntakeError> {
        let (user, property) = tokio::try_join!(
            self.store.session().me(),
            self.store.properties().get(property_id)
        )?;

        if property.status != PropertyStatus::Available {
            return Err(IntakeError::PropertyUnavailable {
                property_id: property.id,
                status: property.status,
            });
        }

        Ok(ApplicationWizard::new(property, &user))
    }

    /// Upload the buffered documents and create the application.
    ///
    /// Missing documents are reported before anything is uploaded. Any failed upload, optional
    /// categories included, aborts the submit and leaves the wizard on the review step with its
    /// files intact.
    pub async fn submit(
        &self,
        wizard: &mut ApplicationWizard,
    ) -> Result<SubmissionOutcome, IntakeError> {
        let step = wizard.current_step();
        if !step.is_last() {
            return Err(IntakeError::NotOnReviewStep { step });
        }
        if wizard.is_submitting() {
            return Err(WizardError::Submitting.into());
        }

        let missing = wizard.documents().missing();
        if !missing.is_empty() {
            return Err(IntakeError::MissingDocuments { missing });
        }

        let review = validate_step(step, wizard.draft(), None);
        if !review.is_empty() {
            wizard.replace_errors(review.clone());
            return Err(WizardError::Invalid {
                step,
                errors: review,
            }
            .into());
        }

        let finalized = match wizard.draft().finalize() {
            Ok(finalized) => finalized,
            Err((step, errors)) => {
                wizard.replace_errors(errors.clone());
                return Err(WizardError::Invalid { step, errors }.into());
            }
        };

        let job = Submission {
            property: wizard.property().clone(),
            applicant: wizard.applicant().clone(),
            documents: wizard.documents().clone(),
            finalized,
        };
        let _submitting = SubmittingGuard::engage(wizard);
        let task = tokio::spawn(persist(
            Arc::clone(&self.store),
            Arc::clone(&self.files),
            job,
        ));
        task.await
            .map_err(|err| IntakeError::Interrupted(err.to_string()))?
    }
}

/// Everything a submit needs once it leaves the wizard.
struct Submission {
    property: Property,
    applicant: UserId,
    documents: DocumentBuffers,
    finalized: FinalizedDraft,
}

/// Holds the wizard's submitting flag for the lifetime of one submit, including a dropped one.
struct SubmittingGuard<'a> {
    wizard: &'a mut ApplicationWizard,
}

impl<'a> SubmittingGuard<'a> {
    fn engage(wizard: &'a mut ApplicationWizard) -> Self {
        wizard.set_submitting(true);
        Self { wizard }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.wizard.set_submitting(false);
    }
}

/// Runs detached from the caller so a dropped request does not cancel uploads in flight.
async fn persist<S, F>(
    store: Arc<S>,
    files: Arc<F>,
    job: Submission,
) -> Result<SubmissionOutcome, IntakeError>
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Submission {
        property,
        applicant,
        documents,
        finalized,
    } = job;
    let links = upload_documents(files.as_ref(), &documents).await?;

    let score = applicant_score(finalized.monthly_income, property.monthly_rent);
    let profile = finalized.profile.clone();
    let application = store
        .applications()
        .create(NewApplication {
            property_id: property.id.clone(),
            user_id: applicant,
            payload: finalized.into_payload(links),
            score,
            docs_complete: documents.completeness(),
        })
        .await?;
    info!(
        application_id = %application.id,
        property_id = %application.property_id,
        score,
        "rental application submitted"
    );

    let profile_sync = match store.session().update_my_user_data(profile).await {
        Ok(_) => ProfileSync::Saved,
        Err(error) => {
            warn!(
                application_id = %application.id,
                %error,
                "applicant profile not saved; application kept"
            );
            ProfileSync::Failed {
                reason: error.to_string(),
            }
        }
    };

    Ok(SubmissionOutcome {
        application,
        profile_sync,
    })
}

/// Upload every buffer. Any failed document fails the whole batch.
async fn upload_documents(
    storage: &dyn FileStorage,
    documents: &DocumentBuffers,
) -> Result<DocumentLinks, IntakeError> {
    let batches = DocumentCategory::ALL.map(|category| async move {
        let results = upload_batch(storage, documents.files(category)).await;
        (category, results)
    });

    let mut links = DocumentLinks::default();
    let mut failures = Vec::new();
    for (category, results) in join_all(batches).await {
        let mut uploaded = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(document) => uploaded.push(document),
                Err(error) => failures.push(UploadFailure { category, error }),
            }
        }
        links.record(category, uploaded);
    }

    if !failures.is_empty() {
        warn!(failed = failures.len(), "aborting submit after upload failures");
        return Err(IntakeError::UploadFailed { failures });
    }
    Ok(links)
}
