//! Applicant intake: the multi-step wizard, its validation rules, and submission into a
//! stored rental application.

pub mod documents;
pub mod draft;
pub mod router;
pub mod scoring;
pub mod service;
pub mod sessions;
pub mod steps;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use documents::{DocumentBuffers, DocumentCategory, DocumentLinks, MissingDocument};
pub use draft::{
    ApplicationDraft, CoApplicantField, DraftField, EntryUpdate, FinalizedDraft, GroupKind,
    OccupantField, PetField, ReferenceField, VehicleField,
};
pub use router::{intake_router, IntakeState, FILE_NAME_HEADER};
pub use scoring::applicant_score;
pub use service::{
    ApplicationIntakeService, IntakeError, ProfileSync, SubmissionOutcome, UploadFailure,
};
pub use sessions::{SessionId, WizardSessions, DEFAULT_IDLE_TIMEOUT};
pub use steps::WizardStep;
pub use validation::{validate_step, ValidationErrors};
pub use wizard::{ApplicationWizard, WizardError, WizardView};
