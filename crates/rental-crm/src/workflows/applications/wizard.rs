use serde::Serialize;

use super::documents::{DocumentBuffers, DocumentCategory, DocumentSlotView};
use super::draft::{ApplicationDraft, DraftField, EntryUpdate, GroupKind};
use super::steps::WizardStep;
use super::validation::{validate_step, ValidationErrors};
use crate::workflows::records::{Property, PropertyId, User, UserId};
use crate::workflows::uploads::PendingFile;

/// Error raised by wizard navigation and edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("{} has invalid fields: {errors}", .step.title())]
    Invalid {
        step: WizardStep,
        errors: ValidationErrors,
    },
    #[error("no {} entry at index {index}", .group.key())]
    UnknownEntry { group: GroupKind, index: usize },
    #[error("no {category} file at index {index}")]
    UnknownDocument {
        category: DocumentCategory,
        index: usize,
    },
    #[error("application is being submitted")]
    Submitting,
}

/// Multi-step rental application for one property and one applicant.
///
/// Edits clear the edited key's error immediately; the step is only re-validated on the next
/// `advance`.
#[derive(Debug, Clone)]
pub struct ApplicationWizard {
    property: Property,
    applicant: UserId,
    current_step: WizardStep,
    draft: ApplicationDraft,
    errors: ValidationErrors,
    documents: DocumentBuffers,
    submitting: bool,
}

/// Serializable snapshot of the wizard for the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub property_id: PropertyId,
    pub property_title: String,
    pub step: WizardStep,
    pub step_title: &'static str,
    pub step_index: usize,
    pub step_count: usize,
    pub progress_percent: f64,
    pub draft: ApplicationDraft,
    pub validation_errors: ValidationErrors,
    pub documents: Vec<DocumentSlotView>,
    pub submitting: bool,
}

impl ApplicationWizard {
    pub fn new(property: Property, applicant: &User) -> Self {
        Self {
            property,
            applicant: applicant.id.clone(),
            current_step: WizardStep::FIRST,
            draft: ApplicationDraft::prefilled(applicant),
            errors: ValidationErrors::default(),
            documents: DocumentBuffers::default(),
            submitting: false,
        }
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn applicant(&self) -> &UserId {
        &self.applicant
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn documents(&self) -> &DocumentBuffers {
        &self.documents
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub(crate) fn replace_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub fn progress_percent(&self) -> f64 {
        (self.current_step.index() + 1) as f64 / WizardStep::COUNT as f64 * 100.0
    }

    /// Validate the current step and move forward, clamped at the last step.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        let errors = validate_step(self.current_step, &self.draft, Some(&self.documents));
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(WizardError::Invalid {
                step: self.current_step,
                errors,
            });
        }

        self.errors = ValidationErrors::default();
        self.current_step = self.current_step.next();
        Ok(self.current_step)
    }

    /// Move back without validating, clamped at the first step.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_idle()?;
        self.current_step = self.current_step.previous();
        Ok(self.current_step)
    }

    pub fn set_field(&mut self, field: DraftField) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.errors.remove(field.key());
        self.draft.set(field);
        Ok(())
    }

    pub fn add_entry(&mut self, group: GroupKind) -> Result<usize, WizardError> {
        self.ensure_idle()?;
        Ok(self.draft.append(group))
    }

    /// Remove an entry. Later entries shift down, so the group's entry errors are dropped.
    pub fn remove_entry(&mut self, group: GroupKind, index: usize) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if !self.draft.remove(group, index) {
            return Err(WizardError::UnknownEntry { group, index });
        }
        self.errors.remove_prefixed(&group.entry_prefix());
        Ok(())
    }

    pub fn update_entry(&mut self, index: usize, update: EntryUpdate) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let group = update.group();
        let key = update.error_key(index);
        if !self.draft.update_entry(index, update) {
            return Err(WizardError::UnknownEntry { group, index });
        }
        self.errors.remove(&key);
        Ok(())
    }

    pub fn attach_document(
        &mut self,
        category: DocumentCategory,
        file: PendingFile,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.documents.attach(category, file);
        self.errors.remove(category.key());
        Ok(())
    }

    pub fn detach_document(
        &mut self,
        category: DocumentCategory,
        index: usize,
    ) -> Result<PendingFile, WizardError> {
        self.ensure_idle()?;
        self.documents
            .detach(category, index)
            .ok_or(WizardError::UnknownDocument { category, index })
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            property_id: self.property.id.clone(),
            property_title: self.property.title.clone(),
            step: self.current_step,
            step_title: self.current_step.title(),
            step_index: self.current_step.index(),
            step_count: WizardStep::COUNT,
            progress_percent: self.progress_percent(),
            draft: self.draft.clone(),
            validation_errors: self.errors.clone(),
            documents: self.documents.slots(),
            submitting: self.submitting,
        }
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.submitting {
            return Err(WizardError::Submitting);
        }
        Ok(())
    }
}
