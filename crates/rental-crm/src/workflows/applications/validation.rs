use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::documents::{DocumentBuffers, DocumentCategory};
use super::draft::{ApplicationDraft, GroupKind};
use super::steps::WizardStep;

/// Field key to message, e.g. `"vehicles[0].make" -> "is required"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Drop every key starting with `prefix`.
    pub fn remove_prefixed(&mut self, prefix: &str) {
        self.0.retain(|key, _| !key.starts_with(prefix));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn require_text(&mut self, key: impl Into<String>, value: &str) {
        if value.trim().is_empty() {
            self.insert(key, "is required");
        }
    }

    fn require<T>(&mut self, key: impl Into<String>, value: &Option<T>) {
        if value.is_none() {
            self.insert(key, "is required");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key} {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Check the fields a step marks as required. Document checks need `documents`.
pub fn validate_step(
    step: WizardStep,
    draft: &ApplicationDraft,
    documents: Option<&DocumentBuffers>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    match step {
        WizardStep::PersonalInformation => {
            let personal = &draft.personal;
            errors.require_text("full_name", &personal.full_name);
            errors.require_text("phone", &personal.phone);
            errors.require("date_of_birth", &personal.date_of_birth);
            let ssn = personal.ssn_last4.trim();
            if ssn.is_empty() {
                errors.insert("ssn_last4", "is required");
            } else if ssn.len() != 4 || !ssn.chars().all(|c| c.is_ascii_digit()) {
                errors.insert("ssn_last4", "must be exactly four digits");
            }
            errors.require_text("emergency_contact_name", &personal.emergency_contact_name);
            errors.require_text("emergency_contact_phone", &personal.emergency_contact_phone);
            errors.require_text(
                "emergency_contact_relationship",
                &personal.emergency_contact_relationship,
            );
        }
        WizardStep::ResidentialHistory => {
            let residence = &draft.residence;
            errors.require_text("current_address", &residence.current_address);
            match residence.current_address_rent {
                None => errors.insert("current_address_rent", "is required"),
                Some(rent) if rent < 0.0 || !rent.is_finite() => {
                    errors.insert("current_address_rent", "must be zero or more")
                }
                Some(_) => {}
            }
            errors.require_text("current_landlord_name", &residence.current_landlord_name);
            errors.require_text("current_landlord_phone", &residence.current_landlord_phone);
            errors.require_text("reason_for_moving", &residence.reason_for_moving);
        }
        WizardStep::EmploymentIncome => {
            let employment = &draft.employment;
            errors.require("employment_status", &employment.employment_status);
            errors.require_text("employer_name", &employment.employer_name);
            errors.require_text("job_title", &employment.job_title);
            match employment.monthly_income {
                None => errors.insert("monthly_income", "is required"),
                Some(income) if income <= 0.0 || !income.is_finite() => {
                    errors.insert("monthly_income", "must be greater than zero")
                }
                Some(_) => {}
            }
            errors.require_text("employment_length", &employment.employment_length);
        }
        WizardStep::AdditionalOccupants => {
            let household = &draft.household;
            for (index, co_applicant) in household.co_applicants.iter().enumerate() {
                let group = GroupKind::CoApplicants;
                errors.require_text(group.entry_key(index, "full_name"), &co_applicant.full_name);
                errors.require_text(group.entry_key(index, "email"), &co_applicant.email);
            }
            for (index, occupant) in household.other_occupants.iter().enumerate() {
                errors.require_text(
                    GroupKind::OtherOccupants.entry_key(index, "name"),
                    &occupant.name,
                );
            }
        }
        WizardStep::Vehicles => {
            let section = &draft.vehicles;
            for (index, vehicle) in section.vehicles.iter().enumerate() {
                let group = GroupKind::Vehicles;
                errors.require_text(group.entry_key(index, "make"), &vehicle.make);
                errors.require_text(group.entry_key(index, "model"), &vehicle.model);
                errors.require_text(
                    group.entry_key(index, "license_plate"),
                    &vehicle.license_plate,
                );
            }
            if section.parking_required && !section.parking_fee_accept {
                errors.insert(
                    "parking_fee_accept",
                    "must be accepted when parking is required",
                );
            }
        }
        WizardStep::Pets => {
            let section = &draft.pets;
            for (index, pet) in section.pets.iter().enumerate() {
                errors.require_text(GroupKind::Pets.entry_key(index, "name"), &pet.name);
                errors.require_text(GroupKind::Pets.entry_key(index, "type"), &pet.kind);
            }
            if !section.pets.is_empty() && !section.pet_policy_ack {
                errors.insert(
                    "pet_policy_ack",
                    "must be acknowledged when pets are listed",
                );
            }
        }
        WizardStep::BackgroundDeclarations => {
            let background = &draft.background;
            let declarations = [
                (
                    "has_been_bankrupt",
                    background.has_been_bankrupt,
                    "bankruptcy_details",
                    &background.bankruptcy_details,
                ),
                (
                    "has_been_evicted",
                    background.has_been_evicted,
                    "eviction_details",
                    &background.eviction_details,
                ),
                (
                    "has_committed_felony",
                    background.has_committed_felony,
                    "felony_details",
                    &background.felony_details,
                ),
            ];
            for (answer_key, answer, details_key, details) in declarations {
                match answer {
                    None => errors.insert(answer_key, "must be answered"),
                    Some(true) if details.trim().is_empty() => {
                        errors.insert(details_key, "must be explained when answered yes")
                    }
                    Some(_) => {}
                }
            }
            for (index, reference) in background.personal_references.iter().enumerate() {
                let group = GroupKind::PersonalReferences;
                errors.require_text(group.entry_key(index, "name"), &reference.name);
                errors.require_text(group.entry_key(index, "phone"), &reference.phone);
            }
            errors.require("desired_move_date", &background.desired_move_date);
        }
        WizardStep::DocumentUpload => {
            if let Some(documents) = documents {
                for missing in documents.missing() {
                    let message = if missing.category == DocumentCategory::PayStubs {
                        format!(
                            "needs at least {} files ({} attached)",
                            missing.required, missing.attached
                        )
                    } else {
                        "is required".to_string()
                    };
                    errors.insert(missing.category.key(), message);
                }
            }
        }
        WizardStep::ReviewSubmit => {
            if !draft.review.agrees_to_terms {
                errors.insert("agrees_to_terms", "must be accepted");
            }
        }
    }

    errors
}
