use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::documents::DocumentLinks;
use super::steps::WizardStep;
use super::validation::{validate_step, ValidationErrors};
use crate::workflows::records::{
    ApplicantProfile, ApplicationPayload, CoApplicant, EmploymentStatus, Occupant,
    PersonalReference, Pet, User, Vehicle,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalSection {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub ssn_last4: String,
    pub driver_license_number: String,
    pub driver_license_state: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidenceSection {
    pub current_address: String,
    pub current_address_rent: Option<f64>,
    pub current_landlord_name: String,
    pub current_landlord_phone: String,
    pub reason_for_moving: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentSection {
    pub employment_status: Option<EmploymentStatus>,
    pub employer_name: String,
    pub job_title: String,
    pub monthly_income: Option<f64>,
    pub employment_length: String,
    pub other_income_source: String,
    pub other_income_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSection {
    pub co_applicants: Vec<CoApplicant>,
    pub other_occupants: Vec<Occupant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleSection {
    pub vehicles: Vec<Vehicle>,
    pub parking_required: bool,
    pub parking_fee_accept: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetSection {
    pub pets: Vec<Pet>,
    pub pet_policy_ack: bool,
}

/// Yes/no declarations stay `None` until the applicant answers them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSection {
    pub has_been_bankrupt: Option<bool>,
    pub bankruptcy_details: String,
    pub has_been_evicted: Option<bool>,
    pub eviction_details: String,
    pub has_committed_felony: Option<bool>,
    pub felony_details: String,
    pub personal_references: Vec<PersonalReference>,
    pub desired_move_date: Option<NaiveDate>,
    pub additional_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSection {
    pub agrees_to_terms: bool,
}

/// Everything typed so far, one section per wizard page. Never reset while the wizard lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub personal: PersonalSection,
    pub residence: ResidenceSection,
    pub employment: EmploymentSection,
    pub household: HouseholdSection,
    pub vehicles: VehicleSection,
    pub pets: PetSection,
    pub background: BackgroundSection,
    pub review: ReviewSection,
}

/// One scalar edit to the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftField {
    FullName(String),
    Email(String),
    Phone(String),
    DateOfBirth(Option<NaiveDate>),
    SsnLast4(String),
    DriverLicenseNumber(String),
    DriverLicenseState(String),
    EmergencyContactName(String),
    EmergencyContactPhone(String),
    EmergencyContactRelationship(String),
    CurrentAddress(String),
    CurrentAddressRent(Option<f64>),
    CurrentLandlordName(String),
    CurrentLandlordPhone(String),
    ReasonForMoving(String),
    EmploymentStatus(Option<EmploymentStatus>),
    EmployerName(String),
    JobTitle(String),
    MonthlyIncome(Option<f64>),
    EmploymentLength(String),
    OtherIncomeSource(String),
    OtherIncomeAmount(Option<f64>),
    ParkingRequired(bool),
    ParkingFeeAccept(bool),
    PetPolicyAck(bool),
    HasBeenBankrupt(bool),
    BankruptcyDetails(String),
    HasBeenEvicted(bool),
    EvictionDetails(String),
    HasCommittedFelony(bool),
    FelonyDetails(String),
    DesiredMoveDate(Option<NaiveDate>),
    AdditionalNotes(String),
    AgreesToTerms(bool),
}

impl DraftField {
    /// Validation-error key this field reports under.
    pub const fn key(&self) -> &'static str {
        match self {
            DraftField::FullName(_) => "full_name",
            DraftField::Email(_) => "email",
            DraftField::Phone(_) => "phone",
            DraftField::DateOfBirth(_) => "date_of_birth",
            DraftField::SsnLast4(_) => "ssn_last4",
            DraftField::DriverLicenseNumber(_) => "driver_license_number",
            DraftField::DriverLicenseState(_) => "driver_license_state",
            DraftField::EmergencyContactName(_) => "emergency_contact_name",
            DraftField::EmergencyContactPhone(_) => "emergency_contact_phone",
            DraftField::EmergencyContactRelationship(_) => "emergency_contact_relationship",
            DraftField::CurrentAddress(_) => "current_address",
            DraftField::CurrentAddressRent(_) => "current_address_rent",
            DraftField::CurrentLandlordName(_) => "current_landlord_name",
            DraftField::CurrentLandlordPhone(_) => "current_landlord_phone",
            DraftField::ReasonForMoving(_) => "reason_for_moving",
            DraftField::EmploymentStatus(_) => "employment_status",
            DraftField::EmployerName(_) => "employer_name",
            DraftField::JobTitle(_) => "job_title",
            DraftField::MonthlyIncome(_) => "monthly_income",
            DraftField::EmploymentLength(_) => "employment_length",
            DraftField::OtherIncomeSource(_) => "other_income_source",
            DraftField::OtherIncomeAmount(_) => "other_income_amount",
            DraftField::ParkingRequired(_) => "parking_required",
            DraftField::ParkingFeeAccept(_) => "parking_fee_accept",
            DraftField::PetPolicyAck(_) => "pet_policy_ack",
            DraftField::HasBeenBankrupt(_) => "has_been_bankrupt",
            DraftField::BankruptcyDetails(_) => "bankruptcy_details",
            DraftField::HasBeenEvicted(_) => "has_been_evicted",
            DraftField::EvictionDetails(_) => "eviction_details",
            DraftField::HasCommittedFelony(_) => "has_committed_felony",
            DraftField::FelonyDetails(_) => "felony_details",
            DraftField::DesiredMoveDate(_) => "desired_move_date",
            DraftField::AdditionalNotes(_) => "additional_notes",
            DraftField::AgreesToTerms(_) => "agrees_to_terms",
        }
    }
}

/// The repeating lists inside the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    CoApplicants,
    OtherOccupants,
    Vehicles,
    Pets,
    PersonalReferences,
}

impl GroupKind {
    pub const fn key(self) -> &'static str {
        match self {
            GroupKind::CoApplicants => "co_applicants",
            GroupKind::OtherOccupants => "other_occupants",
            GroupKind::Vehicles => "vehicles",
            GroupKind::Pets => "pets",
            GroupKind::PersonalReferences => "personal_references",
        }
    }

    /// Error key for one field of one entry, e.g. `vehicles[1].make`.
    pub fn entry_key(self, index: usize, field: &str) -> String {
        format!("{}[{}].{}", self.key(), index, field)
    }

    pub fn entry_prefix(self) -> String {
        format!("{}[", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum CoApplicantField {
    FullName(String),
    Email(String),
    Phone(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum OccupantField {
    Name(String),
    Relationship(String),
    Age(Option<u8>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VehicleField {
    Make(String),
    Model(String),
    Year(Option<u16>),
    Color(String),
    LicensePlate(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PetField {
    Name(String),
    #[serde(rename = "type")]
    Kind(String),
    Breed(String),
    Age(Option<u8>),
    Weight(Option<f32>),
    Vaccinated(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ReferenceField {
    Name(String),
    Phone(String),
    Relationship(String),
    YearsKnown(Option<u8>),
}

/// An edit to one field of one repeating-group entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", content = "change", rename_all = "snake_case")]
pub enum EntryUpdate {
    CoApplicants(CoApplicantField),
    OtherOccupants(OccupantField),
    Vehicles(VehicleField),
    Pets(PetField),
    PersonalReferences(ReferenceField),
}

impl EntryUpdate {
    pub fn group(&self) -> GroupKind {
        match self {
            EntryUpdate::CoApplicants(_) => GroupKind::CoApplicants,
            EntryUpdate::OtherOccupants(_) => GroupKind::OtherOccupants,
            EntryUpdate::Vehicles(_) => GroupKind::Vehicles,
            EntryUpdate::Pets(_) => GroupKind::Pets,
            EntryUpdate::PersonalReferences(_) => GroupKind::PersonalReferences,
        }
    }

    pub fn field_key(&self) -> &'static str {
        match self {
            EntryUpdate::CoApplicants(field) => match field {
                CoApplicantField::FullName(_) => "full_name",
                CoApplicantField::Email(_) => "email",
                CoApplicantField::Phone(_) => "phone",
            },
            EntryUpdate::OtherOccupants(field) => match field {
                OccupantField::Name(_) => "name",
                OccupantField::Relationship(_) => "relationship",
                OccupantField::Age(_) => "age",
            },
            EntryUpdate::Vehicles(field) => match field {
                VehicleField::Make(_) => "make",
                VehicleField::Model(_) => "model",
                VehicleField::Year(_) => "year",
                VehicleField::Color(_) => "color",
                VehicleField::LicensePlate(_) => "license_plate",
            },
            EntryUpdate::Pets(field) => match field {
                PetField::Name(_) => "name",
                PetField::Kind(_) => "type",
                PetField::Breed(_) => "breed",
                PetField::Age(_) => "age",
                PetField::Weight(_) => "weight",
                PetField::Vaccinated(_) => "vaccinated",
            },
            EntryUpdate::PersonalReferences(field) => match field {
                ReferenceField::Name(_) => "name",
                ReferenceField::Phone(_) => "phone",
                ReferenceField::Relationship(_) => "relationship",
                ReferenceField::YearsKnown(_) => "years_known",
            },
        }
    }

    pub fn error_key(&self, index: usize) -> String {
        self.group().entry_key(index, self.field_key())
    }
}

fn entry<T>(entries: &mut [T], index: usize) -> Option<&mut T> {
    entries.get_mut(index)
}

fn remove_at<T>(entries: &mut Vec<T>, index: usize) -> bool {
    if index < entries.len() {
        entries.remove(index);
        true
    } else {
        false
    }
}

impl ApplicationDraft {
    /// Start from whatever the applicant's user record already knows.
    pub fn prefilled(user: &User) -> Self {
        let profile = &user.profile;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            personal: PersonalSection {
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
                date_of_birth: profile.date_of_birth,
                ssn_last4: text(&profile.ssn_last4),
                driver_license_number: text(&profile.driver_license_number),
                driver_license_state: text(&profile.driver_license_state),
                emergency_contact_name: text(&profile.emergency_contact_name),
                emergency_contact_phone: text(&profile.emergency_contact_phone),
                emergency_contact_relationship: text(&profile.emergency_contact_relationship),
            },
            residence: ResidenceSection {
                current_address: text(&profile.current_address),
                current_address_rent: profile.current_address_rent,
                current_landlord_name: text(&profile.current_landlord_name),
                current_landlord_phone: text(&profile.current_landlord_phone),
                reason_for_moving: text(&profile.reason_for_moving),
            },
            employment: EmploymentSection {
                employment_status: profile.employment_status,
                employer_name: text(&profile.employer_name),
                job_title: text(&profile.job_title),
                monthly_income: profile.monthly_income,
                employment_length: text(&profile.employment_length),
                other_income_source: text(&profile.other_income_source),
                other_income_amount: profile.other_income_amount,
            },
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: DraftField) {
        match field {
            DraftField::FullName(value) => self.personal.full_name = value,
            DraftField::Email(value) => self.personal.email = value,
            DraftField::Phone(value) => self.personal.phone = value,
            DraftField::DateOfBirth(value) => self.personal.date_of_birth = value,
            DraftField::SsnLast4(value) => self.personal.ssn_last4 = value,
            DraftField::DriverLicenseNumber(value) => self.personal.driver_license_number = value,
            DraftField::DriverLicenseState(value) => self.personal.driver_license_state = value,
            DraftField::EmergencyContactName(value) => {
                self.personal.emergency_contact_name = value
            }
            DraftField::EmergencyContactPhone(value) => {
                self.personal.emergency_contact_phone = value
            }
            DraftField::EmergencyContactRelationship(value) => {
                self.personal.emergency_contact_relationship = value
            }
            DraftField::CurrentAddress(value) => self.residence.current_address = value,
            DraftField::CurrentAddressRent(value) => self.residence.current_address_rent = value,
            DraftField::CurrentLandlordName(value) => self.residence.current_landlord_name = value,
            DraftField::CurrentLandlordPhone(value) => {
                self.residence.current_landlord_phone = value
            }
            DraftField::ReasonForMoving(value) => self.residence.reason_for_moving = value,
            DraftField::EmploymentStatus(value) => self.employment.employment_status = value,
            DraftField::EmployerName(value) => self.employment.employer_name = value,
            DraftField::JobTitle(value) => self.employment.job_title = value,
            DraftField::MonthlyIncome(value) => self.employment.monthly_income = value,
            DraftField::EmploymentLength(value) => self.employment.employment_length = value,
            DraftField::OtherIncomeSource(value) => self.employment.other_income_source = value,
            DraftField::OtherIncomeAmount(value) => self.employment.other_income_amount = value,
            DraftField::ParkingRequired(value) => self.vehicles.parking_required = value,
            DraftField::ParkingFeeAccept(value) => self.vehicles.parking_fee_accept = value,
            DraftField::PetPolicyAck(value) => self.pets.pet_policy_ack = value,
            DraftField::HasBeenBankrupt(value) => self.background.has_been_bankrupt = Some(value),
            DraftField::BankruptcyDetails(value) => self.background.bankruptcy_details = value,
            DraftField::HasBeenEvicted(value) => self.background.has_been_evicted = Some(value),
            DraftField::EvictionDetails(value) => self.background.eviction_details = value,
            DraftField::HasCommittedFelony(value) => {
                self.background.has_committed_felony = Some(value)
            }
            DraftField::FelonyDetails(value) => self.background.felony_details = value,
            DraftField::DesiredMoveDate(value) => self.background.desired_move_date = value,
            DraftField::AdditionalNotes(value) => self.background.additional_notes = value,
            DraftField::AgreesToTerms(value) => self.review.agrees_to_terms = value,
        }
    }

    pub fn group_len(&self, group: GroupKind) -> usize {
        match group {
            GroupKind::CoApplicants => self.household.co_applicants.len(),
            GroupKind::OtherOccupants => self.household.other_occupants.len(),
            GroupKind::Vehicles => self.vehicles.vehicles.len(),
            GroupKind::Pets => self.pets.pets.len(),
            GroupKind::PersonalReferences => self.background.personal_references.len(),
        }
    }

    /// Append a blank entry and return its index.
    pub fn append(&mut self, group: GroupKind) -> usize {
        match group {
            GroupKind::CoApplicants => self.household.co_applicants.push(CoApplicant::default()),
            GroupKind::OtherOccupants => self.household.other_occupants.push(Occupant::default()),
            GroupKind::Vehicles => self.vehicles.vehicles.push(Vehicle::default()),
            GroupKind::Pets => self.pets.pets.push(Pet::default()),
            GroupKind::PersonalReferences => self
                .background
                .personal_references
                .push(PersonalReference::default()),
        }
        self.group_len(group) - 1
    }

    /// Remove by index. Later entries shift down; out-of-range indexes are ignored.
    pub fn remove(&mut self, group: GroupKind, index: usize) -> bool {
        match group {
            GroupKind::CoApplicants => remove_at(&mut self.household.co_applicants, index),
            GroupKind::OtherOccupants => remove_at(&mut self.household.other_occupants, index),
            GroupKind::Vehicles => remove_at(&mut self.vehicles.vehicles, index),
            GroupKind::Pets => remove_at(&mut self.pets.pets, index),
            GroupKind::PersonalReferences => {
                remove_at(&mut self.background.personal_references, index)
            }
        }
    }

    /// Returns false when no entry exists at `index`.
    pub fn update_entry(&mut self, index: usize, update: EntryUpdate) -> bool {
        match update {
            EntryUpdate::CoApplicants(field) => {
                let Some(target) = entry(&mut self.household.co_applicants, index) else {
                    return false;
                };
                match field {
                    CoApplicantField::FullName(value) => target.full_name = value,
                    CoApplicantField::Email(value) => target.email = value,
                    CoApplicantField::Phone(value) => target.phone = value,
                }
            }
            EntryUpdate::OtherOccupants(field) => {
                let Some(target) = entry(&mut self.household.other_occupants, index) else {
                    return false;
                };
                match field {
                    OccupantField::Name(value) => target.name = value,
                    OccupantField::Relationship(value) => target.relationship = value,
                    OccupantField::Age(value) => target.age = value,
                }
            }
            EntryUpdate::Vehicles(field) => {
                let Some(target) = entry(&mut self.vehicles.vehicles, index) else {
                    return false;
                };
                match field {
                    VehicleField::Make(value) => target.make = value,
                    VehicleField::Model(value) => target.model = value,
                    VehicleField::Year(value) => target.year = value,
                    VehicleField::Color(value) => target.color = value,
                    VehicleField::LicensePlate(value) => target.license_plate = value,
                }
            }
            EntryUpdate::Pets(field) => {
                let Some(target) = entry(&mut self.pets.pets, index) else {
                    return false;
                };
                match field {
                    PetField::Name(value) => target.name = value,
                    PetField::Kind(value) => target.kind = value,
                    PetField::Breed(value) => target.breed = value,
                    PetField::Age(value) => target.age = value,
                    PetField::Weight(value) => target.weight = value,
                    PetField::Vaccinated(value) => target.vaccinated = value,
                }
            }
            EntryUpdate::PersonalReferences(field) => {
                let Some(target) = entry(&mut self.background.personal_references, index) else {
                    return false;
                };
                match field {
                    ReferenceField::Name(value) => target.name = value,
                    ReferenceField::Phone(value) => target.phone = value,
                    ReferenceField::Relationship(value) => target.relationship = value,
                    ReferenceField::YearsKnown(value) => target.years_known = value,
                }
            }
        }
        true
    }

    /// Validate every data step and fold the draft into a submission-ready record.
    ///
    /// Reports the first failing step together with its errors.
    pub fn finalize(&self) -> Result<FinalizedDraft, (WizardStep, ValidationErrors)> {
        for step in WizardStep::ALL {
            if step == WizardStep::DocumentUpload {
                continue;
            }
            let errors = validate_step(step, self, None);
            if !errors.is_empty() {
                return Err((step, errors));
            }
        }

        let missing = |step: WizardStep, key: &str| {
            let mut errors = ValidationErrors::default();
            errors.insert(key, "is required");
            (step, errors)
        };

        let monthly_income = self
            .employment
            .monthly_income
            .ok_or_else(|| missing(WizardStep::EmploymentIncome, "monthly_income"))?;
        let desired_move_date = self
            .background
            .desired_move_date
            .ok_or_else(|| missing(WizardStep::BackgroundDeclarations, "desired_move_date"))?;

        Ok(FinalizedDraft {
            profile: self.profile(),
            monthly_income,
            employer: self.employment.employer_name.trim().to_string(),
            household: self.household.clone(),
            vehicles: self.vehicles.clone(),
            pets: self.pets.clone(),
            background: self.background.clone(),
            desired_move_date,
            agrees_to_terms: self.review.agrees_to_terms,
        })
    }

    /// The subset of the draft persisted back onto the applicant's user record.
    pub fn profile(&self) -> ApplicantProfile {
        fn filled(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        let pets = &self.pets.pets;
        let pet_details = pets
            .iter()
            .filter(|pet| !pet.name.trim().is_empty())
            .map(|pet| format!("{} ({})", pet.name.trim(), pet.kind.trim()))
            .collect::<Vec<_>>()
            .join(", ");

        ApplicantProfile {
            date_of_birth: self.personal.date_of_birth,
            ssn_last4: filled(&self.personal.ssn_last4),
            driver_license_number: filled(&self.personal.driver_license_number),
            driver_license_state: filled(&self.personal.driver_license_state),
            current_address: filled(&self.residence.current_address),
            current_address_rent: self.residence.current_address_rent,
            current_landlord_name: filled(&self.residence.current_landlord_name),
            current_landlord_phone: filled(&self.residence.current_landlord_phone),
            reason_for_moving: filled(&self.residence.reason_for_moving),
            employment_status: self.employment.employment_status,
            employer_name: filled(&self.employment.employer_name),
            job_title: filled(&self.employment.job_title),
            monthly_income: self.employment.monthly_income,
            employment_length: filled(&self.employment.employment_length),
            other_income_source: filled(&self.employment.other_income_source),
            other_income_amount: self.employment.other_income_amount,
            pets: Some(!pets.is_empty()),
            pet_details: filled(&pet_details),
            emergency_contact_name: filled(&self.personal.emergency_contact_name),
            emergency_contact_phone: filled(&self.personal.emergency_contact_phone),
            emergency_contact_relationship: filled(
                &self.personal.emergency_contact_relationship,
            ),
        }
    }
}

/// A draft that passed every step's validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedDraft {
    pub profile: ApplicantProfile,
    pub monthly_income: f64,
    pub employer: String,
    pub household: HouseholdSection,
    pub vehicles: VehicleSection,
    pub pets: PetSection,
    pub background: BackgroundSection,
    pub desired_move_date: NaiveDate,
    pub agrees_to_terms: bool,
}

impl FinalizedDraft {
    pub fn into_payload(self, links: DocumentLinks) -> ApplicationPayload {
        let background = self.background;
        ApplicationPayload {
            co_applicants: self.household.co_applicants,
            other_occupants: self.household.other_occupants,
            vehicles: self.vehicles.vehicles,
            parking_required: self.vehicles.parking_required,
            parking_fee_accept: self.vehicles.parking_fee_accept,
            pets: self.pets.pets,
            pet_policy_ack: self.pets.pet_policy_ack,
            has_been_bankrupt: background.has_been_bankrupt.unwrap_or(false),
            bankruptcy_details: background.bankruptcy_details,
            has_been_evicted: background.has_been_evicted.unwrap_or(false),
            eviction_details: background.eviction_details,
            has_committed_felony: background.has_committed_felony.unwrap_or(false),
            felony_details: background.felony_details,
            personal_references: background.personal_references,
            additional_notes: background.additional_notes,
            desired_move_date: self.desired_move_date,
            agrees_to_terms: self.agrees_to_terms,
            pay_stubs_urls: links.pay_stubs,
            credit_report_url: links.credit_report,
            dl_front_url: links.license_front,
            dl_back_url: links.license_back,
            supporting_docs_urls: links.supporting,
            monthly_income_at_application: self.monthly_income,
            employer_at_application: self.employer,
        }
    }
}
