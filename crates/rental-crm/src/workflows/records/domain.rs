use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::store::Entity;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

record_id!(
    /// Identifier of a rentable unit.
    PropertyId
);
record_id!(
    /// Identifier of a CRM lead or tenant.
    ClientId
);
record_id!(
    /// Identifier of a submitted rental application.
    ApplicationId
);
record_id!(LeaseId);
record_id!(
    /// Identifier of an authenticated portal user (the applicant).
    UserId
);

/// Listing state of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Pending,
    Leased,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Leased => "leased",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Studio,
}

/// Amenity tag marking a unit as pet friendly.
pub const PET_FRIENDLY_AMENITY: &str = "pets";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    pub property_type: PropertyType,
    pub beds: u8,
    pub baths: f32,
    pub sqft: u32,
    pub monthly_rent: u32,
    pub status: PropertyStatus,
    pub amenities: BTreeSet<String>,
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl Property {
    pub fn is_pet_friendly(&self) -> bool {
        self.amenities.contains(PET_FRIENDLY_AMENITY)
    }
}

/// Fields captured by the staff property form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    pub property_type: PropertyType,
    pub beds: u8,
    pub baths: f32,
    pub sqft: u32,
    pub monthly_rent: u32,
    pub status: PropertyStatus,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub monthly_rent: Option<u32>,
    pub status: Option<PropertyStatus>,
    pub amenities: Option<BTreeSet<String>>,
    pub photos: Option<Vec<String>>,
}

impl PropertyPatch {
    pub fn status(status: PropertyStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Property {
    type Id = PropertyId;
    type Fields = NewProperty;
    type Patch = PropertyPatch;

    const KIND: &'static str = "property";
    const ID_PREFIX: &'static str = "prop";

    fn id(&self) -> &PropertyId {
        &self.id
    }

    fn validate(fields: &NewProperty) -> Result<(), String> {
        if fields.title.trim().is_empty() {
            return Err("property title is required".to_string());
        }
        if fields.address.trim().is_empty() {
            return Err("property address is required".to_string());
        }
        Ok(())
    }

    fn materialize(id: PropertyId, created_date: DateTime<Utc>, fields: NewProperty) -> Self {
        Self {
            id,
            title: fields.title,
            address: fields.address,
            city: fields.city,
            neighbourhood: fields.neighbourhood,
            property_type: fields.property_type,
            beds: fields.beds,
            baths: fields.baths,
            sqft: fields.sqft,
            monthly_rent: fields.monthly_rent,
            status: fields.status,
            amenities: fields.amenities,
            photos: fields.photos,
            owner_id: fields.owner_id,
            created_date,
        }
    }

    fn apply(&mut self, patch: PropertyPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(rent) = patch.monthly_rent {
            self.monthly_rent = rent;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        if let Some(photos) = patch.photos {
            self.photos = photos;
        }
    }
}

/// Channel a lead arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Portal,
    Cma,
    #[serde(rename = "agentlocator")]
    AgentLocator,
    Social,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<u32>,
    pub prefs_text: String,
    pub notes: String,
    pub source: LeadSource,
    pub status: ClientStatus,
    pub created_date: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub budget_min: Option<u32>,
    #[serde(default)]
    pub budget_max: Option<u32>,
    #[serde(default)]
    pub prefs_text: String,
    #[serde(default)]
    pub notes: String,
    pub source: LeadSource,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPatch {
    pub status: Option<ClientStatus>,
    pub prefs_text: Option<String>,
    pub notes: Option<String>,
}

impl Entity for Client {
    type Id = ClientId;
    type Fields = NewClient;
    type Patch = ClientPatch;

    const KIND: &'static str = "client";
    const ID_PREFIX: &'static str = "client";

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn validate(fields: &NewClient) -> Result<(), String> {
        if fields.email.trim().is_empty() {
            return Err("client email is required".to_string());
        }
        match (fields.budget_min, fields.budget_max) {
            (Some(min), Some(max)) if min > max => Err(format!(
                "budget minimum {min} exceeds budget maximum {max}"
            )),
            _ => Ok(()),
        }
    }

    fn materialize(id: ClientId, created_date: DateTime<Utc>, fields: NewClient) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            budget_min: fields.budget_min,
            budget_max: fields.budget_max,
            prefs_text: fields.prefs_text,
            notes: fields.notes,
            source: fields.source,
            status: fields.status,
            created_date,
        }
    }

    fn apply(&mut self, patch: ClientPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(prefs) = patch.prefs_text {
            self.prefs_text = prefs;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Denied,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoApplicant {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
    pub relationship: String,
    pub age: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: Option<u16>,
    pub color: String,
    pub license_plate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub age: Option<u8>,
    pub weight: Option<f32>,
    pub vaccinated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalReference {
    pub name: String,
    pub phone: String,
    pub relationship: String,
    pub years_known: Option<u8>,
}

/// Everything an applicant declares through the intake wizard, plus stored document links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPayload {
    pub co_applicants: Vec<CoApplicant>,
    pub other_occupants: Vec<Occupant>,
    pub vehicles: Vec<Vehicle>,
    pub parking_required: bool,
    pub parking_fee_accept: bool,
    pub pets: Vec<Pet>,
    pub pet_policy_ack: bool,
    pub has_been_bankrupt: bool,
    pub bankruptcy_details: String,
    pub has_been_evicted: bool,
    pub eviction_details: String,
    pub has_committed_felony: bool,
    pub felony_details: String,
    pub personal_references: Vec<PersonalReference>,
    pub additional_notes: String,
    pub desired_move_date: NaiveDate,
    pub agrees_to_terms: bool,
    pub pay_stubs_urls: Vec<String>,
    pub credit_report_url: String,
    pub dl_front_url: String,
    pub dl_back_url: String,
    pub supporting_docs_urls: Vec<String>,
    pub monthly_income_at_application: f64,
    pub employer_at_application: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalApplication {
    pub id: ApplicationId,
    pub property_id: PropertyId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub payload: ApplicationPayload,
    pub score: f64,
    pub docs_complete: f64,
    pub status: ApplicationStatus,
    pub created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub payload: ApplicationPayload,
    pub score: f64,
    pub docs_complete: f64,
}

/// Decision writes. `decision_at: Some(None)` clears the timestamp during compensation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub decision_at: Option<Option<DateTime<Utc>>>,
}

impl ApplicationPatch {
    pub fn decided(status: ApplicationStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            decision_at: Some(Some(at)),
        }
    }

    pub fn reopen() -> Self {
        Self {
            status: Some(ApplicationStatus::Pending),
            decision_at: Some(None),
        }
    }
}

impl Entity for RentalApplication {
    type Id = ApplicationId;
    type Fields = NewApplication;
    type Patch = ApplicationPatch;

    const KIND: &'static str = "rental application";
    const ID_PREFIX: &'static str = "app";

    fn id(&self) -> &ApplicationId {
        &self.id
    }

    fn validate(fields: &NewApplication) -> Result<(), String> {
        if !(0.0..=10.0).contains(&fields.score) {
            return Err(format!("score {} outside 0-10", fields.score));
        }
        if !(0.0..=1.0).contains(&fields.docs_complete) {
            return Err(format!(
                "docs_complete {} outside 0-1",
                fields.docs_complete
            ));
        }
        Ok(())
    }

    fn materialize(id: ApplicationId, created_date: DateTime<Utc>, fields: NewApplication) -> Self {
        Self {
            id,
            property_id: fields.property_id,
            user_id: fields.user_id,
            payload: fields.payload,
            score: fields.score,
            docs_complete: fields.docs_complete,
            status: ApplicationStatus::Pending,
            created_date,
            decision_at: None,
        }
    }

    fn apply(&mut self, patch: ApplicationPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(decision_at) = patch.decision_at {
            self.decision_at = decision_at;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    Active,
    Renewed,
    Ended,
}

impl LeaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaseStatus::Active => "active",
            LeaseStatus::Renewed => "renewed",
            LeaseStatus::Ended => "ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: LeaseId,
    pub property_id: PropertyId,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: u32,
    pub deposit: u32,
    pub payment_day: u8,
    pub status: LeaseStatus,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLease {
    pub property_id: PropertyId,
    pub client_id: ClientId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: u32,
    pub deposit: u32,
    pub payment_day: u8,
    pub status: LeaseStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeasePatch {
    pub status: Option<LeaseStatus>,
}

impl Entity for Lease {
    type Id = LeaseId;
    type Fields = NewLease;
    type Patch = LeasePatch;

    const KIND: &'static str = "lease";
    const ID_PREFIX: &'static str = "lease";

    fn id(&self) -> &LeaseId {
        &self.id
    }

    fn validate(fields: &NewLease) -> Result<(), String> {
        if fields.end_date <= fields.start_date {
            return Err("lease must end after it starts".to_string());
        }
        if !(1..=31).contains(&fields.payment_day) {
            return Err(format!("payment day {} is not a day of month", fields.payment_day));
        }
        Ok(())
    }

    fn materialize(id: LeaseId, created_date: DateTime<Utc>, fields: NewLease) -> Self {
        Self {
            id,
            property_id: fields.property_id,
            client_id: fields.client_id,
            start_date: fields.start_date,
            end_date: fields.end_date,
            monthly_rent: fields.monthly_rent,
            deposit: fields.deposit,
            payment_day: fields.payment_day,
            status: fields.status,
            created_date,
        }
    }

    fn apply(&mut self, patch: LeasePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Student,
    Retired,
    Unemployed,
}

/// Applicant profile persisted on the user record. Doubles as a partial update: only `Some`
/// fields overwrite when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub date_of_birth: Option<NaiveDate>,
    pub ssn_last4: Option<String>,
    pub driver_license_number: Option<String>,
    pub driver_license_state: Option<String>,
    pub current_address: Option<String>,
    pub current_address_rent: Option<f64>,
    pub current_landlord_name: Option<String>,
    pub current_landlord_phone: Option<String>,
    pub reason_for_moving: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub employer_name: Option<String>,
    pub job_title: Option<String>,
    pub monthly_income: Option<f64>,
    pub employment_length: Option<String>,
    pub other_income_source: Option<String>,
    pub other_income_amount: Option<f64>,
    pub pets: Option<bool>,
    pub pet_details: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
}

impl ApplicantProfile {
    pub fn merge(&mut self, update: ApplicantProfile) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.date_of_birth, update.date_of_birth);
        take(&mut self.ssn_last4, update.ssn_last4);
        take(&mut self.driver_license_number, update.driver_license_number);
        take(&mut self.driver_license_state, update.driver_license_state);
        take(&mut self.current_address, update.current_address);
        take(&mut self.current_address_rent, update.current_address_rent);
        take(&mut self.current_landlord_name, update.current_landlord_name);
        take(&mut self.current_landlord_phone, update.current_landlord_phone);
        take(&mut self.reason_for_moving, update.reason_for_moving);
        take(&mut self.employment_status, update.employment_status);
        take(&mut self.employer_name, update.employer_name);
        take(&mut self.job_title, update.job_title);
        take(&mut self.monthly_income, update.monthly_income);
        take(&mut self.employment_length, update.employment_length);
        take(&mut self.other_income_source, update.other_income_source);
        take(&mut self.other_income_amount, update.other_income_amount);
        take(&mut self.pets, update.pets);
        take(&mut self.pet_details, update.pet_details);
        take(&mut self.emergency_contact_name, update.emergency_contact_name);
        take(&mut self.emergency_contact_phone, update.emergency_contact_phone);
        take(
            &mut self.emergency_contact_relationship,
            update.emergency_contact_relationship,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

impl Entity for User {
    type Id = UserId;
    type Fields = NewUser;
    type Patch = ApplicantProfile;

    const KIND: &'static str = "user";
    const ID_PREFIX: &'static str = "user";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn validate(fields: &NewUser) -> Result<(), String> {
        if fields.email.trim().is_empty() {
            return Err("user email is required".to_string());
        }
        Ok(())
    }

    fn materialize(id: UserId, created_date: DateTime<Utc>, fields: NewUser) -> Self {
        Self {
            id,
            email: fields.email,
            full_name: fields.full_name,
            phone: fields.phone,
            profile: ApplicantProfile::default(),
            created_date,
        }
    }

    fn apply(&mut self, patch: ApplicantProfile) {
        self.profile.merge(patch);
    }
}
