use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::applications::{
    ApplicationIntakeService, ApplicationWizard, DocumentCategory, DraftField, EntryUpdate,
    GroupKind, PetField, WizardStep,
};
use crate::workflows::records::{
    ApplicantProfile, EmploymentStatus, InMemoryStore, Property, PropertyStatus, PropertyType,
    User,
};
use crate::workflows::uploads::{InMemoryFileStorage, PendingFile};

pub(super) const PROPERTY_ID: &str = "prop-100";

pub(super) fn property(status: PropertyStatus) -> Property {
    Property {
        id: PROPERTY_ID.into(),
        title: "Sherman Hill Two Bedroom".to_string(),
        address: "1520 Woodland Ave".to_string(),
        city: "Des Moines".to_string(),
        neighbourhood: Some("Sherman Hill".to_string()),
        property_type: PropertyType::Apartment,
        beds: 2,
        baths: 1.0,
        sqft: 910,
        monthly_rent: 2800,
        status,
        amenities: BTreeSet::from(["pets".to_string(), "laundry".to_string()]),
        photos: Vec::new(),
        owner_id: None,
        created_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub(super) fn applicant() -> User {
    User {
        id: "user-7".into(),
        email: "maya.ortiz@example.com".to_string(),
        full_name: "Maya Ortiz".to_string(),
        phone: "515-555-0142".to_string(),
        profile: ApplicantProfile {
            job_title: Some("Pharmacist".to_string()),
            ..ApplicantProfile::default()
        },
        created_date: Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap(),
    }
}

pub(super) fn seeded_store(status: PropertyStatus) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.properties.seed(property(status)).expect("seed property");
    store.sign_in(applicant()).expect("sign in");
    store
}

pub(super) fn build_service(
    files: InMemoryFileStorage,
) -> (
    ApplicationIntakeService<InMemoryStore, InMemoryFileStorage>,
    Arc<InMemoryStore>,
    Arc<InMemoryFileStorage>,
) {
    let store = seeded_store(PropertyStatus::Available);
    let files = Arc::new(files);
    let service = ApplicationIntakeService::new(store.clone(), files.clone());
    (service, store, files)
}

pub(super) fn pdf(name: &str) -> PendingFile {
    PendingFile::new(name, "application/pdf", b"%PDF-1.7 test".to_vec())
}

pub(super) fn set(wizard: &mut ApplicationWizard, fields: Vec<DraftField>) {
    for field in fields {
        wizard.set_field(field).expect("field accepted");
    }
}

pub(super) fn fill_personal(wizard: &mut ApplicationWizard) {
    set(
        wizard,
        vec![
            DraftField::DateOfBirth(NaiveDate::from_ymd_opt(1991, 4, 12)),
            DraftField::SsnLast4("4821".to_string()),
            DraftField::EmergencyContactName("Luis Ortiz".to_string()),
            DraftField::EmergencyContactPhone("515-555-0199".to_string()),
            DraftField::EmergencyContactRelationship("Brother".to_string()),
        ],
    );
}

pub(super) fn fill_residence(wizard: &mut ApplicationWizard) {
    set(
        wizard,
        vec![
            DraftField::CurrentAddress("88 Grand Ave, Des Moines".to_string()),
            DraftField::CurrentAddressRent(Some(1650.0)),
            DraftField::CurrentLandlordName("Grand Ave Property Co".to_string()),
            DraftField::CurrentLandlordPhone("515-555-0110".to_string()),
            DraftField::ReasonForMoving("Closer to work".to_string()),
        ],
    );
}

pub(super) fn fill_employment(wizard: &mut ApplicationWizard) {
    set(
        wizard,
        vec![
            DraftField::EmploymentStatus(Some(EmploymentStatus::Employed)),
            DraftField::EmployerName("MercyOne".to_string()),
            DraftField::MonthlyIncome(Some(6500.0)),
            DraftField::EmploymentLength("4 years".to_string()),
        ],
    );
}

pub(super) fn fill_pets(wizard: &mut ApplicationWizard) {
    let index = wizard.add_entry(GroupKind::Pets).expect("pet added");
    wizard
        .update_entry(index, EntryUpdate::Pets(PetField::Name("Biscuit".to_string())))
        .expect("pet name");
    wizard
        .update_entry(index, EntryUpdate::Pets(PetField::Kind("dog".to_string())))
        .expect("pet type");
    set(wizard, vec![DraftField::PetPolicyAck(true)]);
}

pub(super) fn fill_background(wizard: &mut ApplicationWizard) {
    set(
        wizard,
        vec![
            DraftField::HasBeenBankrupt(false),
            DraftField::HasBeenEvicted(false),
            DraftField::HasCommittedFelony(false),
            DraftField::DesiredMoveDate(NaiveDate::from_ymd_opt(2025, 8, 1)),
        ],
    );
}

pub(super) fn attach_required_documents(wizard: &mut ApplicationWizard, pay_stubs: usize) {
    for month in 0..pay_stubs {
        wizard
            .attach_document(DocumentCategory::PayStubs, pdf(&format!("stub-{month}.pdf")))
            .expect("pay stub attached");
    }
    wizard
        .attach_document(DocumentCategory::CreditReport, pdf("credit.pdf"))
        .expect("credit report attached");
    wizard
        .attach_document(DocumentCategory::LicenseFront, pdf("license-front.pdf"))
        .expect("front attached");
    wizard
        .attach_document(DocumentCategory::LicenseBack, pdf("license-back.pdf"))
        .expect("back attached");
}

/// Walk every step with valid answers, stopping on the review step.
pub(super) fn completed_wizard() -> ApplicationWizard {
    let mut wizard = ApplicationWizard::new(property(PropertyStatus::Available), &applicant());
    fill_personal(&mut wizard);
    wizard.advance().expect("personal");
    fill_residence(&mut wizard);
    wizard.advance().expect("residence");
    fill_employment(&mut wizard);
    wizard.advance().expect("employment");
    wizard.advance().expect("occupants");
    wizard.advance().expect("vehicles");
    fill_pets(&mut wizard);
    wizard.advance().expect("pets");
    fill_background(&mut wizard);
    wizard.advance().expect("background");
    attach_required_documents(&mut wizard, 3);
    wizard.advance().expect("documents");
    set(&mut wizard, vec![DraftField::AgreesToTerms(true)]);
    assert_eq!(wizard.current_step(), WizardStep::ReviewSubmit);
    wizard
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
