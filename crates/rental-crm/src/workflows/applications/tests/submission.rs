use super::common::*;
use crate::workflows::applications::{
    DocumentCategory, DraftField, IntakeError, ProfileSync, WizardError, WizardStep,
};
use crate::workflows::records::{ApplicationStatus, CrmStore, PropertyStatus, StoreError, StoreOp};
use crate::workflows::uploads::{
    FileStorage, InMemoryFileStorage, PendingFile, StoredFile, UploadError,
};
use async_trait::async_trait;
use futures::FutureExt;
use std::sync::Arc;

/// Storage whose uploads never complete.
struct StalledStorage;

#[async_trait]
impl FileStorage for StalledStorage {
    async fn upload(&self, _file: &PendingFile) -> Result<StoredFile, UploadError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn start_rejects_properties_that_are_not_available() {
    let store = seeded_store(PropertyStatus::Leased);
    let service = crate::workflows::applications::ApplicationIntakeService::new(
        store,
        std::sync::Arc::new(InMemoryFileStorage::default()),
    );

    match service.start(&PROPERTY_ID.into()).await {
        Err(IntakeError::PropertyUnavailable { status, .. }) => {
            assert_eq!(status, PropertyStatus::Leased)
        }
        other => panic!("expected unavailable property, got {other:?}"),
    }
}

#[tokio::test]
async fn start_prefills_from_the_signed_in_user() {
    let (service, _, _) = build_service(InMemoryFileStorage::default());
    let wizard = service.start(&PROPERTY_ID.into()).await.expect("wizard");
    assert_eq!(wizard.draft().personal.full_name, "Maya Ortiz");
    assert_eq!(wizard.property().monthly_rent, 2800);
}

#[tokio::test]
async fn submit_creates_a_scored_pending_application() {
    let (service, store, files) = build_service(InMemoryFileStorage::default());
    let mut wizard = completed_wizard();

    let outcome = service.submit(&mut wizard).await.expect("submitted");
    let application = outcome.application;

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.user_id.as_str(), "user-7");
    assert_eq!(format!("{:.2}", application.score), "5.80");
    assert!((application.docs_complete - 1.0).abs() < f64::EPSILON);
    assert_eq!(application.payload.pay_stubs_urls.len(), 3);
    assert!(application.payload.pay_stubs_urls[0].ends_with("/stub-0.pdf"));
    assert!(application.payload.credit_report_url.ends_with("/credit.pdf"));
    assert!(application.payload.dl_back_url.ends_with("/license-back.pdf"));
    assert_eq!(application.payload.employer_at_application, "MercyOne");
    assert_eq!(application.payload.pets.len(), 1);
    assert_eq!(outcome.profile_sync, ProfileSync::Saved);
    assert_eq!(files.stored().len(), 6);

    let stored = store.applications().list(None).await.expect("listed");
    assert_eq!(stored.len(), 1);
    let me = store.session().me().await.expect("me");
    assert_eq!(me.profile.ssn_last4.as_deref(), Some("4821"));
    assert_eq!(me.profile.monthly_income, Some(6500.0));
    assert_eq!(me.profile.pet_details.as_deref(), Some("Biscuit (dog)"));
}

#[tokio::test]
async fn missing_pay_stub_blocks_submit_before_any_upload() {
    let (service, store, files) = build_service(InMemoryFileStorage::default());
    let mut wizard = completed_wizard();
    wizard
        .detach_document(DocumentCategory::PayStubs, 2)
        .expect("detached");

    match service.submit(&mut wizard).await {
        Err(IntakeError::MissingDocuments { missing }) => {
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].category, DocumentCategory::PayStubs);
            assert_eq!(missing[0].attached, 2);
        }
        other => panic!("expected missing documents, got {other:?}"),
    }
    assert!(files.stored().is_empty());
    assert!(store.applications().list(None).await.expect("listed").is_empty());
}

#[tokio::test]
async fn submit_requires_the_review_step_and_terms() {
    let (service, _, _) = build_service(InMemoryFileStorage::default());
    let mut wizard = completed_wizard();

    wizard.retreat().expect("back");
    assert!(matches!(
        service.submit(&mut wizard).await,
        Err(IntakeError::NotOnReviewStep {
            step: WizardStep::DocumentUpload
        })
    ));

    wizard.advance().expect("documents still valid");
    wizard
        .set_field(DraftField::AgreesToTerms(false))
        .expect("field");
    match service.submit(&mut wizard).await {
        Err(IntakeError::Wizard(WizardError::Invalid { step, errors })) => {
            assert_eq!(step, WizardStep::ReviewSubmit);
            assert!(errors.contains("agrees_to_terms"));
        }
        other => panic!("expected review validation failure, got {other:?}"),
    }
    assert!(wizard.errors().contains("agrees_to_terms"));
}

#[tokio::test]
async fn earlier_step_edits_are_caught_when_finalizing() {
    let (service, _, _) = build_service(InMemoryFileStorage::default());
    let mut wizard = completed_wizard();
    wizard
        .set_field(DraftField::MonthlyIncome(None))
        .expect("field");

    match service.submit(&mut wizard).await {
        Err(IntakeError::Wizard(WizardError::Invalid { step, errors })) => {
            assert_eq!(step, WizardStep::EmploymentIncome);
            assert!(errors.contains("monthly_income"));
        }
        other => panic!("expected finalize failure, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_failure_keeps_wizard_and_buffers_for_retry() {
    let (service, store, _) = build_service(InMemoryFileStorage::failing_on("stub-1.pdf"));
    let mut wizard = completed_wizard();

    match service.submit(&mut wizard).await {
        Err(IntakeError::UploadFailed { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].category, DocumentCategory::PayStubs);
        }
        other => panic!("expected upload failure, got {other:?}"),
    }

    assert_eq!(wizard.current_step(), WizardStep::ReviewSubmit);
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.documents().count(DocumentCategory::PayStubs), 3);
    assert!(store.applications().list(None).await.expect("listed").is_empty());
}

#[tokio::test]
async fn profile_sync_failure_keeps_the_application() {
    let (service, store, _) = build_service(InMemoryFileStorage::default());
    store.reject_profile_updates(true);
    let mut wizard = completed_wizard();

    let outcome = service.submit(&mut wizard).await.expect("submitted");
    assert!(matches!(outcome.profile_sync, ProfileSync::Failed { .. }));
    assert_eq!(store.applications().list(None).await.expect("listed").len(), 1);
}

#[tokio::test]
async fn store_failure_on_create_surfaces_as_store_error() {
    let (service, store, _) = build_service(InMemoryFileStorage::default());
    store.applications.arm_failure(StoreOp::Create, 0);
    let mut wizard = completed_wizard();

    assert!(matches!(
        service.submit(&mut wizard).await,
        Err(IntakeError::Store(StoreError::Unavailable(_)))
    ));
    assert!(!wizard.is_submitting());
}

#[tokio::test]
async fn dropped_submit_releases_the_wizard_for_retry() {
    let store = seeded_store(PropertyStatus::Available);
    let stalled = crate::workflows::applications::ApplicationIntakeService::new(
        store.clone(),
        Arc::new(StalledStorage),
    );
    let mut wizard = completed_wizard();

    assert!(stalled.submit(&mut wizard).now_or_never().is_none());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.current_step(), WizardStep::ReviewSubmit);
    assert_eq!(wizard.documents().count(DocumentCategory::PayStubs), 3);

    let working = crate::workflows::applications::ApplicationIntakeService::new(
        store.clone(),
        Arc::new(InMemoryFileStorage::default()),
    );
    let outcome = working.submit(&mut wizard).await.expect("retry submitted");
    assert_eq!(outcome.application.payload.pay_stubs_urls.len(), 3);
    assert_eq!(store.applications().list(None).await.expect("listed").len(), 1);
}

#[tokio::test]
async fn failed_optional_documents_abort_the_submit() {
    let (service, store, _) = build_service(InMemoryFileStorage::failing_on("vaccines.pdf"));
    let mut wizard = completed_wizard();
    wizard
        .attach_document(DocumentCategory::SupportingDocuments, pdf("vaccines.pdf"))
        .expect("supporting document");

    match service.submit(&mut wizard).await {
        Err(IntakeError::UploadFailed { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].category, DocumentCategory::SupportingDocuments);
        }
        other => panic!("expected upload failure, got {other:?}"),
    }

    assert_eq!(wizard.current_step(), WizardStep::ReviewSubmit);
    assert_eq!(wizard.documents().count(DocumentCategory::SupportingDocuments), 1);
    assert!(store.applications().list(None).await.expect("listed").is_empty());
}
