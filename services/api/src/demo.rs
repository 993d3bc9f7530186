use crate::infra::{parse_date, CrmServices};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use clap::Args;
use rental_crm::config::WorkflowConfig;
use rental_crm::error::AppError;
use rental_crm::workflows::applications::{
    ApplicationWizard, DocumentCategory, DraftField, IntakeError, ProfileSync,
};
use rental_crm::workflows::leasing::DecisionOutcome;
use rental_crm::workflows::listings::{neighbourhoods, PropertyFilter, PropertySearch};
use rental_crm::workflows::records::{
    ApplicantProfile, ClientStatus, EmploymentStatus, EntityStore, LeadSource,
    NewClient, Property, PropertyImporter, PropertyStatus, RentalApplication, User,
};
use rental_crm::workflows::uploads::PendingFile;
use std::path::{Path, PathBuf};

const SAMPLE_PORTFOLIO: &str = "\
title,address,city,neighbourhood,property_type,beds,baths,sqft,monthly_rent,status,amenities
Sherman Hill Two Bed,1520 Woodland Ave,Des Moines,Sherman Hill,apartment,2,1,910,1650,available,pets;laundry
Drake Bungalow,2701 University Ave,Des Moines,Drake,house,3,1.5,1340,1950,available,parking
Ingersoll Loft,3920 Ingersoll Ave,Des Moines,Ingersoll,condo,1,1,780,1450,leased,pets
Beaverdale Cottage,2830 Beaver Ave,Des Moines,Beaverdale,house,2,1,1020,1250,available,
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Property CSV export to seed the demo portfolio (defaults to a built-in sample)
    #[arg(long)]
    pub(crate) properties: Option<PathBuf>,
    /// Directory of documents to attach; names containing stub, credit, front or back pick
    /// the category, anything else is a supporting document
    #[arg(long)]
    pub(crate) documents: Option<PathBuf>,
    /// Decision date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Deny the demo application instead of approving it
    #[arg(long)]
    pub(crate) deny: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Property CSV export to parse
    pub(crate) csv: PathBuf,
}

pub(crate) async fn run_import_preview(args: ImportArgs) -> Result<(), AppError> {
    let services = CrmServices::in_memory(WorkflowConfig::default());
    let created = services.seed_properties(&args.csv).await?;

    println!("Parsed {} properties from {}", created.len(), args.csv.display());
    render_properties(&created);

    let areas = neighbourhoods(&created);
    if !areas.is_empty() {
        println!("Neighbourhoods: {}", areas.join(", "));
    }
    for status in [
        PropertyStatus::Available,
        PropertyStatus::Pending,
        PropertyStatus::Leased,
    ] {
        let count = created.iter().filter(|p| p.status == status).count();
        println!("- {}: {}", status.label(), count);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        properties,
        documents,
        today,
        deny,
    } = args;

    let now = decision_time(today);
    let services = CrmServices::in_memory(WorkflowConfig::default());
    let portfolio = match properties {
        Some(path) => services.seed_properties(&path).await?,
        None => {
            PropertyImporter::from_reader(SAMPLE_PORTFOLIO.as_bytes())?
                .import(&services.store.properties)
                .await?
        }
    };
    services.sign_in(demo_applicant())?;
    let lead = services.store.clients.create(demo_lead()).await?;

    println!("Rental CRM demo");
    println!("\nPortfolio ({} units)", portfolio.len());
    render_properties(&portfolio);

    let open = services
        .listings
        .search_properties(&PropertySearch {
            filter: PropertyFilter {
                status: Some(PropertyStatus::Available),
                ..PropertyFilter::default()
            },
            sort: Some("monthly_rent".to_string()),
            portal: true,
        })
        .await?;
    let Some(target) = open.last().cloned() else {
        println!("\nNo available units; nothing to apply for.");
        return Ok(());
    };

    let matches = services.listings.client_matches(&lead.id).await?;
    println!(
        "\nLead {} {} ({}) budget fits:",
        matches.client.first_name, matches.client.last_name, matches.stage_label
    );
    for property in &matches.matches {
        println!("  - {} at ${}/mo", property.title, property.monthly_rent);
    }

    println!("\nApplication intake for {} (sensitive fields redacted)", target.title);
    let application = match intake_walkthrough(&services, &target, documents.as_deref()).await {
        Ok(application) => application,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };

    let outcome = if deny {
        DecisionOutcome::Denied
    } else {
        DecisionOutcome::Approved
    };
    match services.leasing.decide(&application.id, outcome, now).await {
        Ok(receipt) => {
            println!(
                "\nDecision: application {} -> {}",
                receipt.application.id,
                receipt.application.status.label()
            );
            if let Some(lease) = receipt.lease {
                println!(
                    "  Lease {} from {} to {} at ${}/mo (deposit ${})",
                    lease.id, lease.start_date, lease.end_date, lease.monthly_rent, lease.deposit
                );
            }
        }
        Err(err) => println!("\nDecision failed: {}", err),
    }

    let summary = services.listings.dashboard(now).await?;
    println!("\nDashboard");
    println!(
        "- {} units | {} leased | {} available | {:.1}% occupancy",
        summary.total_units, summary.leased_units, summary.available_units, summary.occupancy_rate
    );
    println!(
        "- applications: {} pending / {} approved / {} denied",
        summary.applications.pending, summary.applications.approved, summary.applications.denied
    );
    println!("- monthly recurring rent: ${}", summary.monthly_recurring_rent);
    println!("Recent activity:");
    for entry in &summary.recent_activity {
        println!("  - [{:?}] {} ({})", entry.kind, entry.title, entry.timestamp.date_naive());
    }

    Ok(())
}

async fn intake_walkthrough(
    services: &CrmServices,
    property: &Property,
    documents: Option<&Path>,
) -> Result<RentalApplication, IntakeError> {
    let mut wizard = services.intake.start(&property.id).await?;
    fill_wizard(&mut wizard)?;

    for (category, file) in demo_documents(documents) {
        wizard.attach_document(category, file)?;
    }
    wizard.advance()?;
    wizard.set_field(DraftField::AgreesToTerms(true))?;

    let outcome = services.intake.submit(&mut wizard).await?;
    let application = outcome.application;
    println!(
        "- Submitted application {} | score {:.2} | documents {:.0}% complete",
        application.id,
        application.score,
        application.docs_complete * 100.0
    );
    println!(
        "  {} pay stubs, credit report and license uploaded ({} files held)",
        application.payload.pay_stubs_urls.len(),
        services.files.stored().len()
    );
    match outcome.profile_sync {
        ProfileSync::Saved => println!("  Applicant profile updated"),
        ProfileSync::Failed { reason } => println!("  Applicant profile not saved: {}", reason),
    }
    Ok(application)
}

fn fill_wizard(wizard: &mut ApplicationWizard) -> Result<(), IntakeError> {
    let steps: [Vec<DraftField>; 7] = [
        vec![
            DraftField::DateOfBirth(NaiveDate::from_ymd_opt(1991, 4, 12)),
            DraftField::SsnLast4("4821".to_string()),
            DraftField::EmergencyContactName("Luis Ortiz".to_string()),
            DraftField::EmergencyContactPhone("515-555-0199".to_string()),
            DraftField::EmergencyContactRelationship("Brother".to_string()),
        ],
        vec![
            DraftField::CurrentAddress("88 Grand Ave, Des Moines".to_string()),
            DraftField::CurrentAddressRent(Some(1350.0)),
            DraftField::CurrentLandlordName("Grand Ave Property Co".to_string()),
            DraftField::CurrentLandlordPhone("515-555-0110".to_string()),
            DraftField::ReasonForMoving("More space".to_string()),
        ],
        vec![
            DraftField::EmploymentStatus(Some(EmploymentStatus::Employed)),
            DraftField::EmployerName("MercyOne".to_string()),
            DraftField::MonthlyIncome(Some(6200.0)),
            DraftField::EmploymentLength("4 years".to_string()),
        ],
        Vec::new(),
        Vec::new(),
        Vec::new(),
        vec![
            DraftField::HasBeenBankrupt(false),
            DraftField::HasBeenEvicted(false),
            DraftField::HasCommittedFelony(false),
            DraftField::DesiredMoveDate(NaiveDate::from_ymd_opt(2025, 8, 1)),
        ],
    ];

    for fields in steps {
        for field in fields {
            wizard.set_field(field)?;
        }
        let step = wizard.current_step();
        wizard.advance()?;
        println!("- {} complete", step.title());
    }
    Ok(())
}

/// Documents to attach: files from `dir` when given, synthetic PDFs for any category left empty.
fn demo_documents(dir: Option<&Path>) -> Vec<(DocumentCategory, PendingFile)> {
    let mut files = dir.map(read_document_dir).unwrap_or_default();

    let pay_stubs = files
        .iter()
        .filter(|(category, _)| *category == DocumentCategory::PayStubs)
        .count();
    for month in pay_stubs..3 {
        files.push((
            DocumentCategory::PayStubs,
            synthetic_pdf(&format!("pay-stub-{}.pdf", month + 1)),
        ));
    }
    for (category, name) in [
        (DocumentCategory::CreditReport, "credit-report.pdf"),
        (DocumentCategory::LicenseFront, "license-front.pdf"),
        (DocumentCategory::LicenseBack, "license-back.pdf"),
    ] {
        if !files.iter().any(|(existing, _)| *existing == category) {
            files.push((category, synthetic_pdf(name)));
        }
    }
    files
}

fn read_document_dir(dir: &Path) -> Vec<(DocumentCategory, PendingFile)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        println!("  Could not read {}; using sample documents", dir.display());
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let bytes = std::fs::read(&path).ok()?;
            let name = path.file_name()?.to_string_lossy().into_owned();
            let content_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .essence_str()
                .to_string();
            Some((categorize(&name), PendingFile::new(name, content_type, bytes)))
        })
        .collect()
}

fn categorize(file_name: &str) -> DocumentCategory {
    let lowered = file_name.to_ascii_lowercase();
    if lowered.contains("stub") {
        DocumentCategory::PayStubs
    } else if lowered.contains("credit") {
        DocumentCategory::CreditReport
    } else if lowered.contains("front") {
        DocumentCategory::LicenseFront
    } else if lowered.contains("back") {
        DocumentCategory::LicenseBack
    } else {
        DocumentCategory::SupportingDocuments
    }
}

fn synthetic_pdf(name: &str) -> PendingFile {
    PendingFile::new(name, "application/pdf", b"%PDF-1.7\n%demo\n".to_vec())
}

fn decision_time(today: Option<NaiveDate>) -> DateTime<Utc> {
    today
        .and_then(|date| date.and_hms_opt(15, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(Utc::now)
}

fn demo_applicant() -> User {
    User {
        id: "demo-applicant".into(),
        email: "maya.ortiz@example.com".to_string(),
        full_name: "Maya Ortiz".to_string(),
        phone: "515-555-0142".to_string(),
        profile: ApplicantProfile {
            job_title: Some("Pharmacist".to_string()),
            ..ApplicantProfile::default()
        },
        created_date: Utc::now() - Duration::days(3),
    }
}

fn demo_lead() -> NewClient {
    NewClient {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana.reyes@example.com".to_string(),
        phone: "515-555-0177".to_string(),
        budget_min: Some(1200),
        budget_max: Some(1700),
        prefs_text: "Two bedrooms, near Ingersoll".to_string(),
        notes: String::new(),
        source: LeadSource::Portal,
        status: ClientStatus::Active,
    }
}

fn render_properties(properties: &[Property]) {
    for property in properties {
        println!(
            "  - {} | {} | {} bd / {} ba | ${}/mo | {}",
            property.title,
            property.neighbourhood.as_deref().unwrap_or(&property.city),
            property.beds,
            property.baths,
            property.monthly_rent,
            property.status.label()
        );
    }
}
