use serde::{Deserialize, Serialize};

/// Wizard pages in the order the applicant walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalInformation,
    ResidentialHistory,
    EmploymentIncome,
    AdditionalOccupants,
    Vehicles,
    Pets,
    BackgroundDeclarations,
    DocumentUpload,
    ReviewSubmit,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::PersonalInformation,
        WizardStep::ResidentialHistory,
        WizardStep::EmploymentIncome,
        WizardStep::AdditionalOccupants,
        WizardStep::Vehicles,
        WizardStep::Pets,
        WizardStep::BackgroundDeclarations,
        WizardStep::DocumentUpload,
        WizardStep::ReviewSubmit,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const FIRST: WizardStep = WizardStep::PersonalInformation;
    pub const LAST: WizardStep = WizardStep::ReviewSubmit;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::PersonalInformation => "Personal Information",
            WizardStep::ResidentialHistory => "Residential History",
            WizardStep::EmploymentIncome => "Employment & Income",
            WizardStep::AdditionalOccupants => "Additional Occupants",
            WizardStep::Vehicles => "Vehicles",
            WizardStep::Pets => "Pets",
            WizardStep::BackgroundDeclarations => "Background & Declarations",
            WizardStep::DocumentUpload => "Document Upload",
            WizardStep::ReviewSubmit => "Review & Submit",
        }
    }

    /// The following step, staying put on the last one.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Self::LAST)
    }

    /// The preceding step, staying put on the first one.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(Self::FIRST)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}
