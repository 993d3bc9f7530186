use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::uploads::{PendingFile, UploadedDocument};

/// Upload buckets on the document step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    PayStubs,
    CreditReport,
    LicenseFront,
    LicenseBack,
    /// Pet vaccination records and other optional paperwork.
    SupportingDocuments,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::PayStubs,
        DocumentCategory::CreditReport,
        DocumentCategory::LicenseFront,
        DocumentCategory::LicenseBack,
        DocumentCategory::SupportingDocuments,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            DocumentCategory::PayStubs => "pay_stubs",
            DocumentCategory::CreditReport => "credit_report",
            DocumentCategory::LicenseFront => "license_front",
            DocumentCategory::LicenseBack => "license_back",
            DocumentCategory::SupportingDocuments => "supporting_documents",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentCategory::PayStubs => "pay stubs",
            DocumentCategory::CreditReport => "credit report",
            DocumentCategory::LicenseFront => "driver's license (front)",
            DocumentCategory::LicenseBack => "driver's license (back)",
            DocumentCategory::SupportingDocuments => "supporting documents",
        }
    }

    /// Files needed before the application can be submitted.
    pub const fn minimum(self) -> usize {
        match self {
            DocumentCategory::PayStubs => 3,
            DocumentCategory::CreditReport
            | DocumentCategory::LicenseFront
            | DocumentCategory::LicenseBack => 1,
            DocumentCategory::SupportingDocuments => 0,
        }
    }

    /// Single-file categories replace their file on attach.
    pub const fn is_single(self) -> bool {
        matches!(
            self,
            DocumentCategory::CreditReport
                | DocumentCategory::LicenseFront
                | DocumentCategory::LicenseBack
        )
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A required category that is still short of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingDocument {
    pub category: DocumentCategory,
    pub required: usize,
    pub attached: usize,
}

impl fmt::Display for MissingDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required > 1 {
            write!(
                f,
                "{} ({} of {} attached)",
                self.category, self.attached, self.required
            )
        } else {
            write!(f, "{}", self.category)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSlotView {
    pub category: DocumentCategory,
    pub required: usize,
    pub file_names: Vec<String>,
}

/// Files selected on the document step, held until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBuffers {
    pay_stubs: Vec<PendingFile>,
    credit_report: Option<PendingFile>,
    license_front: Option<PendingFile>,
    license_back: Option<PendingFile>,
    supporting: Vec<PendingFile>,
}

impl DocumentBuffers {
    pub fn attach(&mut self, category: DocumentCategory, file: PendingFile) {
        match category {
            DocumentCategory::PayStubs => self.pay_stubs.push(file),
            DocumentCategory::CreditReport => self.credit_report = Some(file),
            DocumentCategory::LicenseFront => self.license_front = Some(file),
            DocumentCategory::LicenseBack => self.license_back = Some(file),
            DocumentCategory::SupportingDocuments => self.supporting.push(file),
        }
    }

    pub fn detach(&mut self, category: DocumentCategory, index: usize) -> Option<PendingFile> {
        fn take_at(files: &mut Vec<PendingFile>, index: usize) -> Option<PendingFile> {
            (index < files.len()).then(|| files.remove(index))
        }

        fn take_single(slot: &mut Option<PendingFile>, index: usize) -> Option<PendingFile> {
            if index == 0 {
                slot.take()
            } else {
                None
            }
        }

        match category {
            DocumentCategory::PayStubs => take_at(&mut self.pay_stubs, index),
            DocumentCategory::CreditReport => take_single(&mut self.credit_report, index),
            DocumentCategory::LicenseFront => take_single(&mut self.license_front, index),
            DocumentCategory::LicenseBack => take_single(&mut self.license_back, index),
            DocumentCategory::SupportingDocuments => take_at(&mut self.supporting, index),
        }
    }

    pub fn files(&self, category: DocumentCategory) -> &[PendingFile] {
        match category {
            DocumentCategory::PayStubs => &self.pay_stubs,
            DocumentCategory::CreditReport => self.credit_report.as_slice(),
            DocumentCategory::LicenseFront => self.license_front.as_slice(),
            DocumentCategory::LicenseBack => self.license_back.as_slice(),
            DocumentCategory::SupportingDocuments => &self.supporting,
        }
    }

    pub fn count(&self, category: DocumentCategory) -> usize {
        self.files(category).len()
    }

    pub fn missing(&self) -> Vec<MissingDocument> {
        DocumentCategory::ALL
            .into_iter()
            .filter(|category| self.count(*category) < category.minimum())
            .map(|category| MissingDocument {
                category,
                required: category.minimum(),
                attached: self.count(category),
            })
            .collect()
    }

    /// Share of required categories that have enough files, in `0.0..=1.0`.
    pub fn completeness(&self) -> f64 {
        let required: Vec<_> = DocumentCategory::ALL
            .into_iter()
            .filter(|category| category.minimum() > 0)
            .collect();
        let satisfied = required
            .iter()
            .filter(|category| self.count(**category) >= category.minimum())
            .count();
        satisfied as f64 / required.len() as f64
    }

    pub fn slots(&self) -> Vec<DocumentSlotView> {
        DocumentCategory::ALL
            .into_iter()
            .map(|category| DocumentSlotView {
                category,
                required: category.minimum(),
                file_names: self
                    .files(category)
                    .iter()
                    .map(|file| file.file_name.clone())
                    .collect(),
            })
            .collect()
    }
}

/// Stored links for every category, in the order the files were attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentLinks {
    pub pay_stubs: Vec<String>,
    pub credit_report: String,
    pub license_front: String,
    pub license_back: String,
    pub supporting: Vec<String>,
}

impl DocumentLinks {
    pub fn record(&mut self, category: DocumentCategory, uploaded: Vec<UploadedDocument>) {
        let mut urls = uploaded.into_iter().map(|document| document.url);
        match category {
            DocumentCategory::PayStubs => self.pay_stubs.extend(urls),
            DocumentCategory::CreditReport => {
                self.credit_report = urls.next().unwrap_or_default()
            }
            DocumentCategory::LicenseFront => {
                self.license_front = urls.next().unwrap_or_default()
            }
            DocumentCategory::LicenseBack => self.license_back = urls.next().unwrap_or_default(),
            DocumentCategory::SupportingDocuments => self.supporting.extend(urls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, "application/pdf", vec![1, 2, 3])
    }

    #[test]
    fn single_categories_replace_and_lists_append() {
        let mut buffers = DocumentBuffers::default();
        buffers.attach(DocumentCategory::CreditReport, file("old.pdf"));
        buffers.attach(DocumentCategory::CreditReport, file("new.pdf"));
        buffers.attach(DocumentCategory::PayStubs, file("jan.pdf"));
        buffers.attach(DocumentCategory::PayStubs, file("feb.pdf"));

        assert_eq!(buffers.count(DocumentCategory::CreditReport), 1);
        assert_eq!(
            buffers.files(DocumentCategory::CreditReport)[0].file_name,
            "new.pdf"
        );
        assert_eq!(buffers.count(DocumentCategory::PayStubs), 2);

        let removed = buffers
            .detach(DocumentCategory::PayStubs, 0)
            .expect("detached");
        assert_eq!(removed.file_name, "jan.pdf");
        assert!(buffers.detach(DocumentCategory::PayStubs, 5).is_none());
        assert!(buffers.detach(DocumentCategory::LicenseBack, 0).is_none());
    }

    #[test]
    fn two_pay_stubs_leave_the_category_missing() {
        let mut buffers = DocumentBuffers::default();
        buffers.attach(DocumentCategory::PayStubs, file("jan.pdf"));
        buffers.attach(DocumentCategory::PayStubs, file("feb.pdf"));
        buffers.attach(DocumentCategory::CreditReport, file("credit.pdf"));
        buffers.attach(DocumentCategory::LicenseFront, file("front.jpg"));
        buffers.attach(DocumentCategory::LicenseBack, file("back.jpg"));

        let missing = buffers.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].category, DocumentCategory::PayStubs);
        assert_eq!(missing[0].to_string(), "pay stubs (2 of 3 attached)");
        assert!((buffers.completeness() - 0.75).abs() < f64::EPSILON);

        buffers.attach(DocumentCategory::PayStubs, file("mar.pdf"));
        assert!(buffers.missing().is_empty());
        assert!((buffers.completeness() - 1.0).abs() < f64::EPSILON);
    }
}
