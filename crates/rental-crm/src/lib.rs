//! Property-management CRM: rental listings, the applicant intake wizard, and lease approvals.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
