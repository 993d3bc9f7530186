use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::matches_term;
use crate::workflows::records::{
    ApplicationStatus, Property, PropertyId, RentalApplication, User, UserId,
};

/// Application joined with the applicant and property it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRow {
    pub application: RentalApplication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,
    pub aging: bool,
}

/// Join applications to their applicants and properties, keeping application order.
pub fn join_rows(
    applications: Vec<RentalApplication>,
    users: &[User],
    properties: &[Property],
    now: DateTime<Utc>,
    aging_days: u32,
) -> Vec<ApplicationRow> {
    let users: HashMap<&UserId, &User> = users.iter().map(|user| (&user.id, user)).collect();
    let properties: HashMap<&PropertyId, &Property> = properties
        .iter()
        .map(|property| (&property.id, property))
        .collect();

    applications
        .into_iter()
        .map(|application| {
            let applicant = users.get(&application.user_id);
            let property = properties.get(&application.property_id);
            ApplicationRow {
                applicant_name: applicant.map(|user| user.full_name.clone()),
                applicant_email: applicant.map(|user| user.email.clone()),
                property_title: property.map(|property| property.title.clone()),
                aging: is_aging(&application, now, aging_days),
                application,
            }
        })
        .collect()
}

/// Pending and created more than `days` days before `now`. A threshold reaching past the
/// earliest representable time flags nothing.
pub fn is_aging(application: &RentalApplication, now: DateTime<Utc>, days: u32) -> bool {
    let cutoff = Duration::try_days(i64::from(days)).and_then(|age| now.checked_sub_signed(age));
    application.status == ApplicationStatus::Pending
        && cutoff.is_some_and(|cutoff| application.created_date < cutoff)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationFilter {
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    /// Keep only pending applications older than this many days.
    pub aging_days: Option<u32>,
}

impl ApplicationFilter {
    pub fn accepts(&self, row: &ApplicationRow, now: DateTime<Utc>) -> bool {
        if let Some(term) = self.search.as_deref() {
            let fields = [
                row.applicant_name.as_deref(),
                row.applicant_email.as_deref(),
                row.property_title.as_deref(),
            ];
            if !matches_term(term, fields.into_iter().flatten()) {
                return false;
            }
        }
        let application = &row.application;
        if self.status.is_some_and(|status| status != application.status) {
            return false;
        }
        if self.score_min.is_some_and(|min| application.score < min) {
            return false;
        }
        if self.score_max.is_some_and(|max| application.score > max) {
            return false;
        }
        if self
            .aging_days
            .is_some_and(|days| !is_aging(application, now, days))
        {
            return false;
        }
        true
    }

    pub fn apply(&self, rows: &[ApplicationRow], now: DateTime<Utc>) -> Vec<ApplicationRow> {
        rows.iter()
            .filter(|row| self.accepts(row, now))
            .cloned()
            .collect()
    }
}

/// Applications bucketed by status for the review board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationBoard {
    pub pending: Vec<ApplicationRow>,
    pub approved: Vec<ApplicationRow>,
    pub denied: Vec<ApplicationRow>,
}

impl ApplicationBoard {
    pub fn from_rows(rows: Vec<ApplicationRow>) -> Self {
        let mut board = Self::default();
        for row in rows {
            match row.application.status {
                ApplicationStatus::Pending => board.pending.push(row),
                ApplicationStatus::Approved => board.approved.push(row),
                ApplicationStatus::Denied => board.denied.push(row),
            }
        }
        board
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.approved.len() + self.denied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
