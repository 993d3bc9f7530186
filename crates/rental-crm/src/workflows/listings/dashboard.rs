use chrono::{DateTime, Utc};
use serde::Serialize;

use super::applications::is_aging;
use crate::workflows::records::{
    ApplicationStatus, Lease, LeaseStatus, Property, PropertyStatus, RentalApplication,
};

pub const AGING_PREVIEW_LIMIT: usize = 5;
pub const ACTIVITY_LIMIT: usize = 10;

const RECENT_PROPERTIES: usize = 3;
const RECENT_APPLICATIONS: usize = 4;
const RECENT_LEASES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationCounts {
    pub pending: usize,
    pub approved: usize,
    pub denied: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Property,
    Application,
    Lease,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_units: usize,
    pub leased_units: usize,
    pub available_units: usize,
    /// Leased share of all units, in percent with one decimal.
    pub occupancy_rate: f64,
    pub applications: ApplicationCounts,
    /// Sum of monthly rent across active leases.
    pub monthly_recurring_rent: u64,
    pub aging_threshold_days: u32,
    pub aging_applications: Vec<RentalApplication>,
    pub recent_activity: Vec<ActivityEntry>,
}

impl DashboardSummary {
    pub fn build(
        properties: &[Property],
        applications: &[RentalApplication],
        leases: &[Lease],
        now: DateTime<Utc>,
        aging_days: u32,
    ) -> Self {
        let total_units = properties.len();
        let leased_units = count_status(properties, PropertyStatus::Leased);
        let available_units = count_status(properties, PropertyStatus::Available);

        let mut counts = ApplicationCounts::default();
        for application in applications {
            match application.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Approved => counts.approved += 1,
                ApplicationStatus::Denied => counts.denied += 1,
            }
        }

        let monthly_recurring_rent = leases
            .iter()
            .filter(|lease| lease.status == LeaseStatus::Active)
            .map(|lease| u64::from(lease.monthly_rent))
            .sum();

        let aging_applications = applications
            .iter()
            .filter(|application| is_aging(application, now, aging_days))
            .take(AGING_PREVIEW_LIMIT)
            .cloned()
            .collect();

        Self {
            total_units,
            leased_units,
            available_units,
            occupancy_rate: occupancy_rate(leased_units, total_units),
            applications: counts,
            monthly_recurring_rent,
            aging_threshold_days: aging_days,
            aging_applications,
            recent_activity: recent_activity(properties, applications, leases),
        }
    }
}

fn count_status(properties: &[Property], status: PropertyStatus) -> usize {
    properties.iter().filter(|p| p.status == status).count()
}

pub fn occupancy_rate(leased: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = leased as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

fn newest<T>(rows: &[T], limit: usize, created: impl Fn(&T) -> DateTime<Utc>) -> Vec<&T> {
    let mut rows: Vec<&T> = rows.iter().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(created(*row)));
    rows.truncate(limit);
    rows
}

/// Latest creations across properties, applications, and leases, newest first.
fn recent_activity(
    properties: &[Property],
    applications: &[RentalApplication],
    leases: &[Lease],
) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = newest(properties, RECENT_PROPERTIES, |p| p.created_date)
        .into_iter()
        .map(|property| ActivityEntry {
            kind: ActivityKind::Property,
            title: format!("Property \"{}\" created", property.title),
            timestamp: property.created_date,
        })
        .collect();
    entries.extend(
        newest(applications, RECENT_APPLICATIONS, |a| a.created_date)
            .into_iter()
            .map(|application| ActivityEntry {
                kind: ActivityKind::Application,
                title: format!("Application {} for property", application.status.label()),
                timestamp: application.created_date,
            }),
    );
    entries.extend(
        newest(leases, RECENT_LEASES, |l| l.created_date)
            .into_iter()
            .map(|lease| ActivityEntry {
                kind: ActivityKind::Lease,
                title: "Lease created".to_string(),
                timestamp: lease.created_date,
            }),
    );
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));
    entries.truncate(ACTIVITY_LIMIT);
    entries
}
