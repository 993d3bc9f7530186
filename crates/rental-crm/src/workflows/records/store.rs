use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::domain::{ApplicantProfile, Client, Lease, Property, RentalApplication, User};

/// A record kind held by the entity store.
///
/// `Fields` is what staff or the wizard supply on create; the store assigns the id and the
/// creation timestamp. `Patch` is a partial update.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + fmt::Display + From<String> + Send + Sync;
    type Fields: Send + Sync;
    type Patch: Send + Sync;

    const KIND: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &Self::Id;

    fn validate(_fields: &Self::Fields) -> Result<(), String> {
        Ok(())
    }

    fn materialize(id: Self::Id, created_date: DateTime<Utc>, fields: Self::Fields) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

/// Error enumeration for entity store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} rejected: {reason}")]
    Rejected { kind: &'static str, reason: String },
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
    #[error("record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found<E: Entity>(id: &E::Id) -> Self {
        StoreError::NotFound {
            kind: E::KIND,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Sort order in the backend's textual form: `created_date` ascending, `-created_date`
/// descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (field, descending) = match raw.strip_prefix('-') {
            Some(field) => (field, true),
            None => (raw, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }

    pub fn newest_first() -> Self {
        Self::descending("created_date")
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Equality constraints on serialized fields, e.g. `{"status": "available"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldFilter {
    fields: BTreeMap<String, Value>,
}

impl FieldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| record.get(field).unwrap_or(&Value::Null) == expected)
    }
}

/// Async CRUD surface over one collection.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn list(&self, sort: Option<&SortKey>) -> Result<Vec<E>, StoreError>;
    async fn get(&self, id: &E::Id) -> Result<E, StoreError>;
    async fn create(&self, fields: E::Fields) -> Result<E, StoreError>;
    async fn update(&self, id: &E::Id, patch: E::Patch) -> Result<E, StoreError>;
    async fn filter(
        &self,
        filter: &FieldFilter,
        sort: Option<&SortKey>,
    ) -> Result<Vec<E>, StoreError>;
}

/// The authenticated applicant's own user record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn me(&self) -> Result<User, StoreError>;
    async fn update_my_user_data(&self, profile: ApplicantProfile) -> Result<User, StoreError>;
}

/// Every collection the CRM reads and writes, plus the current session.
pub trait CrmStore: Send + Sync {
    fn properties(&self) -> &dyn EntityStore<Property>;
    fn clients(&self) -> &dyn EntityStore<Client>;
    fn applications(&self) -> &dyn EntityStore<RentalApplication>;
    fn leases(&self) -> &dyn EntityStore<Lease>;
    fn users(&self) -> &dyn EntityStore<User>;
    fn session(&self) -> &dyn SessionStore;
}

/// Stable sort of records by one serialized field.
pub fn sort_records<E: Serialize>(records: Vec<E>, key: &SortKey) -> Result<Vec<E>, StoreError> {
    let mut keyed = records
        .into_iter()
        .map(|record| {
            let value = serde_json::to_value(&record)?;
            let field = value.get(&key.field).cloned().unwrap_or(Value::Null);
            Ok((field, record))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    keyed.sort_by(|(left, _), (right, _)| {
        let ordering = compare_values(left, right);
        if key.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => {
            match (a.parse::<DateTime<Utc>>(), b.parse::<DateTime<Utc>>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        rank: Option<u32>,
        created_date: &'static str,
    }

    #[test]
    fn parses_descending_sort_keys() {
        let key = SortKey::parse("-created_date").expect("sort key");
        assert!(key.descending);
        assert_eq!(key.field, "created_date");
        assert_eq!(key.to_string(), "-created_date");
        assert_eq!(SortKey::parse("monthly_rent"), Some(SortKey::ascending("monthly_rent")));
        assert!(SortKey::parse("-").is_none());
    }

    #[test]
    fn sorts_timestamps_chronologically_and_nulls_first() {
        let rows = vec![
            Row {
                name: "late",
                rank: Some(2),
                created_date: "2025-03-01T00:00:00Z",
            },
            Row {
                name: "fractional",
                rank: None,
                created_date: "2025-03-01T00:00:00.500Z",
            },
            Row {
                name: "early",
                rank: Some(1),
                created_date: "2025-01-15T09:30:00Z",
            },
        ];

        let sorted = sort_records(rows, &SortKey::newest_first()).expect("sorted");
        let names: Vec<_> = sorted.iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["fractional", "late", "early"]);

        let sorted = sort_records(sorted, &SortKey::ascending("rank")).expect("sorted");
        let names: Vec<_> = sorted.iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["fractional", "early", "late"]);
    }

    #[test]
    fn field_filter_requires_every_equality() {
        let record = json!({"status": "available", "beds": 2});
        assert!(FieldFilter::new().matches(&record));
        assert!(FieldFilter::new().eq("status", "available").matches(&record));
        assert!(!FieldFilter::new()
            .eq("status", "available")
            .eq("beds", 3)
            .matches(&record));
        assert!(!FieldFilter::new().eq("owner_id", "owner-1").matches(&record));
    }
}
