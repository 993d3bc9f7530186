use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{NewProperty, Property, PropertyStatus, PropertyType};
use super::store::{EntityStore, StoreError};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Store { line: usize, source: StoreError },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read property export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid property CSV data: {}", err),
            ImportError::Store { line, source } => {
                write!(f, "could not store property on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Store { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Parsed rows of a property CSV export, ready to be created in the store.
#[derive(Debug, Clone)]
pub struct PropertyImporter {
    rows: Vec<NewProperty>,
}

impl PropertyImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();

        for record in csv_reader.deserialize::<PropertyRow>() {
            rows.push(record?.into_fields());
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[NewProperty] {
        &self.rows
    }

    /// Create one property per row, stopping at the first store failure.
    pub async fn import(
        self,
        store: &dyn EntityStore<Property>,
    ) -> Result<Vec<Property>, ImportError> {
        let mut created = Vec::with_capacity(self.rows.len());
        for (index, fields) in self.rows.into_iter().enumerate() {
            let property = store
                .create(fields)
                .await
                .map_err(|source| ImportError::Store {
                    line: index + 2,
                    source,
                })?;
            created.push(property);
        }
        info!(count = created.len(), "imported properties");
        Ok(created)
    }
}

#[derive(Debug, Deserialize)]
struct PropertyRow {
    title: String,
    address: String,
    city: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    neighbourhood: Option<String>,
    property_type: PropertyType,
    beds: u8,
    baths: f32,
    sqft: u32,
    monthly_rent: u32,
    #[serde(default)]
    status: Option<PropertyStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amenities: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    photos: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    owner_id: Option<String>,
}

impl PropertyRow {
    fn into_fields(self) -> NewProperty {
        NewProperty {
            title: self.title,
            address: self.address,
            city: self.city,
            neighbourhood: self.neighbourhood,
            property_type: self.property_type,
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
            monthly_rent: self.monthly_rent,
            status: self.status.unwrap_or(PropertyStatus::Available),
            amenities: split_list(self.amenities.as_deref())
                .map(|tag| tag.to_ascii_lowercase())
                .collect::<BTreeSet<_>>(),
            photos: split_list(self.photos.as_deref()).collect(),
            owner_id: self.owner_id,
        }
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = String> + '_ {
    raw.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
