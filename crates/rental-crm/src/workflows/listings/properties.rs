use serde::{Deserialize, Serialize};

use super::matches_term;
use crate::workflows::records::{Property, PropertyStatus, PropertyType};

/// Bedroom criterion: an exact count, or "N or more".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "beds", rename_all = "snake_case")]
pub enum BedroomFilter {
    Exactly(u8),
    AtLeast(u8),
}

impl BedroomFilter {
    pub fn accepts(self, beds: u8) -> bool {
        match self {
            BedroomFilter::Exactly(wanted) => beds == wanted,
            BedroomFilter::AtLeast(minimum) => beds >= minimum,
        }
    }
}

/// Conjunction of property criteria. Unset criteria accept everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    pub search: Option<String>,
    pub status: Option<PropertyStatus>,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub bedrooms: Option<BedroomFilter>,
    /// `Some(true)` keeps pet-friendly units, `Some(false)` keeps the rest.
    pub pets: Option<bool>,
    pub neighbourhood: Option<String>,
    pub property_type: Option<PropertyType>,
}

impl PropertyFilter {
    pub fn accepts(&self, property: &Property) -> bool {
        if let Some(term) = self.search.as_deref() {
            let fields = [
                Some(property.title.as_str()),
                Some(property.address.as_str()),
                Some(property.city.as_str()),
                property.neighbourhood.as_deref(),
            ];
            if !matches_term(term, fields.into_iter().flatten()) {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != property.status) {
            return false;
        }
        if self.price_min.is_some_and(|min| property.monthly_rent < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| property.monthly_rent > max) {
            return false;
        }
        if self
            .bedrooms
            .is_some_and(|bedrooms| !bedrooms.accepts(property.beds))
        {
            return false;
        }
        if self
            .pets
            .is_some_and(|pets| pets != property.is_pet_friendly())
        {
            return false;
        }
        if let Some(neighbourhood) = self.neighbourhood.as_deref() {
            if property.neighbourhood.as_deref() != Some(neighbourhood) {
                return false;
            }
        }
        if self
            .property_type
            .is_some_and(|kind| kind != property.property_type)
        {
            return false;
        }
        true
    }

    /// Matching properties in source order.
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        properties
            .iter()
            .filter(|property| self.accepts(property))
            .cloned()
            .collect()
    }
}

/// Public portal ordering: open units first, leased units after them for the waitlist.
pub fn portal_order(properties: Vec<Property>) -> Vec<Property> {
    let (leased, open): (Vec<_>, Vec<_>) = properties
        .into_iter()
        .partition(|property| property.status == PropertyStatus::Leased);
    open.into_iter().chain(leased).collect()
}

/// Distinct neighbourhoods in first-seen order, for the portal's neighbourhood picker.
pub fn neighbourhoods(properties: &[Property]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in properties.iter().filter_map(|p| p.neighbourhood.as_ref()) {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}
