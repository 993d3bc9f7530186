use serde::Serialize;

use super::matches_term;
use crate::workflows::records::{
    Client, Lease, LeaseStatus, Property, PropertyStatus, RentalApplication,
};

/// Where a client sits in the leasing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStage {
    Lead,
    Applied,
    Leased,
}

impl ClientStage {
    pub const fn label(self) -> &'static str {
        match self {
            ClientStage::Lead => "Lead",
            ClientStage::Applied => "Applied",
            ClientStage::Leased => "Leased",
        }
    }
}

/// Leased with an active lease, applied with any application, otherwise a lead.
pub fn client_stage(
    client: &Client,
    applications: &[RentalApplication],
    leases: &[Lease],
) -> ClientStage {
    let id = client.id.as_str();
    if leases
        .iter()
        .any(|lease| lease.client_id.as_str() == id && lease.status == LeaseStatus::Active)
    {
        ClientStage::Leased
    } else if applications
        .iter()
        .any(|application| application.user_id.as_str() == id)
    {
        ClientStage::Applied
    } else {
        ClientStage::Lead
    }
}

/// Available properties whose rent fits the client's budget, at most `limit` of them.
pub fn matching_properties(
    client: &Client,
    properties: &[Property],
    limit: usize,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| property.status == PropertyStatus::Available)
        .filter(|property| within_budget(client, property.monthly_rent))
        .take(limit)
        .cloned()
        .collect()
}

fn within_budget(client: &Client, rent: u32) -> bool {
    client.budget_min.map_or(true, |min| rent >= min)
        && client.budget_max.map_or(true, |max| rent <= max)
}

/// Clients whose full name, email, or phone contain `term`.
pub fn search_clients(clients: &[Client], term: &str) -> Vec<Client> {
    clients
        .iter()
        .filter(|client| {
            let name = client.full_name();
            matches_term(
                term,
                [name.as_str(), client.email.as_str(), client.phone.as_str()],
            )
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientMatches {
    pub client: Client,
    pub stage: ClientStage,
    pub stage_label: &'static str,
    pub matches: Vec<Property>,
}
