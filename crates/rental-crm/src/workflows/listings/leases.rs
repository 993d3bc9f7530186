use serde::Serialize;

use super::matches_term;
use crate::workflows::records::{Client, Lease, Property, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseRow {
    pub lease: Lease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

/// Join leases to property titles and tenant names.
///
/// Leases opened by an approval reference the applicant's user id, so tenants are looked up
/// among clients first and users second.
pub fn join_leases(
    leases: Vec<Lease>,
    properties: &[Property],
    clients: &[Client],
    users: &[User],
) -> Vec<LeaseRow> {
    leases
        .into_iter()
        .map(|lease| {
            let property_title = properties
                .iter()
                .find(|property| property.id == lease.property_id)
                .map(|property| property.title.clone());
            let client_name = clients
                .iter()
                .find(|client| client.id == lease.client_id)
                .map(Client::full_name)
                .or_else(|| {
                    users
                        .iter()
                        .find(|user| user.id.as_str() == lease.client_id.as_str())
                        .map(|user| user.full_name.clone())
                });
            LeaseRow {
                lease,
                property_title,
                client_name,
            }
        })
        .collect()
}

pub fn search_leases(rows: &[LeaseRow], term: &str) -> Vec<LeaseRow> {
    rows.iter()
        .filter(|row| {
            let fields = [row.property_title.as_deref(), row.client_name.as_deref()];
            matches_term(term, fields.into_iter().flatten())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::listings::tests::fixtures::{client, lease, property, user};
    use crate::workflows::records::{LeaseStatus, PropertyStatus};

    #[test]
    fn search_matches_property_title_and_tenant_name() {
        let properties = vec![
            property("prop-1", "Woodland Court", 1250, 2, PropertyStatus::Leased),
            property("prop-2", "Grand Terrace", 1800, 3, PropertyStatus::Leased),
        ];
        let clients = vec![client("client-1", "Dana", "Reyes", None, None)];
        let users = vec![user("user-5", "Marcus Lindqvist", "marcus@example.com")];
        let rows = join_leases(
            vec![
                lease("lease-1", "prop-1", "client-1", 1250, LeaseStatus::Active),
                lease("lease-2", "prop-2", "user-5", 1800, LeaseStatus::Active),
            ],
            &properties,
            &clients,
            &users,
        );

        assert_eq!(rows[0].client_name.as_deref(), Some("Dana Reyes"));
        assert_eq!(rows[1].client_name.as_deref(), Some("Marcus Lindqvist"));

        let found = search_leases(&rows, "terrace");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lease.id.as_str(), "lease-2");

        let found = search_leases(&rows, "reyes");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lease.id.as_str(), "lease-1");
    }
}
