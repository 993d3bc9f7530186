//! Entity access layer: typed records, the async store contract, and the in-memory backend.

pub mod domain;
pub mod import;
pub mod memory;
pub mod store;

pub use domain::{
    ApplicantProfile, ApplicationId, ApplicationPatch, ApplicationPayload, ApplicationStatus,
    Client, ClientId, ClientPatch, ClientStatus, CoApplicant, EmploymentStatus, LeadSource, Lease,
    LeaseId, LeasePatch, LeaseStatus, NewApplication, NewClient, NewLease, NewProperty, NewUser,
    Occupant, PersonalReference, Pet, Property, PropertyId, PropertyPatch, PropertyStatus,
    PropertyType, RentalApplication, User, UserId, Vehicle, PET_FRIENDLY_AMENITY,
};
pub use import::{ImportError, PropertyImporter};
pub use memory::{InMemoryStore, MemoryTable, StoreOp};
pub use store::{CrmStore, Entity, EntityStore, FieldFilter, SessionStore, SortKey, StoreError};
