use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::domain::{ApplicantProfile, Client, Lease, Property, RentalApplication, User, UserId};
use super::store::{
    sort_records, CrmStore, Entity, EntityStore, FieldFilter, SessionStore, SortKey, StoreError,
};

/// Write operations that can be armed to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy)]
struct ArmedFailure {
    op: StoreOp,
    remaining: usize,
}

/// One in-memory collection. Rows keep insertion order.
pub struct MemoryTable<E: Entity> {
    rows: Mutex<Vec<E>>,
    sequence: AtomicU64,
    armed: Mutex<Option<ArmedFailure>>,
}

impl<E: Entity> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            sequence: AtomicU64::new(1),
            armed: Mutex::new(None),
        }
    }
}

impl<E: Entity> MemoryTable<E> {
    /// Insert a fully formed row, bypassing id assignment.
    pub fn seed(&self, row: E) -> Result<(), StoreError> {
        self.lock_rows()?.push(row);
        Ok(())
    }

    /// Make the `op` call after `skip` successful ones fail with `Unavailable`.
    pub fn arm_failure(&self, op: StoreOp, skip: usize) {
        if let Ok(mut armed) = self.armed.lock() {
            *armed = Some(ArmedFailure {
                op,
                remaining: skip,
            });
        }
    }

    pub fn snapshot(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.lock_rows()?.clone())
    }

    fn lock_rows(&self) -> Result<MutexGuard<'_, Vec<E>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable(format!("{} table lock poisoned", E::KIND)))
    }

    fn trip(&self, op: StoreOp) -> Result<(), StoreError> {
        let mut armed = self
            .armed
            .lock()
            .map_err(|_| StoreError::Unavailable("fault injector lock poisoned".to_string()))?;
        match armed.as_mut() {
            Some(failure) if failure.op == op => {
                if failure.remaining == 0 {
                    *armed = None;
                    return Err(StoreError::Unavailable(format!(
                        "injected {op:?} failure on {}",
                        E::KIND
                    )));
                }
                failure.remaining -= 1;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn next_id(&self, rows: &[E]) -> E::Id {
        loop {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            let candidate = E::Id::from(format!("{}-{sequence:06}", E::ID_PREFIX));
            if rows.iter().all(|row| row.id() != &candidate) {
                return candidate;
            }
        }
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryTable<E> {
    async fn list(&self, sort: Option<&SortKey>) -> Result<Vec<E>, StoreError> {
        let rows = self.snapshot()?;
        match sort {
            Some(key) => sort_records(rows, key),
            None => Ok(rows),
        }
    }

    async fn get(&self, id: &E::Id) -> Result<E, StoreError> {
        self.lock_rows()?
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }

    async fn create(&self, fields: E::Fields) -> Result<E, StoreError> {
        self.trip(StoreOp::Create)?;
        E::validate(&fields).map_err(|reason| StoreError::Rejected {
            kind: E::KIND,
            reason,
        })?;

        let mut rows = self.lock_rows()?;
        let id = self.next_id(&rows);
        let row = E::materialize(id, Utc::now(), fields);
        debug!(kind = E::KIND, id = %row.id(), "record created");
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &E::Id, patch: E::Patch) -> Result<E, StoreError> {
        self.trip(StoreOp::Update)?;
        let mut rows = self.lock_rows()?;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;
        row.apply(patch);
        Ok(row.clone())
    }

    async fn filter(
        &self,
        filter: &FieldFilter,
        sort: Option<&SortKey>,
    ) -> Result<Vec<E>, StoreError> {
        let mut matched = Vec::new();
        for row in self.snapshot()? {
            if filter.matches(&serde_json::to_value(&row)?) {
                matched.push(row);
            }
        }
        match sort {
            Some(key) => sort_records(matched, key),
            None => Ok(matched),
        }
    }
}

/// Development and test backend holding every collection in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    pub properties: MemoryTable<Property>,
    pub clients: MemoryTable<Client>,
    pub applications: MemoryTable<RentalApplication>,
    pub leases: MemoryTable<Lease>,
    pub users: MemoryTable<User>,
    current_user: Mutex<Option<UserId>>,
    reject_profile_updates: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `user` and make it the session's current user.
    pub fn sign_in(&self, user: User) -> Result<(), StoreError> {
        let id = user.id.clone();
        self.users.seed(user)?;
        *self.lock_session()? = Some(id);
        Ok(())
    }

    pub fn reject_profile_updates(&self, reject: bool) {
        self.reject_profile_updates.store(reject, Ordering::SeqCst);
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<UserId>>, StoreError> {
        self.current_user
            .lock()
            .map_err(|_| StoreError::Unavailable("session lock poisoned".to_string()))
    }

    fn current_user_id(&self) -> Result<UserId, StoreError> {
        self.lock_session()?
            .clone()
            .ok_or_else(|| StoreError::Unavailable("no signed-in user".to_string()))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn me(&self) -> Result<User, StoreError> {
        let id = self.current_user_id()?;
        self.users.get(&id).await
    }

    async fn update_my_user_data(&self, profile: ApplicantProfile) -> Result<User, StoreError> {
        if self.reject_profile_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "profile updates are disabled".to_string(),
            ));
        }
        let id = self.current_user_id()?;
        self.users.update(&id, profile).await
    }
}

impl CrmStore for InMemoryStore {
    fn properties(&self) -> &dyn EntityStore<Property> {
        &self.properties
    }

    fn clients(&self) -> &dyn EntityStore<Client> {
        &self.clients
    }

    fn applications(&self) -> &dyn EntityStore<RentalApplication> {
        &self.applications
    }

    fn leases(&self) -> &dyn EntityStore<Lease> {
        &self.leases
    }

    fn users(&self) -> &dyn EntityStore<User> {
        &self.users
    }

    fn session(&self) -> &dyn SessionStore {
        self
    }
}
