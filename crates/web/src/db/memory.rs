//! In-memory stores.
//!
//! Same contracts as the `PostgreSQL` repositories, backed by a
//! `tokio::sync::RwLock`. Used by the integration harness and unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use reservations_core::{
    Reservation, ReservationFields, ReservationFilter, ReservationId, StaffUserId, Username,
    listing_order,
};

use super::{RepositoryError, ReservationStore, StaffStore};
use crate::models::StaffUser;

#[derive(Debug, Default)]
struct ReservationTable {
    last_id: i32,
    rows: BTreeMap<ReservationId, Reservation>,
}

/// In-memory [`ReservationStore`].
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    table: RwLock<ReservationTable>,
    unavailable: AtomicBool,
}

impl InMemoryReservationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every operation fails with `Unavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored reservations.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no reservations.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn create(
        &self,
        fields: ReservationFields,
        created_on: NaiveDate,
    ) -> Result<Reservation, RepositoryError> {
        self.check_available()?;
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = ReservationId::new(table.last_id);
        let reservation = Reservation::from_fields(id, fields, created_on);
        table.rows.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation, RepositoryError> {
        self.check_available()?;
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_filtered(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        self.check_available()?;
        let table = self.table.read().await;
        let mut matching: Vec<Reservation> = table
            .rows
            .values()
            .filter(|reservation| filter.matches(reservation))
            .cloned()
            .collect();
        matching.sort_by(listing_order);
        Ok(matching)
    }

    async fn update(
        &self,
        id: ReservationId,
        fields: ReservationFields,
    ) -> Result<Reservation, RepositoryError> {
        self.check_available()?;
        let mut table = self.table.write().await;
        let reservation = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        reservation.apply(fields);
        Ok(reservation.clone())
    }

    async fn delete(&self, id: ReservationId) -> Result<(), RepositoryError> {
        self.check_available()?;
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

/// In-memory [`StaffStore`].
#[derive(Debug, Default)]
pub struct InMemoryStaffStore {
    users: RwLock<Vec<StaffUser>>,
}

impl InMemoryStaffStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StaffStore for InMemoryStaffStore {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        is_staff: bool,
    ) -> Result<StaffUser, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|user| &user.username == username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let next_id = users.iter().map(|user| user.id.as_i32()).max().unwrap_or(0) + 1;
        let user = StaffUser {
            id: StaffUserId::new(next_id),
            username: username.clone(),
            password_hash: password_hash.to_string(),
            is_staff,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StaffUser>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<StaffUser>, RepositoryError> {
        Ok(self.users.read().await.clone())
    }
}
