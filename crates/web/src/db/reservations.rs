//! Reservation repository.
//!
//! Queries are built at runtime (`query_as` + `QueryBuilder`) so the crate
//! compiles without a live database.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use reservations_core::{Reservation, ReservationFields, ReservationFilter, ReservationId};

use super::RepositoryError;

/// Columns selected for every reservation query, in `ReservationRow` order.
const RESERVATION_COLUMNS: &str = "id, first_name, last_name, date, party_size, created_at, notes";

/// `ORDER BY` clause matching `reservations_core::listing_order`.
const LISTING_ORDER: &str = " ORDER BY date DESC, created_at DESC, id DESC";

/// Persistence boundary for reservations.
///
/// Listings are fully materialized and ordered by date descending, then
/// creation date descending, then id descending.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new reservation created on `created_on`.
    async fn create(
        &self,
        fields: ReservationFields,
        created_on: NaiveDate,
    ) -> Result<Reservation, RepositoryError>;

    /// Fetch one reservation. `RepositoryError::NotFound` when absent.
    async fn get(&self, id: ReservationId) -> Result<Reservation, RepositoryError>;

    /// Every reservation in listing order.
    async fn list(&self) -> Result<Vec<Reservation>, RepositoryError> {
        self.list_filtered(&ReservationFilter::default()).await
    }

    /// Reservations whose first or last name contains `term`, ignoring case.
    ///
    /// A missing or blank term behaves exactly like [`ReservationStore::list`].
    async fn search(&self, term: Option<&str>) -> Result<Vec<Reservation>, RepositoryError> {
        self.list_filtered(&ReservationFilter::search(term)).await
    }

    /// Reservations matching every criterion of `filter`, in listing order.
    async fn list_filtered(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    /// Overwrite the editable fields. `id` and `created_at` never change.
    async fn update(
        &self,
        id: ReservationId,
        fields: ReservationFields,
    ) -> Result<Reservation, RepositoryError>;

    /// Remove a reservation permanently. A second delete reports `NotFound`.
    async fn delete(&self, id: ReservationId) -> Result<(), RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` reservation queries.
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i32,
    first_name: String,
    last_name: String,
    date: NaiveDate,
    party_size: i32,
    created_at: NaiveDate,
    notes: Option<String>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = RepositoryError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let party_size = u32::try_from(row.party_size)
            .ok()
            .filter(|size| *size >= 1)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "invalid party size in database: {}",
                    row.party_size
                ))
            })?;

        Ok(Self {
            id: ReservationId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            date: row.date,
            party_size,
            created_at: row.created_at,
            notes: row.notes,
        })
    }
}

fn party_size_column(party_size: u32) -> Result<i32, RepositoryError> {
    i32::try_from(party_size)
        .map_err(|_| RepositoryError::Conflict(format!("party size {party_size} out of range")))
}

/// Escape `LIKE` metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL` implementation of [`ReservationStore`].
#[derive(Debug, Clone)]
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    /// Create a new reservation repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationRepository {
    async fn create(
        &self,
        fields: ReservationFields,
        created_on: NaiveDate,
    ) -> Result<Reservation, RepositoryError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "INSERT INTO reservations.reservation \
             (first_name, last_name, date, party_size, created_at, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.date)
        .bind(party_size_column(fields.party_size)?)
        .bind(created_on)
        .bind(fields.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation, RepositoryError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations.reservation WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn list_filtered(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations.reservation WHERE TRUE"
        ));

        if let Some(term) = filter.search_term() {
            let pattern = format!("%{}%", escape_like(term));
            query
                .push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR last_name ILIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        if let Some(date) = filter.date {
            query.push(" AND date = ").push_bind(date);
        }

        query.push(LISTING_ORDER);

        let rows = query
            .build_query_as::<ReservationRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(
        &self,
        id: ReservationId,
        fields: ReservationFields,
    ) -> Result<Reservation, RepositoryError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "UPDATE reservations.reservation \
             SET first_name = $1, last_name = $2, date = $3, party_size = $4, notes = $5 \
             WHERE id = $6 \
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.date)
        .bind(party_size_column(fields.party_size)?)
        .bind(fields.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete(&self, id: ReservationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reservations.reservation WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(party_size: i32) -> ReservationRow {
        ReservationRow {
            id: 7,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
            party_size,
            created_at: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_row_conversion() {
        let reservation = Reservation::try_from(row(4)).unwrap();
        assert_eq!(reservation.id, ReservationId::new(7));
        assert_eq!(reservation.party_size, 4);
        assert_eq!(reservation.notes, None);
    }

    #[test]
    fn test_row_with_invalid_party_size_is_corrupt() {
        assert!(matches!(
            Reservation::try_from(row(0)),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(matches!(
            Reservation::try_from(row(-3)),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("doe"), "doe");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_party_size_column_range() {
        assert_eq!(party_size_column(12).unwrap(), 12);
        assert!(party_size_column(u32::MAX).is_err());
    }
}
