//! # Calendar Service
//!
//! Calendar, period and reservation operations over an injected document
//! store and optional cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::{CalendarError, CalendarResult};
use super::locks::PeriodLocks;
use super::model::{Calendar, Entity, Period, Reservation};
use super::window::{parse_date, ttl_until, TimeWindow};
use crate::cache::{Cache, CachedRepository};
use crate::document_store::{DocumentStore, FilterExpr, StoreError, StoredDocument, Table};

/// Default lifetime of cached documents
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(120);

/// Calendar operations
pub struct CalendarService {
    store: Arc<dyn DocumentStore>,
    calendars: CachedRepository<Calendar>,
    periods: CachedRepository<Period>,
    reservations: CachedRepository<Reservation>,
    locks: PeriodLocks,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn to_document<T: Serialize>(record: &T) -> CalendarResult<Value> {
    Ok(serde_json::to_value(record)?)
}

impl CalendarService {
    /// Create a service. `cache` is `None` when caching is switched off.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Option<Arc<dyn Cache>>, cache_ttl: Duration) -> Self {
        Self {
            calendars: CachedRepository::new(store.clone(), cache.clone(), cache_ttl),
            periods: CachedRepository::new(store.clone(), cache.clone(), cache_ttl),
            reservations: CachedRepository::new(store.clone(), cache, cache_ttl),
            store,
            locks: PeriodLocks::new(),
            clock: local_now,
        }
    }

    /// Replace the wall clock used for TTL derivation
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    fn load<T: StoredDocument>(&self, id: &str) -> CalendarResult<Option<T>> {
        self.store
            .get(T::TABLE, id)?
            .map(|raw| serde_json::from_value(raw).map_err(CalendarError::from))
            .transpose()
    }

    fn require_calendar(&self, calendar_id: &str) -> CalendarResult<Calendar> {
        self.load::<Calendar>(calendar_id)?
            .ok_or_else(|| CalendarError::not_found(Table::Calendar, calendar_id))
    }

    fn ttl_for(&self, end_date: &str) -> CalendarResult<i64> {
        let end = parse_date("endDate", end_date)?;
        Ok(ttl_until(end, (self.clock)()))
    }

    // ==================
    // Entities
    // ==================

    /// Register an owner entity. An empty id is replaced by a fresh one.
    pub fn create_entity(&self, mut entity: Entity) -> CalendarResult<Entity> {
        if entity.id.is_empty() {
            entity.id = new_id();
        }
        self.store
            .create(Table::Entity, &entity.id, to_document(&entity)?)?;
        info!(entity_id = %entity.id, "entity created");
        Ok(entity)
    }

    pub fn get_entity(&self, id: &str) -> CalendarResult<Entity> {
        self.load::<Entity>(id)?
            .ok_or_else(|| CalendarError::not_found(Table::Entity, id))
    }

    fn owner_exists(&self, owner_id: &str) -> CalendarResult<bool> {
        Ok(self.store.get(Table::Entity, owner_id)?.is_some())
    }

    // ==================
    // Calendars
    // ==================

    /// Create a calendar with a fresh id.
    ///
    /// The owner check is inverted: creation is refused when the owner
    /// entity exists and allowed when it does not. Stored calendars depend
    /// on this behaviour, so it is kept as is.
    pub fn create_calendar(&self, mut calendar: Calendar) -> CalendarResult<Calendar> {
        if self.owner_exists(&calendar.owner_id)? {
            return Err(CalendarError::OwnerExists(calendar.owner_id));
        }

        calendar.id = new_id();
        self.store
            .create(Table::Calendar, &calendar.id, to_document(&calendar)?)
            .map_err(|e| {
                warn!(calendar_id = %calendar.id, error = %e, "calendar insert failed");
                CalendarError::CreateConflict {
                    table: Table::Calendar,
                    reason: e.to_string(),
                }
            })?;
        info!(calendar_id = %calendar.id, owner_id = %calendar.owner_id, "calendar created");
        Ok(calendar)
    }

    /// Replace the calendar stored under `id`
    pub async fn update_calendar(&self, id: &str, mut calendar: Calendar) -> CalendarResult<Calendar> {
        calendar.id = id.to_string();
        self.store
            .replace(Table::Calendar, id, to_document(&calendar)?)
            .map_err(|e| match e {
                StoreError::DocumentNotFound { .. } => CalendarError::not_found(Table::Calendar, id),
                other => other.into(),
            })?;
        self.calendars.evict(id).await;
        info!(calendar_id = %id, "calendar replaced");
        Ok(calendar)
    }

    pub async fn get_calendar(&self, id: &str) -> CalendarResult<Calendar> {
        self.calendars
            .get(id)
            .await?
            .ok_or_else(|| CalendarError::not_found(Table::Calendar, id))
    }

    // ==================
    // Periods
    // ==================

    /// Publish an availability period. The period is stored on its own and
    /// is not linked to the calendar beyond this existence check.
    pub fn set_available_period(&self, calendar_id: &str, mut period: Period) -> CalendarResult<Period> {
        self.require_calendar(calendar_id)?;
        TimeWindow::parse(&period.start_date, &period.end_date)?;

        period.id = new_id();
        period.ttl = self.ttl_for(&period.end_date)?;
        self.store
            .create(Table::Period, &period.id, to_document(&period)?)?;
        info!(
            calendar_id = %calendar_id,
            period_id = %period.id,
            start = %period.start_date,
            end = %period.end_date,
            "period published"
        );
        Ok(period)
    }

    pub async fn get_available_period(&self, id: &str) -> CalendarResult<Period> {
        self.periods
            .get(id)
            .await?
            .ok_or_else(|| CalendarError::not_found(Table::Period, id))
    }

    // ==================
    // Reservations
    // ==================

    /// Reserve the requested window on the period named by
    /// `reservation.period_id`.
    ///
    /// The conflict check and the insert run under the resolved period's
    /// lock.
    pub async fn add_reservation(&self, calendar_id: &str, mut reservation: Reservation) -> CalendarResult<Reservation> {
        self.require_calendar(calendar_id)?;
        let requested = TimeWindow::parse(&reservation.start_date, &reservation.end_date)?;

        let candidates = self.candidate_periods(&reservation.period_id)?;
        let Some(lock_id) = candidates.first().map(|period| period.id.clone()) else {
            debug!(period_id = %reservation.period_id, "no such period");
            return Err(CalendarError::NoFreePeriod);
        };

        let _guard = self.locks.acquire(&lock_id).await;
        let period = self.find_free_period(candidates, &requested)?;

        reservation.id = new_id();
        reservation.period_id = period.id;
        reservation.ttl = self.ttl_for(&reservation.end_date)?;
        self.store
            .create(Table::Reservation, &reservation.id, to_document(&reservation)?)?;
        info!(
            calendar_id = %calendar_id,
            reservation_id = %reservation.id,
            period_id = %reservation.period_id,
            "reservation created"
        );
        Ok(reservation)
    }

    fn candidate_periods(&self, period_id: &str) -> CalendarResult<Vec<Period>> {
        self.store
            .query(Table::Period, &[FilterExpr::eq("id", period_id)])?
            .into_iter()
            .map(|raw| serde_json::from_value(raw).map_err(CalendarError::from))
            .collect()
    }

    /// Pick the first candidate period that contains `requested` and has no
    /// overlapping reservation.
    fn find_free_period(&self, candidates: Vec<Period>, requested: &TimeWindow) -> CalendarResult<Period> {
        let mut outside = None;
        let mut conflicted = false;

        for period in candidates {
            let window = TimeWindow::parse(&period.start_date, &period.end_date)?;
            if !window.contains(requested) {
                outside = Some(period.id);
                continue;
            }

            let existing = self
                .store
                .query(Table::Reservation, &[FilterExpr::eq("periodId", period.id.as_str())])?;

            let mut clash = None;
            for raw in existing {
                let other: Reservation = serde_json::from_value(raw)?;
                let other_window = TimeWindow::parse(&other.start_date, &other.end_date)?;
                if let Some(kind) = other_window.overlap_with(requested) {
                    clash = Some((other.id, kind));
                    break;
                }
            }

            match clash {
                None => return Ok(period),
                Some((reservation_id, kind)) => {
                    debug!(
                        period_id = %period.id,
                        reservation_id = %reservation_id,
                        overlap = ?kind,
                        "period unavailable"
                    );
                    conflicted = true;
                }
            }
        }

        match outside {
            Some(period_id) if !conflicted => Err(CalendarError::OutsidePeriod(period_id)),
            _ => Err(CalendarError::NoFreePeriod),
        }
    }

    /// Cancel a reservation. The period named by the reservation must
    /// resolve; the delete itself succeeds even if the reservation is gone.
    pub async fn cancel_reservation(&self, calendar_id: &str, reservation: &Reservation) -> CalendarResult<()> {
        self.require_calendar(calendar_id)?;

        let periods = self.candidate_periods(&reservation.period_id)?;
        let Some(period) = periods.first() else {
            return Err(CalendarError::not_found(Table::Period, &reservation.period_id));
        };

        let _guard = self.locks.acquire(&period.id).await;
        let removed = self.store.delete(Table::Reservation, &reservation.id)?;
        self.reservations.evict(&reservation.id).await;
        info!(
            calendar_id = %calendar_id,
            reservation_id = %reservation.id,
            removed,
            "reservation cancelled"
        );
        Ok(())
    }

    pub async fn get_reservation(&self, id: &str) -> CalendarResult<Reservation> {
        self.reservations
            .get(id)
            .await?
            .ok_or_else(|| CalendarError::not_found(Table::Reservation, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::calendar::window::{DATE_FORMAT, TTL_PER_DAY};
    use crate::document_store::{MemoryDocumentStore, StoreResult};

    fn fixed_now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2030-01-01 00:00", DATE_FORMAT).unwrap()
    }

    fn service() -> CalendarService {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(128));
        CalendarService::new(
            Arc::new(MemoryDocumentStore::new()),
            Some(cache),
            DEFAULT_CACHE_TTL,
        )
        .with_clock(fixed_now)
    }

    fn period(start: &str, end: &str) -> Period {
        Period {
            start_date: start.into(),
            end_date: end.into(),
            ..Default::default()
        }
    }

    fn request(period_id: &str, start: &str, end: &str) -> Reservation {
        Reservation {
            period_id: period_id.into(),
            start_date: start.into(),
            end_date: end.into(),
            ..Default::default()
        }
    }

    fn calendar(svc: &CalendarService) -> Calendar {
        svc.create_calendar(Calendar {
            owner_id: "unregistered-owner".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_create_calendar_assigns_id() {
        let svc = service();
        let cal = svc
            .create_calendar(Calendar {
                id: "client-chosen".into(),
                owner_id: "o1".into(),
            })
            .unwrap();
        assert_ne!(cal.id, "client-chosen");
        assert!(Uuid::parse_str(&cal.id).is_ok());
    }

    #[test]
    fn test_create_calendar_inverted_owner_check() {
        let svc = service();
        let owner = svc.create_entity(Entity::default()).unwrap();

        let result = svc.create_calendar(Calendar {
            owner_id: owner.id.clone(),
            ..Default::default()
        });
        assert!(matches!(result, Err(CalendarError::OwnerExists(id)) if id == owner.id));
    }

    /// Store that refuses every calendar insert
    #[derive(Debug, Default)]
    struct RefusingStore {
        inner: MemoryDocumentStore,
    }

    impl DocumentStore for RefusingStore {
        fn create(&self, table: Table, id: &str, document: Value) -> StoreResult<()> {
            if table == Table::Calendar {
                return Err(StoreError::Internal("disk full".into()));
            }
            self.inner.create(table, id, document)
        }

        fn get(&self, table: Table, id: &str) -> StoreResult<Option<Value>> {
            self.inner.get(table, id)
        }

        fn replace(&self, table: Table, id: &str, document: Value) -> StoreResult<()> {
            self.inner.replace(table, id, document)
        }

        fn delete(&self, table: Table, id: &str) -> StoreResult<bool> {
            self.inner.delete(table, id)
        }

        fn query(&self, table: Table, filters: &[FilterExpr]) -> StoreResult<Vec<Value>> {
            self.inner.query(table, filters)
        }
    }

    #[test]
    fn test_create_calendar_store_failure_is_conflict() {
        let svc = CalendarService::new(Arc::new(RefusingStore::default()), None, DEFAULT_CACHE_TTL);

        let err = svc
            .create_calendar(Calendar {
                owner_id: "o1".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CalendarError::CreateConflict { table: Table::Calendar, .. }));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_calendar() {
        let svc = service();
        let cal = calendar(&svc);
        // Warm the cache
        svc.get_calendar(&cal.id).await.unwrap();

        let updated = svc
            .update_calendar(
                &cal.id,
                Calendar {
                    id: "ignored".into(),
                    owner_id: "new-owner".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, cal.id);

        let fetched = svc.get_calendar(&cal.id).await.unwrap();
        assert_eq!(fetched.owner_id, "new-owner");
    }

    #[tokio::test]
    async fn test_update_missing_calendar() {
        let svc = service();
        let result = svc.update_calendar("missing", Calendar::default()).await;
        assert!(matches!(result, Err(CalendarError::NotFound { table: Table::Calendar, .. })));
    }

    #[test]
    fn test_period_requires_calendar() {
        let svc = service();
        let result = svc.set_available_period("missing", period("2030-01-01 10:00", "2030-01-01 12:00"));
        assert!(matches!(result, Err(CalendarError::NotFound { table: Table::Calendar, .. })));
    }

    #[tokio::test]
    async fn test_period_ttl_and_lookup() {
        let svc = service();
        let cal = calendar(&svc);

        let p = svc
            .set_available_period(&cal.id, period("2030-01-11 10:00", "2030-01-11 12:00"))
            .unwrap();
        assert_eq!(p.ttl, 10 * TTL_PER_DAY);

        let fetched = svc.get_available_period(&p.id).await.unwrap();
        assert_eq!(fetched, p);
    }

    #[test]
    fn test_period_rejects_bad_dates() {
        let svc = service();
        let cal = calendar(&svc);

        let result = svc.set_available_period(&cal.id, period("tomorrow", "2030-01-01 12:00"));
        assert!(matches!(result, Err(CalendarError::InvalidDate { .. })));
    }

    #[tokio::test]
    async fn test_reservation_stamps_period_and_ttl() {
        let svc = service();
        let cal = calendar(&svc);
        let p = svc
            .set_available_period(&cal.id, period("2030-01-03 10:00", "2030-01-03 12:00"))
            .unwrap();

        let r = svc
            .add_reservation(&cal.id, request(&p.id, "2030-01-03 10:00", "2030-01-03 11:00"))
            .await
            .unwrap();
        assert_eq!(r.period_id, p.id);
        assert_eq!(r.ttl, 2 * TTL_PER_DAY);
        assert_eq!(svc.get_reservation(&r.id).await.unwrap(), r);
    }

    #[tokio::test]
    async fn test_reservation_unknown_period_conflicts() {
        let svc = service();
        let cal = calendar(&svc);

        let result = svc
            .add_reservation(&cal.id, request("nope", "2030-01-03 10:00", "2030-01-03 11:00"))
            .await;
        assert!(matches!(result, Err(CalendarError::NoFreePeriod)));
    }

    #[tokio::test]
    async fn test_period_locks_released_after_requests() {
        let svc = service();
        let cal = calendar(&svc);
        let p = svc
            .set_available_period(&cal.id, period("2030-01-03 10:00", "2030-01-03 12:00"))
            .unwrap();

        for i in 0..100 {
            let result = svc
                .add_reservation(&cal.id, request(&format!("bogus-{i}"), "2030-01-03 10:00", "2030-01-03 11:00"))
                .await;
            assert!(matches!(result, Err(CalendarError::NoFreePeriod)));
        }
        assert_eq!(svc.locks.len(), 0);

        let r = svc
            .add_reservation(&cal.id, request(&p.id, "2030-01-03 10:00", "2030-01-03 11:00"))
            .await
            .unwrap();
        let rejected = svc
            .add_reservation(&cal.id, request(&p.id, "2030-01-03 10:30", "2030-01-03 11:30"))
            .await;
        assert!(rejected.is_err());
        svc.cancel_reservation(&cal.id, &r).await.unwrap();

        assert_eq!(svc.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_reservation_requires_calendar() {
        let svc = service();
        let result = svc
            .add_reservation("missing", request("p", "2030-01-03 10:00", "2030-01-03 11:00"))
            .await;
        assert!(matches!(result, Err(CalendarError::NotFound { table: Table::Calendar, .. })));
    }

    #[tokio::test]
    async fn test_cancel_evicts_cached_reservation() {
        let svc = service();
        let cal = calendar(&svc);
        let p = svc
            .set_available_period(&cal.id, period("2030-01-03 10:00", "2030-01-03 12:00"))
            .unwrap();
        let r = svc
            .add_reservation(&cal.id, request(&p.id, "2030-01-03 10:00", "2030-01-03 11:00"))
            .await
            .unwrap();
        svc.get_reservation(&r.id).await.unwrap();

        svc.cancel_reservation(&cal.id, &r).await.unwrap();
        let result = svc.get_reservation(&r.id).await;
        assert!(matches!(result, Err(CalendarError::NotFound { table: Table::Reservation, .. })));

        // Cancelling again still succeeds once the period resolves
        svc.cancel_reservation(&cal.id, &r).await.unwrap();
    }

    #[tokio::test]
    async fn test_entity_roundtrip() {
        let svc = service();
        let e = svc.create_entity(Entity { id: "owner-1".into() }).unwrap();
        assert_eq!(svc.get_entity("owner-1").unwrap(), e);

        let dup = svc.create_entity(Entity { id: "owner-1".into() });
        assert!(dup.unwrap_err().is_conflict());
    }
}
