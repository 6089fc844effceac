use crate::models::{BookingRow, ExceptionRow, NewException, RecurringBookingRow};
use chrono::{DateTime, Duration, Utc};
use domain::busy::{self, BusyInstance, RecurringSource};
use domain::model::{Booking, Exception, RecurrenceRule};
use domain::outcome::CreateOutcome;
use domain::{availability, conflict};
use shared::errors::{AppError, DomainError};
use shared::types::{BookingId, ResourceId};
use sqlx::PgPool;

pub struct BookingRepository;

impl BookingRepository {
    /// C3: the store-facing half of the busy-set resolver. Runs the two
    /// queries named in the source algorithm (non-recurring bookings
    /// intersecting the window; recurring bookings whose template starts
    /// before the window ends, with their rule and exceptions) and hands the
    /// rows to the pure resolver in `domain::busy`.
    pub async fn resolve_busy_set(
        pool: &PgPool,
        resource_id: ResourceId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInstance>, sqlx::Error> {
        let single_bookings = Self::find_single_bookings(pool, resource_id, window_start, window_end).await?;
        let recurring = Self::find_recurring_sources(pool, resource_id, window_end).await?;
        Ok(busy::resolve(window_start, window_end, &single_bookings, &recurring))
    }

    async fn find_single_bookings(
        pool: &PgPool,
        resource_id: ResourceId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<(BookingId, DateTime<Utc>, DateTime<Utc>)>, sqlx::Error> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.resource_id, b.start, b."end", b.metadata, b.created_at
            FROM bookings b
            LEFT JOIN recurrence_rules r ON r.booking_id = b.id
            WHERE b.resource_id = $1
              AND r.booking_id IS NULL
              AND b.time_range && tstzrange($2, $3, '[)')
            "#,
        )
        .bind(resource_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|r| (r.id, r.start, r.end)).collect())
    }

    async fn find_recurring_sources(
        pool: &PgPool,
        resource_id: ResourceId,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<RecurringSource>, sqlx::Error> {
        let rows: Vec<RecurringBookingRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.resource_id, b.start, b."end", r.rrule, r.is_infinite
            FROM bookings b
            JOIN recurrence_rules r ON r.booking_id = b.id
            WHERE b.resource_id = $1 AND b.start < $2
            "#,
        )
        .bind(resource_id)
        .bind(window_end)
        .fetch_all(pool)
        .await?;

        let mut sources = Vec::with_capacity(rows.len());
        for row in rows {
            let exceptions = Self::find_exceptions(pool, row.id).await?;
            sources.push(RecurringSource {
                booking_id: row.id,
                base_start: row.start,
                base_end: row.end,
                rule: RecurrenceRule {
                    rrule: row.rrule,
                    is_infinite: row.is_infinite,
                },
                exceptions,
            });
        }
        Ok(sources)
    }

    async fn find_exceptions(pool: &PgPool, booking_id: BookingId) -> Result<Vec<Exception>, sqlx::Error> {
        let rows: Vec<ExceptionRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, except_date, replace_start, replace_end
            FROM exceptions
            WHERE booking_id = $1
            ORDER BY except_date
            "#,
        )
        .bind(booking_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Exception::from).collect())
    }

    /// C4.4.1: create a single (non-recurring) booking.
    ///
    /// The non-overlap invariant is enforced by the storage exclusion
    /// constraint on `(resource_id, time_range)`; this function treats the
    /// constraint violation as the source of truth and only uses C3 to
    /// enrich the resulting 409 with the conflicting instances and
    /// suggestions. A plain advisory lock isn't needed here — a single
    /// insert is already atomic against the exclusion index.
    pub async fn create_single(
        pool: &PgPool,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metadata: serde_json::Value,
    ) -> Result<CreateOutcome, AppError> {
        let mut tx = pool.begin().await?;

        let insert = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (id, resource_id, start, "end", time_range, metadata, created_at)
            VALUES (gen_random_uuid(), $1, $2, $3, tstzrange($2, $3, '[)'), $4, now())
            RETURNING id, resource_id, start, "end", metadata, created_at
            "#,
        )
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .bind(&metadata)
        .fetch_one(&mut *tx)
        .await;

        match insert {
            Ok(row) => {
                tx.commit().await?;
                Ok(CreateOutcome::Created(Booking {
                    id: row.id,
                    resource_id: row.resource_id,
                    start: row.start,
                    end: row.end,
                    metadata: row.metadata,
                    created_at: row.created_at,
                    recurrence: None,
                    exceptions: vec![],
                }))
            }
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23P01") => {
                tx.rollback().await?;
                Self::conflict_response(pool, resource_id, start, end).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// C4.4.2: validate, expand over the validation window, check for
    /// conflicts against the existing busy set, and write atomically —
    /// serialized on `resource_id` by an advisory transaction lock, because
    /// the exclusion index alone only protects the template interval.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_recurring(
        pool: &PgPool,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rrule_text: String,
        exceptions_input: Vec<NewException>,
        metadata: serde_json::Value,
        expansion_days: i64,
    ) -> Result<CreateOutcome, AppError> {
        domain::validate(&rrule_text, start)
            .map_err(|e| DomainError::InvalidRecurrence(e.to_string()))?;

        let exceptions: Vec<Exception> = exceptions_input
            .iter()
            .map(|e| Exception {
                id: shared::types::ExceptionId::new(),
                except_date: e.except_date,
                replace: match (e.replace_start, e.replace_end) {
                    (Some(s), Some(en)) => Some((s, en)),
                    _ => None,
                },
            })
            .collect();

        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(resource_id.to_string())
            .execute(&mut *tx)
            .await?;

        let validation_window_end = start + Duration::days(expansion_days);
        let occurrences = domain::expand(&rrule_text, start, validation_window_end, start, end, &exceptions)
            .map_err(|e| DomainError::InvalidRecurrence(e.to_string()))?;

        let existing_single =
            Self::find_single_bookings(pool, resource_id, start, validation_window_end).await?;
        let existing_recurring = Self::find_recurring_sources(pool, resource_id, validation_window_end).await?;
        let busy = busy::resolve(start, validation_window_end, &existing_single, &existing_recurring);

        let conflicts = conflict::find_conflicts_for_occurrences(&occurrences, &busy);
        if !conflicts.is_empty() {
            tx.rollback().await?;
            let duration_minutes = (end - start).num_minutes();
            let result = availability::next_available(&busy, start, duration_minutes, 720, 15, 5);
            return Ok(CreateOutcome::Conflict {
                conflicts,
                next_available: result.suggestions,
            });
        }

        let booking = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (id, resource_id, start, "end", time_range, metadata, created_at)
            VALUES (gen_random_uuid(), $1, $2, $3, tstzrange($2, $3, '[)'), $4, now())
            RETURNING id, resource_id, start, "end", metadata, created_at
            "#,
        )
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .bind(&metadata)
        .fetch_one(&mut *tx)
        .await?;

        let rule = RecurrenceRule::new(&rrule_text);
        sqlx::query("INSERT INTO recurrence_rules (booking_id, rrule, is_infinite) VALUES ($1, $2, $3)")
            .bind(booking.id)
            .bind(&rule.rrule)
            .bind(rule.is_infinite)
            .execute(&mut *tx)
            .await?;

        for exception in &exceptions {
            let (replace_start, replace_end) = match exception.replace {
                Some((s, e)) => (Some(s), Some(e)),
                None => (None, None),
            };
            sqlx::query(
                "INSERT INTO exceptions (id, booking_id, except_date, replace_start, replace_end) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(exception.id)
            .bind(booking.id)
            .bind(exception.except_date)
            .bind(replace_start)
            .bind(replace_end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(CreateOutcome::Created(Booking {
            id: booking.id,
            resource_id: booking.resource_id,
            start: booking.start,
            end: booking.end,
            metadata: booking.metadata,
            created_at: booking.created_at,
            recurrence: Some(rule),
            exceptions,
        }))
    }

    async fn conflict_response(
        pool: &PgPool,
        resource_id: ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CreateOutcome, AppError> {
        let busy = Self::resolve_busy_set(pool, resource_id, start, end).await?;
        let candidate = shared::types::TimeSlot::new(start, end)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let conflicts = conflict::find_conflicts(&candidate, &busy);

        let duration_minutes = (end - start).num_minutes();
        let search_busy = Self::resolve_busy_set(pool, resource_id, start, start + Duration::hours(720)).await?;
        let result = availability::next_available(&search_busy, start, duration_minutes, 720, 15, 5);

        Ok(CreateOutcome::Conflict {
            conflicts,
            next_available: result.suggestions,
        })
    }
}
