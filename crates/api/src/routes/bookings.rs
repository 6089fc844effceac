use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, NaiveDate, Utc};
use db::{BookingRepository, NewException, ResourceRepository};
use domain::CreateOutcome;
use serde::{Deserialize, Serialize};
use shared::{AppError, DomainError};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ExceptionInput {
    pub date: NaiveDate,
    pub replace_start: Option<DateTime<Utc>>,
    pub replace_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub resource_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
    pub recurrence_rule: Option<String>,
    pub exceptions: Option<Vec<ExceptionInput>>,
}

#[derive(Debug, Serialize)]
struct BookingView {
    id: Uuid,
    resource_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    is_recurring: bool,
    recurrence_rule: Option<String>,
    exceptions: Vec<ExceptionView>,
}

#[derive(Debug, Serialize)]
struct ExceptionView {
    date: NaiveDate,
    replace_start: Option<DateTime<Utc>>,
    replace_end: Option<DateTime<Utc>>,
}

impl From<domain::Booking> for BookingView {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into_uuid(),
            resource_id: booking.resource_id.into_uuid(),
            start_time: booking.start,
            end_time: booking.end,
            metadata: booking.metadata,
            created_at: booking.created_at,
            is_recurring: booking.recurrence.is_some(),
            recurrence_rule: booking.recurrence.map(|r| r.rrule),
            exceptions: booking
                .exceptions
                .into_iter()
                .map(|e| ExceptionView {
                    date: e.except_date,
                    replace_start: e.replace.map(|(s, _)| s),
                    replace_end: e.replace.map(|(_, e)| e),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ConflictEntryView {
    booking_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    is_recurring: bool,
    occurrence_start: Option<DateTime<Utc>>,
    occurrence_end: Option<DateTime<Utc>>,
}

impl From<domain::ConflictEntry> for ConflictEntryView {
    fn from(c: domain::ConflictEntry) -> Self {
        Self {
            booking_id: c.booking_id.into_uuid(),
            start: c.start,
            end: c.end,
            is_recurring: c.is_recurring,
            occurrence_start: c.occurrence_start,
            occurrence_end: c.occurrence_end,
        }
    }
}

#[derive(Debug, Serialize)]
struct SuggestionView {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn validate(req: &CreateBookingRequest) -> Result<(), DomainError> {
    if req.end_time <= req.start_time {
        return Err(DomainError::Validation {
            field: "end_time".into(),
            message: "must be after start_time".into(),
        });
    }

    if let Some(exceptions) = &req.exceptions {
        if req.recurrence_rule.is_none() && !exceptions.is_empty() {
            return Err(DomainError::Validation {
                field: "exceptions".into(),
                message: "only valid when recurrence_rule is present".into(),
            });
        }
        for exception in exceptions {
            if exception.replace_start.is_some() != exception.replace_end.is_some() {
                return Err(DomainError::Validation {
                    field: "exceptions[].replace_start/replace_end".into(),
                    message: "both must be present or both absent".into(),
                });
            }
        }
    }

    Ok(())
}

#[tracing::instrument(skip(state, req), fields(resource_id = %req.resource_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req).map_err(AppError::from)?;

    let resource_id = shared::types::ResourceId::from_uuid(req.resource_id);
    if ResourceRepository::find_by_id(&state.pool, resource_id)
        .await
        .map_err(AppError::from)?
        .is_none()
    {
        return Err(DomainError::ResourceNotFound(req.resource_id.to_string()).into());
    }

    let metadata = req.metadata.unwrap_or_else(|| serde_json::json!({}));

    let outcome = match req.recurrence_rule {
        Some(rrule_text) => {
            let exceptions = req
                .exceptions
                .unwrap_or_default()
                .into_iter()
                .map(|e| NewException {
                    except_date: e.date,
                    replace_start: e.replace_start,
                    replace_end: e.replace_end,
                })
                .collect();

            BookingRepository::create_recurring(
                &state.pool,
                resource_id,
                req.start_time,
                req.end_time,
                rrule_text,
                exceptions,
                metadata,
                state.recurrence_expansion_days,
            )
            .await?
        }
        None => {
            BookingRepository::create_single(
                &state.pool,
                resource_id,
                req.start_time,
                req.end_time,
                metadata,
            )
            .await?
        }
    };

    match outcome {
        CreateOutcome::Created(booking) => {
            tracing::info!(booking_id = %booking.id, "booking created");
            let body = serde_json::json!({
                "status": "success",
                "booking": BookingView::from(booking),
            });
            Ok((StatusCode::CREATED, Json(body)))
        }
        CreateOutcome::Conflict { conflicts, next_available } => {
            tracing::info!(conflict_count = conflicts.len(), "booking request conflicts with existing busy set");
            let body = serde_json::json!({
                "status": "conflict",
                "message": "the requested interval overlaps an existing booking",
                "conflicts": conflicts.into_iter().map(ConflictEntryView::from).collect::<Vec<_>>(),
                "next_available": next_available
                    .into_iter()
                    .map(|s| SuggestionView { start: s.start, end: s.end })
                    .collect::<Vec<_>>(),
            });
            Ok((StatusCode::CONFLICT, Json(body)))
        }
    }
}
