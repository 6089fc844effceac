use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use db::{BookingRepository, ResourceRepository};
use serde::{Deserialize, Serialize};
use shared::DomainError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub resource_id: String,
    pub from: String,
    pub to: String,
    pub slot: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AvailableSlotView {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: i64,
}

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    resource_id: Uuid,
    resource_name: String,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    slot_duration_minutes: i64,
    available_slots: Vec<AvailableSlotView>,
    busy_slots_count: usize,
}

fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::Validation {
            field: field.into(),
            message: "must be an RFC 3339 UTC timestamp".into(),
        })
}

#[tracing::instrument(skip(state, query), fields(resource_id = %query.resource_id))]
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<axum::Json<AvailabilityResponse>> {
    let resource_uuid: Uuid = query.resource_id.parse().map_err(|_| {
        ApiError::from(shared::AppError::from(DomainError::Validation {
            field: "resource_id".into(),
            message: "must be a UUID".into(),
        }))
    })?;

    let from = parse_instant("from", &query.from)?;
    let to = parse_instant("to", &query.to)?;

    if to <= from {
        return Err(DomainError::Validation {
            field: "to".into(),
            message: "must be after from".into(),
        }
        .into());
    }

    let resource_id = shared::types::ResourceId::from_uuid(resource_uuid);
    let resource = ResourceRepository::find_by_id(&state.pool, resource_id)
        .await?
        .ok_or_else(|| DomainError::ResourceNotFound(resource_uuid.to_string()))?;

    let slot_minutes = query.slot.unwrap_or(60);
    let busy = BookingRepository::resolve_busy_set(&state.pool, resource_id, from, to).await?;
    let available = domain::availability::availability(&busy, from, to, slot_minutes);

    Ok(axum::Json(AvailabilityResponse {
        resource_id: resource_uuid,
        resource_name: resource.name,
        from,
        to,
        slot_duration_minutes: slot_minutes,
        available_slots: available
            .into_iter()
            .map(|s| AvailableSlotView {
                start: s.start,
                end: s.end,
                duration_minutes: s.duration_minutes,
            })
            .collect(),
        busy_slots_count: busy.len(),
    }))
}
