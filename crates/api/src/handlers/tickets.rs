//! Handlers for the `/tickets` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use wastetrace_core::ticket::{NewTicket, StatusUpdate, Ticket, TicketFilter, TicketStats};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /tickets
///
/// Missing `citizenId` and `classification` fall back to their defaults.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let Json(input) = payload?;
    let ticket = state.tickets.create(input).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets
///
/// Optional query filters: `citizenId`, `collectorId`, `status`.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = state.tickets.list_filtered(&filter).await?;
    Ok(Json(tickets))
}

/// GET /tickets/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<TicketStats>> {
    let stats = state.tickets.stats().await?;
    Ok(Json(stats))
}

/// GET /tickets/{waste_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(waste_id): Path<String>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.tickets.get(&waste_id).await?;
    Ok(Json(ticket))
}

/// PUT /tickets/{waste_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(waste_id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> AppResult<Json<Ticket>> {
    let Json(update) = payload?;
    let ticket = state.tickets.update_status(&waste_id, &update).await?;
    Ok(Json(ticket))
}
