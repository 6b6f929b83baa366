//! Event endpoints: add via extraction, delete by (title, start), list
//! upcoming.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use notical_core::time::normalize_timestamp;
use notical_core::{Event, NoticalError, event::upcoming};

use crate::extract::parse_extracted;
use crate::routes::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add_event", post(add_event))
        .route("/delete_event", post(delete_event))
        .route("/get_events", get(get_events))
}

/// Request body for adding an event from a free-text notification
#[derive(Deserialize)]
pub struct AddEventRequest {
    pub notification: String,
}

/// Event fields as the API reports them, timestamps in RFC 3339 in the
/// configured timezone
#[derive(Serialize)]
pub struct EventBody {
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: String,
    pub description: String,
}

impl From<&Event> for EventBody {
    fn from(event: &Event) -> Self {
        EventBody {
            title: event.title.clone(),
            start: event.start.map(|dt| dt.to_rfc3339()),
            end: event.end.map(|dt| dt.to_rfc3339()),
            location: event.location.clone(),
            description: event.description.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct AddEventResponse {
    pub message: String,
    pub event: EventBody,
}

/// POST /add_event - Extract an event from the notification text and append
/// it to the calendar document
async fn add_event(
    State(state): State<AppState>,
    Json(req): Json<AddEventRequest>,
) -> Result<Json<AddEventResponse>, ApiError> {
    let raw = state.extractor.extract(&req.notification).await?;
    log::debug!("model output: {raw}");

    let extracted = parse_extracted(&raw)?;

    let start = extracted
        .start
        .as_deref()
        .map(|s| normalize_timestamp(s, state.tz))
        .transpose()?;
    let end = extracted
        .end
        .as_deref()
        .map(|s| normalize_timestamp(s, state.tz))
        .transpose()?;

    let event = Event::new(
        extracted
            .title
            .unwrap_or_else(|| "Untitled event".to_string()),
        start,
        end,
        extracted.location.unwrap_or_default(),
        extracted.description.unwrap_or_default(),
    );
    let body = EventBody::from(&event);

    {
        let _guard = state.write_lock.lock().await;
        let mut events = state.store.load()?;
        events.push(event);
        state.store.save(&events)?;
    }

    log::info!("added event '{}'", body.title);
    Ok(Json(AddEventResponse {
        message: "Event added".to_string(),
        event: body,
    }))
}

/// Request body for deleting events by their (title, start) identity
#[derive(Deserialize)]
pub struct DeleteEventRequest {
    pub title: String,
    /// ISO-8601 start time
    pub start: String,
}

#[derive(Serialize)]
pub struct DeleteEventResponse {
    pub message: String,
}

/// POST /delete_event - Remove every event matching (title, start)
async fn delete_event(
    State(state): State<AppState>,
    Json(req): Json<DeleteEventRequest>,
) -> Result<Json<DeleteEventResponse>, ApiError> {
    let start = normalize_timestamp(&req.start, state.tz)?;

    let _guard = state.write_lock.lock().await;
    let events = state.store.load()?;

    let kept: Vec<Event> = events
        .iter()
        .filter(|e| !e.matches(&req.title, start))
        .cloned()
        .collect();
    let removed = events.len() - kept.len();

    if removed == 0 {
        return Err(NoticalError::EventNotFound {
            title: req.title,
            start: req.start,
        }
        .into());
    }

    state.store.save(&kept)?;

    log::info!("removed {removed} event(s) titled '{}'", req.title);
    Ok(Json(DeleteEventResponse {
        message: format!("Removed {removed} event(s)"),
    }))
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventBody>,
}

/// GET /get_events - Upcoming events, soonest remaining time first
async fn get_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, ApiError> {
    let now = Utc::now().with_timezone(&state.tz);
    let events = state.store.load()?;

    let events = upcoming(&events, now)
        .iter()
        .map(EventBody::from)
        .collect();

    Ok(Json(EventsResponse { events }))
}
