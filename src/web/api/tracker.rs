use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::scenario::FixRecord;
use crate::tracker::{Axis, TrackerStatus};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActuatorCommands {
    pub azimuth_us: u16,
    pub elevation_us: u16,
}

#[utoipa::path(
    get,
    path = "/api/tracker/status",
    responses(
        (status = 200, description = "Tracker status", body = TrackerStatus)
    ),
    tag = "tracker"
)]
pub async fn status(State(state): State<AppState>) -> Json<TrackerStatus> {
    let now = state.clock.now_ms();
    let tracker = state.tracker.lock().await;
    Json(tracker.status(now))
}

#[utoipa::path(
    get,
    path = "/api/tracker/actuators",
    responses(
        (status = 200, description = "Current servo commands", body = ActuatorCommands)
    ),
    tag = "tracker"
)]
pub async fn actuators(State(state): State<AppState>) -> Json<ActuatorCommands> {
    let tracker = state.tracker.lock().await;
    Json(ActuatorCommands {
        azimuth_us: tracker.actuator_command(Axis::Azimuth),
        elevation_us: tracker.actuator_command(Axis::Elevation),
    })
}

#[utoipa::path(
    post,
    path = "/api/tracker/fix",
    request_body = FixRecord,
    responses(
        (status = 202, description = "Fix queued for the next tick", body = TrackerStatus),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "tracker"
)]
pub async fn ingest_fix(
    State(state): State<AppState>,
    Json(record): Json<FixRecord>,
) -> ApiResult<(StatusCode, Json<TrackerStatus>)> {
    record.validate().map_err(ApiError::Validation)?;

    let now = state.clock.now_ms();
    let mut tracker = state.tracker.lock().await;
    tracker.ingest_fix(record.to_fix(now));
    log::trace!("Queued fix ({}, {}) with {} sats", record.lat, record.lon, record.sats);

    Ok((StatusCode::ACCEPTED, Json(tracker.status(now))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Tracker, TrackerMode, TrackerSettings};

    fn state() -> AppState {
        AppState::new(Tracker::new(TrackerSettings::default()))
    }

    fn record(lat: f64, lon: f64, sats: u8) -> FixRecord {
        FixRecord {
            lat,
            lon,
            alt: 0,
            sats,
            heading: 0.0,
            speed: 0.0,
        }
    }

    #[tokio::test]
    async fn fresh_tracker_is_unarmed_and_centred() {
        let state = state();
        let Json(status) = status(State(state.clone())).await;
        assert_eq!(status.mode, TrackerMode::Unarmed);
        assert!(status.home.is_none());

        let Json(commands) = actuators(State(state)).await;
        assert_eq!(
            commands,
            ActuatorCommands {
                azimuth_us: 1500,
                elevation_us: 1500
            }
        );
    }

    #[tokio::test]
    async fn ingested_fix_is_processed_on_tick() {
        let state = state();
        let (code, Json(queued)) = ingest_fix(State(state.clone()), Json(record(47.0, 8.0, 7)))
            .await
            .unwrap();
        assert_eq!(code, StatusCode::ACCEPTED);
        assert!(queued.home.is_none());
        assert_eq!(queued.last_fix.unwrap().latitude_e7, 470_000_000);

        state.tracker.lock().await.tick(state.clock.now_ms());

        let Json(status) = status(State(state)).await;
        assert!(status.home.is_some());
        assert!(status.home_set_on_last_fix);
    }

    #[tokio::test]
    async fn rejects_invalid_coordinates() {
        let state = state();
        let result = ingest_fix(State(state.clone()), Json(record(47.0, 200.0, 7))).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(state.tracker.lock().await.last_fix().is_none());
    }
}
