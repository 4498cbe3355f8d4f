use axum::{routing::get, routing::post, Router};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::scenario::Scenario;
use crate::tracker::{GeoFix, LogDisplay, Peripherals, Tracker};

use super::api::tracker as tracker_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/tracker/status", get(tracker_handlers::status))
        .route("/api/tracker/actuators", get(tracker_handlers::actuators))
        .route("/api/tracker/fix", post(tracker_handlers::ingest_fix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, scenario: Option<Scenario>) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let peripherals = Peripherals::default().display(LogDisplay);
    let state = AppState::new(Tracker::with_peripherals(config.tracker, peripherals));

    tokio::spawn(run_tick_loop(state.clone(), config.web.tick_ms, scenario));

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

/// Ticks the tracker on a fixed period, feeding scenario fixes as they come due.
async fn run_tick_loop(state: AppState, tick_ms: u64, scenario: Option<Scenario>) {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let timeline = scenario.map(|s| s.timeline()).unwrap_or_default();
    if !timeline.is_empty() {
        log::info!("Feeding {} scenario fixes", timeline.len());
    }
    let origin = state.clock.now_ms();
    let mut pending = timeline.into_iter().peekable();

    loop {
        interval.tick().await;
        let now = state.clock.now_ms();
        let mut tracker = state.tracker.lock().await;
        while let Some(timed) = pending.next_if(|t| origin + t.at_ms <= now) {
            tracker.ingest_fix(GeoFix {
                arrival_ms: now,
                ..timed.fix
            });
        }
        tracker.tick(now);
    }
}
