use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::tracker::ActuatorCommands;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tracker::status,
        super::api::tracker::actuators,
        super::api::tracker::ingest_fix,
    ),
    components(
        schemas(
            ActuatorCommands,
            ErrorResponse,
            crate::scenario::FixRecord,
            crate::tracker::TrackerStatus,
            crate::tracker::TrackerMode,
            crate::tracker::TrackingState,
            crate::tracker::HomePoint,
            crate::tracker::GeoFix,
        )
    ),
    info(
        title = "AAT Tracker API",
        description = "Status and fix ingest for the antenna tracker",
        version = "0.1.0"
    ),
    tags(
        (name = "tracker", description = "Tracking state and position input")
    )
)]
pub struct ApiDoc;
