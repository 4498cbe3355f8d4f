pub mod actuator;
pub mod cadence;
mod engine;
pub mod fixed;
pub mod geodesy;
mod home;
pub mod predictor;
mod settings;
pub mod sink;
mod types;

pub use engine::{Tracker, TrackerMode, TrackerStatus};
pub use home::HomeArming;
pub use settings::{AxisBounds, TrackerSettings};
pub use sink::{
    ActuatorSink, DisplayFrame, DisplaySink, LogDisplay, NullActuator, NullDisplay, Peripherals,
    RecordingActuator,
};
pub use types::{Axis, GeoFix, HomePoint, TrackingState, COORD_SCALE};
