pub mod parser;
pub mod replay;

pub use parser::{FixRecord, Scenario, ScenarioError, TimedFix};
pub use replay::{Replay, ReplayFrame, ReplayOptions, ReplayReport};
