use serde::Serialize;

use crate::scenario::Scenario;
use crate::tracker::{
    Axis, HomePoint, LogDisplay, Peripherals, RecordingActuator, Tracker, TrackerMode,
    TrackerSettings, TrackerStatus,
};

#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Simulated loop period.
    pub tick_ms: u64,
    /// How long to keep ticking after the last fix.
    pub tail_ms: u64,
    /// Tracker clock value at the scenario start, i.e. time since boot.
    pub clock_offset_ms: u64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            tail_ms: 5000,
            clock_offset_ms: 0,
        }
    }
}

/// One change of the actuator outputs.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    pub at_ms: u64,
    pub mode: TrackerMode,
    pub target_azimuth_deg: u16,
    pub projected_azimuth_deg: u16,
    pub elevation_deg: u8,
    pub distance_m: u32,
    pub azimuth_us: u16,
    pub elevation_us: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub fixes: usize,
    pub ticks: u64,
    pub home: Option<HomePoint>,
    pub frames: Vec<ReplayFrame>,
    pub final_status: TrackerStatus,
}

/// Runs a scenario against a tracker on a simulated clock.
pub struct Replay {
    settings: TrackerSettings,
    options: ReplayOptions,
}

impl Replay {
    pub fn new(settings: TrackerSettings, options: ReplayOptions) -> Self {
        Self { settings, options }
    }

    pub fn run(&self, scenario: &Scenario) -> ReplayReport {
        let recorder = RecordingActuator::default();
        let peripherals = Peripherals::with_actuators(recorder.clone()).display(LogDisplay);
        let mut tracker = Tracker::with_peripherals(self.settings, peripherals);

        let timeline = scenario.timeline();
        let tick = self.options.tick_ms.max(1);
        let end = scenario.duration_ms() + self.options.tail_ms;
        let offset = self.options.clock_offset_ms;

        log::info!(
            "Replaying {} fixes over {}ms (tick {}ms)",
            timeline.len(),
            end,
            tick
        );

        let mut pending = timeline.iter().peekable();
        let mut frames: Vec<ReplayFrame> = Vec::new();
        let mut last_writes = 0;
        let mut ticks = 0;
        let mut elapsed = 0;

        loop {
            let now = offset + elapsed;
            while let Some(timed) = pending.next_if(|t| t.at_ms <= elapsed) {
                tracker.ingest_fix(timed.fix);
            }
            tracker.tick(now);
            ticks += 1;

            let writes = recorder.last(Axis::Azimuth).writes;
            if writes != last_writes {
                last_writes = writes;
                let azimuth_us = recorder.last(Axis::Azimuth).microseconds;
                let elevation_us = recorder.last(Axis::Elevation).microseconds;
                let changed = frames.last().map_or(true, |f| {
                    f.azimuth_us != azimuth_us || f.elevation_us != elevation_us
                });
                if changed {
                    let state = tracker.tracking_state();
                    frames.push(ReplayFrame {
                        at_ms: now,
                        mode: tracker.mode(now),
                        target_azimuth_deg: state.azimuth_deg,
                        projected_azimuth_deg: tracker.projected_azimuth(),
                        elevation_deg: state.elevation_deg,
                        distance_m: state.distance_m,
                        azimuth_us,
                        elevation_us,
                    });
                }
            }

            if elapsed >= end {
                break;
            }
            elapsed = (elapsed + tick).min(end);
        }

        let final_now = offset + end;
        log::info!(
            "Replay finished: {} ticks, {} actuator changes",
            ticks,
            frames.len()
        );

        ReplayReport {
            fixes: timeline.len(),
            ticks,
            home: tracker.home(),
            frames,
            final_status: tracker.status(final_now),
        }
    }
}
