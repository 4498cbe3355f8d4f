use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::tracker::GeoFix;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("start: {0}")]
    Start(String),
    #[error("step {0}: {1}")]
    Step(usize, String),
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub start: DateTime<Utc>,
    pub variables: HashMap<String, serde_yaml::Value>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub time: Option<TimeExpr>,
    /// Milliseconds after the scenario start.
    pub offset_ms: u64,
    pub fix: FixRecord,
}

#[derive(Debug, Clone)]
pub enum TimeExpr {
    Relative(Duration),
    Absolute(DateTime<Utc>),
}

impl TimeExpr {
    pub fn resolve(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeExpr::Relative(d) => start + *d,
            TimeExpr::Absolute(dt) => *dt,
        }
    }
}

/// A decoded position report in human units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct FixRecord {
    /// Degrees, north positive.
    pub lat: f64,
    /// Degrees, east positive.
    pub lon: f64,
    /// Metres.
    #[serde(default)]
    pub alt: i32,
    pub sats: u8,
    /// Course over ground in degrees.
    #[serde(default)]
    pub heading: f64,
    /// Ground speed in m/s.
    #[serde(default)]
    pub speed: f64,
}

impl FixRecord {
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} out of range", self.lon));
        }
        if !(0.0..360.0).contains(&self.heading) {
            return Err(format!("heading {} out of range", self.heading));
        }
        if !(0.0..=655.35).contains(&self.speed) {
            return Err(format!("speed {} out of range", self.speed));
        }
        Ok(())
    }

    pub fn to_fix(&self, arrival_ms: u64) -> GeoFix {
        GeoFix {
            heading_cdeg: (self.heading * 100.0).round() as u16,
            speed_cms: (self.speed * 100.0).round() as u16,
            arrival_ms,
            ..GeoFix::from_degrees(self.lat, self.lon, self.alt, self.sats)
        }
    }
}

/// A fix due `at_ms` after the scenario start.
#[derive(Debug, Clone, Copy)]
pub struct TimedFix {
    pub at_ms: u64,
    pub fix: GeoFix,
}

impl Scenario {
    pub fn from_str(yaml: &str) -> Result<Self, ScenarioError> {
        let root: serde_yaml::Value = serde_yaml::from_str(yaml)?;

        let variables: HashMap<String, serde_yaml::Value> = root
            .get("variables")
            .map(|v| serde_yaml::from_value(v.clone()))
            .transpose()?
            .unwrap_or_default();

        let raw_steps = root
            .get("steps")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ScenarioError::Step(0, "missing 'steps'".into()))?;

        let parsed = raw_steps
            .iter()
            .enumerate()
            .map(|(i, v)| parse_step(i, v, &variables))
            .collect::<Result<Vec<_>, _>>()?;

        let start = match root.get("start") {
            Some(value) => {
                let text = resolve_value(value, &variables);
                let text = text
                    .as_str()
                    .ok_or_else(|| ScenarioError::Start("expected RFC3339 string".into()))?;
                DateTime::parse_from_rfc3339(text.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| ScenarioError::Start(e.to_string()))?
            }
            // Without an explicit start the first absolute time anchors relative ones
            None => parsed
                .iter()
                .find_map(|(time, _)| match time {
                    Some(TimeExpr::Absolute(dt)) => Some(*dt),
                    _ => None,
                })
                .unwrap_or_else(Utc::now),
        };

        let mut steps = Vec::with_capacity(parsed.len());
        let mut previous_ms = 0u64;
        for (i, (time, fix)) in parsed.into_iter().enumerate() {
            let offset_ms = match &time {
                Some(expr) => {
                    let delta = expr.resolve(start) - start;
                    if delta < Duration::zero() {
                        return Err(ScenarioError::Step(i, "time is before scenario start".into()));
                    }
                    delta.num_milliseconds() as u64
                }
                None => previous_ms,
            };
            if offset_ms < previous_ms {
                return Err(ScenarioError::Step(i, "time is earlier than previous step".into()));
            }
            previous_ms = offset_ms;
            steps.push(Step {
                time,
                offset_ms,
                fix,
            });
        }

        Ok(Scenario {
            start,
            variables,
            steps,
        })
    }

    pub fn timeline(&self) -> Vec<TimedFix> {
        self.steps
            .iter()
            .map(|step| TimedFix {
                at_ms: step.offset_ms,
                fix: step.fix.to_fix(step.offset_ms),
            })
            .collect()
    }

    /// Offset of the last step.
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map(|s| s.offset_ms).unwrap_or(0)
    }
}

fn parse_step(
    i: usize,
    value: &serde_yaml::Value,
    vars: &HashMap<String, serde_yaml::Value>,
) -> Result<(Option<TimeExpr>, FixRecord), ScenarioError> {
    let err = |msg: &str| ScenarioError::Step(i, msg.into());
    let map = value.as_mapping().ok_or_else(|| err("expected mapping"))?;

    if let Some(key) = map
        .keys()
        .find(|k| !matches!(k.as_str(), Some("time") | Some("fix")))
    {
        let name = key.as_str().unwrap_or("<non-string>");
        return Err(err(&format!("unknown key: {}", name)));
    }

    let time = map
        .get("time")
        .map(|v| resolve_value(v, vars))
        .and_then(|v| v.as_str().map(String::from))
        .map(parse_time)
        .transpose()
        .map_err(|e| err(&e))?;

    let value = map.get("fix").ok_or_else(|| err("missing 'fix'"))?;
    let fix: FixRecord =
        serde_yaml::from_value(resolve_value(value, vars)).map_err(|e| err(&e.to_string()))?;
    fix.validate().map_err(|e| err(&e))?;

    Ok((time, fix))
}

fn parse_time(s: String) -> Result<TimeExpr, String> {
    let s = s.trim();

    // Relative: T+10s, T+1500ms
    if s.to_lowercase().starts_with('t') {
        let rest = &s[1..];
        let (neg, rest) = match rest.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, rest.strip_prefix('+').unwrap_or(rest)),
        };
        let dur = parse_duration(rest)?;
        return Ok(TimeExpr::Relative(if neg { -dur } else { dur }));
    }

    // Absolute with offset: 2026-01-12T10:00:00Z + 500ms
    if let Some(idx) = s.rfind(['+', '-']) {
        if idx > 10 {
            if let Ok(base) = DateTime::parse_from_rfc3339(s[..idx].trim()) {
                let offset = &s[idx..];
                let (neg, rest) = match offset.strip_prefix('-') {
                    Some(r) => (true, r),
                    None => (false, offset.strip_prefix('+').unwrap_or(offset)),
                };
                let dur = parse_duration(rest)?;
                return Ok(TimeExpr::Absolute(
                    base.with_timezone(&Utc) + if neg { -dur } else { dur },
                ));
            }
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| TimeExpr::Absolute(dt.with_timezone(&Utc)))
        .map_err(|e| e.to_string())
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn resolve_value(
    value: &serde_yaml::Value,
    vars: &HashMap<String, serde_yaml::Value>,
) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::String(s) => {
            // Direct reference: "$var" keeps the variable's type
            let t = s.trim();
            if t.starts_with('$') && !t.contains(' ') {
                if let Some(v) = vars.get(&t[1..]) {
                    return v.clone();
                }
            }
            let mut result = s.clone();
            for (name, val) in vars {
                let pattern = format!("${}", name);
                if let Some(rep) = simple_to_string(val) {
                    result = result.replace(&pattern, &rep);
                }
            }
            serde_yaml::Value::String(result)
        }
        serde_yaml::Value::Mapping(m) => serde_yaml::Value::Mapping(
            m.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, vars)))
                .collect(),
        ),
        serde_yaml::Value::Sequence(s) => {
            serde_yaml::Value::Sequence(s.iter().map(|v| resolve_value(v, vars)).collect())
        }
        other => other.clone(),
    }
}

fn simple_to_string(v: &serde_yaml::Value) -> Option<String> {
    match v {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
