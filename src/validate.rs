use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;

use crate::degree_steps::{DegreeStepSet, MAX_GENERATED_ANGLES, MIN_DEGREE_STEPS};
use crate::routing::RoutingConfiguration;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {text:?}")]
    Parse { field: &'static str, text: String },
    #[error("invalid degree step #{index}: {token:?}")]
    DegreeStepToken { index: usize, token: String },
    #[error("invalid degree step range from {from} to {to} by {step}, nothing will be done")]
    Range { from: f64, to: f64, step: f64 },
    #[error("zero time step")]
    ZeroDuration,
    #[error("invalid date-time")]
    InvalidDateTime,
}

impl ConfigError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::Parse { .. } | ConfigError::DegreeStepToken { .. } => "ParseError",
            ConfigError::Range { .. } => "RangeError",
            ConfigError::ZeroDuration => "ZeroDuration",
            ConfigError::InvalidDateTime => "InvalidDateTime",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Advisory {
    #[error(
        "insufficient directional resolution: {count} degree steps, at least {min} recommended",
        min = MIN_DEGREE_STEPS
    )]
    InsufficientResolution { count: usize },
    #[error("no boat performance file selected")]
    MissingBoatFile,
}

impl Advisory {
    pub fn kind(&self) -> &'static str {
        match self {
            Advisory::InsufficientResolution { .. } => "InsufficientResolution",
            Advisory::MissingBoatFile => "MissingBoatFile",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Accepted,
    Warning(Advisory),
    Rejected(ConfigError),
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected(_))
    }

    pub fn into_result(self) -> Result<Option<Advisory>, ConfigError> {
        match self {
            Verdict::Accepted => Ok(None),
            Verdict::Warning(advisory) => Ok(Some(advisory)),
            Verdict::Rejected(err) => Err(err),
        }
    }
}

pub fn check_time_step(seconds: u32) -> Verdict {
    if seconds == 0 {
        Verdict::Rejected(ConfigError::ZeroDuration)
    } else {
        Verdict::Accepted
    }
}

pub fn check_degree_steps(steps: &DegreeStepSet) -> Verdict {
    if steps.len() < MIN_DEGREE_STEPS {
        Verdict::Warning(Advisory::InsufficientResolution { count: steps.len() })
    } else {
        Verdict::Accepted
    }
}

pub fn check_boat_file(path: &Path) -> Verdict {
    if path.as_os_str().is_empty() {
        Verdict::Warning(Advisory::MissingBoatFile)
    } else {
        Verdict::Accepted
    }
}

pub fn check_generation_range(from: f64, to: f64, step: f64) -> Verdict {
    let in_range = (0.0..180.0).contains(&from)
        && to > 0.0
        && to <= 180.0
        && from < to
        && step > 0.0
        && step < 180.0;
    if in_range && generated_angles(from, to, step) <= MAX_GENERATED_ANGLES as f64 {
        Verdict::Accepted
    } else {
        Verdict::Rejected(ConfigError::Range { from, to, step })
    }
}

pub fn generated_angles(from: f64, to: f64, step: f64) -> f64 {
    ((to - from) / step + 1e-9).floor() + 1.0
}

/// Builds the start time from the date picker and the decimal-hour field.
/// The hour is rounded to the nearest minute, so any text written with at
/// least two decimals reproduces the minute it came from.
pub fn compose_start_time(
    date: Option<NaiveDate>,
    hour_text: &str,
) -> Result<NaiveDateTime, ConfigError> {
    let hour = hour_text
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Parse {
            field: "start hour",
            text: hour_text.to_string(),
        })?;
    let date = date.ok_or(ConfigError::InvalidDateTime)?;
    if !(0.0..24.0).contains(&hour) {
        return Err(ConfigError::InvalidDateTime);
    }
    let minutes = ((hour * 60.0).round() as u32).min(24 * 60 - 1);
    date.and_hms_opt(minutes / 60, minutes % 60, 0)
        .ok_or(ConfigError::InvalidDateTime)
}

pub fn validate(configuration: &RoutingConfiguration) -> Result<Vec<Advisory>, ConfigError> {
    let checks = [
        check_time_step(configuration.time_step_secs),
        check_degree_steps(&configuration.degree_steps),
        check_boat_file(&configuration.boat_file),
    ];
    let mut advisories = Vec::new();
    for verdict in checks {
        if let Some(advisory) = verdict.into_result()? {
            advisories.push(advisory);
        }
    }
    Ok(advisories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingConfiguration;
    use chrono::NaiveTime;
    use std::path::PathBuf;

    fn date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, 1)
    }

    #[test]
    fn zero_time_step_is_rejected() {
        assert_eq!(
            check_time_step(0),
            Verdict::Rejected(ConfigError::ZeroDuration)
        );
        assert_eq!(check_time_step(1), Verdict::Accepted);
    }

    #[test]
    fn degree_step_count_threshold() {
        let three = DegreeStepSet::from(vec![-10.0, 0.0, 10.0]);
        assert_eq!(
            check_degree_steps(&three),
            Verdict::Warning(Advisory::InsufficientResolution { count: 3 })
        );
        let four = DegreeStepSet::from(vec![-20.0, -10.0, 10.0, 20.0]);
        assert_eq!(check_degree_steps(&four), Verdict::Accepted);
    }

    #[test]
    fn generation_range_bounds() {
        assert!(!check_generation_range(0.0, 180.0, 179.9).is_rejected());
        assert!(check_generation_range(180.0, 180.0, 1.0).is_rejected());
        assert!(check_generation_range(200.0, 210.0, 1.0).is_rejected());
        assert!(check_generation_range(10.0, 10.0, 1.0).is_rejected());
        assert!(check_generation_range(10.0, 20.0, -1.0).is_rejected());
        assert!(check_generation_range(10.0, f64::NAN, 1.0).is_rejected());
        assert!(check_generation_range(10.0, 20.0, f64::INFINITY).is_rejected());
    }

    #[test]
    fn generation_count_is_capped() {
        assert_eq!(generated_angles(10.0, 30.0, 10.0), 3.0);
        assert_eq!(generated_angles(0.0, 180.0, 0.05), 3601.0);
        assert!(!check_generation_range(0.0, 180.0, 0.05).is_rejected());
        assert!(!check_generation_range(0.5, 180.0, 0.05).is_rejected());
        assert_eq!(
            check_generation_range(0.0, 180.0, 1e-4),
            Verdict::Rejected(ConfigError::Range {
                from: 0.0,
                to: 180.0,
                step: 1e-4
            })
        );
        assert!(check_generation_range(0.0, 180.0, 1e-9).is_rejected());
    }

    #[test]
    fn compose_start_time_rounds_to_minutes() {
        let time = compose_start_time(date(), "10.75").unwrap();
        assert_eq!(time.time(), NaiveTime::from_hms_opt(10, 45, 0).unwrap());
        let time = compose_start_time(date(), "10.98").unwrap();
        assert_eq!(time.time(), NaiveTime::from_hms_opt(10, 59, 0).unwrap());
        let time = compose_start_time(date(), "23.9999").unwrap();
        assert_eq!(time.time(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn compose_start_time_failures() {
        assert_eq!(
            compose_start_time(None, "10"),
            Err(ConfigError::InvalidDateTime)
        );
        assert_eq!(
            compose_start_time(date(), "24"),
            Err(ConfigError::InvalidDateTime)
        );
        assert_eq!(
            compose_start_time(date(), "-1"),
            Err(ConfigError::InvalidDateTime)
        );
        let err = compose_start_time(date(), "noon").unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn validate_collects_advisories() {
        let mut cfg = RoutingConfiguration {
            boat_file: PathBuf::new(),
            ..RoutingConfiguration::default()
        };
        cfg.degree_steps = DegreeStepSet::from(vec![-10.0, 10.0]);
        let advisories = validate(&cfg).unwrap();
        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].kind(), "InsufficientResolution");
        assert_eq!(advisories[1], Advisory::MissingBoatFile);

        cfg.time_step_secs = 0;
        assert_eq!(validate(&cfg), Err(ConfigError::ZeroDuration));
    }

    #[test]
    fn messages_are_readable() {
        let advisory = Advisory::InsufficientResolution { count: 2 };
        assert_eq!(
            advisory.to_string(),
            "insufficient directional resolution: 2 degree steps, at least 4 recommended"
        );
        assert_eq!(ConfigError::ZeroDuration.to_string(), "zero time step");
    }
}
