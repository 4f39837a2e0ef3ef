use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::degree_steps::DegreeStepSet;

pub const DEFAULT_TIME_STEP_SECS: u32 = 3600;
pub const DEFAULT_DEGREE_STEP: f64 = 15.0;
pub const DEFAULT_MAX_DEGREE_STEP: f64 = 165.0;
pub const DEFAULT_MAX_DIVERTED_COURSE: f64 = 100.0;
pub const DEFAULT_MAX_SEARCH_ANGLE: f64 = 120.0;
pub const DEFAULT_MAX_WIND_KNOTS: f64 = 100.0;
pub const DEFAULT_MAX_SWELL_METERS: f64 = 20.0;
pub const DEFAULT_MAX_LATITUDE: f64 = 90.0;
pub const DEFAULT_MAX_TACKS: i32 = -1;
pub const DEFAULT_CYCLONE_MONTHS: u32 = 1;
pub const DEFAULT_CYCLONE_WIND_SPEED: f64 = 30.0;
pub const DEFAULT_CYCLONE_START_YEAR: i32 = 1985;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    #[default]
    Newton,
    RungeKutta,
}

impl Integrator {
    pub fn label(self) -> &'static str {
        match self {
            Integrator::Newton => "NEWTON",
            Integrator::RungeKutta => "RUNGE-KUTTA",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "rk" | "rk4" | "runge_kutta" | "runge-kutta" | "rungekutta" => Integrator::RungeKutta,
            _ => Integrator::Newton,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimatologyType {
    #[default]
    Disabled,
    CurrentsOnly,
    CumulativeMap,
    CumulativeMinusCalms,
    MostLikely,
    Average,
}

impl ClimatologyType {
    pub const ALL: [ClimatologyType; 6] = [
        ClimatologyType::Disabled,
        ClimatologyType::CurrentsOnly,
        ClimatologyType::CumulativeMap,
        ClimatologyType::CumulativeMinusCalms,
        ClimatologyType::MostLikely,
        ClimatologyType::Average,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            ClimatologyType::Disabled => "DISABLED",
            ClimatologyType::CurrentsOnly => "CURRENTS ONLY",
            ClimatologyType::CumulativeMap => "CUMULATIVE MAP",
            ClimatologyType::CumulativeMinusCalms => "CUMULATIVE MINUS CALMS",
            ClimatologyType::MostLikely => "MOST LIKELY",
            ClimatologyType::Average => "AVERAGE",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "currents" | "currents_only" => ClimatologyType::CurrentsOnly,
            "cumulative" | "cumulative_map" => ClimatologyType::CumulativeMap,
            "cumulative_minus_calms" | "minus_calms" => ClimatologyType::CumulativeMinusCalms,
            "most_likely" | "likely" => ClimatologyType::MostLikely,
            "average" | "avg" => ClimatologyType::Average,
            _ => ClimatologyType::Disabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycloneAvoidance {
    pub enabled: bool,
    pub months: u32,
    pub days: u32,
    pub wind_speed: f64,
    pub climatology_start_year: i32,
}

impl Default for CycloneAvoidance {
    fn default() -> Self {
        Self {
            enabled: false,
            months: DEFAULT_CYCLONE_MONTHS,
            days: 0,
            wind_speed: DEFAULT_CYCLONE_WIND_SPEED,
            climatology_start_year: DEFAULT_CYCLONE_START_YEAR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfiguration {
    pub start: String,
    pub end: String,
    pub start_time: NaiveDateTime,
    pub boat_file: PathBuf,
    pub time_step_secs: u32,
    pub degree_steps: DegreeStepSet,
    pub integrator: Integrator,
    pub max_diverted_course: f64,
    pub max_search_angle: f64,
    pub max_wind_knots: f64,
    pub max_swell_meters: f64,
    pub max_latitude: f64,
    // Negative means no limit.
    pub max_tacks: i32,
    pub tacking_time_secs: f64,
    pub cyclone: CycloneAvoidance,
    pub detect_land: bool,
    pub currents: bool,
    pub inverted_regions: bool,
    pub anchoring: bool,
    pub allow_data_deficient: bool,
    pub use_grib: bool,
    pub climatology_type: ClimatologyType,
}

impl Default for RoutingConfiguration {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            start_time: NaiveDateTime::default(),
            boat_file: PathBuf::new(),
            time_step_secs: DEFAULT_TIME_STEP_SECS,
            degree_steps: default_degree_steps(),
            integrator: Integrator::Newton,
            max_diverted_course: DEFAULT_MAX_DIVERTED_COURSE,
            max_search_angle: DEFAULT_MAX_SEARCH_ANGLE,
            max_wind_knots: DEFAULT_MAX_WIND_KNOTS,
            max_swell_meters: DEFAULT_MAX_SWELL_METERS,
            max_latitude: DEFAULT_MAX_LATITUDE,
            max_tacks: DEFAULT_MAX_TACKS,
            tacking_time_secs: 0.0,
            cyclone: CycloneAvoidance::default(),
            detect_land: true,
            currents: false,
            inverted_regions: false,
            anchoring: false,
            allow_data_deficient: false,
            use_grib: true,
            climatology_type: ClimatologyType::Disabled,
        }
    }
}

impl RoutingConfiguration {
    pub fn time_step(&self) -> TimeStep {
        TimeStep::from_secs(self.time_step_secs)
    }

    pub fn uses_boat(&self, boat_file: &std::path::Path) -> bool {
        self.boat_file == boat_file
    }
}

fn default_degree_steps() -> DegreeStepSet {
    let count = (DEFAULT_MAX_DEGREE_STEP / DEFAULT_DEGREE_STEP) as u32;
    let steps: Vec<f64> = (1..=count)
        .map(|i| DEFAULT_DEGREE_STEP * f64::from(i))
        .flat_map(|v| [v, -v])
        .collect();
    DegreeStepSet::from(steps)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeStep {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeStep {
    pub fn from_secs(total: u32) -> Self {
        let hours = total / 3600;
        let rest = total % 3600;
        Self {
            hours,
            minutes: rest / 60,
            seconds: rest % 60,
        }
    }

    pub fn total_secs(self) -> u32 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

pub fn decimal_hour(time: NaiveDateTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}
