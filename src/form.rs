use chrono::{NaiveDate, NaiveDateTime};

use crate::degree_steps::parse_degrees;
use crate::routing::{decimal_hour, Integrator, TimeStep};
use crate::validate::ConfigError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeInputs {
    pub from: String,
    pub to: String,
    pub by: String,
}

impl RangeInputs {
    pub fn new(from: &str, to: &str, by: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            by: by.to_string(),
        }
    }

    pub fn parse(&self) -> Result<(f64, f64, f64), ConfigError> {
        let field = |text: &str| {
            parse_degrees(text).ok_or_else(|| ConfigError::Parse {
                field: "degree step range",
                text: text.to_string(),
            })
        };
        Ok((
            field(self.from.as_str())?,
            field(self.to.as_str())?,
            field(self.by.as_str())?,
        ))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub sources: Vec<String>,
    pub start: String,
    pub end: String,
    pub start_date: Option<NaiveDate>,
    pub start_hour: String,
    pub boat_path: String,
    pub time_step_hours: u32,
    pub time_step_minutes: u32,
    pub time_step_seconds: u32,
    pub degree_steps: Vec<String>,
    pub degree_step_selection: Option<usize>,
    pub degree_step_entry: String,
    pub range: RangeInputs,
    pub newton: bool,
    pub runge_kutta: bool,
    pub max_diverted_course: f64,
    pub max_search_angle: f64,
    pub max_wind_knots: f64,
    pub max_swell_meters: f64,
    pub max_latitude: f64,
    pub max_tacks: i32,
    pub tacking_time: f64,
    pub avoid_cyclone_tracks: bool,
    pub cyclone_months: u32,
    pub cyclone_days: u32,
    pub cyclone_wind_speed: f64,
    pub cyclone_climatology_start_year: i32,
    pub cyclone_fields_enabled: bool,
    pub detect_land: bool,
    pub currents: bool,
    pub inverted_regions: bool,
    pub anchoring: bool,
    pub allow_data_deficient: bool,
    pub use_grib: bool,
    pub climatology_selection: usize,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, name: &str) {
        self.sources.push(name.to_string());
    }

    pub fn remove_source(&mut self, name: &str) -> bool {
        match self.sources.iter().position(|s| s == name) {
            Some(index) => {
                self.sources.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    pub fn set_start_date_time(&mut self, time: Option<NaiveDateTime>) -> Result<(), ConfigError> {
        let time = time.ok_or(ConfigError::InvalidDateTime)?;
        self.start_date = Some(time.date());
        self.start_hour = format!("{:.3}", decimal_hour(time));
        Ok(())
    }

    pub fn time_step(&self) -> TimeStep {
        TimeStep {
            hours: self.time_step_hours,
            minutes: self.time_step_minutes,
            seconds: self.time_step_seconds,
        }
    }

    pub fn set_time_step(&mut self, step: TimeStep) {
        self.time_step_hours = step.hours;
        self.time_step_minutes = step.minutes;
        self.time_step_seconds = step.seconds;
    }

    pub fn integrator(&self) -> Integrator {
        if self.runge_kutta {
            Integrator::RungeKutta
        } else {
            Integrator::Newton
        }
    }

    pub fn set_integrator(&mut self, integrator: Integrator) {
        self.newton = integrator == Integrator::Newton;
        self.runge_kutta = integrator == Integrator::RungeKutta;
    }

    pub fn add_degree_step(&mut self) -> Result<(), ConfigError> {
        let value = parse_degrees(&self.degree_step_entry).ok_or_else(|| ConfigError::Parse {
            field: "degree step",
            text: self.degree_step_entry.clone(),
        })?;
        let text = value.to_string();
        match self.degree_step_selection {
            Some(index) if index < self.degree_steps.len() => {
                self.degree_steps.insert(index, text)
            }
            _ => self.degree_steps.push(text),
        }
        self.degree_step_entry.clear();
        Ok(())
    }

    pub fn remove_degree_step(&mut self) -> bool {
        let Some(index) = self.degree_step_selection else {
            return false;
        };
        if index >= self.degree_steps.len() {
            return false;
        }
        self.degree_steps.remove(index);
        self.degree_step_selection = if self.degree_steps.is_empty() {
            None
        } else {
            Some(index.min(self.degree_steps.len() - 1))
        };
        true
    }

    pub fn clear_degree_steps(&mut self) {
        self.degree_steps.clear();
        self.degree_step_selection = None;
    }

    pub fn set_avoid_cyclones(&mut self, enabled: bool) {
        self.avoid_cyclone_tracks = enabled;
        self.cyclone_fields_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_add_remove_clear() {
        let mut form = FormState::new();
        form.add_source("Falmouth");
        form.add_source("Horta");
        assert!(form.remove_source("Falmouth"));
        assert!(!form.remove_source("Brest"));
        assert_eq!(form.sources, vec!["Horta"]);
        form.clear_sources();
        assert!(form.sources.is_empty());
    }

    #[test]
    fn set_start_date_time_writes_three_decimals() {
        let mut form = FormState::new();
        let time = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 20, 0)
            .unwrap();
        form.set_start_date_time(Some(time)).unwrap();
        assert_eq!(form.start_date, Some(time.date()));
        assert_eq!(form.start_hour, "14.333");
    }

    #[test]
    fn set_start_date_time_rejects_missing_value() {
        let mut form = FormState {
            start_hour: "9.50".to_string(),
            ..FormState::default()
        };
        let before = form.clone();
        assert_eq!(
            form.set_start_date_time(None),
            Err(ConfigError::InvalidDateTime)
        );
        assert_eq!(form, before);
    }

    #[test]
    fn add_degree_step_at_selection_or_end() {
        let mut form = FormState::new();
        form.degree_steps = vec!["10.0".to_string(), "20.0".to_string()];
        form.degree_step_entry = "15".to_string();
        form.degree_step_selection = Some(1);
        form.add_degree_step().unwrap();
        assert_eq!(form.degree_steps, vec!["10.0", "15", "20.0"]);
        assert!(form.degree_step_entry.is_empty());

        form.degree_step_selection = None;
        form.degree_step_entry = "-7.5".to_string();
        form.add_degree_step().unwrap();
        assert_eq!(form.degree_steps.last().map(String::as_str), Some("-7.5"));
    }

    #[test]
    fn add_degree_step_rejects_garbage() {
        let mut form = FormState::new();
        form.degree_step_entry = "abc".to_string();
        let err = form.add_degree_step().unwrap_err();
        assert_eq!(err.kind(), "ParseError");
        assert!(form.degree_steps.is_empty());
        assert_eq!(form.degree_step_entry, "abc");
    }

    #[test]
    fn remove_degree_step_keeps_selection_index() {
        let mut form = FormState::new();
        form.degree_steps = vec!["1".into(), "2".into(), "3".into()];
        assert!(!form.remove_degree_step());

        form.degree_step_selection = Some(1);
        assert!(form.remove_degree_step());
        assert_eq!(form.degree_steps, vec!["1", "3"]);
        assert_eq!(form.degree_step_selection, Some(1));

        assert!(form.remove_degree_step());
        assert_eq!(form.degree_step_selection, Some(0));
        assert!(form.remove_degree_step());
        assert_eq!(form.degree_step_selection, None);
    }

    #[test]
    fn cyclone_toggle_keeps_values() {
        let mut form = FormState {
            cyclone_months: 3,
            ..FormState::default()
        };
        form.set_avoid_cyclones(true);
        assert!(form.cyclone_fields_enabled);
        form.set_avoid_cyclones(false);
        assert!(!form.cyclone_fields_enabled);
        assert!(!form.avoid_cyclone_tracks);
        assert_eq!(form.cyclone_months, 3);
    }

    #[test]
    fn range_inputs_parse() {
        assert_eq!(
            RangeInputs::new("10", " 30 ", "10").parse(),
            Ok((10.0, 30.0, 10.0))
        );
        let err = RangeInputs::new("10", "x", "10").parse().unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }
}
