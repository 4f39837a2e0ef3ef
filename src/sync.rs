use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::degree_steps::DegreeStepSet;
use crate::form::FormState;
use crate::routing::{
    decimal_hour, ClimatologyType, CycloneAvoidance, RoutingConfiguration, TimeStep,
};
use crate::validate::{check_time_step, compose_start_time, validate, Advisory, ConfigError};

pub trait ConfigurationSlot {
    fn replace_current(&mut self, configuration: RoutingConfiguration);

    fn boat_changed(&mut self, configuration: &RoutingConfiguration);
}

#[derive(Clone, Debug, Default)]
pub struct CurrentConfiguration {
    current: Option<RoutingConfiguration>,
    replacements: usize,
    refreshed_boats: Vec<PathBuf>,
}

impl CurrentConfiguration {
    pub fn new(seed: Option<RoutingConfiguration>) -> Self {
        Self {
            current: seed,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&RoutingConfiguration> {
        self.current.as_ref()
    }

    pub fn replacements(&self) -> usize {
        self.replacements
    }

    pub fn refreshed_boats(&self) -> &[PathBuf] {
        &self.refreshed_boats
    }
}

impl ConfigurationSlot for CurrentConfiguration {
    fn replace_current(&mut self, configuration: RoutingConfiguration) {
        self.current = Some(configuration);
        self.replacements += 1;
    }

    fn boat_changed(&mut self, configuration: &RoutingConfiguration) {
        if !self.refreshed_boats.contains(&configuration.boat_file) {
            self.refreshed_boats.push(configuration.boat_file.clone());
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pulled {
    pub configuration: RoutingConfiguration,
    pub advisories: Vec<Advisory>,
}

/// A blocking problem. When every field could be read (a zero time step)
/// the assembled configuration rides along for display; it must not be
/// forwarded to the search engine.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{reason}")]
pub struct Rejected {
    pub reason: ConfigError,
    pub configuration: Option<Box<RoutingConfiguration>>,
}

impl From<ConfigError> for Rejected {
    fn from(reason: ConfigError) -> Self {
        Self {
            reason,
            configuration: None,
        }
    }
}

pub fn pull(form: &FormState) -> Result<Pulled, Rejected> {
    settle(assemble(form), form.time_step().total_secs())
}

fn assemble(form: &FormState) -> Result<RoutingConfiguration, ConfigError> {
    let start_time = compose_start_time(form.start_date, &form.start_hour)?;
    let degree_steps = DegreeStepSet::from_text(&form.degree_steps)?;
    let climatology_type =
        ClimatologyType::from_index(form.climatology_selection).ok_or_else(|| {
            ConfigError::Parse {
                field: "climatology type",
                text: form.climatology_selection.to_string(),
            }
        })?;

    Ok(RoutingConfiguration {
        start: form.start.clone(),
        end: form.end.clone(),
        start_time,
        boat_file: PathBuf::from(form.boat_path.trim()),
        time_step_secs: form.time_step().total_secs(),
        degree_steps,
        integrator: form.integrator(),
        max_diverted_course: form.max_diverted_course,
        max_search_angle: form.max_search_angle,
        max_wind_knots: form.max_wind_knots,
        max_swell_meters: form.max_swell_meters,
        max_latitude: form.max_latitude,
        max_tacks: form.max_tacks,
        tacking_time_secs: form.tacking_time,
        cyclone: CycloneAvoidance {
            enabled: form.avoid_cyclone_tracks,
            months: form.cyclone_months,
            days: form.cyclone_days,
            wind_speed: form.cyclone_wind_speed,
            climatology_start_year: form.cyclone_climatology_start_year,
        },
        detect_land: form.detect_land,
        currents: form.currents,
        inverted_regions: form.inverted_regions,
        anchoring: form.anchoring,
        allow_data_deficient: form.allow_data_deficient,
        use_grib: form.use_grib,
        climatology_type,
    })
}

// A zero time step outranks every other problem.
fn settle(
    assembled: Result<RoutingConfiguration, ConfigError>,
    time_step_secs: u32,
) -> Result<Pulled, Rejected> {
    if let Err(reason) = check_time_step(time_step_secs).into_result() {
        return Err(Rejected {
            reason,
            configuration: assembled.ok().map(Box::new),
        });
    }
    let configuration = assembled?;
    match validate(&configuration) {
        Ok(advisories) => Ok(Pulled {
            configuration,
            advisories,
        }),
        Err(reason) => Err(Rejected {
            reason,
            configuration: Some(Box::new(configuration)),
        }),
    }
}

pub fn push(configuration: &RoutingConfiguration, form: &mut FormState) {
    form.start = configuration.start.clone();
    form.end = configuration.end.clone();
    form.start_date = Some(configuration.start_time.date());
    form.start_hour = format!("{:.2}", decimal_hour(configuration.start_time));
    form.boat_path = configuration.boat_file.to_string_lossy().into_owned();
    form.set_time_step(TimeStep::from_secs(configuration.time_step_secs));
    form.degree_steps = configuration.degree_steps.to_text();
    form.degree_step_selection = None;
    form.set_integrator(configuration.integrator);

    form.max_diverted_course = configuration.max_diverted_course;
    form.max_search_angle = configuration.max_search_angle;
    form.max_wind_knots = configuration.max_wind_knots;
    form.max_swell_meters = configuration.max_swell_meters;
    form.max_latitude = configuration.max_latitude;
    form.max_tacks = configuration.max_tacks;
    form.tacking_time = configuration.tacking_time_secs;

    let cyclone = &configuration.cyclone;
    form.set_avoid_cyclones(cyclone.enabled);
    form.cyclone_months = cyclone.months;
    form.cyclone_days = cyclone.days;
    form.cyclone_wind_speed = cyclone.wind_speed;
    form.cyclone_climatology_start_year = cyclone.climatology_start_year;

    form.detect_land = configuration.detect_land;
    form.currents = configuration.currents;
    form.inverted_regions = configuration.inverted_regions;
    form.anchoring = configuration.anchoring;
    form.allow_data_deficient = configuration.allow_data_deficient;
    form.use_grib = configuration.use_grib;
    form.climatology_selection = configuration.climatology_type.index();
}

pub struct SyncController<S: ConfigurationSlot> {
    slot: S,
}

impl<S: ConfigurationSlot> SyncController<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    pub fn load(&self, configuration: &RoutingConfiguration, form: &mut FormState) {
        debug!(
            "load configuration start={} end={}",
            configuration.start, configuration.end
        );
        push(configuration, form);
    }

    pub fn notify_changed(&mut self, configuration: RoutingConfiguration) {
        debug!(
            "current configuration replaced start={} end={} dt={}",
            configuration.start, configuration.end, configuration.time_step_secs
        );
        self.slot.replace_current(configuration);
    }

    pub fn update(&mut self, form: &FormState) -> Result<Vec<Advisory>, Rejected> {
        match pull(form) {
            Ok(Pulled {
                configuration,
                advisories,
            }) => {
                for advisory in &advisories {
                    warn!("configuration warning: {advisory}");
                }
                self.notify_changed(configuration);
                Ok(advisories)
            }
            Err(rejected) => {
                warn!("configuration rejected: {}", rejected.reason);
                Err(rejected)
            }
        }
    }

    pub fn generate_from_range(&mut self, form: &mut FormState) -> Result<Pulled, Rejected> {
        let (from, to, by) = form.range.parse().inspect_err(|err| {
            warn!("degree step range rejected: {err}");
        })?;
        let mut steps = DegreeStepSet::new();
        if let Err(err) = steps.generate(from, to, by) {
            warn!("degree step generation rejected: {err}");
            return Err(err.into());
        }
        debug!("generated {} degree steps from {from} to {to} by {by}", steps.len());

        let mut staged = form.clone();
        staged.degree_steps.clear();
        let assembled = assemble(&staged).map(|mut configuration| {
            configuration.degree_steps = steps;
            configuration
        });
        let pulled = settle(assembled, form.time_step().total_secs()).inspect_err(|rejected| {
            warn!("configuration rejected: {}", rejected.reason);
        })?;
        for advisory in &pulled.advisories {
            warn!("configuration warning: {advisory}");
        }
        push(&pulled.configuration, form);
        self.notify_changed(pulled.configuration.clone());
        Ok(pulled)
    }

    pub fn add_degree_step(&mut self, form: &mut FormState) -> Result<Vec<Advisory>, Rejected> {
        form.add_degree_step()?;
        self.update(form)
    }

    pub fn remove_degree_step(&mut self, form: &mut FormState) -> Result<Vec<Advisory>, Rejected> {
        if !form.remove_degree_step() {
            return Ok(Vec::new());
        }
        self.update(form)
    }

    pub fn clear_degree_steps(&mut self, form: &mut FormState) -> Result<Vec<Advisory>, Rejected> {
        form.clear_degree_steps();
        self.update(form)
    }

    pub fn set_avoid_cyclones(
        &mut self,
        form: &mut FormState,
        enabled: bool,
    ) -> Result<Vec<Advisory>, Rejected> {
        form.set_avoid_cyclones(enabled);
        self.update(form)
    }

    pub fn use_current_time(&mut self, form: &mut FormState) -> Result<Vec<Advisory>, Rejected> {
        self.use_forecast_time(form, Some(Local::now().naive_local()))
    }

    pub fn use_forecast_time(
        &mut self,
        form: &mut FormState,
        timeline: Option<NaiveDateTime>,
    ) -> Result<Vec<Advisory>, Rejected> {
        form.set_start_date_time(timeline)?;
        self.update(form)
    }

    pub fn change_boat(
        &mut self,
        form: &mut FormState,
        boat_path: &str,
    ) -> Result<Vec<Advisory>, Rejected> {
        form.boat_path = boat_path.to_string();
        let Pulled {
            configuration,
            advisories,
        } = pull(form)?;
        info!("boat changed to {}", configuration.boat_file.display());
        self.slot.boat_changed(&configuration);
        self.notify_changed(configuration);
        Ok(advisories)
    }
}
