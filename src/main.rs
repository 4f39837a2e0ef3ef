use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use weather_routing_config::config::{parse_args, Edits};
use weather_routing_config::logging::init as init_logging;
use weather_routing_config::storage::{load_configuration, save_configuration};
use weather_routing_config::{
    Advisory, CurrentConfiguration, FormState, Rejected, RoutingConfiguration, SyncController,
};

fn main() -> Result<()> {
    let config = parse_args()?;
    let _log_guard = init_logging(&config);
    info!("wr-config starting");
    debug!("config path: {}", config.config_path.display());

    let seed = load_configuration(&config.routing_file)?;
    if seed.is_none() {
        warn!(
            "no routing configuration at {}, starting from defaults",
            config.routing_file.display()
        );
    }
    let loaded = seed.clone().unwrap_or_default();
    let mut controller = SyncController::new(CurrentConfiguration::new(seed));
    let mut form = FormState::new();
    controller.load(&loaded, &mut form);

    match apply_edits(&mut controller, &mut form, &config.edits) {
        Ok(advisories) => {
            for advisory in &advisories {
                eprintln!("warning: {advisory}");
            }
            let current = controller
                .slot()
                .current()
                .ok_or_else(|| anyhow!("no configuration was produced"))?;
            if config.json {
                println!("{}", serde_json::to_string_pretty(current)?);
            } else {
                print_summary(current);
            }
            if config.save {
                save_configuration(&config.routing_file, current)?;
            }
        }
        Err(rejected) => {
            if config.json {
                if let Some(configuration) = rejected.configuration.as_deref() {
                    println!("{}", serde_json::to_string_pretty(configuration)?);
                }
            }
            info!("wr-config exited");
            return Err(anyhow!(
                "configuration rejected ({}): {}",
                rejected.reason.kind(),
                rejected.reason
            ));
        }
    }

    info!("wr-config exited");
    Ok(())
}

fn apply_edits(
    controller: &mut SyncController<CurrentConfiguration>,
    form: &mut FormState,
    edits: &Edits,
) -> Result<Vec<Advisory>, Rejected> {
    for source in &edits.sources {
        form.add_source(source);
    }
    if let Some(start) = &edits.start {
        form.start = start.clone();
    }
    if let Some(end) = &edits.end {
        form.end = end.clone();
    }
    if let Some(step) = edits.time_step {
        form.set_time_step(step);
    }
    if let Some(integrator) = edits.integrator {
        form.set_integrator(integrator);
    }
    if let Some(climatology) = edits.climatology {
        form.climatology_selection = climatology.index();
    }
    if let Some(enabled) = edits.avoid_cyclones {
        controller.set_avoid_cyclones(form, enabled)?;
    }
    if let Some(boat) = &edits.boat {
        controller.change_boat(form, boat)?;
    }
    if edits.now {
        controller.use_current_time(form)?;
    } else if edits.start_time.is_some() {
        controller.use_forecast_time(form, edits.start_time)?;
    }
    if let Some(range) = &edits.generate {
        form.range = range.clone();
        controller.generate_from_range(form)?;
    }
    controller.update(form)
}

fn print_summary(configuration: &RoutingConfiguration) {
    let step = configuration.time_step();
    println!("start:           {}", configuration.start);
    println!("end:             {}", configuration.end);
    println!("start time:      {}", configuration.start_time.format("%Y-%m-%d %H:%M"));
    println!("boat:            {}", configuration.boat_file.display());
    println!(
        "time step:       {}h {}m {}s",
        step.hours, step.minutes, step.seconds
    );
    println!(
        "degree steps:    {}",
        configuration.degree_steps.to_text().join(" ")
    );
    println!("integrator:      {}", configuration.integrator.label());
    println!(
        "limits:          course {} search {} wind {}kn swell {}m lat {} tacks {} tacking {}s",
        configuration.max_diverted_course,
        configuration.max_search_angle,
        configuration.max_wind_knots,
        configuration.max_swell_meters,
        configuration.max_latitude,
        configuration.max_tacks,
        configuration.tacking_time_secs
    );
    let cyclone = &configuration.cyclone;
    if cyclone.enabled {
        println!(
            "cyclones:        avoid {}mo {}d above {}kn since {}",
            cyclone.months, cyclone.days, cyclone.wind_speed, cyclone.climatology_start_year
        );
    } else {
        println!("cyclones:        off");
    }
    println!(
        "flags:           land={} currents={} inverted={} anchoring={} deficient={} grib={}",
        configuration.detect_land,
        configuration.currents,
        configuration.inverted_regions,
        configuration.anchoring,
        configuration.allow_data_deficient,
        configuration.use_grib
    );
    println!(
        "climatology:     {}",
        configuration.climatology_type.label()
    );
}
