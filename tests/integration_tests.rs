// tests/integration_tests.rs

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use weather_routing_config::storage::{load_configuration, save_configuration};
use weather_routing_config::{
    pull, push, Advisory, ClimatologyType, ConfigError, CurrentConfiguration, DegreeStepSet,
    FormState, Integrator, RangeInputs, RoutingConfiguration, SyncController, TimeStep,
};

fn temp_file(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dir.push(format!("wr-config-integration-{suffix}"));
    let _ = fs::create_dir_all(&dir);
    dir.push(name);
    dir
}

fn passage() -> RoutingConfiguration {
    RoutingConfiguration {
        start: "Falmouth".to_string(),
        end: "Horta".to_string(),
        start_time: NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(6, 5, 0)
            .unwrap(),
        boat_file: PathBuf::from("boats/cruiser.xml"),
        time_step_secs: 1800,
        integrator: Integrator::RungeKutta,
        climatology_type: ClimatologyType::CurrentsOnly,
        ..RoutingConfiguration::default()
    }
}

#[test]
fn test_editing_session_end_to_end() {
    // Test that a whole session only ever forwards accepted configurations
    let mut controller = SyncController::new(CurrentConfiguration::new(Some(passage())));
    let mut form = FormState::new();
    form.add_source("Falmouth");
    form.add_source("Horta");
    form.add_source("Brest");
    controller.load(&passage(), &mut form);

    form.end = "Brest".to_string();
    controller.update(&form).unwrap();
    assert_eq!(controller.slot().current().unwrap().end, "Brest");

    form.range = RangeInputs::new("5", "45", "5");
    let generated = controller
        .generate_from_range(&mut form)
        .unwrap()
        .configuration;
    assert_eq!(generated.degree_steps.len(), 18);
    assert!(generated.degree_steps.is_symmetric());

    form.set_time_step(TimeStep::default());
    let rejected = controller.update(&form).unwrap_err();
    assert_eq!(rejected.reason, ConfigError::ZeroDuration);
    assert_eq!(
        rejected.configuration.as_ref().map(|c| c.time_step_secs),
        Some(0)
    );
    assert_eq!(controller.slot().current(), Some(&generated));

    form.set_time_step(TimeStep::from_secs(3725));
    controller.update(&form).unwrap();
    let current = controller.slot().current().unwrap();
    assert_eq!(current.time_step_secs, 3725);
    assert_eq!(current.degree_steps, generated.degree_steps);
}

#[test]
fn test_round_trip_through_form() {
    // Test that push followed by pull reproduces the configuration
    let mut configuration = passage();
    configuration.degree_steps = DegreeStepSet::from(vec![-67.5, -22.5, -0.5, 0.5, 22.5, 67.5]);
    configuration.cyclone.months = 4;
    configuration.max_tacks = 12;
    let mut form = FormState::new();
    push(&configuration, &mut form);
    assert_eq!(form.start_hour, "6.08");
    let pulled = pull(&form).unwrap();
    assert_eq!(pulled.configuration, configuration);
}

#[test]
fn test_insufficient_resolution_is_only_a_warning() {
    // Test that fewer than four degree steps still reach the slot
    let mut controller = SyncController::new(CurrentConfiguration::default());
    let mut form = FormState::new();
    let mut configuration = passage();
    configuration.degree_steps = DegreeStepSet::from(vec![-15.0, 0.0, 15.0]);
    controller.load(&configuration, &mut form);
    let advisories = controller.update(&form).unwrap();
    assert_eq!(
        advisories,
        vec![Advisory::InsufficientResolution { count: 3 }]
    );
    assert_eq!(controller.slot().replacements(), 1);
}

#[test]
fn test_saved_configuration_reloads() {
    // Test that a configuration pulled from the form survives a save and load
    let path = temp_file("passage.toml");
    let mut form = FormState::new();
    push(&passage(), &mut form);
    form.set_avoid_cyclones(true);
    let configuration = pull(&form).unwrap().configuration;
    save_configuration(&path, &configuration).unwrap();
    assert!(Path::new(&path).exists());
    let loaded = load_configuration(&path).unwrap().unwrap();
    assert_eq!(loaded, configuration);
    assert!(loaded.cyclone.enabled);
    let _ = fs::remove_file(&path);
    let _ = fs::remove_dir(path.parent().unwrap());
}

#[test]
fn test_cargo_toml_metadata() {
    // Test that Cargo.toml has required metadata
    let cargo_content = fs::read_to_string("Cargo.toml").expect("Failed to read Cargo.toml");

    assert!(
        cargo_content.contains("name = \"weather-routing-config\""),
        "Missing package name"
    );
    assert!(cargo_content.contains("description ="), "Missing description");
    assert!(cargo_content.contains("license ="), "Missing license");
    assert!(cargo_content.contains("readme ="), "Missing readme");
}
