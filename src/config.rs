use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::form::RangeInputs;
use crate::routing::{ClimatologyType, Integrator, TimeStep};

pub const DEFAULT_CONFIG_FILE: &str = "wr-config.toml";
pub const DEFAULT_ROUTING_FILE: &str = "routing.toml";
pub const DEFAULT_LOG_ENABLED: bool = false;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "wr-config.log";
pub const DEFAULT_JSON: bool = false;
pub const DEFAULT_SAVE: bool = false;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edits {
    pub sources: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub boat: Option<String>,
    pub time_step: Option<TimeStep>,
    pub start_time: Option<NaiveDateTime>,
    pub now: bool,
    pub integrator: Option<Integrator>,
    pub climatology: Option<ClimatologyType>,
    pub avoid_cyclones: Option<bool>,
    pub generate: Option<RangeInputs>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub routing_file: PathBuf,
    pub log_enabled: bool,
    pub log_level: String,
    pub log_file: String,
    pub json: bool,
    pub save: bool,
    pub edits: Edits,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    routing_file: Option<String>,
    log_enabled: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
    json: Option<bool>,
    save: Option<bool>,
}

pub fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<Config> {
    let mut explicit_config: Option<PathBuf> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("--config needs a value"))?;
            explicit_config = Some(PathBuf::from(value));
        }
    }

    let env_config = env::var("WR_CONFIG").ok().map(PathBuf::from);
    let config_path = explicit_config
        .clone()
        .or(env_config)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = default_config(config_path.clone());

    if config_path.exists() {
        if let Some(file_config) = load_file_config(&config_path)? {
            apply_file_config(&mut config, file_config);
        }
    } else if explicit_config.is_some() {
        return Err(anyhow!("Config file not found: {}", config_path.display()));
    }

    apply_env(&mut config);

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                iter.next();
            }
            "--routing-file" => {
                config.routing_file = PathBuf::from(
                    iter.next()
                        .ok_or_else(|| anyhow!("--routing-file needs a value"))?,
                );
            }
            "--log" => {
                config.log_enabled = true;
            }
            "--no-log" => {
                config.log_enabled = false;
            }
            "--log-level" => {
                config.log_level = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-level needs a value"))?
                    .to_string();
            }
            "--log-file" => {
                config.log_file = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-file needs a value"))?
                    .to_string();
            }
            "--json" => {
                config.json = true;
            }
            "--save" => {
                config.save = true;
            }
            "--source" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--source needs a value"))?;
                config.edits.sources.push(value.to_string());
            }
            "--start" => {
                config.edits.start = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--start needs a value"))?
                        .to_string(),
                );
            }
            "--end" => {
                config.edits.end = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--end needs a value"))?
                        .to_string(),
                );
            }
            "--boat" => {
                config.edits.boat = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--boat needs a value"))?
                        .to_string(),
                );
            }
            "--time-step" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--time-step needs a value"))?;
                config.edits.time_step = Some(parse_time_step(value)?);
            }
            "--start-time" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--start-time needs a value"))?;
                config.edits.start_time = Some(parse_start_time(value)?);
            }
            "--now" => {
                config.edits.now = true;
            }
            "--integrator" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--integrator needs a value"))?;
                config.edits.integrator = Some(Integrator::from_str(value));
            }
            "--climatology" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--climatology needs a value"))?;
                config.edits.climatology = Some(ClimatologyType::from_str(value));
            }
            "--avoid-cyclones" => {
                config.edits.avoid_cyclones = Some(true);
            }
            "--no-avoid-cyclones" => {
                config.edits.avoid_cyclones = Some(false);
            }
            "--generate" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--generate needs a value"))?;
                config.edits.generate = Some(parse_range(value)?);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                return Err(anyhow!("Unknown argument: {other}"));
            }
        }
    }

    validate_edits(&config.edits)?;
    Ok(config)
}

fn default_config(config_path: PathBuf) -> Config {
    Config {
        config_path,
        routing_file: PathBuf::from(DEFAULT_ROUTING_FILE),
        log_enabled: DEFAULT_LOG_ENABLED,
        log_level: DEFAULT_LOG_LEVEL.to_string(),
        log_file: DEFAULT_LOG_FILE.to_string(),
        json: DEFAULT_JSON,
        save: DEFAULT_SAVE,
        edits: Edits::default(),
    }
}

fn apply_env(config: &mut Config) {
    if let Ok(value) = env::var("WR_ROUTING_FILE") {
        config.routing_file = PathBuf::from(value);
    }
    if let Ok(value) = env::var("WR_LOG_ENABLED") {
        config.log_enabled = is_truthy(&value);
    }
    if let Ok(value) = env::var("WR_LOG_LEVEL") {
        config.log_level = value;
    }
    if let Ok(value) = env::var("WR_LOG_FILE") {
        config.log_file = value;
    }
    if let Ok(value) = env::var("WR_JSON") {
        config.json = is_truthy(&value);
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "yes" | "on")
}

fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let cfg: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(cfg))
}

fn apply_file_config(target: &mut Config, file: FileConfig) {
    if let Some(routing_file) = file.routing_file {
        if !routing_file.trim().is_empty() {
            target.routing_file = PathBuf::from(routing_file);
        }
    }
    if let Some(log_enabled) = file.log_enabled {
        target.log_enabled = log_enabled;
    }
    if let Some(log_level) = file.log_level {
        target.log_level = log_level;
    }
    if let Some(log_file) = file.log_file {
        target.log_file = log_file;
    }
    if let Some(json) = file.json {
        target.json = json;
    }
    if let Some(save) = file.save {
        target.save = save;
    }
}

// `H:M:S`, `M:S` or plain seconds.
fn parse_time_step(value: &str) -> Result<TimeStep> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    let mut numbers = Vec::with_capacity(parts.len());
    for part in &parts {
        let number: u32 = part
            .trim()
            .parse()
            .with_context(|| format!("invalid time step: {value}"))?;
        numbers.push(number);
    }
    match numbers.as_slice() {
        [seconds] => Ok(TimeStep::from_secs(*seconds)),
        [minutes, seconds] => Ok(TimeStep {
            hours: 0,
            minutes: *minutes,
            seconds: *seconds,
        }),
        [hours, minutes, seconds] => Ok(TimeStep {
            hours: *hours,
            minutes: *minutes,
            seconds: *seconds,
        }),
        _ => Err(anyhow!("invalid time step: {value}")),
    }
}

fn parse_start_time(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| anyhow!("invalid start time: {value}"))
}

fn parse_range(value: &str) -> Result<RangeInputs> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [from, to, by] => Ok(RangeInputs::new(from, to, by)),
        _ => Err(anyhow!("--generate expects FROM,TO,BY, got {value}")),
    }
}

fn validate_edits(edits: &Edits) -> Result<()> {
    if edits.now && edits.start_time.is_some() {
        return Err(anyhow!("--now and --start-time are mutually exclusive"));
    }
    Ok(())
}

fn print_help() {
    println!("wr-config");
    println!("Usage: wr-config [--config PATH] [--routing-file PATH] [--json] [--save]");
    println!("       [--log] [--no-log] [--log-level LEVEL] [--log-file PATH]");
    println!("       [--source NAME] [--start NAME] [--end NAME] [--boat PATH]");
    println!("       [--time-step H:M:S] [--start-time \"YYYY-MM-DD HH:MM\"] [--now]");
    println!("       [--integrator newton|rk] [--climatology NAME]");
    println!("       [--avoid-cyclones] [--no-avoid-cyclones] [--generate FROM,TO,BY]");
    println!("Environment: WR_CONFIG overrides config path");
    println!("Environment: WR_ROUTING_FILE sets the routing configuration file");
    println!("Environment: WR_LOG_ENABLED/LEVEL/FILE configure logging");
    println!("Environment: WR_JSON=1 prints the configuration as JSON");
}
