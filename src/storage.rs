use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::routing::RoutingConfiguration;

pub fn load_configuration(path: &Path) -> Result<Option<RoutingConfiguration>> {
    if !path.exists() {
        debug!("no routing configuration at {}", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read routing configuration: {}", path.display()))?;
    let configuration: RoutingConfiguration = toml::from_str(&content)
        .with_context(|| format!("Failed to parse routing configuration: {}", path.display()))?;
    debug!(
        "loaded routing configuration {} ({} degree steps)",
        path.display(),
        configuration.degree_steps.len()
    );
    Ok(Some(configuration))
}

pub fn save_configuration(path: &Path, configuration: &RoutingConfiguration) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing configuration: {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc = existing
        .parse::<DocumentMut>()
        .with_context(|| format!("Failed to parse routing configuration: {}", path.display()))?;
    let fresh = toml_edit::ser::to_document(configuration).with_context(|| {
        format!("Failed to serialize routing configuration: {}", path.display())
    })?;
    for (key, item) in fresh.iter() {
        doc[key] = item.clone();
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write routing configuration: {}", path.display()))?;
    info!("routing configuration saved {}", path.display());
    Ok(())
}
