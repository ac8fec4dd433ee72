//! Wires configuration, collaborators and the engine for one command.

use chrono::TimeZone;
use domain::services::{
    Clock, PackageCatalog, StaticAccessGate, UsageAccessGate, UsageEngine, UsageSource,
};
use domain::EngineError;
use serde_json::{json, Value};
use tracing::{info, info_span, warn};

use crate::commands::Command;
use crate::config::{Config, ReportTimeZone};
use crate::error::ReportError;
use crate::fixtures::{load_package_catalog, load_usage_source};

/// Build the access gate described by the configuration.
pub fn create_gate(config: &Config) -> StaticAccessGate {
    let gate = StaticAccessGate::new(config.access.mode);
    if config.access.settings_available {
        gate
    } else {
        gate.without_settings()
    }
}

/// Run `command` and return its JSON result.
///
/// Usage commands are refused unless the access gate reports a grant.
pub fn run(config: &Config, command: &Command, clock: impl Clock + 'static) -> Result<Value, ReportError> {
    let span = info_span!("report", command = command.name());
    let _guard = span.enter();

    let gate = create_gate(config);

    match command {
        Command::Access => {
            return Ok(json!({
                "granted": gate.is_granted(),
                "mode": gate.mode(),
            }));
        }
        Command::OpenSettings => {
            gate.open_access_settings()?;
            return Ok(Value::Null);
        }
        Command::Unsupported(_) => {
            return Err(ReportError::NotImplemented(command.name().to_string()));
        }
        _ => {}
    }

    if command.requires_access() && !gate.is_granted() {
        warn!(mode = %gate.mode(), "Usage access not granted");
        return Err(ReportError::AccessDenied(gate.mode()));
    }

    let options = config.engine.options()?;
    let time_zone = config.engine.time_zone()?;
    let source = load_usage_source(&config.source.intervals_path)?;
    let catalog = load_package_catalog(&config.source.catalog_path, config.source.legacy_platform)?;
    let engine = UsageEngine::new(source, catalog)
        .with_clock(clock)
        .with_options(options);

    info!("Running report command");
    match time_zone {
        ReportTimeZone::Local => execute(&engine, command),
        ReportTimeZone::Fixed(offset) => execute(&engine.with_time_zone(offset), command),
    }
}

fn execute<S, P, Tz>(engine: &UsageEngine<S, P, Tz>, command: &Command) -> Result<Value, ReportError>
where
    S: UsageSource,
    P: PackageCatalog,
    Tz: TimeZone,
{
    let value = match command {
        Command::Recent => serde_json::to_value(engine.recency_snapshot()?)?,
        Command::Monthly { package } => {
            let package = package.as_deref().ok_or_else(|| {
                EngineError::InvalidArgument("packageName is required".to_string())
            })?;
            serde_json::to_value(engine.monthly_series(package)?)?
        }
        Command::Weekly => serde_json::to_value(engine.weekly_matrix()?)?,
        Command::Access | Command::OpenSettings | Command::Unsupported(_) => {
            return Err(ReportError::NotImplemented(command.name().to_string()));
        }
    };
    Ok(value)
}
