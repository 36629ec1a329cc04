//! CLI command implementations
//!
//! Each command returns the JSON written as `data`. Commands that talk to
//! the backend run on a tokio runtime owned by the command.

use std::future::Future;
use std::path::Path;

use serde_json::{json, Value};

use crate::client::{ApiClient, TimelineCursor};
use crate::config::ConsoleConfig;
use crate::history::{self, ChangeRecord, HistoryError, Snapshot};
use crate::observability::{log_event, Event, ObservationScope};
use crate::stats::{self, ActivityReport};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Parse CLI arguments and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run one command and write its response.
///
/// Failures are written as an error response and also returned.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Replay { file, step } => replay(&file, step),
        Command::Timeline {
            config,
            resource_name,
            resource_id,
            step,
        } => timeline(&config, &resource_name, &resource_id, step),
        Command::Diff { before, after } => diff(&before, &after),
        Command::Request { config, request_id } => request(&config, &request_id),
        Command::Stats { config } => activity(&config),
    };

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            log_event(
                Event::CommandFailed,
                &[("code", e.code_str()), ("message", e.message())],
            );
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Reconstruct a step from a saved timeline
pub fn replay(file: &Path, step: Option<usize>) -> CliResult<Value> {
    let records = parse_records(read_json_file(file)?)?;
    let step = resolve_step(step, records.len())?;

    let initial = history::initial_snapshot(&records)?;
    let state = history::reconstruct(initial.as_ref(), &records, step)?;

    step_view(step, records.len(), &records[step], state.as_ref())
}

/// Diff two JSON documents
pub fn diff(before: &Path, after: &Path) -> CliResult<Value> {
    let before = read_json_file(before)?;
    let after = read_json_file(after)?;

    let changes = Value::Object(history::compare(&before, &after));
    let formatted = history::format_changes(&changes);

    Ok(json!({
        "changes": changes,
        "formatted": formatted,
    }))
}

fn timeline(
    config_path: &Path,
    resource_name: &str,
    resource_id: &str,
    step: Option<usize>,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let client = ApiClient::new(&config)?;

    let scope = ObservationScope::with_fields(
        "TIMELINE",
        &[("resource_name", resource_name), ("resource_id", resource_id)],
    );
    let result = block_on(async {
        let source = client.timeline(resource_name, resource_id);
        let mut cursor = TimelineCursor::open(source, config.page_size).await?;
        let step = resolve_step(step, cursor.total())?;
        cursor.look_at(step).await?;
        Ok::<_, CliError>(cursor)
    })
    .and_then(|result| result);

    let cursor = match result {
        Ok(cursor) => cursor,
        Err(e) => {
            scope.fail(e.message());
            return Err(e);
        }
    };

    let step = cursor.active_step();
    let event = cursor
        .current_event()
        .ok_or(HistoryError::StepOutOfRange {
            step,
            len: cursor.loaded().len(),
        })?;
    let mut view = step_view(step, cursor.total(), event, cursor.current_state())?;
    view["pagination"] = serde_json::to_value(cursor.pagination())?;

    let step_str = step.to_string();
    let loaded = cursor.loaded().len().to_string();
    log_event(
        Event::ReconstructComplete,
        &[("step", step_str.as_str()), ("loaded", loaded.as_str())],
    );
    scope.complete(&[("step", step_str.as_str())]);

    Ok(view)
}

fn request(config_path: &Path, request_id: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let client = ApiClient::new(&config)?;

    let detail = block_on(client.request_log(request_id))??;
    let actions = stats::request_actions(&detail.history_entries);

    let mut view = serde_json::to_value(&detail)?;
    view["actions"] = json!(actions);
    Ok(view)
}

fn activity(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let client = ApiClient::new(&config)?;

    let stats = block_on(client.request_stats())??;
    let report = ActivityReport::build(&stats, &config)?;

    Ok(serde_json::to_value(report)?)
}

/// Read a timeline from a bare array or a backend response envelope
pub fn parse_records(value: Value) -> CliResult<Vec<ChangeRecord>> {
    let records = match value {
        Value::Array(_) => value,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(data @ Value::Array(_)) => data,
            _ => {
                return Err(CliError::invalid_input(
                    "expected a 'data' array of history entries",
                ))
            }
        },
        _ => {
            return Err(CliError::invalid_input(
                "expected an array of history entries",
            ))
        }
    };

    let records: Vec<ChangeRecord> = serde_json::from_value(records)?;
    if records.is_empty() {
        return Err(HistoryError::EmptyTimeline.into());
    }
    Ok(records)
}

/// JSON view of one reconstructed step
pub fn step_view(
    step: usize,
    total: usize,
    event: &ChangeRecord,
    state: Option<&Snapshot>,
) -> CliResult<Value> {
    let changes = event
        .parse_detail()?
        .into_changes()
        .map(Value::Object)
        .unwrap_or(Value::Null);

    Ok(json!({
        "step": step,
        "total": total,
        "event": event,
        "label": event.label(),
        "occurred_at": event.occurred_at(),
        "changes": history::format_changes(&changes),
        "state": state,
    }))
}

fn resolve_step(step: Option<usize>, len: usize) -> CliResult<usize> {
    if len == 0 {
        return Err(HistoryError::EmptyTimeline.into());
    }
    match step {
        Some(step) if step >= len => Err(HistoryError::StepOutOfRange { step, len }.into()),
        Some(step) => Ok(step),
        None => Ok(len - 1),
    }
}

fn load_config(path: &Path) -> CliResult<ConsoleConfig> {
    let config = ConsoleConfig::load(path)?;
    log_event(
        Event::ConfigLoaded,
        &[("api_base_url", config.api_base_url.as_str())],
    );
    Ok(config)
}

fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(rt.block_on(future))
}
