use std::{env, fs::File, process::ExitCode};

use clap::Parser;
use serde_json::{from_reader, Value};
use tracing_subscriber::EnvFilter;

mod constants;
mod error;
mod filter;
mod handlers;
mod matching;
mod processes;
mod resolver;
mod trace;
mod utilities;

use constants::{Config, CONFIG_NAME};
use error::HelperError;
use filter::FilterPayload;

/// Process detection, liveness and termination helper for a game library
/// launcher. Prints exactly one JSON object on stdout.
#[derive(Parser)]
#[command(name = "LauncherProcHelper", version)]
struct Cli {
    /// Action to run: find | check | alive | kill | trace
    action: Option<String>,

    /// JSON filter payload; malformed input degrades to an empty filter
    payload: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config();
    let payload = FilterPayload::parse(cli.payload.as_deref().unwrap_or("{}"));

    let action = cli.action.as_deref().unwrap_or_default();
    let value = match dispatch(action, &payload, &config) {
        Ok(value) => value,
        Err(error) => error.to_json(),
    };
    println!("{}", value);

    if value.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn dispatch(action: &str, payload: &FilterPayload, config: &Config) -> Result<Value, HelperError> {
    match action.trim().to_lowercase().as_str() {
        "find" => handlers::find::handle_find(payload),
        "check" | "alive" => handlers::check::handle_check(payload),
        "kill" => handlers::kill::handle_kill(payload, config),
        "trace" => handlers::trace::handle_trace(payload, config),
        _ => Err(HelperError::UnknownAction),
    }
}

fn load_config() -> Config {
    let Ok(mut path) = env::current_exe() else {
        return Config::default();
    };
    path.pop(); // Directory only, not the executable itself
    path.push(CONFIG_NAME);

    match File::open(path) {
        Ok(file) => from_reader(file).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_is_structured() {
        let result = dispatch("explode", &FilterPayload::default(), &Config::default());
        assert!(matches!(result, Err(HelperError::UnknownAction)));
    }

    #[test]
    fn action_is_case_insensitive() {
        let value = dispatch(" FIND ", &FilterPayload::default(), &Config::default()).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn alive_aliases_check() {
        let payload = FilterPayload::parse(r#"{"pids":[999999999]}"#);
        let config = Config::default();
        let checked = dispatch("check", &payload, &config).unwrap();
        let alive = dispatch("alive", &payload, &config).unwrap();
        assert_eq!(checked["running"], alive["running"]);
    }
}
