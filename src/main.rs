//! redfish-temps entry point: CLI dispatch, config resolution, JSON output.

mod app;
mod config;
mod redfish;
mod thermal;

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

use app::cli::{Args, HELP_TEXT};
use app::logging::{init_tracing, level_filter};
use config::persistence::{load_config, merge_connection, resolve_connection, resolve_log_level, save_config};
use config::types::ToolConfig;
use redfish::HttpsRedfishClient;
use thermal::error::FetchError;
use thermal::fetch_temperatures;
use thermal::types::Reading;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.kind() == clap::error::ErrorKind::DisplayHelp {
                print!("{}", HELP_TEXT);
                return ExitCode::SUCCESS;
            }
            if err.kind() == clap::error::ErrorKind::DisplayVersion {
                println!("redfish-temps {} ({})", env!("CARGO_PKG_VERSION"), std::env::consts::ARCH);
                return ExitCode::SUCCESS;
            }

            eprintln!("{}", err);
            eprintln!("\nFor more information, try '--help'.");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let (config, config_source) = load_config(args.config.as_deref()).await?;

    // Priority: 1. --log-level flag, 2. LOG_LEVEL env, 3. config file, 4. default (warn)
    let log_level = resolve_log_level(&args, std::env::var("LOG_LEVEL").ok(), &config);
    let filter = level_filter(&log_level).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}'. Using WARN. Valid levels: TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL",
            log_level
        );
        "warn"
    });
    init_tracing(filter);

    match &config_source {
        Some(path) => info!("Loaded configuration from: {:?}", path),
        None => debug!("No config file found, using command-line values only"),
    }

    let settings = merge_connection(&args, &config.connection)?;

    if let Some(path) = args.write_config.as_deref() {
        let snapshot = ToolConfig { connection: settings, logging: config.logging.clone() };
        save_config(&snapshot, Path::new(path)).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let params = resolve_connection(&settings)?;
    debug!("Resolved connection: {:?}", params);

    let client = HttpsRedfishClient::new(&params).await?;

    match render_outcome(fetch_temperatures(&client).await)? {
        Output::Stdout(json) => {
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Output::Stderr(message) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// What the process prints, and where. Stderr output means exit code 1.
#[derive(Debug, PartialEq)]
enum Output {
    Stdout(String),
    Stderr(String),
}

/// Readings become a JSON array with sorted keys and 2-space indent; a failure
/// becomes its message.
fn render_outcome(outcome: Result<Vec<Reading>, FetchError>) -> Result<Output> {
    match outcome {
        Ok(readings) => Ok(Output::Stdout(serde_json::to_string_pretty(&readings)?)),
        Err(e) => Ok(Output::Stderr(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn readings_render_as_sorted_indented_array() {
        let readings = vec![Reading::from_resource(&json!({
            "@odata.id": "/redfish/v1/Chassis/1/Thermal#/Temperatures/0",
            "Status": {"State": "Enabled", "Health": "OK"},
            "ReadingCelsius": 45,
            "Name": "CPU1"
        }))];

        let expected = r#"[
  {
    "Name": "CPU1",
    "ReadingCelsius": 45,
    "Status": {
      "Health": "OK",
      "State": "Enabled"
    }
  }
]"#;
        assert_eq!(render_outcome(Ok(readings)).unwrap(), Output::Stdout(expected.to_string()));
    }

    #[test]
    fn no_readings_render_as_empty_array() {
        assert_eq!(render_outcome(Ok(Vec::new())).unwrap(), Output::Stdout("[]".to_string()));
    }

    #[test]
    fn failure_goes_to_stderr() {
        let failure = FetchError::Http {
            url: "/redfish/v1/Chassis".to_string(),
            status: 404,
            message: "Resource not found".to_string(),
        };

        assert_eq!(
            render_outcome(Err(failure)).unwrap(),
            Output::Stderr("Url '/redfish/v1/Chassis' response Error code 404\nerror_message: Resource not found".to_string())
        );
    }
}
