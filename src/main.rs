use std::fs::read_to_string;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use carbon_footprint::config::{Config, ConfigError};
use carbon_footprint::{
    compute_total, ActivityInput, DataError, EmissionFactorTable, FactorSource, FootprintError,
};

const EXIT_DATA: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;

/// Estimate a carbon footprint breakdown from an activity record.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Activity record as JSON; read from stdin when omitted.
    input: Option<PathBuf>,

    /// Emission factor JSON file, overriding FOOTPRINT_FACTORS_PATH.
    #[arg(long)]
    factors: Option<PathBuf>,

    /// Pretty-print the breakdown.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("cannot read activity record: {0}")]
    Unreadable(#[from] io::Error),
    #[error("malformed activity record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Footprint(#[from] FootprintError),
    #[error("cannot render breakdown: {0}")]
    Render(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Unreadable(_) | CliError::Malformed(_) => EXIT_INVALID_INPUT,
            CliError::Footprint(e) if e.is_invalid_input() => EXIT_INVALID_INPUT,
            CliError::Config(_)
            | CliError::Data(_)
            | CliError::Footprint(_)
            | CliError::Render(_) => EXIT_DATA,
        }
    }
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = Config::load()
        .map_err(CliError::from)
        .and_then(|config| run(args, config, io::stdin()));

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load the table, read one record from the input file or `stdin`, and
/// render its breakdown as JSON.
fn run(args: Args, config: Config, stdin: impl Read) -> Result<String, CliError> {
    let source = args.factors.map_or(config.factor_source, FactorSource::File);
    let table = EmissionFactorTable::load(&source)?;

    let input = read_input(args.input.as_ref(), stdin)?;
    let breakdown = compute_total(&input, &table)?;
    info!(total = breakdown.total, "Footprint computed");

    let rendered = if args.pretty || config.pretty {
        serde_json::to_string_pretty(&breakdown)
    } else {
        serde_json::to_string(&breakdown)
    };
    rendered.map_err(CliError::Render)
}

fn read_input(path: Option<&PathBuf>, mut stdin: impl Read) -> Result<ActivityInput, CliError> {
    let raw = match path {
        Some(path) => read_to_string(path)?,
        None => {
            let mut raw = String::new();
            stdin.read_to_string(&mut raw)?;
            raw
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const HOUSEHOLD: &str = r#"{"electricity_kwh": 100, "cooking_fuel": "lpg",
        "cooking_amount": 5, "transport_km": 50, "mode": "bus", "food_type": "vegetarian",
        "food_waste_kg": 2, "waste_kg": 10, "is_segregated": true}"#;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("footprint").chain(argv.iter().copied())).unwrap()
    }

    fn embedded() -> Config {
        Config {
            factor_source: FactorSource::Embedded,
            pretty: false,
        }
    }

    #[test]
    fn prints_breakdown_for_stdin_record() {
        let json = run(args(&[]), embedded(), HOUSEHOLD.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 223.5);
    }

    #[test]
    fn unparsable_record_exits_as_invalid_input() {
        let err = run(args(&[]), embedded(), "{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Malformed(_)));
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn missing_record_file_exits_as_invalid_input() {
        let err = run(args(&["/nonexistent/activity.json"]), embedded(), io::empty()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn unknown_fuel_exits_as_invalid_input() {
        let record = file_with(r#"{"cooking_fuel": "coal"}"#);
        let path = record.path().to_str().unwrap();
        let err = run(args(&[path]), embedded(), io::empty()).unwrap_err();
        assert!(matches!(err, CliError::Footprint(_)));
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn unreadable_factors_exit_as_data_error() {
        let config = Config {
            factor_source: FactorSource::File(PathBuf::from("/nonexistent/factors.json")),
            pretty: false,
        };
        let err = run(args(&[]), config, HOUSEHOLD.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Data(DataError::Unreadable { .. })));
        assert_eq!(err.exit_code(), EXIT_DATA);
    }

    #[test]
    fn incomplete_factors_exit_as_data_error() {
        let factors = file_with(
            r#"{
                "energy": {"electricity": 0.8, "renewable": 0.1},
                "cooking": {"lpg": 3.0},
                "transport": {"bus": 0.1},
                "food": {"diet_baseline": {"vegetarian": 1400.0}, "waste": 2.0}
            }"#,
        );
        let path = factors.path().to_str().unwrap();
        let err = run(args(&["--factors", path]), embedded(), HOUSEHOLD.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Footprint(FootprintError::Data(_))));
        assert_eq!(err.exit_code(), EXIT_DATA);
    }

    #[test]
    fn factors_flag_overrides_configured_path() {
        let factors = file_with(
            r#"{
                "energy": {"electricity": 1.0, "renewable": 0.0},
                "cooking": {"lpg": 0.0},
                "transport": {"bus": 0.0},
                "food": {"diet_baseline": {"vegetarian": 0.0}, "waste": 0.0},
                "waste": {"landfill": 0.0, "segregated": 0.0}
            }"#,
        );
        let config = Config {
            factor_source: FactorSource::File(PathBuf::from("/nonexistent/factors.json")),
            pretty: true,
        };
        let path = factors.path().to_str().unwrap();
        let json = run(args(&["--factors", path]), config, HOUSEHOLD.as_bytes()).unwrap();
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["electricity"], 100.0);
        assert_eq!(value["total"], 100.0);
    }

    #[test]
    fn config_errors_exit_as_data_error() {
        let err = CliError::from(ConfigError::InvalidValue {
            key: "FOOTPRINT_PRETTY",
            value: "sometimes".to_string(),
            reason: "provided string was not `true` or `false`".to_string(),
        });
        assert_eq!(err.exit_code(), EXIT_DATA);
    }
}
