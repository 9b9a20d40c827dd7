use std::io::Read;

use clap::Parser;

use morph_api::descriptor::TypeDescriptor;
use morph_api::value::Value;
use morph_config_hcl::HclParser;
use morph_engine::bootstrap::Engine;
use morph_engine::config::{MorphConfig, TomlParser};
use morph_engine::error::EngineError;

#[derive(Parser)]
#[command(name = "morph", about = "Convert a JSON value to a target type")]
struct Cli {
    /// Target type, e.g. `int`, `Integer`, `BigDecimal`, `long[][]`.
    #[arg(long, short)]
    target: TypeDescriptor,

    /// Path to a TOML or HCL configuration file.
    #[arg(long, env = "MORPH_CONFIG")]
    config: Option<String>,

    /// JSON value to convert; read from stdin when omitted.
    value: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, morphs_to = %cli.target, "conversion failed");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<serde_json::Value, EngineError> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path, "loading configuration");
            MorphConfig::load_with(path, &[&TomlParser, &HclParser])?
        }
        None => MorphConfig::default(),
    };
    let engine = Engine::bootstrap(config)?;

    let input = match &cli.value {
        Some(value) => value.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let value = Value::from_json_str(&input)
        .map_err(|e| EngineError::from(e).with_context("input"))?;

    tracing::debug!(morphs_to = %cli.target, source = %value.type_of(), "converting");
    let converted = engine.convert(&cli.target, &value)?;
    Ok(converted.to_json())
}
