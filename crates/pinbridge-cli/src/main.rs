//! pinbridge command-line driver.
//!
//! Builds one board from a JSON configuration file, runs a single pin command
//! against it and closes it.
//!
//! ```sh
//! pinbridge-cli --config board.json set 2 high
//! pinbridge-cli --config board.json set-pwm 5 0.25
//! RUST_LOG=debug pinbridge-cli --config board.json get 2
//! ```
//!
//! Bluetooth LE boards need the `ble` feature.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pinbridge_board::Board;
use pinbridge_core::BoardConfig;
use pinbridge_hardware::AnyBleAdapter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Drive the pins of a remote board over HTTP or Bluetooth LE
#[derive(Parser, Debug)]
#[command(name = "pinbridge-cli", version, long_about = None)]
struct Args {
    /// Path to the board configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Board name used in logs and error messages
    #[arg(short, long, default_value = "board")]
    name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Read a pin level
    Get { pin: String },

    /// Drive a pin high or low
    Set { pin: String, level: Level },

    /// Read the raw PWM state of a pin (0-100)
    Pwm { pin: String },

    /// Set the PWM duty cycle of a pin (0.0-1.0)
    SetPwm { pin: String, duty: f64 },

    /// Read an analog pin
    Analog { pin: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    High,
    Low,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config(&args.config)?;
    let adapter = ble_adapter(&config).await?;
    let board = Board::from_config(args.name.as_str(), &config, adapter)
        .await
        .with_context(|| format!("failed to set up board '{}'", args.name))?;
    info!(board = %board.name(), backend = %board.backend_kind(), "Board ready");

    let outcome = run(&board, &args.command).await;
    board.close();
    outcome
}

fn load_config(path: &Path) -> Result<BoardConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: BoardConfig = serde_json::from_str(&raw).with_context(|| {
        format!(
            "{}: expected {{\"url\": ...}} or {{\"bt_server_name\": ...}}",
            path.display()
        )
    })?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}

#[cfg(feature = "ble")]
async fn ble_adapter(config: &BoardConfig) -> Result<Option<AnyBleAdapter>> {
    match config {
        BoardConfig::Ble(_) => {
            let adapter = pinbridge_hardware::BtleplugAdapter::first().await?;
            Ok(Some(adapter.into()))
        }
        BoardConfig::Http(_) => Ok(None),
    }
}

#[cfg(not(feature = "ble"))]
async fn ble_adapter(config: &BoardConfig) -> Result<Option<AnyBleAdapter>> {
    if matches!(config, BoardConfig::Ble(_)) {
        anyhow::bail!("this build has no Bluetooth support; rebuild with `--features ble`");
    }
    Ok(None)
}

async fn run(board: &Board, command: &Command) -> Result<()> {
    match command {
        Command::Get { pin } => {
            let high = board.gpio_pin_by_name(pin).get().await?;
            println!("{}", if high { "high" } else { "low" });
        }
        Command::Set { pin, level } => {
            board
                .gpio_pin_by_name(pin)
                .set(*level == Level::High)
                .await?;
            println!("ok");
        }
        Command::Pwm { pin } => {
            let state = board.gpio_pin_by_name(pin).pwm().await?;
            println!("{state}");
        }
        Command::SetPwm { pin, duty } => {
            board.gpio_pin_by_name(pin).set_pwm(*duty).await?;
            println!("ok");
        }
        Command::Analog { pin } => {
            let reading = board.analog_by_name(pin)?.read().await?;
            println!("{}", reading.value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let args =
            Args::try_parse_from(["pinbridge-cli", "--config", "b.json", "set", "2", "high"])
                .unwrap();
        assert_eq!(args.name, "board");
        assert_eq!(
            args.command,
            Command::Set {
                pin: "2".to_string(),
                level: Level::High
            }
        );
    }

    #[test]
    fn test_parse_set_pwm() {
        let args = Args::try_parse_from([
            "pinbridge-cli",
            "-c",
            "b.json",
            "--name",
            "garage",
            "set-pwm",
            "5",
            "0.25",
        ])
        .unwrap();
        assert_eq!(args.name, "garage");
        assert_eq!(
            args.command,
            Command::SetPwm {
                pin: "5".to_string(),
                duty: 0.25
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        let result =
            Args::try_parse_from(["pinbridge-cli", "--config", "b.json", "set", "2", "on"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/pinbridge.json"));
        assert!(result.is_err());
    }
}
