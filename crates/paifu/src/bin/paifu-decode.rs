//! Decodes a raw `fetchGameRecord` response and prints its game record.
//!
//! ```text
//! paifu-decode [--config paifu.json] [--no-validate] <response-file>
//! paifu-decode --inspect <message-file>
//! ```
//!
//! With `--inspect` any captured message is dumped field by field
//! instead, including the decoded action of an `.lq.ActionPrototype`
//! notification.

use std::path::PathBuf;
use std::process::ExitCode;

use paifu::{Config, PaifuError};

struct Args {
    config: Option<PathBuf>,
    validate: bool,
    inspect: bool,
    input: PathBuf,
}

const USAGE: &str =
    "usage: paifu-decode [--config <path>] [--no-validate] [--inspect] <message-file>";

fn parse_args() -> Result<Args, String> {
    let mut config = None;
    let mut validate = true;
    let mut inspect = false;
    let mut input = None;
    let mut args = std::env::args_os().skip(1);
    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--config") => {
                config = Some(PathBuf::from(args.next().ok_or("--config needs a path")?));
            }
            Some("--no-validate") => validate = false,
            Some("--inspect") => inspect = true,
            Some("-h" | "--help") => return Err(USAGE.into()),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {}", arg.to_string_lossy())),
        }
    }
    let input = input.ok_or_else(|| USAGE.to_owned())?;
    Ok(Args {
        config,
        validate,
        inspect,
        input,
    })
}

fn decode(args: &Args, config: &Config) -> Result<String, PaifuError> {
    let message = std::fs::read(&args.input).map_err(|source| PaifuError::ReadFile {
        path: args.input.clone(),
        source,
    })?;
    if args.inspect {
        let dump = paifu::protocol::inspect::inspect_frame(&message)?;
        return serde_json::to_string_pretty(&dump).map_err(PaifuError::Serialize);
    }
    let validate = args.validate && config.archive.validate;
    let game = paifu::record::build_game_record(&message, validate)?;
    let json = game.to_json().map_err(PaifuError::Serialize)?;
    serde_json::to_string_pretty(&json).map_err(PaifuError::Serialize)
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let config = match &args.config {
        Some(path) => Config::from_path(path),
        None => Ok(Config::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = paifu::logging::try_init(&config.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match decode(&args, &config) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(input = %args.input.display(), error = %e, "Abort with an unhandled error.");
            ExitCode::FAILURE
        }
    }
}
