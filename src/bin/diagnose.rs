//! Command-line front end for one-off diagnosis runs.
//!
//! Usage:
//!   diagnose [--model FILE] [--vitals JSON] "symptom description"
//!   echo "symptom description" | diagnose
//!
//! Prints the full result payload as pretty JSON on stdout.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use differo::{DiagnosticEngine, EngineConfig, VitalSigns};

struct Args {
    model: Option<PathBuf>,
    vitals: Option<VitalSigns>,
    text: String,
}

fn parse_args() -> Result<Args, String> {
    let mut model = None;
    let mut vitals = None;
    let mut words = Vec::new();

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--model" => {
                let path = iter.next().ok_or("--model requires a file path")?;
                model = Some(PathBuf::from(path));
            }
            "--vitals" => {
                let json = iter.next().ok_or("--vitals requires a JSON object")?;
                let parsed: VitalSigns = serde_json::from_str(&json)
                    .map_err(|e| format!("invalid vitals JSON: {e}"))?;
                vitals = Some(parsed);
            }
            "--help" | "-h" => {
                return Err("usage: diagnose [--model FILE] [--vitals JSON] TEXT".to_string());
            }
            other => words.push(other.to_string()),
        }
    }

    let mut text = words.join(" ");
    if text.is_empty() {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
    }

    Ok(Args {
        model,
        vitals,
        text,
    })
}

fn main() -> ExitCode {
    differo::init_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let engine = match &args.model {
        Some(path) => match DiagnosticEngine::from_model_file(path, EngineConfig::default()) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("failed to load model {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => DiagnosticEngine::new(),
    };

    let result = engine.diagnose(&args.text, args.vitals.as_ref());

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}
