mod config;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod worker;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_INTERPRETER, ModelPaths, resolve_model_dir};
use crate::input::parse_fields;
use crate::input::progress::ProgressInput;
use crate::input::survey::survey_answers;
use crate::model::registry::ModelRegistry;
use crate::pipeline::heuristic::assess_heuristic_fields;
use crate::pipeline::model_risk::predict_risk;
use crate::pipeline::progress::{ProgressError, predict_progress};
use crate::pipeline::survey::{SurveyError, classify_survey};
use crate::report::CliOutcome;
use crate::report::json::{
    NO_INPUT, NO_RISK_INPUT, NO_WORKER_INPUT, render, render_error, render_risk_error,
};
use crate::worker::{OwnedArtifact, WorkerSpec, run_bridge};

#[derive(Debug, Parser)]
#[command(
    name = "screening-core",
    version,
    about = "Screening risk, progress and survey predictions with a JSON result contract",
    long_about = "Each subcommand takes one JSON argument and prints exactly one JSON object \
        to stdout. Diagnostics go to stderr.\n\n\
        EXAMPLES:\n\
        \n  screening-core risk '{\"communication\": 2, \"eye_contact\": 1}'\
        \n  screening-core progress '{\"week\": 4, \"communication\": 3, ...}'\
        \n  screening-core worker --remove-input /tmp/upload/scan.nii.gz"
)]
struct Cli {
    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the model artifacts
    #[arg(long, env = "SCREENING_MODEL_DIR", global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Risk level from behavioral ratings (trained model, heuristic fallback)
    Risk {
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Risk level from the rule-based scorer only
    Heuristic {
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Next-period progress score and trend
    Progress {
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Parent survey classification
    Survey {
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Run the isolated prediction entrypoint on an input artifact
    Worker {
        input: Option<PathBuf>,
        /// Entrypoint script (default: <model-dir>/asd_fmri/predict_mri.py)
        #[arg(long)]
        entrypoint: Option<PathBuf>,
        /// Interpreter used to run the entrypoint
        #[arg(long, env = "SCREENING_PYTHON", default_value = DEFAULT_INTERPRETER)]
        interpreter: OsString,
        /// Delete the input artifact once the bridge is done, whatever the outcome
        #[arg(long)]
        remove_input: bool,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                eprintln!("{err}");
                let code = report::emit(&CliOutcome::failed(render_error(&format!(
                    "Invalid arguments: {}",
                    first_line(&err.to_string())
                ))));
                std::process::exit(code.max(1));
            }
        },
    };
    logging::init(cli.verbose);

    // Drop guards inside `run` fire before the process exits.
    let outcome = run(cli);
    let code = report::emit(&outcome);
    std::process::exit(code);
}

fn run(cli: Cli) -> CliOutcome {
    let model_dir = resolve_model_dir(cli.model_dir.as_deref());
    let registry = ModelRegistry::new(ModelPaths::under(&model_dir));
    tracing::debug!(
        model_dir = %registry.paths().base_dir.display(),
        "registry configured"
    );

    match cli.command {
        Command::Risk { input } => run_risk(input.as_deref(), &registry),
        Command::Heuristic { input } => run_heuristic(input.as_deref()),
        Command::Progress { input } => run_progress(input.as_deref(), &registry),
        Command::Survey { input } => run_survey(input.as_deref(), &registry),
        Command::Worker {
            input,
            entrypoint,
            interpreter,
            remove_input,
        } => {
            let entrypoint =
                entrypoint.unwrap_or_else(|| registry.paths().worker_entrypoint.clone());
            run_worker(input, WorkerSpec::new(interpreter, entrypoint), remove_input)
        }
    }
}

fn run_risk(input: Option<&str>, registry: &ModelRegistry) -> CliOutcome {
    let Some(text) = input else {
        return CliOutcome::failed(render_risk_error(NO_RISK_INPUT));
    };
    match parse_fields(text) {
        Ok(fields) => CliOutcome::ok(render(&predict_risk(&fields, registry))),
        Err(err) => CliOutcome::failed(render_risk_error(&err.to_string())),
    }
}

fn run_heuristic(input: Option<&str>) -> CliOutcome {
    let Some(text) = input else {
        return CliOutcome::failed(render_risk_error(NO_RISK_INPUT));
    };
    match parse_fields(text) {
        Ok(fields) => CliOutcome::ok(render(&assess_heuristic_fields(&fields))),
        Err(err) => CliOutcome::failed(render_risk_error(&err.to_string())),
    }
}

fn run_progress(input: Option<&str>, registry: &ModelRegistry) -> CliOutcome {
    let Some(text) = input else {
        return CliOutcome::failed(render_error(NO_INPUT));
    };
    let result = parse_fields(text)
        .and_then(|fields| ProgressInput::from_fields(&fields))
        .map_err(|err| err.to_string())
        .and_then(|progress_input| {
            let model = registry.progress_model().map_err(ProgressError::from);
            model
                .and_then(|m| predict_progress(&progress_input, m))
                .map_err(|err| err.to_string())
        });
    match result {
        Ok(assessment) => CliOutcome::ok(render(&assessment)),
        Err(message) => {
            tracing::error!(error = %message, "progress prediction failed");
            CliOutcome::failed(render_error(&message))
        }
    }
}

fn run_survey(input: Option<&str>, registry: &ModelRegistry) -> CliOutcome {
    let Some(text) = input else {
        return CliOutcome::failed(render_error(NO_INPUT));
    };
    let result = parse_fields(text)
        .map_err(|err| err.to_string())
        .and_then(|fields| {
            let answers = survey_answers(&fields);
            registry
                .survey_model()
                .map_err(SurveyError::from)
                .and_then(|m| classify_survey(&answers, m))
                .map_err(|err| err.to_string())
        });
    match result {
        Ok(survey) => CliOutcome::ok(render(&survey)),
        Err(message) => {
            tracing::error!(error = %message, "survey classification failed");
            CliOutcome::failed(render_error(&message))
        }
    }
}

fn run_worker(input: Option<PathBuf>, worker: WorkerSpec, remove_input: bool) -> CliOutcome {
    let Some(input) = input else {
        return CliOutcome::failed(render_error(NO_WORKER_INPUT));
    };
    let guard = remove_input.then(|| OwnedArtifact::new(input.clone()));
    let output = run_bridge(&worker, &input);
    drop(guard);
    CliOutcome::new(output.render(), output.exit_code)
}

fn first_line(text: &str) -> &str {
    let line = text.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim()
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
