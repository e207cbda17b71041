use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Parser;

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("screening_core_main_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn text(out: &CliOutcome) -> String {
    String::from_utf8(out.body.clone()).unwrap()
}

fn empty_registry() -> ModelRegistry {
    ModelRegistry::new(ModelPaths::under(Path::new(
        "/nonexistent/screening-core/models",
    )))
}

#[test]
fn test_parse_risk_subcommand() {
    let cli = Cli::try_parse_from([
        "screening-core",
        "-vv",
        "--model-dir",
        "/opt/models",
        "risk",
        "{\"communication\": 2}",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.model_dir, Some(PathBuf::from("/opt/models")));
    match cli.command {
        Command::Risk { input } => assert_eq!(input.as_deref(), Some("{\"communication\": 2}")),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_input_is_optional() {
    let cli = Cli::try_parse_from(["screening-core", "progress"]).unwrap();
    match cli.command {
        Command::Progress { input } => assert!(input.is_none()),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_worker_flags() {
    let cli = Cli::try_parse_from([
        "screening-core",
        "worker",
        "--remove-input",
        "--entrypoint",
        "/srv/predict_mri.py",
        "--interpreter",
        "python3.11",
        "/tmp/scan.nii",
    ])
    .unwrap();
    match cli.command {
        Command::Worker {
            input,
            entrypoint,
            interpreter,
            remove_input,
        } => {
            assert_eq!(input, Some(PathBuf::from("/tmp/scan.nii")));
            assert_eq!(entrypoint, Some(PathBuf::from("/srv/predict_mri.py")));
            assert_eq!(interpreter, "python3.11");
            assert!(remove_input);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["screening-core", "train"]).is_err());
}

#[test]
fn test_heuristic_missing_input() {
    let out = run_heuristic(None);
    assert_eq!(out.exit_code, 1);
    assert_eq!(
        text(&out),
        "{\"error\":\"No input provided. Expected JSON string with features.\",\
         \"risk\":\"Unknown\",\"probability\":{}}\n"
    );
}

#[test]
fn test_heuristic_invalid_json() {
    let out = run_heuristic(Some("{not json"));
    assert_eq!(out.exit_code, 1);
    assert!(text(&out).starts_with("{\"error\":\"Invalid JSON input: "));
    assert!(text(&out).ends_with("\",\"risk\":\"Unknown\",\"probability\":{}}\n"));
}

#[test]
fn test_heuristic_valid_input() {
    let out = run_heuristic(Some("{}"));
    assert_eq!(out.exit_code, 0);
    let parsed: serde_json::Value = serde_json::from_str(text(&out).trim_end()).unwrap();
    assert!(parsed.get("error").is_none());
    assert!(parsed["probability"].is_object());
}

#[test]
fn test_risk_without_model_matches_heuristic() {
    let registry = empty_registry();
    let input = "{\"communication\": 1, \"eye_contact\": 1, \"social_interaction\": 1, \
                 \"repetitive_actions\": 5, \"sensory_sensitivity\": 5, \"speech_clarity\": 1}";
    let risk = run_risk(Some(input), &registry);
    let heuristic = run_heuristic(Some(input));
    assert_eq!(risk, heuristic);
    assert_eq!(risk.exit_code, 0);
}

#[test]
fn test_risk_missing_input() {
    let out = run_risk(None, &empty_registry());
    assert_eq!(out.exit_code, 1);
    assert!(text(&out).contains("\"risk\":\"Unknown\""));
}

const PROGRESS_REQUEST: &str = "{\"week\": 4, \"communication\": 3, \"social_skills\": 3, \
     \"behavior_control\": 3, \"attention_span\": 3, \"sensory_response\": 3, \
     \"current_score\": 40}";

#[test]
fn test_progress_without_model_names_missing_artifact() {
    let out = run_progress(Some(PROGRESS_REQUEST), &empty_registry());
    assert_eq!(out.exit_code, 1);
    let parsed: serde_json::Value = serde_json::from_str(text(&out).trim_end()).unwrap();
    let message = parsed["error"].as_str().unwrap();
    assert!(message.starts_with("artifact not found: "));
    assert!(message.ends_with(crate::config::PROGRESS_MODEL_FILE));
}

#[test]
fn test_progress_rejects_non_finite_score() {
    let request = PROGRESS_REQUEST.replace("40", "\"inf\"");
    let out = run_progress(Some(request.as_str()), &empty_registry());
    assert_eq!(out.exit_code, 1);
    assert_eq!(
        text(&out),
        "{\"error\":\"field `current_score` must be numeric\"}\n"
    );
}

#[test]
fn test_survey_without_model_names_missing_artifact() {
    let out = run_survey(Some("{}"), &empty_registry());
    assert_eq!(out.exit_code, 1);
    let parsed: serde_json::Value = serde_json::from_str(text(&out).trim_end()).unwrap();
    let message = parsed["error"].as_str().unwrap();
    assert!(message.ends_with(crate::config::SURVEY_MODEL_FILE));
}

#[test]
fn test_progress_missing_input() {
    assert_eq!(
        text(&run_progress(None, &empty_registry())),
        "{\"error\":\"No input provided\"}\n"
    );
}

#[test]
fn test_worker_missing_path_argument() {
    let out = run_worker(None, WorkerSpec::new("sh", "/nonexistent/predict.py"), false);
    assert_eq!(out.exit_code, 1);
    assert_eq!(text(&out), "{\"error\":\"Missing file path argument\"}\n");
}

#[test]
fn test_worker_remove_input_on_failure() {
    let dir = make_temp_dir();
    let input = dir.join("scan.nii");
    fs::write(&input, b"scan").unwrap();

    let worker = WorkerSpec::new("sh", dir.join("absent.py"));
    let out = run_worker(Some(input.clone()), worker, true);
    assert_eq!(out.exit_code, 1);
    assert!(text(&out).contains("Prediction script not found"));
    assert!(!input.exists());
}

#[test]
fn test_worker_keeps_input_without_flag() {
    let dir = make_temp_dir();
    let input = dir.join("scan.nii");
    fs::write(&input, b"scan").unwrap();

    let worker = WorkerSpec::new("sh", dir.join("absent.py"));
    run_worker(Some(input.clone()), worker, false);
    assert!(input.exists());
}

#[test]
fn test_first_line() {
    assert_eq!(
        first_line("error: unrecognized subcommand 'train'\n\nUsage: screening-core"),
        "unrecognized subcommand 'train'"
    );
    assert_eq!(first_line(""), "");
}
