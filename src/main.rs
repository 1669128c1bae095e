use std::process::ExitCode;
use std::sync::Arc;

use scholar_irt::config::CliConfig;
use scholar_irt::logging::init_tracing;
use scholar_irt::simulation::{self, SimulatedLearner, SimulationReport};
use scholar_irt::{CatEngine, InMemorySessionRepository, ItemBank, QuizService};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = CliConfig::from_env();
    let _log_guard = match init_tracing(&config.log_level, config.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialise logging: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize report");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            tracing::error!(error = %err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> scholar_irt::Result<SimulationReport> {
    let engine = CatEngine::new(config.engine)?;

    let bank = match &config.bank_path {
        Some(path) => ItemBank::from_json_file(path)?,
        None => ItemBank::demo(),
    };
    tracing::info!(
        items = bank.len(),
        true_theta = config.true_theta,
        seed = config.seed,
        "starting adaptive quiz simulation"
    );

    let repository = Arc::new(InMemorySessionRepository::new());
    let quiz = QuizService::new(engine, bank, Arc::clone(&repository));
    let mut learner = SimulatedLearner::new(config.true_theta, config.seed);

    let report = simulation::run(&quiz, "simulated-learner", &mut learner, config.max_items)?;
    tracing::info!(
        final_theta = report.final_theta,
        standard_error = report.standard_error,
        answered = report.steps.len(),
        "simulation finished"
    );
    Ok(report)
}
