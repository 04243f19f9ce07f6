use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use massing_studio_lib::advisor::AdvisorClient;
use massing_studio_lib::command::execute_json_batch;
use massing_studio_lib::export::feasibility_report;
use massing_studio_lib::state::{AppSettings, AppState, ChatMessage, ProjectStore};

const ADVISOR_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Massing Studio - parcel massing and feasibility from the command line
#[derive(Parser, Debug)]
#[command(name = "massing-studio", version, long_about = None)]
struct Args {
    /// Project JSON to open (defaults to the autosave when enabled)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// JSON array of commands to run against the project
    #[arg(short, long)]
    commands: Option<PathBuf>,

    /// Question for the advisor about the resulting project
    #[arg(long)]
    ask: Option<String>,

    /// Write the resulting project to this path
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Override the currency for this run
    #[arg(long)]
    currency: Option<String>,

    /// Skip printing the feasibility report
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "massing_studio=info,massing_studio_lib=info".into()),
        )
        .init();

    let mut settings = AppSettings::load();
    if let Some(code) = &args.currency {
        settings.currency = code.clone();
    }
    let mut state = AppState::new(settings);

    if let Some(path) = &args.project {
        let metrics = state.project.load_from_path(path)?;
        tracing::info!(
            "Loaded project from {} ({} blocks, GFA {:.0} m²)",
            path.display(),
            state.project.blocks().len(),
            metrics.gfa
        );
    } else if state.settings.autosave {
        if let Some(file) = ProjectStore::load_autosave() {
            state.project.replace_project(file);
            tracing::info!("Restored autosave ({} blocks)", state.project.blocks().len());
        }
    }
    if let Some(code) = &args.currency {
        state.project.set_currency(code.clone());
    }

    if let Some(path) = &args.commands {
        let json = std::fs::read_to_string(path)?;
        let responses = execute_json_batch(&mut state, &json)?;
        for response in &responses {
            if !response.success {
                tracing::warn!("command failed: {}", response.error.as_deref().unwrap_or(""));
            }
            println!("{}", serde_json::to_string(response)?);
        }
    }

    if let Some(question) = &args.ask {
        ask_advisor(&mut state, question)?;
    }

    if !args.quiet {
        println!(
            "{}",
            feasibility_report(&state.project.snapshot(), state.settings.display.precision)
        );
    }

    if let Some(path) = &args.save {
        state.project.save_to_path(path)?;
        tracing::info!("Saved project to {}", path.display());
    }

    if state.settings.autosave {
        state.project.autosave();
    }

    Ok(())
}

/// Ask the advisor one question about the current project and print the answer
fn ask_advisor(state: &mut AppState, question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = AdvisorClient::new(state.settings.advisor.endpoint.clone());
    let runtime = tokio::runtime::Runtime::new()?;

    state.advisor.input = question.to_string();
    let snapshot = state.project.snapshot();
    if !state.advisor.dispatch(runtime.handle(), &client, snapshot) {
        return Ok(());
    }
    while !state.advisor.poll_responses() {
        std::thread::sleep(ADVISOR_POLL_INTERVAL);
    }

    if let Some(ChatMessage { text, is_error, .. }) = state.advisor.messages.last() {
        if *is_error {
            eprintln!("Advisor error: {text}");
        } else {
            println!("{text}\n");
        }
    }
    Ok(())
}
