//! AutoProxy CLI - Bridge interface for the rendering host
//!
//! Commands: templates, classify, validate, plan
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use autoproxy_core::{
    CardAttributes, CardRecord, Face, PipelineError, PlanRequest, ProxyPipeline, Settings,
    TemplateRegistry,
};

#[derive(Parser)]
#[command(name = "autoproxy-cli")]
#[command(about = "AutoProxy CLI - card proxy frame compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to templates directory
    #[arg(short, long, default_value = "templates")]
    templates_dir: PathBuf,

    /// Path to a settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates,

    /// Classify card attributes into frame layers
    Classify {
        /// JSON payload (mana_cost, type_line, oracle_text, colour_identity)
        #[arg(short, long)]
        payload: String,
    },

    /// Validate a card JSON dump
    Validate {
        /// Card JSON file
        #[arg(short, long)]
        card: PathBuf,

        #[arg(short, long, value_enum, default_value_t = FaceArg::Front)]
        face: FaceArg,
    },

    /// Plan a render job for a card JSON dump
    Plan {
        /// Card JSON file
        #[arg(short, long)]
        card: PathBuf,

        #[arg(short, long, value_enum, default_value_t = FaceArg::Front)]
        face: FaceArg,

        /// Artist credit overriding the card data
        #[arg(short, long)]
        artist: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FaceArg {
    Front,
    Back,
}

impl From<FaceArg> for Face {
    fn from(face: FaceArg) -> Self {
        match face {
            FaceArg::Front => Face::Front,
            FaceArg::Back => Face::Back,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AUTOPROXY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to encode output: {}"}}"#, e);
            ExitCode::FAILURE
        }
    }
}

fn fail(error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::FAILURE
}

fn read_card(path: &Path) -> Result<CardRecord, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    CardRecord::from_json(&json).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(e) => return fail(e),
        },
        None => Settings::default(),
    };

    let registry = match TemplateRegistry::load_from_dir(&cli.templates_dir) {
        Ok(r) => r,
        Err(e) => return fail(format!("Failed to load templates: {}", e)),
    };

    let pipeline = ProxyPipeline::new(registry, settings);

    match cli.command {
        Commands::Templates => {
            let templates: Vec<_> = pipeline
                .list_templates()
                .iter()
                .map(|t| serde_json::json!({
                    "id": t.id,
                    "name": t.name,
                    "version": t.template_version,
                    "cardClasses": t.card_classes,
                    "default": t.is_default,
                    "deprecated": t.deprecated,
                }))
                .collect();
            print_json(&templates)
        }

        Commands::Classify { payload } => {
            let card: CardAttributes = match serde_json::from_str(&payload) {
                Ok(c) => c,
                Err(e) => return fail(format!("Invalid payload: {}", e)),
            };
            print_json(&pipeline.classify(&card))
        }

        Commands::Validate { card, face } => {
            let record = match read_card(&card) {
                Ok(r) => r,
                Err(e) => return fail(e),
            };
            let result = pipeline.validate_card(&record, face.into());
            let code = print_json(&result);
            if result.valid {
                code
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Plan { card, face, artist } => {
            let record = match read_card(&card) {
                Ok(r) => r,
                Err(e) => return fail(e),
            };
            let request = PlanRequest {
                record,
                face: face.into(),
                artist,
            };
            match pipeline.plan(&request) {
                Ok(job) => print_json(&serde_json::json!({
                    "success": true,
                    "job": job,
                })),
                Err(e @ PipelineError::ValidationFailed(_)) => {
                    fail(e);
                    ExitCode::from(2)
                }
                Err(e) => fail(e),
            }
        }
    }
}
