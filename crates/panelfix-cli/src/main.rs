//! panelfix CLI: command-line interface for elevator button relabeling.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use panelfix::{DetectionBatch, RelabelConfig, Relabeler};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "panelfix")]
#[command(
    about = "Relabel noisy elevator button detections into a consistently numbered panel"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relabel one detection batch.
    Relabel(CliRelabelArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliRelabelArgs {
    /// Path to the detection batch (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Path to write the relabeled panel (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Configuration file (JSON); missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the clustering drift gain, in (0, 1].
    #[arg(long)]
    drift_gain: Option<f64>,

    /// Override the number of classifier alternates kept per button.
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Keep a short first row when building columns.
    #[arg(long)]
    no_row_suppression: bool,

    /// Fail when any button stays unresolved.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Default)]
struct RelabelOverrides {
    drift_gain: Option<f64>,
    max_candidates: Option<usize>,
    no_row_suppression: bool,
}

impl CliRelabelArgs {
    fn to_overrides(&self) -> RelabelOverrides {
        RelabelOverrides {
            drift_gain: self.drift_gain,
            max_candidates: self.max_candidates,
            no_row_suppression: self.no_row_suppression,
        }
    }
}

fn build_relabel_config(
    config_path: Option<&Path>,
    overrides: &RelabelOverrides,
) -> CliResult<RelabelConfig> {
    let mut config = match config_path {
        Some(path) => RelabelConfig::from_json_file(path).map_err(|e| -> CliError {
            format!("Failed to load config {}: {}", path.display(), e).into()
        })?,
        None => RelabelConfig::default(),
    };

    if let Some(gain) = overrides.drift_gain {
        config.drift_gain = gain;
    }
    if let Some(k) = overrides.max_candidates {
        config.max_candidates = k;
    }
    if overrides.no_row_suppression {
        config.suppress_partial_first_row = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Relabel(args) => run_relabel(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&RelabelConfig::default())?);
    Ok(())
}

// ── relabel ────────────────────────────────────────────────────────────

fn run_relabel(args: &CliRelabelArgs) -> CliResult<()> {
    tracing::info!("Loading detections: {}", args.input.display());

    let data = std::fs::read_to_string(&args.input).map_err(|e| -> CliError {
        format!("Failed to read {}: {}", args.input.display(), e).into()
    })?;
    let batch = DetectionBatch::from_json_str(&data).map_err(|e| -> CliError {
        format!("Malformed detection batch {}: {}", args.input.display(), e).into()
    })?;

    tracing::info!("Batch size: {} buttons", batch.buttons.len());

    let config = build_relabel_config(args.config.as_deref(), &args.to_overrides())?;
    let panel = Relabeler::new(config).relabel(&batch)?;

    let summary = &panel.summary;
    tracing::info!(
        "Panel: {} rows x {} cols, reading order {:?}",
        summary.n_rows,
        summary.n_cols,
        panel.template.order(),
    );
    tracing::info!(
        "Labels: {} consistent, {} repaired, {} adopted, {} jump, {} suppressed, {} unresolved",
        summary.n_consistent,
        summary.n_repaired,
        summary.n_candidates_adopted,
        summary.n_jump_accepted,
        summary.n_suppressed,
        summary.n_unresolved,
    );

    // Write results
    let json = serde_json::to_string_pretty(&panel)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    if args.strict && !panel.is_fully_resolved() {
        return Err(format!(
            "{} buttons unresolved: {:?}",
            summary.n_unresolved, summary.unresolved_buttons
        )
        .into());
    }

    Ok(())
}
