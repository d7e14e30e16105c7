use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use n8n_workflow_exporter::{
    ExportConfig, ReportRenderer,
    cli::{export_workflows, inspect_workflow},
};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Workflow exporter: pull every n8n workflow out of its container into a tidy, name-keyed file tree
#[derive(Parser)]
#[command(name = "wfx", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export all workflows into <output-dir> and <output-dir>/archived
    Export {
        /// Host directory for exported workflows [env: N8N_OUTPUT_DIR]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Container running n8n [env: N8N_CONTAINER]
        #[arg(short, long)]
        container: Option<String>,

        /// Scratch directory inside the container [env: N8N_SCRATCH_DIR]
        #[arg(long)]
        scratch_dir: Option<String>,

        /// Export command, `{output}` is replaced by the export directory [env: N8N_EXPORT_COMMAND]
        #[arg(long)]
        export_command: Option<String>,

        /// Run commands on the host shell instead of inside a container
        #[arg(long)]
        local: bool,

        /// Also write a YAML manifest of exported workflows to this file
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show how a workflow JSON file would be named and filed
    Inspect {
        /// An exported workflow JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_loaded = Path::new(&cli.env).exists();
    if env_loaded {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if env_loaded {
        log::debug!("Loaded settings from {}", cli.env.bright_black());
    }

    match cli.command {
        Commands::Export {
            output_dir,
            container,
            scratch_dir,
            export_command,
            local,
            manifest,
            no_color,
        } => {
            let mut config = ExportConfig::from_env();
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(container) = container {
                config.container = container;
            }
            if let Some(scratch_dir) = scratch_dir {
                config.scratch_dir = scratch_dir;
            }
            if let Some(export_command) = export_command {
                config.export_command = export_command;
            }
            config.manifest = manifest;

            log::info!(
                "Exporting workflows to: {}",
                config.output_dir.display().bright_black()
            );

            let colored = !no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal();
            export_workflows(&config, local, ReportRenderer::new(colored)).await?;
        }
        Commands::Inspect { file } => {
            log::info!("Inspecting {}", file.display().bright_black());
            print!("{}", inspect_workflow(&file)?);
        }
    }

    Ok(())
}
