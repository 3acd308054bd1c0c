//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pagemark_core::Converter;
use pagemark_shared::{
    AppConfig, ConversionRequest, ModelName, config_file_path, init_config, load_config,
};
use pagemark_store::LogLevel;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagemark — turn a web page into Markdown with a local model.
#[derive(Parser)]
#[command(
    name = "pagemark",
    version,
    about = "Fetch a web page through a cleaning proxy and convert it to Markdown with a local Ollama model.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert a web page to Markdown.
    Convert {
        /// Website URL to convert (passed to the proxy verbatim).
        url: String,

        /// Model to convert with (defaults to the configured default, or
        /// the first installed model).
        #[arg(short, long)]
        model: Option<String>,

        /// Do not save the .md file locally; print to stdout only.
        #[arg(long)]
        no_save: bool,
    },

    /// List models installed on the local inference service.
    Models,

    /// Show recent conversion log entries.
    Logs {
        /// Number of lines to show (defaults to the configured tail length).
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            url,
            model,
            no_save,
        } => cmd_convert(&url, model.as_deref(), no_save).await,
        Command::Models => cmd_models().await,
        Command::Logs { lines } => cmd_logs(lines).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_convert(url: &str, model: Option<&str>, no_save: bool) -> Result<()> {
    let config = load_config()?;
    let converter = Converter::from_config(&config)?;

    if url.trim().is_empty() {
        converter
            .activity_log()
            .record(LogLevel::Warning, "Conversion attempted without URL");
        return Err(eyre!("please enter a URL"));
    }

    let model = resolve_model(&converter, &config, model).await?;
    let save_locally = !no_save && config.defaults.save_locally;

    info!(url, model = %model, save_locally, "starting conversion");

    let request = ConversionRequest {
        url: url.to_string(),
        model,
    };

    let spinner = conversion_spinner();
    let outcome = match converter.convert_url(&request, save_locally).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(eyre!("error processing request: {e}"));
        }
    };

    println!("{}", outcome.result.markdown_content);

    if let Some(path) = outcome.saved_path {
        eprintln!();
        eprintln!("File saved locally: {}", path.display());
    }

    Ok(())
}

/// Pick the model to convert with: explicit flag, then configured default,
/// then the first installed model.
async fn resolve_model(
    converter: &Converter,
    config: &AppConfig,
    flag: Option<&str>,
) -> Result<ModelName> {
    if let Some(name) = flag {
        if name.trim().is_empty() {
            return Err(eyre!("model name must not be empty"));
        }
        return Ok(ModelName::new(name));
    }

    if let Some(name) = &config.ollama.default_model {
        return Ok(ModelName::new(name.clone()));
    }

    let models = converter.list_models().await;
    match models.into_iter().next() {
        Some(model) => Ok(model),
        None => Err(no_models_guidance()),
    }
}

/// Guided empty state when the inference service reports no models.
fn no_models_guidance() -> color_eyre::eyre::Report {
    eyre!(
        "no Ollama models found. Please ensure Ollama is running and models are installed.\n\n\
         To get started:\n\
         1. Install Ollama from https://ollama.com/download\n\
         2. Start the Ollama service (`ollama serve`)\n\
         3. Install a model: `ollama pull mistral` (or your preferred model)"
    )
}

fn conversion_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message("Converting...");
    spinner
}

async fn cmd_models() -> Result<()> {
    let config = load_config()?;
    let converter = Converter::from_config(&config)?;

    let models = converter.list_models().await;
    if models.is_empty() {
        return Err(no_models_guidance());
    }

    for model in models {
        println!("{model}");
    }
    Ok(())
}

async fn cmd_logs(lines: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let converter = Converter::from_config(&config)?;

    let max_lines = lines.unwrap_or(config.defaults.tail_lines);
    println!("{}", converter.activity_log().tail(max_lines));
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;

    println!("# resolved config ({})", path.display());
    println!("{}", toml_pretty(&config)?);
    Ok(())
}

fn toml_pretty(config: &AppConfig) -> Result<String> {
    // AppConfig is serde-serializable; reuse the shared schema.
    Ok(toml::to_string_pretty(config)?)
}
