//! CLI command definitions, routing, and tracing setup.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mdgen_core::pipeline::{GenerateResult, ProgressReporter};
use mdgen_shared::{AppConfig, Delimiter, GenerateConfig, init_config, load_config};
use tracing::info;

use crate::prompt;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mdgen: turn CSV content exports into front-matter Markdown pages.
#[derive(Parser)]
#[command(
    name = "mdgen",
    version,
    about = "Generate one Markdown page per CSV row (VuePress-style README.md tree).",
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
    /// Generate Markdown pages from a CSV file.
    #[command(alias = "generate:md")]
    Generate(GenerateArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `generate`.
#[derive(clap::Args)]
pub(crate) struct GenerateArgs {
    /// Path to CSV file (ex: ./fancy.csv).
    pub filename: PathBuf,

    /// CSV delimiter; skips the delimiter question.
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Emit an H1 heading from the title column; skips the heading question.
    #[arg(long, conflicts_with = "no_header")]
    pub header: bool,

    /// Do not emit an H1 heading; skips the heading question.
    #[arg(long)]
    pub no_header: bool,

    /// Output root directory (defaults to the configured output_dir).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Accept configured defaults instead of asking.
    #[arg(short, long)]
    pub yes: bool,
}

impl GenerateArgs {
    fn header_flag(&self) -> Option<bool> {
        match (self.header, self.no_header) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
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
        0 => "mdgen=warn,mdgen_core=warn,mdgen_markdown=warn,mdgen_shared=warn",
        1 => "mdgen=info,mdgen_core=info,mdgen_markdown=info,mdgen_shared=info",
        2 => "mdgen=debug,mdgen_core=debug,mdgen_markdown=debug,mdgen_shared=debug",
        _ => "mdgen=trace,mdgen_core=trace,mdgen_markdown=trace,mdgen_shared=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(&args),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let app = load_config()?;
    let config = resolve_generate_config(args, &app)?;

    info!(
        source = %config.source.display(),
        delimiter = %config.delimiter,
        create_header = config.create_header,
        output = %config.output_root.display(),
        "generating pages"
    );

    let reporter = CliProgress::new();
    let result = mdgen_core::pipeline::generate(&config, &reporter)?;

    println!(
        "All files have been generated to the {} directory",
        result.output_root.display()
    );

    Ok(())
}

/// Merge flags, prompt answers and config into the run config.
///
/// Questions are only asked for values no flag supplied, and never with
/// `--yes` or when stdin is not a terminal.
fn resolve_generate_config(args: &GenerateArgs, app: &AppConfig) -> Result<GenerateConfig> {
    let mut config = GenerateConfig::from_app(&args.filename, app)?;
    let interactive = !args.yes && io::stdin().is_terminal();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    config.delimiter = match &args.delimiter {
        Some(d) => d.parse::<Delimiter>()?,
        None if interactive => prompt::ask_delimiter(&mut input, &mut output, config.delimiter)?,
        None => config.delimiter,
    };

    config.create_header = match args.header_flag() {
        Some(flag) => flag,
        None if interactive => prompt::ask_confirmation(
            &mut input,
            &mut output,
            "Create a H1 Header on each page from the title column",
            config.create_header,
        )?,
        None => config.create_header,
    };

    if let Some(out) = &args.out {
        config.output_root = out.clone();
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn row_written(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Clears the spinner when the run aborts early
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid args")
    }

    fn generate_args(args: &[&str]) -> GenerateArgs {
        match parse(args).command {
            Command::Generate(args) => args,
            Command::Config { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_requires_filename() {
        assert!(Cli::try_parse_from(["mdgen", "generate"]).is_err());
    }

    #[test]
    fn legacy_command_name_is_accepted() {
        let args = generate_args(&["mdgen", "generate:md", "pages.csv"]);
        assert_eq!(args.filename, PathBuf::from("pages.csv"));
    }

    #[test]
    fn header_flags_conflict() {
        assert!(
            Cli::try_parse_from(["mdgen", "generate", "a.csv", "--header", "--no-header"]).is_err()
        );
        assert_eq!(generate_args(&["mdgen", "generate", "a.csv"]).header_flag(), None);
        assert_eq!(
            generate_args(&["mdgen", "generate", "a.csv", "--no-header"]).header_flag(),
            Some(false)
        );
    }

    #[test]
    fn flags_override_config() {
        let args = generate_args(&[
            "mdgen", "generate", "a.csv", "-d", ";", "--no-header", "-o", "site/docs", "-y",
        ]);
        let config = resolve_generate_config(&args, &AppConfig::default()).unwrap();
        assert_eq!(config.delimiter.as_byte(), b';');
        assert!(!config.create_header);
        assert_eq!(config.output_root, PathBuf::from("site/docs"));
        assert_eq!(config.source, PathBuf::from("a.csv"));
    }

    #[test]
    fn yes_takes_config_defaults() {
        let mut app = AppConfig::default();
        app.defaults.delimiter = "|".into();
        app.defaults.create_header = false;

        let args = generate_args(&["mdgen", "generate", "a.csv", "--yes"]);
        let config = resolve_generate_config(&args, &app).unwrap();
        assert_eq!(config.delimiter.as_byte(), b'|');
        assert!(!config.create_header);
        assert_eq!(config.output_root, PathBuf::from("./output"));
    }

    #[test]
    fn bad_delimiter_flag_is_an_error() {
        let args = generate_args(&["mdgen", "generate", "a.csv", "-d", "ab", "-y"]);
        assert!(resolve_generate_config(&args, &AppConfig::default()).is_err());
    }
}
