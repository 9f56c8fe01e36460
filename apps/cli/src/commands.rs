//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use docfuse_core::{
    DocAssembly, FsReader, ProgressReporter, assemble_documentation, write_document,
};
use docfuse_shared::{AppConfig, ProfileTable, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docfuse — merge documentation sets into single markdown documents.
#[derive(Parser)]
#[command(
    name = "docfuse",
    version,
    about = "Merge a multi-file documentation set into one document with absolute links.",
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
    /// Merge one or more documentation sets into single documents.
    Merge {
        /// Set identifiers to merge (e.g. vuex, vue-router, @pinia/root).
        #[arg(required = true)]
        set_ids: Vec<String>,

        /// Navigation-tree JSON file (only with a single set id;
        /// defaults to the profile's nav_file).
        #[arg(long)]
        nav: Option<String>,

        /// Directory the documentation repositories live under.
        #[arg(long)]
        docs_root: Option<String>,

        /// Output directory for merged documents.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// List all known documentation-set profiles.
    List,

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
        0 => "docfuse=info",
        1 => "docfuse=debug",
        _ => "docfuse=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge {
            set_ids,
            nav,
            docs_root,
            out,
        } => cmd_merge(&set_ids, nav.as_deref(), docs_root.as_deref(), out.as_deref()).await,
        Command::List => cmd_list(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

async fn cmd_merge(
    set_ids: &[String],
    nav: Option<&str>,
    docs_root: Option<&str>,
    out: Option<&str>,
) -> Result<()> {
    if nav.is_some() && set_ids.len() > 1 {
        return Err(eyre!("--nav applies to a single set id, got {}", set_ids.len()));
    }

    let config = load_config()?;
    let table = ProfileTable::from_config(&config);
    let docs_root = PathBuf::from(docs_root.unwrap_or(&config.defaults.docs_root));
    let out_dir = PathBuf::from(out.unwrap_or(&config.defaults.output_dir));
    let concurrency = config.defaults.load_concurrency as usize;

    let mut failed = 0usize;
    for id in set_ids {
        match merge_one(id, nav, &table, &docs_root, &out_dir, concurrency).await {
            Ok(()) => {}
            // One bad set must not sink its siblings.
            Err(e) => {
                error!(set = id, "merge failed: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} of {} set(s) failed", set_ids.len()));
    }
    Ok(())
}

async fn merge_one(
    id: &str,
    nav: Option<&str>,
    table: &ProfileTable,
    docs_root: &Path,
    out_dir: &Path,
    concurrency: usize,
) -> Result<()> {
    let profile = table.get(id)?;

    let nav_path = nav
        .map(String::from)
        .or_else(|| profile.nav_file.clone())
        .ok_or_else(|| {
            eyre!("set '{id}' has no nav_file configured; pass --nav <file>")
        })?;
    let nav_path = if Path::new(&nav_path).is_absolute() {
        PathBuf::from(&nav_path)
    } else {
        docs_root.join(&nav_path)
    };

    let raw = std::fs::read_to_string(&nav_path)
        .map_err(|e| eyre!("cannot read nav file '{}': {e}", nav_path.display()))?;
    let tree: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| eyre!("nav file '{}' is not valid JSON: {e}", nav_path.display()))?;

    info!(set = id, nav = %nav_path.display(), "merging documentation set");

    let reader = Arc::new(FsReader::new(docs_root));
    let reporter = CliProgress::new();
    let assembly = assemble_documentation(&tree, profile, reader, concurrency, &reporter).await?;
    let path = write_document(out_dir, profile, &assembly.text)?;

    print_summary(id, &assembly, &path);
    Ok(())
}

fn print_summary(id: &str, assembly: &DocAssembly, path: &Path) {
    println!();
    println!("  {id}: merged {} pages", assembly.page_count);
    println!("  Output: {}", path.display());
    if !assembly.missing_pages.is_empty() {
        println!("  Missing pages ({}):", assembly.missing_pages.len());
        for page in &assembly.missing_pages {
            println!("    {page}");
        }
    }
    if !assembly.unresolved_links.is_empty() {
        println!("  Unresolved links ({}):", assembly.unresolved_links.len());
        for link in &assembly.unresolved_links {
            println!("    {} -> {}", link.page, link.target);
        }
    }
    println!();
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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn begin(&self, total: usize) {
        self.spinner.set_message(format!("Loading {total} pages"));
    }

    fn page_done(&self, path: &str) {
        self.spinner.set_message(format!("Loaded {path}"));
    }

    fn finish(&self, message: &str) {
        self.spinner.finish_and_clear();
        info!("{message}");
    }
}

// ---------------------------------------------------------------------------
// list / config
// ---------------------------------------------------------------------------

fn cmd_list() -> Result<()> {
    let config = load_config()?;
    let table = ProfileTable::from_config(&config);

    println!();
    for profile in table.all() {
        println!("  {}", profile.id);
        println!("    name:         {}", profile.title());
        println!("    content root: {}", profile.content_root);
        println!("    host:         {}", profile.host);
    }
    println!();
    Ok(())
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
