//! SQL Review CLI
//!
//! Checks parsed statement batches against a review policy.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sqlreview::config::{ColorMode, Config, OutputFormat};
use sqlreview::input::expand_patterns;
use sqlreview::output::{GithubFormatter, JsonFormatter, OutputFormatter, TextFormatter};
use sqlreview::{Engine, PlanChecker, Registry, RuleType};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sqlreview",
    version,
    about = "SQL review advisor",
    long_about = "Checks parsed SQL statement batches against per-engine review policies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check statement batch files
    Check(CheckArgs),
    /// List registered rules per engine
    Rules {
        /// Only list rules of this engine
        #[arg(long)]
        engine: Option<Engine>,
    },
    /// Initialize a configuration file
    Init {
        /// Preset to use (recommended, strict, minimal)
        #[arg(long, default_value = "recommended")]
        preset: String,

        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        output_format: String,
    },
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Batch files, directories or glob patterns
    #[arg(required = true)]
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output (also lists OK results)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<RuleType>>,

    /// Show statistics
    #[arg(long)]
    stats: bool,

    /// Show per-rule timing statistics
    #[arg(long)]
    timing: bool,

    /// Hide statement summaries and the run summary
    #[arg(long)]
    no_summary: bool,

    /// Exit with 0 even if errors are found
    #[arg(long)]
    exit_zero: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Github,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Github => OutputFormat::Github,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Rules { engine } => handle_rules(engine).map(|_| 0),
        Commands::Init {
            preset,
            output_format,
        } => handle_init(&preset, &output_format).map(|_| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn handle_check(args: CheckArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(
        args.format.map(OutputFormat::from),
        args.verbose.then_some(true),
        args.jobs,
        args.disable,
    );

    let colored = !args.no_color && config.output.color != ColorMode::Never;
    if !colored {
        colored::control::set_override(false);
    } else if config.output.color == ColorMode::Always {
        colored::control::set_override(true);
    }

    let files = expand_patterns(&args.files)?;
    if files.is_empty() {
        bail!("No statement batches found");
    }
    if config.output.verbose {
        eprintln!("Checking {} batch file(s)", files.len());
    }

    let checker = PlanChecker::new(config);
    let report = checker.check_files(&files);
    let config = checker.config();

    let formatter: Box<dyn OutputFormatter> = match config.output.format {
        OutputFormat::Text => {
            let mut f = TextFormatter::new();
            if !colored {
                f = f.without_color();
            }
            if config.output.verbose {
                f = f.verbose();
            }
            if args.no_summary {
                f = f.without_summaries();
            }
            f.show_stats = args.stats || config.output.statistics;
            Box::new(f)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
        OutputFormat::Github if args.no_summary => {
            Box::new(GithubFormatter::new().without_summary())
        }
        OutputFormat::Github => Box::new(GithubFormatter::new()),
    };

    print!("{}", formatter.format(&report));

    if args.timing {
        eprintln!();
        eprintln!("{}", report.format_timings());
    }

    Ok(if args.exit_zero { 0 } else { report.exit_code() })
}

fn handle_rules(engine: Option<Engine>) -> Result<()> {
    let registry = Registry::builtin();
    let engines: Vec<Engine> = match engine {
        Some(engine) => vec![engine],
        None => Engine::ALL.to_vec(),
    };

    let mut listed = 0;
    for engine in engines {
        let rule_types = registry.rule_types(engine);
        if rule_types.is_empty() {
            continue;
        }

        println!("{}", engine.to_string().bold());
        for rule_type in rule_types {
            println!("    {}", rule_type.as_str().cyan());
            println!("      {}", rule_type.description());
            let payload = rule_type.default_payload();
            if !payload.is_null() {
                println!("      Default payload: {}", payload);
            }
            listed += 1;
        }
        println!();
    }

    if listed == 0 {
        bail!("No rules registered for the selected engine");
    }
    println!("{} rules registered", listed);
    Ok(())
}

fn handle_init(preset: &str, output_format: &str) -> Result<()> {
    let Some(config) = Config::preset(preset) else {
        bail!(
            "Unknown preset '{}'. Available: recommended, strict, minimal",
            preset
        );
    };

    let filename = if output_format == "json" {
        ".sqlreviewrc.json"
    } else {
        ".sqlreviewrc.yaml"
    };

    if Path::new(filename).exists() {
        bail!("{} already exists. Remove it first to reinitialize.", filename);
    }

    let content = if output_format == "json" {
        serde_json::to_string_pretty(&config)?
    } else {
        format!(
            "# SQL review configuration\n# Generated with: sqlreview init --preset {}\n\n{}",
            preset,
            serde_yaml::to_string(&config)?
        )
    };

    std::fs::write(filename, content).with_context(|| format!("Failed to write {}", filename))?;

    println!("{} Created {}", "success".green().bold(), filename);
    println!();
    println!("Next steps:");
    println!("  1. Review and customize the policy");
    println!("  2. Run {} to check your batches", "sqlreview check changes/".cyan());
    Ok(())
}
