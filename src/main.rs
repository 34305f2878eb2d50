use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use triangle_pipeline::config::Config;
use triangle_pipeline::pipeline::{PipelineEntry, PipelineFilter, PipelineSort};
use triangle_pipeline::scoring::SalesConfig;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_BROWSER: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Lead export to score (.json or .csv); defaults to `leads` in the config
    #[arg(short, long)]
    leads: Option<PathBuf>,

    /// Which leads to include
    #[arg(long, value_enum, default_value_t = PipelineFilter::All)]
    filter: PipelineFilter,

    /// Ordering of the pipeline
    #[arg(long, value_enum, default_value_t = PipelineSort::Probability)]
    sort: PipelineSort,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List scored leads (default if no subcommand)
    List {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show one lead with its score breakdown
    Show {
        /// Index number of the lead (1-based, as shown in list)
        index: usize,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Open a follow-up for a lead: a calendar event, or an email with --email
    Open {
        /// Index number of the lead (1-based, as shown in list)
        index: usize,

        /// Compose an email instead of a calendar event
        #[arg(long)]
        email: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Check the scoring configuration and report every problem
    Validate,
    /// Print the configured pipeline stages
    Stages,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "triangle-pipeline")]
#[command(about = "Trade-intelligence lead scoring and sales pipeline CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/triangle-pipeline/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Score as of this date (YYYY-MM-DD) instead of now
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = triangle_pipeline::telemetry::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::List {
        pipeline: PipelineArgs::default(),
        tsv: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = triangle_pipeline::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match triangle_pipeline::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let sales = config.effective_sales();
    if let Err(errors) = triangle_pipeline::scoring::validate_sales_config(&sales) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let as_of = match cli.as_of {
        Some(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or_else(Utc::now),
        None => Utc::now(),
    };
    let use_colors = triangle_pipeline::output::should_use_colors();

    match command {
        Commands::Validate => {
            println!(
                "Config OK: {} deal tiers, {} pipeline stages",
                sales.deal_tiers.len(),
                sales.pipeline_stages.iter().count()
            );
        }
        Commands::Stages => {
            println!("{}", triangle_pipeline::output::format_stages(&sales.pipeline_stages));
        }
        Commands::List { pipeline, tsv } => {
            let start_time = Instant::now();
            let entries = load_pipeline(&config, &sales, &pipeline, as_of);

            if tsv {
                let output = triangle_pipeline::output::format_pipeline_tsv(&entries);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else if cli.verbose && !entries.is_empty() {
                // Verbose mode: detailed output with breakdowns
                for entry in &entries {
                    println!(
                        "{}",
                        triangle_pipeline::output::format_entry_detail(entry, use_colors)
                    );
                    println!();
                }
            } else {
                println!(
                    "{}",
                    triangle_pipeline::output::format_pipeline_table(&entries, use_colors)
                );
            }

            if !tsv {
                let summary = triangle_pipeline::pipeline::summarize(&entries);
                println!();
                println!(
                    "{}",
                    triangle_pipeline::output::format_summary(
                        &summary,
                        &config.effective_representative(),
                        use_colors
                    )
                );
            }

            tracing::debug!(count = entries.len(), elapsed = ?start_time.elapsed(), "listed pipeline");
        }
        Commands::Show { index, pipeline } => {
            let entries = load_pipeline(&config, &sales, &pipeline, as_of);
            let entry = select_entry(&entries, index);
            println!(
                "{}",
                triangle_pipeline::output::format_entry_detail(entry, use_colors)
            );
        }
        Commands::Open {
            index,
            email,
            pipeline,
        } => {
            let entries = load_pipeline(&config, &sales, &pipeline, as_of);
            let entry = select_entry(&entries, index);
            let representative = config.effective_representative();

            let link = if email {
                triangle_pipeline::browser::follow_up_mailto(entry, &representative)
            } else {
                triangle_pipeline::browser::follow_up_calendar_url(entry, &representative)
            };
            let link = match link {
                Ok(url) => url,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };

            if let Err(e) = triangle_pipeline::browser::open_url(link.as_str()) {
                eprintln!("Failed to open browser: {:#}", e);
                std::process::exit(EXIT_BROWSER);
            }

            let kind = if email { "email" } else { "calendar follow-up" };
            println!("Opening {} for {}: {}", kind, entry.company_name, link);
        }
        Commands::Init => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load, score, filter and sort the lead export, exiting on data errors
fn load_pipeline(
    config: &Config,
    sales: &SalesConfig,
    args: &PipelineArgs,
    as_of: DateTime<Utc>,
) -> Vec<PipelineEntry> {
    let Some(path) = args.leads.clone().or_else(|| config.leads.clone()) else {
        eprintln!("No lead export given.");
        eprintln!("Pass --leads <FILE> or set a default in the config file:");
        eprintln!("  leads: /path/to/users.json");
        std::process::exit(EXIT_DATA);
    };

    let records = match triangle_pipeline::leads::load_leads(&path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Lead data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let entries = triangle_pipeline::pipeline::build_pipeline(&records, sales, as_of);
    let mut entries = triangle_pipeline::pipeline::filter_entries(entries, args.filter, as_of);
    triangle_pipeline::pipeline::sort_entries(&mut entries, args.sort);

    tracing::debug!(
        loaded = records.len(),
        shown = entries.len(),
        filter = ?args.filter,
        sort = ?args.sort,
        "pipeline ready"
    );
    entries
}

fn select_entry(entries: &[PipelineEntry], index: usize) -> &PipelineEntry {
    // Validate index bounds (1-based)
    if index < 1 || index > entries.len() {
        eprintln!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            entries.len()
        );
        std::process::exit(EXIT_DATA);
    }
    &entries[index - 1]
}
