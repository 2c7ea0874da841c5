//! untable CLI - HTML table extraction and normalization tool

mod entity;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untable::extract::classify_with_mark;
use untable::pipeline::process_entities_with;
use untable::render::{anomalies_to_text, raw_to_text};
use untable::{
    extract_entity, EntityOutcome, ExtractOptions, FieldSpecTable, HtmlOptions, HtmlReader,
    JsonFormat,
};

#[derive(Parser)]
#[command(name = "untable")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Turn semi-structured HTML tables into flat, validated records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layout variant of every table on an HTML page
    Classify {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Extract the raw record of one entity directory
    Extract {
        /// Entity directory (one HTML file per page class)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        #[command(flatten)]
        out: OutputArgs,

        /// Print `key: value` lines instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Extract and normalize one entity directory
    Normalize {
        /// Entity directory (one HTML file per page class)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Rule table (JSON)
        #[arg(short, long, value_name = "FILE", env = "UNTABLE_RULES")]
        rules: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Extract and normalize every entity directory under a root
    Batch {
        /// Directory of entity directories
        #[arg(value_name = "ROOT")]
        input: PathBuf,

        /// Rule table (JSON)
        #[arg(short, long, value_name = "FILE", env = "UNTABLE_RULES")]
        rules: PathBuf,

        /// Process entities one at a time
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        read: ReadArgs,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Validate a rule table and print a summary
    Rules {
        /// Rule table (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ReadArgs {
    /// Only read tables inside elements matching this CSS selector
    #[arg(long, value_name = "SELECTOR", env = "UNTABLE_SCOPE")]
    scope: Option<String>,

    /// Cell text marking the selected column of a pivot table
    #[arg(long, default_value = "X")]
    mark: String,

    /// Extra cell text read as "no value" (repeatable)
    #[arg(long = "null", value_name = "TEXT")]
    null_markers: Vec<String>,

    /// Skip the first page's headline and summary
    #[arg(long)]
    tables_only: bool,
}

impl ReadArgs {
    fn reader(&self) -> untable::Result<HtmlReader> {
        let mut options = HtmlOptions::new();
        if let Some(scope) = &self.scope {
            options = options.with_scope(scope.as_str());
        }
        for marker in &self.null_markers {
            options = options.with_null_marker(marker.as_str());
        }
        HtmlReader::new(options)
    }

    fn extract_options(&self) -> ExtractOptions {
        let options = ExtractOptions::new().with_mark(self.mark.as_str());
        if self.tables_only {
            options.tables_only()
        } else {
            options
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

impl OutputArgs {
    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }

    fn write(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(path) = &self.output {
            fs::write(path, content)?;
            eprintln!("{} {}", "Saved to".green(), path.display());
        } else {
            println!("{}", content);
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify { input, read } => cmd_classify(&input, &read),
        Commands::Extract {
            input,
            read,
            out,
            text,
        } => cmd_extract(&input, &read, &out, text),
        Commands::Normalize {
            input,
            rules,
            read,
            out,
        } => cmd_normalize(&input, &rules, &read, &out),
        Commands::Batch {
            input,
            rules,
            sequential,
            read,
            out,
        } => cmd_batch(&input, &rules, sequential, &read, &out),
        Commands::Rules { input } => cmd_rules(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_classify(input: &Path, read: &ReadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    let page = read.reader()?.read(&html, "page");

    println!("{}", "Tables".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (index, table) in page.tables.iter().enumerate() {
        let layout = classify_with_mark(table, &read.mark);
        let title = table
            .heading
            .as_deref()
            .or_else(|| table.rows.first().and_then(|r| r.label.as_deref()))
            .unwrap_or("");
        println!(
            "{:>3}  {:<13} {:>3} rows  {}",
            index,
            layout.to_string().bold(),
            table.row_count(),
            title.dimmed()
        );
    }

    if page.tables.is_empty() {
        println!("{}", "No tables found".yellow());
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    read: &ReadArgs,
    out: &OutputArgs,
    text: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let entity = entity::read_entity(input, &read.reader()?)?;
    let extraction = extract_entity(&entity, &read.extract_options());

    if !extraction.anomalies.is_empty() {
        eprint!("{}", anomalies_to_text(&extraction.anomalies).yellow());
    }

    let content = if text {
        raw_to_text(&extraction.record)
    } else {
        untable::render::to_json(&extraction, out.format())?
    };
    out.write(&content)
}

fn cmd_normalize(
    input: &Path,
    rules: &Path,
    read: &ReadArgs,
    out: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let specs = FieldSpecTable::from_path(rules)?;
    let entity = entity::read_entity(input, &read.reader()?)?;
    let outcome = untable::process_entity(&entity, &specs, &read.extract_options());

    report_anomalies(&outcome);
    if outcome.is_no_data() {
        eprintln!("{} {}", "No data:".yellow().bold(), outcome.entity_id());
    }

    out.write(&untable::render::to_json(&outcome, out.format())?)
}

fn cmd_batch(
    root: &Path,
    rules: &Path,
    sequential: bool,
    read: &ReadArgs,
    out: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let specs = FieldSpecTable::from_path(rules)?;
    let reader = read.reader()?;
    let mut options = read.extract_options();
    if sequential {
        options = options.sequential();
    }

    let dirs = entity::entity_dirs(root)?;
    let pb = ProgressBar::new(dirs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading pages...");
    let mut entities = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        entities.push(entity::read_entity(dir, &reader)?);
        pb.inc(1);
    }

    pb.set_message("Processing...");
    let no_data = AtomicUsize::new(0);
    let outcomes = process_entities_with(&entities, &specs, &options, |outcome| {
        if outcome.is_no_data() {
            no_data.fetch_add(1, Ordering::Relaxed);
        }
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let anomalies: usize = outcomes.iter().map(|o| o.anomalies().len()).sum();
    eprintln!("\n{}", "Summary:".green().bold());
    eprintln!("  {} {} entities", "├─".dimmed(), outcomes.len());
    eprintln!(
        "  {} {} without data",
        "├─".dimmed(),
        no_data.load(Ordering::Relaxed)
    );
    eprintln!("  {} {} anomalies", "└─".dimmed(), anomalies);

    out.write(&untable::render::to_json(&outcomes, out.format())?)
}

fn cmd_rules(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let specs = FieldSpecTable::from_path(input)?;

    println!("{}", "Rule Table".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Rules".bold(), specs.len());
    println!("{}: {}", "Deletions".bold(), specs.deletion_count());

    let extracting = specs.specs().iter().filter(|s| s.extract.is_some()).count();
    let ranged = specs.specs().iter().filter(|s| s.range.is_some()).count();
    println!("{}: {}", "With extraction".bold(), extracting);
    println!("{}: {}", "With range".bold(), ranged);

    println!("\n{}", "Valid".green().bold());
    Ok(())
}

fn report_anomalies(outcome: &EntityOutcome) {
    let anomalies = outcome.anomalies();
    if anomalies.is_empty() {
        return;
    }
    eprintln!(
        "{} {}",
        anomalies.len().to_string().yellow().bold(),
        "anomalies".yellow()
    );
    eprint!("{}", anomalies_to_text(anomalies).yellow());
}

fn cmd_version() {
    println!("{} {}", "untable".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("HTML table extraction and normalization tool");
    println!();
    println!("License: MIT");
}
