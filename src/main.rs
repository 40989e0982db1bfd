use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docx_section_merge::{merge_files, MergeOptions, DEFAULT_THRESHOLD};

const DEFAULT_TEMPLATE: &str = "Full paper/5. บทที่ 1.docx";
const DEFAULT_SOURCE: &str = "ref/ข้อเสนอโครงงาน.docx";
const DEFAULT_TARGET: &str = "5.บทที่ 1.docx";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Template .docx whose headings define the output outline.
    #[arg(default_value = DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Source .docx whose section bodies are copied in.
    #[arg(default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Output .docx path. An existing file is backed up first.
    #[arg(default_value = DEFAULT_TARGET)]
    target: PathBuf,

    /// Lowest title similarity (0..=1) accepted as a match.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    threshold: f64,

    /// Use the template's styles for the output so its style names survive.
    #[arg(long)]
    inherit_styles: bool,

    /// Match and report, but do not write or back up anything.
    #[arg(long)]
    dry_run: bool,

    /// Print one line per template section.
    #[arg(long)]
    report: bool,

    /// Print the statistics as JSON.
    #[arg(long)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 1, got {value}"))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docx_section_merge={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = MergeOptions {
        threshold: args.threshold,
        inherit_styles: args.inherit_styles,
        dry_run: args.dry_run,
    };

    println!("Template: {}", args.template.display());
    println!("Source:   {}", args.source.display());

    let outcome = merge_files(&args.template, &args.source, &args.target, &options)
        .with_context(|| format!("merge into {}", args.target.display()))?;

    if args.report {
        for o in &outcome.report.outcomes {
            let indent = "  ".repeat(o.level.saturating_sub(1) as usize);
            match (&o.source_title, o.score) {
                (Some(src), Some(score)) => println!(
                    "{indent}{} <- {} ({}{:.2}, {} paragraphs)",
                    o.title,
                    src,
                    if o.exact { "exact, " } else { "" },
                    score,
                    o.paragraphs
                ),
                _ => println!("{indent}{} <- (no match)", o.title),
            }
        }
    }

    if let Some(backup) = &outcome.backup {
        println!("Backed up existing target to: {}", backup.display());
    }
    if outcome.written {
        println!("Wrote merged document to: {}", args.target.display());
    } else {
        println!("Dry run: {} not written", args.target.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report.stats)?);
    } else {
        println!("Stats: {}", outcome.report.stats);
    }
    Ok(())
}
