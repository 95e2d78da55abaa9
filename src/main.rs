mod dataset;
mod db;
mod error;
mod export;
mod parser;
mod recert;
mod reconcile;
mod record;
mod settings;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use parser::ParsedDocument;
use recert::RecertPolicy;
use reconcile::{DuplicatePolicy, OverlayIndex};
use record::GovernanceRecord;
use settings::Settings;
use source::{DocumentKind, DocumentRef};

#[derive(Parser)]
#[command(name = "adr_governance", about = "ADR governance ledger and recertification report")]
struct Cli {
    /// Settings file (default: ./adr-governance.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every ADR, reconcile service-level overlays and write the report
    Export(ExportArgs),
    /// Parse one ADR and print the extracted record as JSON
    Inspect {
        file: PathBuf,
        /// Document kind (default: inferred from the file name)
        #[arg(short, long, value_enum)]
        kind: Option<DocumentKind>,
        /// Report date for the upcoming flag (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show recent exports recorded in the SQLite database
    Runs {
        #[arg(long = "db", default_value = db::DEFAULT_DB_PATH)]
        database: PathBuf,
        /// Max runs to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Args)]
struct ExportArgs {
    /// Directory of foundational ADRs
    #[arg(long)]
    foundational: Option<PathBuf>,
    /// Directory of deprecated ADRs (do-not-use-f-adr-*.md)
    #[arg(long)]
    deprecated: Option<PathBuf>,
    /// Directory of service-level ADRs (s-adr-*.md)
    #[arg(long)]
    service: Option<PathBuf>,
    /// Output path (default depends on format)
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "csv")]
    format: export::Format,
    /// Report date for the upcoming flag (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Descend into subdirectories
    #[arg(long)]
    recursive: bool,
    /// Override the configured duplicate service-name policy
    #[arg(long, value_enum)]
    duplicate_policy: Option<DuplicatePolicy>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Export(args) => run_export(&args, &settings),
        Commands::Inspect { file, kind, today } => {
            let kind = kind.unwrap_or_else(|| {
                let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
                DocumentKind::infer(name)
            });
            let doc = DocumentRef { path: file, kind }.load()?;
            let parsed = parser::parse_document(&doc, &settings.recert_policy(), report_date(today));
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Commands::Runs { database, limit } => {
            if !database.exists() {
                println!(
                    "No database at {}. Run 'export --format sqlite' first.",
                    database.display()
                );
                return Ok(());
            }
            let conn = db::connect(&database)?;
            db::init_schema(&conn)?;
            let runs = db::fetch_runs(&conn, limit)?;
            if runs.is_empty() {
                println!("No exports recorded.");
                return Ok(());
            }
            println!(
                "{:>4} | {:<10} | {:>5} | {:>7} | {:>7} | {:>11} | {:>5} | {:<19}",
                "#", "Report", "Docs", "Skipped", "Matched", "Synthesized", "Rows", "Created"
            );
            println!("{}", "-".repeat(92));
            for r in &runs {
                println!(
                    "{:>4} | {:<10} | {:>5} | {:>7} | {:>7} | {:>11} | {:>5} | {:<19}",
                    r.id,
                    r.report_date,
                    r.documents,
                    r.skipped,
                    r.matched,
                    r.synthesized,
                    r.rows,
                    r.created_at
                );
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn report_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn run_export(args: &ExportArgs, settings: &Settings) -> anyhow::Result<()> {
    let dirs = [
        (args.foundational.as_deref(), DocumentKind::Foundational),
        (args.deprecated.as_deref(), DocumentKind::Deprecated),
        (args.service.as_deref(), DocumentKind::Service),
    ];
    if dirs.iter().all(|(dir, _)| dir.is_none()) {
        bail!("Nothing to export: pass at least one of --foundational, --deprecated, --service");
    }

    let mut refs = Vec::new();
    for (dir, kind) in dirs {
        let Some(dir) = dir else { continue };
        let found = source::discover(dir, kind, args.recursive)?;
        info!(dir = %dir.display(), ?kind, documents = found.len(), "discovered");
        refs.extend(found);
    }
    if refs.is_empty() {
        println!("No ADR documents found.");
        return Ok(());
    }

    let today = report_date(args.today);
    let policy = settings.recert_policy();
    println!("Processing {} documents (report date {})...", refs.len(), today);
    let duplicates = args.duplicate_policy.unwrap_or(settings.duplicate_policy);
    let mut batch = process_documents(&refs, &policy, today)?;

    if batch.overlays.is_empty() {
        info!("no service-level ADRs to reconcile");
    }
    let summary = reconcile::reconcile(
        &mut batch.records,
        &batch.overlays,
        duplicates,
        &policy,
        today,
    )?;
    info!(
        overlays = batch.overlays.len(),
        matched = summary.matched,
        synthesized = summary.synthesized,
        "reconciled service-level ADRs"
    );

    let dataset = dataset::assemble(&batch.records, &settings.blank_marker);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.format.default_path()));

    match args.format {
        export::Format::Sqlite => {
            let conn = db::connect(&output)?;
            db::init_schema(&conn)?;
            db::save_dataset(&conn, &dataset)?;
            db::insert_run(
                &conn,
                &db::RunRow {
                    id: 0,
                    report_date: today.to_string(),
                    documents: (refs.len() - batch.skipped) as i64,
                    skipped: batch.skipped as i64,
                    matched: summary.matched as i64,
                    synthesized: summary.synthesized as i64,
                    rows: dataset.rows.len() as i64,
                    created_at: String::new(),
                },
            )?;
        }
        format => export::write_file(&dataset, format, &output)?,
    }

    println!(
        "Saved {} rows ({} records, {} synthesized, {} skipped) to {}",
        dataset.rows.len(),
        batch.records.len(),
        summary.synthesized,
        batch.skipped,
        output.display()
    );
    Ok(())
}

struct Batch {
    records: Vec<GovernanceRecord>,
    overlays: OverlayIndex,
    skipped: usize,
}

/// Load and parse each document in order. A document that cannot be read is
/// logged and skipped; it never stops the batch.
fn process_documents(
    refs: &[DocumentRef],
    policy: &RecertPolicy,
    today: NaiveDate,
) -> anyhow::Result<Batch> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(refs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .context("Invalid progress template")?
        .progress_chars("#>-"),
    );

    let mut batch = Batch {
        records: Vec::new(),
        overlays: OverlayIndex::default(),
        skipped: 0,
    };

    for doc_ref in refs {
        match doc_ref.load() {
            Ok(doc) => match parser::parse_document(&doc, policy, today) {
                ParsedDocument::Governance(record) => {
                    debug!(
                        source = %doc.source,
                        service = %record.service_name,
                        capabilities = record.capability_mapping.len(),
                        classifications = record.data_classification.len(),
                        "parsed governance ADR"
                    );
                    batch.records.push(record);
                }
                ParsedDocument::Overlay(overlay) => {
                    debug!(source = %doc.source, service = %overlay.service_name, "parsed service ADR");
                    batch.overlays.insert(overlay);
                }
            },
            Err(e) => {
                pb.suspend(|| warn!(error = %e, "skipping document"));
                batch.skipped += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(batch)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
