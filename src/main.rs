use anyhow::{anyhow, bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use curlq::document::{output_path_for, save_document};
use curlq::quotes::count_quotes;
use curlq::reader::{AsyncFileReader, ReaderConfig};
use curlq::session::{Session, SessionConfig};
use curlq::stats::{write_stats_file, FileStats, FileStatus, RunStats};

#[derive(Parser, Debug)]
#[command(name = "curlq")]
#[command(about = "Convert straight quotes in TXT/DOCX manuscripts into curly quotes")]
#[command(version)]
struct Args {
    /// Input documents (.txt or .docx)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for converted documents (default: next to each input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only print the quote report, do not convert
    #[arg(long)]
    report_only: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting curlq");
    info!(?args, "Parsed CLI arguments");

    if let Some(dir) = &args.output_dir {
        if dir.exists() && !dir.is_dir() {
            bail!("Output path is not a directory: {}", dir.display());
        }
    }

    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let started = Instant::now();

    let reader = AsyncFileReader::new(ReaderConfig { fail_fast: args.fail_fast });
    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(args.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let mut run = RunStats::new(run_start);

    for input in &args.inputs {
        let file_start = Instant::now();
        progress.set_message(input.display().to_string());

        let stats = match process_file(&reader, input, &args, &progress).await {
            Ok(stats) => stats,
            Err(e) => {
                if args.fail_fast {
                    progress.abandon();
                    return Err(e);
                }
                warn!("Failed to process {}: {:#}", input.display(), e);
                progress.suspend(|| eprintln!("{}: error: {:#}", input.display(), e));
                FileStats::failed(
                    input.display().to_string(),
                    format!("{e:#}"),
                    file_start.elapsed().as_millis() as u64,
                )
            }
        };

        run.record(stats);
        progress.inc(1);
    }

    progress.finish_and_clear();
    run.total_processing_time_ms = started.elapsed().as_millis() as u64;

    println!(
        "Done: {} converted, {} unchanged, {} reported, {} failed ({} quotes normalized)",
        run.files_converted,
        run.files_unchanged,
        run.files_reported,
        run.files_failed,
        run.total_quotes_normalized
    );
    info!(
        converted = run.files_converted,
        unchanged = run.files_unchanged,
        reported = run.files_reported,
        failed = run.files_failed,
        "Run completed in {}ms",
        run.total_processing_time_ms
    );

    if let Some(stats_path) = &args.stats_out {
        write_stats_file(stats_path, &run).await?;
        info!("Wrote stats to {}", stats_path.display());
    }

    if run.files_failed > 0 {
        bail!("{} of {} files failed", run.files_failed, args.inputs.len());
    }

    Ok(())
}

/// Report and convert a single input
async fn process_file(
    reader: &AsyncFileReader,
    input: &Path,
    args: &Args,
    progress: &ProgressBar,
) -> Result<FileStats> {
    let start = Instant::now();

    let (upload, read_stats) = reader.read_upload(input).await?;
    let upload = upload.ok_or_else(|| {
        anyhow!(read_stats.read_error.clone().unwrap_or_else(|| "read failed".to_string()))
    })?;

    let mut session = Session::new(SessionConfig::default());
    let notice = session.load_upload(&upload.name, &upload.bytes);
    if notice.is_error() {
        bail!("{}", notice.message());
    }

    let quotes_before = count_quotes(session.text());
    let report = session.quote_report();
    progress.suspend(|| {
        println!("{}: {} characters", input.display(), session.char_count());
        for (category, count) in &report {
            println!("  - {category}: {count}");
        }
    });

    let mut stats = FileStats {
        path: input.display().to_string(),
        chars_processed: session.char_count() as u64,
        quotes_before,
        quotes_after: quotes_before,
        processing_time_ms: 0,
        output_path: None,
        status: FileStatus::Unchanged,
        error: None,
    };

    if args.report_only {
        stats.status = FileStatus::Reported;
        stats.processing_time_ms = start.elapsed().as_millis() as u64;
        return Ok(stats);
    }

    let document = match session.convert() {
        Some(conversion) => {
            stats.quotes_after = count_quotes(&conversion.normalized);
            conversion.document.clone()
        }
        None => None,
    };

    match (document, session.notice()) {
        (Some(bytes), _) => {
            let output = output_path_for(input, args.output_dir.as_deref());
            save_document(&output, &bytes).await?;
            progress.suspend(|| println!("  -> {}", output.display()));
            stats.output_path = Some(output.display().to_string());
            stats.status = FileStatus::Converted;
        }
        (None, Some(notice)) if notice.is_error() => bail!("{}", notice.message()),
        (None, Some(notice)) => progress.suspend(|| println!("  {notice}")),
        (None, None) => {}
    }

    stats.processing_time_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}
