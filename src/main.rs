use agehist::classifier::{AgeClassifier, CivilDate};
use agehist::config::{Mode, PipelineConfig};
use agehist::queue::DEFAULT_QUEUE_CAPACITY;
use agehist::report::{ReportFormat, write_report};
use agehist::{AgehistError, Input, pipeline};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agehist")]
#[command(
    version,
    about = "Concurrent age histogram over a file of ISO birth dates",
    long_about = None
)]
struct Cli {
    /// File with one birth date (YYYY-MM-DD) per line. Without it, prints the banner.
    path: Option<PathBuf>,

    /// Worker threads, the producer included [default: number of CPUs]
    #[arg(
        short,
        long,
        env = "AGEHIST_THREADS",
        value_parser = clap::value_parser!(u64).range(1..=4096)
    )]
    threads: Option<u64>,

    #[arg(long, value_enum, default_value_t = Mode::Queue)]
    mode: Mode,

    /// Work queue slots (in-flight task cap in tasks mode)
    #[arg(
        long,
        default_value_t = DEFAULT_QUEUE_CAPACITY as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    capacity: u64,

    /// Reference date for ages [default: today, UTC]
    #[arg(long)]
    today: Option<CivilDate>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGEHIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn print_banner<W: Write>(program: &str, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {} :: Histograma concurrente de edades ===", program)?;
    writeln!(out)?;
    writeln!(out, "Version {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Uso: {} <archivo> [--threads N] [--mode queue|tasks]", program)?;
    out.flush()
}

fn run(cli: Cli, path: PathBuf) -> Result<(), AgehistError> {
    let mut config = PipelineConfig::detect()
        .with_mode(cli.mode)
        .with_queue_capacity(cli.capacity as usize);
    if let Some(threads) = cli.threads {
        config = config.with_workers(threads as usize);
    }

    let classifier = match cli.today {
        Some(date) => AgeClassifier::as_of(date),
        None => AgeClassifier::today(),
    };

    let summary = pipeline::run(Input::path(path), &classifier, &config)?;
    if let Some(err) = &summary.source_error {
        let _ = writeln!(io::stderr(), "{}", err);
    }

    let stdout = io::stdout();
    write_report(&summary.histogram, cli.format, &mut stdout.lock())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let Some(path) = cli.path.clone() else {
        let program = std::env::args().next().unwrap_or_else(|| "agehist".to_string());
        if let Err(err) = print_banner(&program, &mut io::stdout().lock()) {
            debug!(error = %err, "banner not written");
        }
        return ExitCode::SUCCESS;
    };

    // Only usage errors, reported by clap above, exit non-zero.
    if let Err(err) = run(cli, path) {
        let _ = writeln!(io::stderr(), "agehist: {}", err);
    }
    ExitCode::SUCCESS
}
