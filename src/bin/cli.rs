//
// Copyright, 2025.  Signal65 / Futurum Group.
// 
//! CLI supporting `fetch random`, `list` and `version`.
//!
//! Examples:
//! ```bash
//! s3sample --bucket media list                          # every *.txt object
//! s3sample --bucket media list --suffix .csv
//! s3sample --bucket media fetch random -n 5 -o ./data   # 5 objects not yet in ./data
//! s3sample --bucket file:///srv/mirror fetch random -n 2 -o ./data -j 4
//! s3sample --config ./team.yaml list                    # bucket from the config file
//! ```

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::{self, ErrorKind, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use s3sample::config::{default_config_path, FileSettings, GlobalSettings, LogFormat};
use s3sample::constants::{DEFAULT_FETCH_COUNT, DEFAULT_FETCH_JOBS, DEFAULT_LIST_SUFFIX, ENV_BUCKET};
use s3sample::progress::ProgressTracker;
use s3sample::{
    fetch_random, list_all, report, store_for_bucket, FetchConfig, FetchObserver, ListConfig,
    StoreConfig,
};

/// Macro to safely print with broken pipe handling
macro_rules! safe_println {
    ($($arg:tt)*) => {
        match writeln!(io::stdout(), $($arg)*) {
            Ok(_) => {},
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                // Gracefully exit on broken pipe (e.g., when piped to head/tail)
                std::process::exit(0);
            }
            Err(e) => return Err(e.into())
        }
    };
}

// -- Commands

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short = 'v',
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity: -v = Info, -vv = Debug",
    )]
    verbose: u8,

    /// Log line format on stderr [default: text].
    #[arg(long = "log-format", global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Bucket name (s3://name or name), or file:///path for a local tree. Defaults to $S3SAMPLE_BUCKET.
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// YAML file with `bucket`, `verbose` and `log-format` keys [default: $HOME/.s3sample.yaml].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch files from the bucket.
    Fetch {
        #[command(subcommand)]
        cmd: FetchCommand,
    },

    /// List objects in the bucket whose key ends with a suffix.
    List {
        /// Key suffix to match (case-sensitive).
        #[arg(short = 's', long = "suffix", default_value = DEFAULT_LIST_SUFFIX)]
        suffix: String,
    },

    /// Print the version number.
    Version,
}

#[derive(Subcommand)]
enum FetchCommand {
    /// Randomly select and fetch files that don't exist locally.
    Random {
        /// Number of random files to fetch.
        #[arg(short = 'n', long = "count", default_value_t = DEFAULT_FETCH_COUNT)]
        count: usize,

        /// Output directory for downloaded files.
        #[arg(short = 'o', long = "outdir", default_value = ".")]
        outdir: PathBuf,

        /// Maximum concurrent downloads.
        /// Values below 1 are treated as 1.
        #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_FETCH_JOBS)]
        jobs: usize,

        /// Seed for the random selection; omit for a fresh selection each run.
        #[arg(long)]
        seed: Option<u64>,
    },
}

// -----------------------------------------------------------------------------
// Command implementations
// -----------------------------------------------------------------------------

fn require_bucket(settings: &GlobalSettings) -> Result<String> {
    settings.bucket.clone().with_context(|| {
        format!("no bucket configured: pass --bucket, set {ENV_BUCKET}, or add `bucket:` to the config file")
    })
}

/// Cancel `token` on Ctrl-C so no further pages or objects are started.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight work");
            token.cancel();
        }
    });
}

async fn list_cmd(bucket: &str, suffix: String, cancel: &CancellationToken) -> Result<()> {
    let config = ListConfig::new(bucket).with_suffix(suffix);
    let store = store_for_bucket(&config.bucket, &StoreConfig::from_env())
        .await
        .context("unable to initialize object store")?;

    let inventory = list_all(store.as_ref(), &config.bucket, cancel)
        .await
        .context("Failed to list objects")?;

    for line in report(&inventory, &config.suffix) {
        safe_println!("{}", line);
    }
    Ok(())
}

async fn fetch_random_cmd(
    bucket: &str,
    count: usize,
    outdir: PathBuf,
    jobs: usize,
    seed: Option<u64>,
    show_progress: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let config = FetchConfig::new(bucket, outdir).with_count(count).with_jobs(jobs);
    let store = store_for_bucket(&config.bucket, &StoreConfig::from_env())
        .await
        .context("unable to initialize object store")?;

    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_rng(&mut rand::rng()),
    };

    let tracker = show_progress.then(|| Arc::new(ProgressTracker::new("DOWNLOAD")));
    let observer = tracker.clone().map(|t| t as Arc<dyn FetchObserver>);

    let summary = fetch_random(store, &config, &mut rng, cancel, observer)
        .await
        .context("Failed to fetch files")?;

    if let Some(t) = tracker {
        t.finish("Download");
    }
    info!(
        listed = summary.listed,
        missing = summary.missing,
        selected = summary.selected,
        "Run summary"
    );
    // Per-object failures were already logged; they do not change the exit code.
    eprintln!("{summary}");
    if summary.cancelled {
        bail!("fetch interrupted; {} selected files were not started", summary.skipped);
    }
    Ok(())
}

/// Main CLI function
#[tokio::main]
async fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let (file, config_used) = FileSettings::discover(cli.config.as_deref(), default_config_path().as_deref())?;
    let settings = GlobalSettings::layer(
        file,
        std::env::var(ENV_BUCKET).ok(),
        cli.bucket,
        cli.verbose,
        cli.log_format,
    );

    let filter = match settings.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false);
    // init() also bridges `log` records from the AWS SDK and friends.
    match settings.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    if let Some(path) = &config_used {
        info!(path = %path.display(), "Using config file");
    }

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match cli.cmd {
        Command::Version => {
            safe_println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }

        Command::List { suffix } => {
            let bucket = require_bucket(&settings)?;
            list_cmd(&bucket, suffix, &cancel).await?
        }

        Command::Fetch { cmd: FetchCommand::Random { count, outdir, jobs, seed } } => {
            let bucket = require_bucket(&settings)?;
            let show_progress = settings.verbose == 0 && io::stderr().is_terminal();
            fetch_random_cmd(&bucket, count, outdir, jobs, seed, show_progress, &cancel).await?
        }
    }

    Ok(())
}
