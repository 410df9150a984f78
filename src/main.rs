use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use favsync::{
    cli,
    config::{self, Config},
    error,
    error::{AppError, AuthError},
    info, success, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Migrate Deezer favourite tracks into a new Spotify playlist
    Sync(SyncOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Do not use the redis match cache
    #[clap(long)]
    pub no_cache: bool,

    /// Print the login URLs without opening a browser
    #[clap(long)]
    pub no_browser: bool,

    /// Name of the playlist to create
    #[clap(long)]
    pub playlist_name: Option<String>,

    /// Directory the run log is written to
    #[clap(long, default_value = ".")]
    pub log_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Sync(opt) => run_sync(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn run_sync(opt: SyncOptions) {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();

    // untracked: it outlives the tracker's shutdown
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        let outcome = cli::watch_interrupts(tokio::signal::ctrl_c, interrupt).await;
        if outcome == cli::Interrupt::Forced {
            error!("Interrupted again, exiting without cleanup");
        }
    });

    let args = cli::SyncArgs {
        no_cache: opt.no_cache,
        no_browser: opt.no_browser,
        playlist_name: opt.playlist_name,
        log_dir: opt.log_dir,
    };
    let outcome = cli::sync(&config, args, cancel.clone(), &tracker).await;

    let report = match outcome {
        Ok(report) => report,
        Err(AppError::Auth(e @ AuthError::Cancelled { .. })) => {
            warning!("{}", e);
            shutdown(cancel, tracker).await;
            return;
        }
        Err(e) => error!("{}", e),
    };

    shutdown(cancel, tracker).await;

    if report.cancelled {
        warning!(
            "Interrupted after {} of {} tracks",
            report.matched + report.unmatched,
            report.total
        );
    }
    info!(
        "{} matched ({} from cache), {} without match",
        report.matched, report.from_cache, report.unmatched
    );
    success!("Added {} tracks", report.added);
    info!("Done.");
}

async fn shutdown(cancel: CancellationToken, tracker: TaskTracker) {
    cancel.cancel();
    tracker.close();
    tracker.wait().await;
}
