//! bashellit: a small line-oriented editor shell for Bash scripts.
//!
//! Usage:
//!   bashellit [FILE]                 interactive shell (type :help)
//!   bashellit format [--write] FILE  re-indent a script
//!   bashellit highlight FILE         print classified spans, one JSON array per line
//!   bashellit recent [--remove PATH] list or prune the recent-file list

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;

use bashellit::app::infrastructure::logging::init_logging;
use bashellit::app::services::recent::RecentStore;
use bashellit::app::{
    format_script, AppError, AppState, FsStorage, Message, Output, Result, SettingsStore, ShellClassifier,
};
use bashellit::ui::render;

#[derive(Parser, Debug)]
#[command(name = "bashellit", version)]
#[command(about = "Edit, format and highlight Bash scripts; notices when they change on disk")]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    /// Script to open on start (defaults to the last active file)
    file: Option<String>,

    /// Settings file to use instead of the platform config location
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the formatted script, or rewrite it in place with --write
    Format {
        #[arg(long)]
        write: bool,
        file: PathBuf,
    },
    /// Print the style class of every span
    Highlight { file: PathBuf },
    /// List recent files, or forget one
    Recent {
        #[arg(long)]
        remove: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Some(Command::Format { write, file }) => format_file(&file, write).await,
        Some(Command::Highlight { file }) => highlight_file(&file).await,
        Some(Command::Recent { remove }) => recent(args.settings, remove),
        None => {
            // AppState is Rc-based; every command runs as a task on this thread
            let local = tokio::task::LocalSet::new();
            local.run_until(run_shell(args.settings, args.file)).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bashellit: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn format_file(file: &Path, write: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let formatted = format_script(&content);
    if !write {
        print!("{}", formatted);
        return Ok(());
    }
    if formatted != content {
        tokio::fs::write(file, &formatted).await?;
        log::info!("Formatted {}", file.display());
    }
    Ok(())
}

async fn highlight_file(file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let classifier = ShellClassifier::new();
    for spans in classifier.classify_text(&content) {
        println!("{}", serde_json::to_string(&spans)?);
    }
    Ok(())
}

fn recent(settings: Option<PathBuf>, remove: Option<String>) -> Result<()> {
    let mut store = SettingsStore::open(settings);
    if let Some(path) = remove {
        store.remove_recent(&path)?;
    }
    let active = store.last_active();
    println!("{}", render::recent_list(&store.list_recent(), active.as_deref()));
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn show(result: Result<Output>) -> bool {
    match result {
        Ok(Output::Text(text)) => println!("{}", text),
        Ok(Output::Nothing) => return false,
        Ok(Output::Quit) => return false,
        Err(e) => eprintln!("{}", notice(&e)),
    }
    true
}

fn notice(e: &AppError) -> String {
    match e {
        AppError::Busy(_) | AppError::Command(_) => e.to_string(),
        _ => format!("error: {}", e),
    }
}

/// A finished command: whether it was typed, and what it produced.
type Finished = std::result::Result<(bool, Result<Output>), JoinError>;

fn report(finished: Finished) {
    match finished {
        // ticks only interrupt the prompt when they have something to say
        Ok((typed, result)) => {
            if show(result) || typed {
                prompt();
            }
        }
        Err(e) => log::error!("Command task failed: {}", e),
    }
}

async fn run_shell(settings: Option<PathBuf>, file: Option<String>) -> Result<()> {
    let state = Rc::new(AppState::new(Rc::new(FsStorage), SettingsStore::open(settings)));

    match file {
        Some(file) => {
            show(state.handle_message(Message::Open(file)).await);
        }
        None => {
            show(Ok(state.restore().await));
        }
    }

    let mut ticker = tokio::time::interval(state.check_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // the first tick completes immediately
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut running: JoinSet<(bool, Result<Output>)> = JoinSet::new();
    prompt();
    loop {
        let message = tokio::select! {
            Some(finished) = running.join_next(), if !running.is_empty() => {
                report(finished);
                continue;
            }
            _ = ticker.tick() => Message::Tick,
            line = lines.next_line() => match line? {
                None => Message::Quit,
                Some(line) if line.trim().is_empty() => {
                    prompt();
                    continue;
                }
                Some(line) => match Message::parse(&line) {
                    Ok(message) => message,
                    Err(e) => {
                        eprintln!("{}", notice(&e));
                        prompt();
                        continue;
                    }
                },
            },
        };

        if message == Message::Quit {
            break;
        }
        let typed = message != Message::Tick;
        let task_state = Rc::clone(&state);
        running.spawn_local(async move { (typed, task_state.handle_message(message).await) });
    }

    // stop checking, but let pending saves land
    let _ = state.handle_message(Message::Quit).await;
    if !running.is_empty() {
        println!("\nWaiting for {} pending operation(s)", running.len());
    }
    while let Some(finished) = running.join_next().await {
        if let Ok((_, result)) = finished {
            show(result);
        }
    }
    println!();
    Ok(())
}
