use std::{env, fs, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "unbiased-news.log";

/// Send tracing output to a log file so it never lands on the feed screen.
///
/// Precedence: RUST_LOG env var > default `unbiased_news=info`.
/// The returned guard must stay alive until exit so buffered lines flush.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log directory {}: {}", dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "unbiased_news=info".into());
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Some(guard)
}

fn log_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_STATE_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("unbiased-news");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".local");
        p.push("state");
        p.push("unbiased-news");
        return Some(p);
    }
    None
}
