use std::fs::File;
use std::io::stderr;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use miette::{Context, IntoDiagnostic, miette};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::reload;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, reload::Handle, util::SubscriberInitExt,
};

pub trait LogHandle: Send + Sync {
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()>;
}

impl<S> LogHandle for Handle<EnvFilter, S>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()> {
        self.modify(|current| *current = new_filter)
            .into_diagnostic()
    }
}

pub struct LogHandles {
    console_handle: Mutex<Box<dyn LogHandle>>,
    file_handle: Mutex<Box<dyn LogHandle>>,
    log_file: PathBuf,
    // Keeps the file writer's worker thread alive
    _guard: WorkerGuard,
}

static LOG_HANDLES: OnceLock<LogHandles> = OnceLock::new();

fn log_dir() -> PathBuf {
    std::env::temp_dir().join("tempo_logs")
}

fn build_handles() -> miette::Result<LogHandles> {
    // Console Layer with its own reloadable filter
    let console_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let (console_filter, console_handle) = reload::Layer::new(console_filter);
    let console_layer = fmt::layer()
        .without_time()
        .with_writer(stderr)
        .with_filter(console_filter);

    // File Layer with its own reloadable filter (initially off)
    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .from_env_lossy();
    let (file_filter, file_handle) = reload::Layer::new(file_filter);

    let dir = log_dir();
    std::fs::create_dir_all(&dir)
        .into_diagnostic()
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_file = dir.join(format!("tempo_{timestamp}.log"));
    let file = File::create(&log_file)
        .into_diagnostic()
        .with_context(|| format!("Failed to create log file: {}", log_file.display()))?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false) // No colors in file
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .context("Failed to install the tracing subscriber")?;

    Ok(LogHandles {
        console_handle: Mutex::new(Box::new(console_handle)),
        file_handle: Mutex::new(Box::new(file_handle)),
        log_file,
        _guard: guard,
    })
}

fn handles() -> miette::Result<&'static LogHandles> {
    LOG_HANDLES
        .get()
        .ok_or_else(|| miette!("Logging has not been initialised"))
}

pub fn set_log_level(level: Level) -> miette::Result<()> {
    let new_filter = EnvFilter::new(level.to_string());

    handles()?
        .console_handle
        .lock()
        .map_err(|_| miette!("Console log handle poisoned"))?
        .set_filter(new_filter)
        .with_context(|| format!("Failed to modify log filter to level: {level}"))
}

pub fn toggle_file_logging(enable: bool) -> miette::Result<()> {
    let new_filter = if enable {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("off")
    };

    let handles = handles()?;
    handles
        .file_handle
        .lock()
        .map_err(|_| miette!("File log handle poisoned"))?
        .set_filter(new_filter)
        .context("Failed to modify log filter")?;
    if enable {
        debug!("Logging to {}", handles.log_file.display());
    }
    Ok(())
}

/// Initialize tracing and backtrace. Calling it again is a no-op.
pub fn init() -> miette::Result<()> {
    if LOG_HANDLES.get().is_some() {
        return Ok(());
    }

    #[cfg(feature = "dev-tools")]
    color_backtrace::install();

    let handles = build_handles()?;
    // Only the first successful init gets here, the subscriber is global
    let _ = LOG_HANDLES.set(handles);
    debug!("Logging initialised, files under {}", log_dir().display());
    Ok(())
}
