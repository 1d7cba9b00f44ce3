//! # Ponto CLI Entry Point
//!
//! This is the main entry point for the Ponto admin dashboard.
//!
//! ## Overview
//!
//! Ponto is a terminal dashboard for the Se Liga No Ponto operations stack:
//! metrics, scraper jobs, the mobile release checklist, billing, the runtime
//! configuration form and an AI-powered security audit. All operational data
//! is mocked; the audit is the only outbound call and falls back to a static
//! report when it cannot be made.
//!
//! ## Usage
//!
//! ```bash
//! # Start the dashboard
//! ponto
//!
//! # Start with animations disabled
//! ponto --reduced-motion
//!
//! # Pick a theme and log more detail
//! ponto --theme "Tokyo Night" --log-level debug
//!
//! # Debug mode - print sections and record counts and exit
//! ponto --debug
//! ```
//!
//! The audit uses the Gemini API key from the `API_KEY` environment variable.
//! Logs go to `<data dir>/ponto/ponto.log`; `RUST_LOG` overrides `--log-level`.
//!
//! ## Key Bindings
//!
//! ### Navigation
//! - `Tab` / `Shift+Tab` - Next / previous section
//! - `1`..`6` - Jump to a section
//! - `s` - Open the sidebar on narrow terminals (`j`/`k`, `Enter`, `Esc`)
//! - `j` / `k` / arrows / `PageUp` / `PageDown` / mouse wheel - Scroll
//! - `m` - Toggle reduced motion
//! - `t` - Cycle theme
//! - `?` - Show/hide key help
//! - `q` / `Ctrl+c` - Quit
//!
//! ### Sections
//! - Scrapers: `r` - Trigger all seeders
//! - Audit: `a` / `Enter` - Run the security audit
//! - Settings: `j` / `k` - Move field focus, `Enter` - Edit, toggle or cycle,
//!   `Esc` - Leave the text field

use ponto::audit::{self, AuditOutcome, ReportGenerator};
use ponto::config::{self, Config};
use ponto::data;
use ponto::ui::{self, app::Action, app::Section, App, theme::Theme};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// Ponto - admin dashboard for the Se Liga No Ponto platform
#[derive(Parser, Debug)]
#[command(name = "ponto")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal admin dashboard for Se Liga No Ponto", long_about = None)]
struct Args {
    /// Disable animations (overrides the saved preference)
    #[arg(long)]
    reduced_motion: bool,

    /// Color theme, e.g. "Luminous" or "Catppuccin Mocha"
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Log level written to the log file (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Print the sections and record counts and exit
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Try to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);

        // Call the original panic hook
        original_hook(panic_info);
    }));

    // Run the application and ensure cleanup happens
    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

/// Route `tracing` output to the log file; the terminal belongs to the UI.
///
/// Returns false, after a warning on stderr, when logging could not be set
/// up. The dashboard runs either way.
fn start_logging(path: Result<PathBuf>, level: &str) -> bool {
    match path.and_then(|path| init_logging(&path, level)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            false
        }
    }
}

fn init_logging(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {level}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")?;
    Ok(())
}

/// Resolve the starting preferences: CLI flags win over the saved config.
fn startup_config(args: &Args, saved: Config) -> Result<Config> {
    let mut config = saved;
    if let Some(name) = &args.theme {
        let theme = Theme::by_name(name).with_context(|| {
            let known: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
            format!("Unknown theme: {name} (available: {})", known.join(", "))
        })?;
        config.theme = theme.name.to_string();
    }
    Ok(config)
}

fn print_debug_info() {
    println!("=== Sections ===");
    for (i, section) in Section::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, section.label());
    }
    println!("\n=== Records ===");
    println!("  Scrapers:          {}", data::SCRAPERS.len());
    println!("  Transactions:      {}", data::TRANSACTIONS.len());
    println!("  Deployment steps:  {}", data::DEPLOYMENT_STEPS.len());
    println!("  Weekly metrics:    {}", data::WEEKLY_METRICS.len());
    println!("  Pipeline runs:     {}", data::PIPELINE_ACTIVITY.len());
    println!("  Webhooks:          {}", data::WEBHOOKS.len());
    println!(
        "\nAudit API key: {}",
        if std::env::var_os(audit::API_KEY_VAR).is_some() {
            "set"
        } else {
            "not set (fallback report)"
        }
    );
}

async fn run_application(args: Args) -> Result<()> {
    // Debug mode: print sections and exit before touching the terminal
    if args.debug {
        print_debug_info();
        return Ok(());
    }

    // before the alternate screen, so a warning is still readable
    start_logging(config::log_file_path(), &args.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ponto starting");

    let config = startup_config(&args, Config::load())?;
    let mut app = App::from_config(&config, args.reduced_motion);
    let generator = audit::generator_from_env();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        &mut event_reader,
        &generator,
        &tx,
        &mut rx,
    )
    .await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    tracing::info!("ponto exiting");

    // Return the first error that occurred, or Ok if both succeeded
    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// Store every audit result that has arrived since the last frame.
fn drain_audit_results(app: &mut App, rx: &mut UnboundedReceiver<AuditOutcome>) {
    while let Ok(outcome) = rx.try_recv() {
        app.finish_audit(outcome);
    }
}

/// Apply one terminal event to the app and carry out the resulting action.
fn handle_event(
    app: &mut App,
    event: Event,
    generator: &Arc<dyn ReportGenerator>,
    tx: &UnboundedSender<AuditOutcome>,
) {
    let action = match event {
        // only react to presses; release/repeat events arrive on some platforms
        Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, Instant::now()),
        Event::Mouse(mouse) => {
            app.handle_mouse(mouse);
            Action::None
        }
        _ => Action::None,
    };

    match action {
        Action::None => {}
        Action::Quit => app.should_quit = true,
        Action::RunAudit { ticket } => {
            audit::spawn_audit(Arc::clone(generator), ticket, tx.clone());
        }
        Action::PersistConfig => {
            if let Err(e) = app.to_config().save() {
                tracing::warn!(error = %e, "failed to save preferences");
            }
        }
    }
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
    generator: &Arc<dyn ReportGenerator>,
    tx: &UnboundedSender<AuditOutcome>,
    rx: &mut UnboundedReceiver<AuditOutcome>,
) -> Result<()> {
    loop {
        drain_audit_results(app, rx);

        terminal
            .draw(|f| ui::render(f, app))
            .map_err(|e| anyhow::anyhow!("Failed to draw terminal UI: {e}"))?;

        // ~60fps while something is moving, otherwise just often enough for
        // spinners and incoming audit results
        let poll_timeout = ui::render::poll_timeout(app);

        // Let the audit task make progress between frames
        tokio::task::yield_now().await;

        if let Some(event) = event_reader.read_event(poll_timeout)? {
            handle_event(app, event, generator, tx);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
