use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use profile_wizard::error::{Result, WizardError};
use profile_wizard::event::EventHandler;
use profile_wizard::onboard::{SimulatedCommitter, WizardApp, WizardConfig};
use profile_wizard::store::{FileStorage, KeyValueStorage, MemoryStorage, Store};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "profile-wizard")]
#[command(author, version, about = "Three-step profile questionnaire for the terminal")]
struct Args {
    /// Path to config file (default: $XDG_CONFIG_HOME/profile-wizard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the answers are saved in
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Step to open on (0 = Basics)
    #[arg(long)]
    step: Option<usize>,

    /// Discard saved answers before starting
    #[arg(long)]
    reset: bool,

    /// Keep answers in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting profile-wizard");
        }
    }

    let config = load_config(&args);
    let store = open_store(&args, &config)?;

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run_wizard(&mut terminal, config, store).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }

    result
}

/// Config file, then CLI overrides. A broken file falls back to defaults.
fn load_config(args: &Args) -> WizardConfig {
    let loaded = match &args.config {
        Some(path) => WizardConfig::load_from(path),
        None => WizardConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        WizardConfig::default()
    });

    if let Some(step) = args.step {
        config.wizard.initial_step = step;
    }
    if let Some(ref dir) = args.data_dir {
        config.storage.dir = Some(dir.clone());
    }
    config
}

fn open_store(args: &Args, config: &WizardConfig) -> Result<Store> {
    let storage: Arc<dyn KeyValueStorage> = if args.ephemeral {
        info!("Answers will not be saved");
        Arc::new(MemoryStorage::new())
    } else {
        let dir = config
            .storage
            .dir
            .clone()
            .unwrap_or_else(FileStorage::default_dir);
        Arc::new(FileStorage::new(dir)?)
    };

    let mut store = Store::open(storage, config.storage.key.clone());
    if args.reset {
        store.purge();
    }
    Ok(store)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: WizardConfig,
    store: Store,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.wizard.tick_rate_ms.max(10));
    let mut events = EventHandler::new(tick_rate);
    let mut changes = store.subscribe();

    let committer = Arc::new(SimulatedCommitter::new(Duration::from_millis(
        config.commit.delay_ms,
    )));
    let mut app = WizardApp::new(config, store, committer, events.sender());

    let result = loop {
        if let Err(e) = terminal.draw(|frame| profile_wizard::onboard::ui::draw(frame, &app)) {
            break Err(WizardError::Terminal(e.to_string()));
        }

        tokio::select! {
            event = events.next() => match event {
                Some(event) => app.handle_event(event),
                None => break Ok(()),
            },
            Ok(()) = changes.changed() => {
                let answers = changes.borrow_and_update().clone();
                app.on_answers_changed(&answers);
            }
        }

        if app.should_exit {
            break Ok(());
        }
    };

    // Nothing may touch the store once the wizard is gone
    app.shutdown();
    result
}
