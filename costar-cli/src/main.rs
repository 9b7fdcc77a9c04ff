mod http;
mod logging;
mod search;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::broadcast;

use costar_core::backend::PathBackend;
use costar_core::config::{ClientConfig, ConfigOrigin};
use costar_core::model::PickerId;
use costar_core::reducer::{AppEvent, EventEmitter, EventEnvelope, reduce, settle_after_lag};
use costar_core::selection::SelectionState;
use costar_core::state::{AppState, Focus};
use costar_core::submission::PathSubmission;

use http::HttpBackend;
use search::SearchClient;

const FRAME_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Parser)]
#[command(name = "costar")]
#[command(about = "Find the chain of shared movies between two actors", long_about = None)]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path to a costar.yaml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive picker (default)
    Tui,
    /// List actors whose name starts with a prefix
    Search { prefix: String },
    /// Print the shortest path between two actor ids
    Path { actor_1: String, actor_2: String },
}

fn load_config(cli: &Cli) -> anyhow::Result<(ConfigOrigin, ClientConfig)> {
    let (origin, config) = match &cli.config {
        Some(path) => {
            let config = ClientConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            (ConfigOrigin::file(path), config)
        }
        None => {
            let cwd = std::env::current_dir()?;
            ClientConfig::discover(&cwd)?
        }
    };

    let config = match &cli.base_url {
        Some(url) => config.with_base_url(url.clone())?,
        None => config,
    };
    Ok((origin, config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { ref prefix }) => {
            logging::init_stderr();
            let (origin, config) = load_config(&cli)?;
            origin.log();
            run_cli_search(&config, prefix).await
        }
        Some(Commands::Path {
            ref actor_1,
            ref actor_2,
        }) => {
            logging::init_stderr();
            let (origin, config) = load_config(&cli)?;
            origin.log();
            run_cli_path(&config, actor_1, actor_2).await
        }
        Some(Commands::Tui) | None => {
            // Origin is logged once the file subscriber is up
            let (origin, config) = load_config(&cli)?;
            run_tui(origin, config).await
        }
    }
}

async fn run_cli_search(config: &ClientConfig, prefix: &str) -> anyhow::Result<()> {
    let backend: Arc<dyn PathBackend> = Arc::new(HttpBackend::new(config)?);
    let rows = SearchClient::new(backend).search(prefix).await;

    if rows.is_empty() {
        println!("No actors found for '{}'", prefix);
        return Ok(());
    }

    println!("{:<12} {:<32} {}", "ID", "NAME", "BORN");
    for row in &rows {
        let row = costar_core::selection::TableRow::from(row);
        println!("{:<12} {:<32} {}", row.id, row.display_name, row.birth_year);
    }
    Ok(())
}

async fn run_cli_path(config: &ClientConfig, actor_1: &str, actor_2: &str) -> anyhow::Result<()> {
    let backend = HttpBackend::new(config)?;
    let (event_tx, _) = broadcast::channel::<EventEnvelope>(16);
    let submission =
        PathSubmission::new(EventEmitter::new(event_tx)).with_timeout(config.submit_timeout());

    let mut selections = SelectionState::new();
    selections.set(PickerId::First, actor_1.to_string());
    selections.set(PickerId::Second, actor_2.to_string());

    match submission.submit(&selections, &backend).await {
        Some(Ok(path)) => {
            println!("{}", path.header);
            for line in &path.lines {
                println!("  {}", line);
            }
            Ok(())
        }
        Some(Err(e)) => {
            eprintln!("Error: {}", e.user_message());
            tracing::debug!(error = %e, "path request failed");
            std::process::exit(1);
        }
        None => Ok(()),
    }
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(origin: ConfigOrigin, config: ClientConfig) -> anyhow::Result<()> {
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init_file(&log_path)?;
    origin.log();
    tracing::info!(base_url = %config.base_url, "starting costar");

    let backend: Arc<dyn PathBackend> = Arc::new(HttpBackend::new(&config)?);
    let (event_tx, _) = broadcast::channel::<EventEnvelope>(1_000);
    let events = EventEmitter::new(event_tx);

    let ctx = TuiContext {
        submission: PathSubmission::new(events.clone()).with_timeout(config.submit_timeout()),
        search: SearchClient::new(backend.clone()),
        backend,
        events,
    };

    let mut terminal = setup_terminal()?;
    let result = tui_loop(&mut terminal, &ctx, &config.base_url).await;
    restore_terminal(terminal)?;
    result
}

/// Everything key handlers need to start background work
struct TuiContext {
    backend: Arc<dyn PathBackend>,
    search: SearchClient,
    submission: PathSubmission,
    events: EventEmitter,
}

impl TuiContext {
    /// Apply an event originating in the UI loop itself
    fn apply(&self, state: &mut AppState, event: AppEvent) {
        reduce(state, &self.events.envelope(event));
    }

    fn query_changed(&self, state: &mut AppState, picker: PickerId, query: String) {
        self.apply(
            state,
            AppEvent::QueryChanged {
                picker,
                query: query.clone(),
            },
        );
        if query.trim().is_empty() {
            return;
        }
        let generation = state.picker(picker).issued_generation;
        self.search
            .spawn_search(picker, generation, query, self.events.clone());
    }

    fn submit(&self, state: &AppState) {
        if self.submission.is_in_flight() {
            tracing::debug!("submit pressed while a request is running");
            return;
        }
        let selections = state.selections.clone();
        let submission = self.submission.clone();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            submission.submit(&selections, backend.as_ref()).await;
        });
    }
}

enum KeyOutcome {
    Continue,
    Quit,
}

fn handle_key(ctx: &TuiContext, state: &mut AppState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
        KeyCode::Char('s') if ctrl => {
            ctx.submit(state);
            return KeyOutcome::Continue;
        }
        KeyCode::Tab => {
            state.focus = state.focus.next();
            return KeyOutcome::Continue;
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            return KeyOutcome::Continue;
        }
        _ => {}
    }

    match state.focus {
        Focus::Query(picker) => match key.code {
            KeyCode::Char(c) if !ctrl => {
                let mut query = state.picker(picker).query.clone();
                query.push(c);
                ctx.query_changed(state, picker, query);
            }
            KeyCode::Backspace => {
                let mut query = state.picker(picker).query.clone();
                if query.pop().is_some() {
                    ctx.query_changed(state, picker, query);
                }
            }
            KeyCode::Enter | KeyCode::Down => state.focus = Focus::Table(picker),
            _ => {}
        },
        Focus::Table(picker) => match key.code {
            KeyCode::Up => state.picker_mut(picker).cursor_up(),
            KeyCode::Down => state.picker_mut(picker).cursor_down(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let index = state.picker(picker).cursor;
                ctx.apply(state, AppEvent::RowSelected { picker, index });
            }
            KeyCode::Char('/') => state.focus = Focus::Query(picker),
            _ => {}
        },
        Focus::Results => match key.code {
            KeyCode::Up => state.panel.scroll_up(1),
            KeyCode::Down => state.panel.scroll_down(1),
            KeyCode::PageUp => state.panel.scroll_up(10),
            KeyCode::PageDown => state.panel.scroll_down(10),
            KeyCode::Enter => ctx.submit(state),
            _ => {}
        },
    }

    KeyOutcome::Continue
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ctx: &TuiContext,
    base_url: &str,
) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let mut event_rx = ctx.events.subscribe();
    let mut tick: u64 = 0;
    // Set when events were skipped; resolved once no submission is running
    let mut lag_pending = false;

    loop {
        loop {
            match event_rx.try_recv() {
                Ok(env) => reduce(&mut state, &env),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "ui fell behind the event stream");
                    lag_pending = true;
                }
                Err(_) => break,
            }
        }
        if lag_pending && !ctx.submission.is_in_flight() {
            lag_pending = false;
            if settle_after_lag(&mut state, false) {
                tracing::warn!("submission outcome was dropped; cleared loading indicator");
            }
        }

        terminal.draw(|f| ui::draw(f, &state, base_url, tick))?;
        tick = tick.wrapping_add(1);

        // The frame just drawn has laid out the new results
        if state.panel.scroll_pending {
            ctx.apply(&mut state, AppEvent::ResultsScrolled);
            continue;
        }

        if event::poll(FRAME_INTERVAL)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let KeyOutcome::Quit = handle_key(ctx, &mut state, key) {
                    break;
                }
            }
        }
    }

    tracing::info!("exiting");
    Ok(())
}
