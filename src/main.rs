mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{DataSource, LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use bracket_api::client::{self, BracketApi};
use bracket_api::resolver::{SnapshotSource, TeamCache};
use crossterm::event::{self as crossterm_event, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DemoFormat {
    Single,
    Double,
}

#[derive(Debug, Default, PartialEq)]
struct LaunchOptions {
    league_id: Option<String>,
    demo: Option<DemoFormat>,
    token: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(LaunchOptions),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = handle_cli_args();
    let mut settings = AppSettings::load();
    if options.league_id.is_none() && options.demo.is_none() && settings.bracket_json.is_none() {
        eprintln!("Missing league id\n\n{}", usage_text());
        std::process::exit(2);
    }
    let source = build_source(&options, &settings)?;
    settings.access_token = source.tenant_theme.as_ref().map(|(_, token)| token.clone());
    let refresh_interval = settings.refresh_interval;

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    info!("viewing {} ({})", source.league_id, describe_source(&options, &settings));
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(source, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic bracket reload thread
    let periodic_task = refresh_interval.map(|every| {
        let refresher = PeriodicRefresher::new(network_req_tx.clone(), every);
        tokio::spawn(refresher.run())
    });

    // Trigger bracket load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }

    Ok(())
}

fn handle_cli_args() -> LaunchOptions {
    match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{}", usage_text());
            std::process::exit(0);
        }
        Ok(Command::Version) => {
            println!("bracketui {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--demo" => {
                let format = match args.peek().map(String::as_str) {
                    Some("single") => Some(DemoFormat::Single),
                    Some("double") => Some(DemoFormat::Double),
                    _ => None,
                };
                if format.is_some() {
                    args.next();
                }
                options.demo = Some(format.unwrap_or(DemoFormat::Double));
            }
            "--token" => {
                let token = args.next().ok_or("--token needs a value")?;
                options.token = Some(token);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown argument: {flag}")),
            league_id => {
                if options.league_id.is_some() {
                    return Err(format!("Unexpected argument: {league_id}"));
                }
                options.league_id = Some(league_id.to_string());
            }
        }
    }

    Ok(Command::Run(options))
}

fn usage_text() -> &'static str {
    "bracketui - tournament bracket terminal UI

Usage:
  bracketui <league-id> [--token <access-token>]
  bracketui --demo [single|double]
  bracketui --help
  bracketui --version

Environment:
  BRACKETUI_API_BASE_URL   API origin (default http://127.0.0.1:8080)
  BRACKETUI_BRACKET_JSON   Path to a local bracket snapshot used instead of the API
  BRACKETUI_ACCESS_TOKEN   Bearer token for the tenant bracket theme
  BRACKETUI_REFRESH_SECS   Reload the bracket every N seconds (0 = off)
  BRACKETUI_LOG            Log level: error, warn, info, debug, trace"
}

/// Pick the bracket provider and team resolver for this session.
fn build_source(options: &LaunchOptions, settings: &AppSettings) -> anyhow::Result<DataSource> {
    if let Some(format) = options.demo {
        let snapshot = client::demo_snapshot()?;
        let league_id = options
            .league_id
            .clone()
            .or_else(|| snapshot.bracket.data.league_id.clone())
            .unwrap_or_else(|| "demo".to_string());
        let mut source = SnapshotSource::new(snapshot);
        if format == DemoFormat::Single {
            source = source.with_format_type("single_elim");
        }
        return Ok(snapshot_source(league_id, source));
    }

    if let Some(path) = settings.bracket_json.as_deref() {
        let snapshot = client::load_snapshot(path)?;
        let league_id = options
            .league_id
            .clone()
            .or_else(|| snapshot.bracket.data.league_id.clone())
            .unwrap_or_else(|| "snapshot".to_string());
        return Ok(snapshot_source(league_id, SnapshotSource::new(snapshot)));
    }

    let api = BracketApi::new(&settings.api_base_url);
    let token = options.token.clone().or_else(|| settings.access_token.clone());
    Ok(DataSource {
        league_id: options.league_id.clone().unwrap_or_default(),
        provider: Arc::new(api.clone()),
        teams: Arc::new(TeamCache::new(Arc::new(api.clone()))),
        tenant_theme: token.map(|token| (api, token)),
    })
}

fn snapshot_source(league_id: String, source: SnapshotSource) -> DataSource {
    let source = Arc::new(source);
    DataSource {
        league_id,
        provider: source.clone(),
        teams: Arc::new(TeamCache::new(source)),
        tenant_theme: None,
    }
}

fn describe_source(options: &LaunchOptions, settings: &AppSettings) -> String {
    match (options.demo, settings.bracket_json.as_deref()) {
        (Some(_), _) => "embedded demo".to_string(),
        (None, Some(path)) => format!("snapshot {path}"),
        (None, None) => settings.api_base_url.clone(),
    }
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let wants_theme = app.lock().await.settings.access_token.is_some();
            let _ = network_requests.send(NetworkRequest::LoadBracket).await;
            // Queued after the bracket so the tenant theme wins over the
            // bracket's own.
            if wants_theme {
                let _ = network_requests.send(NetworkRequest::LoadTenantTheme).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Mouse(mouse_event) => app.lock().await.on_mouse(mouse_event),
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::BracketLoaded { bracket } => {
            let mut guard = app.lock().await;
            guard.on_bracket_loaded(bracket);
        }
        NetworkResponse::ThemeLoaded { theme } => {
            let mut guard = app.lock().await;
            guard.on_theme_loaded(theme);
        }
        NetworkResponse::ThemeFailed { message } => {
            let mut guard = app.lock().await;
            guard.on_theme_failed(&message);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Mouse(mouse_event) => Some(UiEvent::Mouse(mouse_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, EnableMouseCapture)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where there is no one left to
/// report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, DisableMouseCapture);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn league_id_and_token() {
        let cmd = parse(&["league-42", "--token", "abc"]).unwrap();
        assert_eq!(
            cmd,
            Command::Run(LaunchOptions {
                league_id: Some("league-42".into()),
                demo: None,
                token: Some("abc".into()),
            })
        );
    }

    #[test]
    fn demo_format_is_optional() {
        let Command::Run(opts) = parse(&["--demo"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(opts.demo, Some(DemoFormat::Double));

        let Command::Run(opts) = parse(&["--demo", "single"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(opts.demo, Some(DemoFormat::Single));
        assert!(opts.league_id.is_none());

        let Command::Run(opts) = parse(&["--demo", "my-league"]).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(opts.demo, Some(DemoFormat::Double));
        assert_eq!(opts.league_id.as_deref(), Some("my-league"));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help", "bogus"]), Ok(Command::Help));
        assert_eq!(parse(&["-V"]), Ok(Command::Version));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["--nope"]).is_err());
        assert!(parse(&["--token"]).is_err());
        assert!(parse(&["a", "b"]).is_err());
    }

    #[test]
    fn demo_source_uses_the_snapshot_league() {
        let options = LaunchOptions {
            demo: Some(DemoFormat::Single),
            ..LaunchOptions::default()
        };
        let source = build_source(&options, &AppSettings::default()).unwrap();
        assert_eq!(source.league_id, "demo-invitational");
        assert!(source.tenant_theme.is_none());
    }

    #[test]
    fn api_source_carries_the_token_for_the_theme() {
        let options = LaunchOptions {
            league_id: Some("l1".into()),
            token: Some("cli-token".into()),
            ..LaunchOptions::default()
        };
        let settings = AppSettings {
            access_token: Some("env-token".into()),
            ..AppSettings::default()
        };
        let source = build_source(&options, &settings).unwrap();
        assert_eq!(source.league_id, "l1");
        let (_, token) = source.tenant_theme.expect("theme configured");
        assert_eq!(token, "cli-token");
    }
}
