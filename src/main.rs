use asteroid_explorer::{
    api::AstroClient,
    app::{App, Request},
    config::Config,
    events::{Event, EventHandler},
    handlers, logging,
    range::local_today,
    ui,
};
use color_eyre::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    install_panic_hook();
    color_eyre::install()?;

    let config = Config::load();
    let client = Arc::new(AstroClient::new(&config.api)?);
    let export_dir = Arc::new(config.export.directory.clone());
    info!("Using NASA API at {}", config.api.base_url);

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new();
    let mut events = EventHandler::new(150);

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        let Some(event) = events.next().await else {
            break;
        };
        if let Some(request) = app.apply(event) {
            dispatch(request, client.clone(), export_dir.clone(), events.tx.clone());
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Runs one user action on its own task and posts the outcome back to the loop.
fn dispatch(request: Request, client: Arc<AstroClient>, export_dir: Arc<String>, tx: UnboundedSender<Event>) {
    info!("Dispatching {:?}", request);
    tokio::spawn(async move {
        let today = local_today();
        let event = match request {
            Request::Asteroids { start, end } => {
                Event::AsteroidsLoaded(handlers::list_asteroids(&*client, start, end, today).await)
            }
            Request::Picture { date } => Event::PictureLoaded(handlers::show_picture(&*client, date, today).await),
            Request::Export { start, end } => match handlers::export_asteroids(&*client, start, end, today).await {
                Ok(artifact) => {
                    let range = artifact.range;
                    let saved = tokio::task::spawn_blocking(move || artifact.save_in(export_dir.as_str())).await;
                    let result = match saved {
                        Ok(Ok(path)) => Ok(path),
                        Ok(Err(e)) => Err(handlers::ExportFailure::new(range, e).message),
                        Err(e) => Err(format!("Error exporting asteroid data: {}", e)),
                    };
                    Event::ExportFinished { range, result }
                }
                Err(failure) => Event::ExportFinished {
                    range: failure.range,
                    result: Err(failure.message),
                },
            },
        };
        let _ = tx.send(event);
    });
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
        original_hook(panic_info);
    }));
}
