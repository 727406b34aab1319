use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rehearsal_room::logging::init_logging;
use rehearsal_room::{Config, ReplyScheduler, RngSource, Session};
use tracing::{error, info};

mod app;
mod cli;
mod handler;
mod tui;
mod ui;

use app::App;
use cli::Cli;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    let settings = config.resolve(&cli.overrides())?;

    init_logging(&settings.log_level, settings.log_file.as_deref())?;
    info!(
        mood = %settings.mood,
        delay_ms = settings.reply_delay.as_millis() as u64,
        policy = ?settings.reply_policy,
        "Starting rehearsal room"
    );

    let (scheduler, replies) = ReplyScheduler::new(settings.reply_delay, settings.reply_policy);
    let session = Session::new(settings.mood, settings.reply_policy);
    let source = RngSource(StdRng::from_os_rng());
    let mut app = App::new(session, scheduler, Box::new(source));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, replies).await;
    tui::restore()?;

    if let Err(e) = &result {
        error!(error = %e, "Exited with error");
    }
    info!("Rehearsal room closed");
    result
}

async fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    mut replies: tokio::sync::mpsc::UnboundedReceiver<rehearsal_room::ReplyRequest>,
) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(app, event)?,
                None => break,
            },
            Some(reply) = replies.recv() => app.deliver_reply(reply),
        }
    }

    Ok(())
}
