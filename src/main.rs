//! Draftwell - Entry Point
//!
//! Parses the command line, then either exports the default data files or
//! runs the terminal demo.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use draftwell::data::{export_default_data, DataManager};
use draftwell::game::{Game, GameState};
use draftwell::ui::App;

const LOG_FILE: &str = "draftwell.log";
const DEFAULT_EXPORT_DIR: &str = "assets/data";

/// Target frames per second for the demo loop
const TARGET_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// What the binary was asked to do
#[derive(Debug, PartialEq)]
enum Command {
    /// Write the default RON files to a directory and exit
    ExportData(PathBuf),
    /// Run the demo, optionally with a fixed seed
    Play { seed: Option<u64> },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut seed = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export-data" => {
                let dir = args.next().unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string());
                return Ok(Command::ExportData(PathBuf::from(dir)));
            }
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                seed = Some(value.parse().with_context(|| format!("invalid seed {:?}", value))?);
            }
            other => bail!("unknown argument {:?}", other),
        }
    }
    Ok(Command::Play { seed })
}

/// Log to a file so output never lands on the TUI
fn init_logging() -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE)
        .or_else(|_| File::create("/dev/null"))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    log::info!("Starting Draftwell v{}", env!("CARGO_PKG_VERSION"));

    match parse_args(std::env::args().skip(1))? {
        Command::ExportData(dir) => {
            export_default_data(&dir)?;
            println!("Default draft data written to {}", dir.display());
            Ok(())
        }
        Command::Play { seed } => run_tui(Game::with_data(DataManager::new(), seed)),
    }
}

fn run_tui(mut game: Game) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new();
    let result = run_loop(&mut terminal, &mut app, &mut game);

    // Restore before reporting so the message is readable
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => log::info!("Draftwell shut down cleanly"),
        Err(e) => {
            log::error!("Demo exited with error: {}", e);
            eprintln!("Error: {}", e);
        }
    }
    result
}

/// Poll input, feed real frame time to the game, draw
fn run_loop(terminal: &mut Tui, app: &mut App, game: &mut Game) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, game) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        // Unscaled; the scheduler keeps counting while gameplay is frozen
        game.update(delta);
        terminal.draw(|frame| app.render(frame, game))?;

        if *game.state() == GameState::Quit {
            break;
        }

        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}
