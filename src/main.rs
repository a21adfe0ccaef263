use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

mod agent;
mod app;
mod config;
mod logging;
mod shell_agent;

use app::{App, ChannelAdapter, SystemClipboard};
use config::Config;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("chatty {}", APP_VERSION);
                return Ok(());
            }
            "--agent" => {
                let config = Config::from_env();
                return shell_agent::run(&config.shell);
            }
            unknown => {
                eprintln!("unknown argument: {}", unknown);
                std::process::exit(2);
            }
        }
    }

    let log_rx = logging::init();
    let config = Config::from_env();

    let command = match config.agent_command.clone() {
        Some(command) => command,
        None => default_agent_command()?,
    };
    let (agent, human_tx, reply_rx) = agent::spawn(&command)?;
    info!(pid = agent.id(), "agent process running");

    let mut app = App::new(
        &config,
        ChannelAdapter::new(human_tx, reply_rx),
        Box::new(SystemClipboard::default()),
        Some(log_rx),
    );

    install_panic_hook();
    let result = setup_terminal().and_then(|mut terminal| {
        let run = app::run_app(&mut terminal, &mut app, config.tick);
        let restored = restore_terminal(&mut terminal);
        run.and(restored)
    });
    if result.is_err() {
        // setup may have failed halfway; make sure the shell gets a sane tty.
        restore_terminal_state();
    }

    // Closing our end of the human channel lets the bridge thread finish.
    drop(app);
    agent.shutdown();

    if let Err(err) = &result {
        error!(error = %err, "terminal session failed");
    }
    result
}

fn default_agent_command() -> Result<Vec<String>> {
    let exe = std::env::current_exe().context("locate chatty executable")?;
    Ok(vec![
        exe.to_string_lossy().into_owned(),
        "--agent".to_string(),
    ])
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    crossterm::execute!(
        std::io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("enter alternate screen")?;

    let mut terminal =
        Terminal::new(CrosstermBackend::new(std::io::stdout())).context("create terminal")?;
    terminal.clear().context("clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    restore_terminal_state();
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

/// Undo every mode `setup_terminal` turns on. Safe to call more than once
/// and from a panic hook.
fn restore_terminal_state() {
    crossterm::execute!(
        std::io::stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )
    .ok();
    disable_raw_mode().ok();
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal_state();
        default_hook(info);
    }));
}
