use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use watch_core::{update, AppState, Msg};
use watch_engine::EngineSettings;
use watch_logging::{watch_info, watch_warn};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui::commands::{parse_line, Command, HELP};
use super::ui::render::render;

/// How long the loop waits for input before polling the engine again.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);
    watch_info!("Console starting");

    let state_dir = persistence::state_dir();
    let runner = EffectRunner::new(EngineSettings::default(), state_dir.clone());
    let mut console = Console::new(runner);

    match persistence::load_endpoint(&state_dir) {
        Some(endpoint) => console.dispatch(Msg::EndpointRestored(endpoint))?,
        None => console.render()?,
    }

    let input_rx = spawn_input_reader();
    loop {
        while let Some(msg) = console.runner.poll() {
            console.dispatch(msg)?;
        }

        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_line(&line) {
                Ok(Some(Command::Msg(msg))) => console.dispatch(msg)?,
                Ok(Some(Command::Help)) => console.print(HELP)?,
                Ok(Some(Command::Quit)) => break,
                Ok(None) => {}
                Err(problem) => console.print(&problem)?,
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    console.dispatch(Msg::Shutdown)?;
    watch_info!("Console stopped");
    Ok(())
}

/// Owns the single [`AppState`]; every message goes through [`update`] here,
/// one at a time.
struct Console {
    state: AppState,
    runner: EffectRunner,
}

impl Console {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out)?;
        for line in render(&self.state.view()) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    fn print(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    watch_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
    });
    rx
}
