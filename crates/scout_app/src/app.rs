use std::io::{self, BufRead};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use scout_core::{update, AppState, Msg};
use scout_engine::{ChannelRenderer, EngineError, EngineHandle, UiEvent};
use scout_logging::{scout_info, scout_warn};

use crate::commands::{help_text, parse_command, Command};
use crate::config::AppConfig;
use crate::effects::{with_view, EffectRunner, SharedView};
use crate::render::TerminalView;
use crate::signals::spawn_signal_listener;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum Input {
    Line(String),
    Eof,
    Interrupt,
}

pub fn run_app(config: AppConfig) -> Result<(), EngineError> {
    let view: SharedView = Arc::new(Mutex::new(TerminalView::new(io::stdout())));
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>();
    let engine = EngineHandle::new(
        config.engine_settings(),
        Arc::new(ChannelRenderer::new(ui_tx)),
    )?;
    scout_info!("Scout started against {}", config.api_base_url);
    let printer = spawn_event_printer(ui_rx, view.clone());

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx.clone());
    if let Err(err) = spawn_signal_listener(input_tx) {
        scout_warn!("Signal handling unavailable: {}", err);
    }

    let state = AppState::new().with_suggest_min_chars(config.suggest_min_chars);
    let mut app = App::new(state, EffectRunner::new(engine, view.clone()), view);
    app.greet();

    for input in input_rx {
        match input {
            Input::Line(line) => {
                if !app.handle_line(&line) {
                    break;
                }
            }
            other => {
                scout_info!("Input closed: {:?}", other);
                break;
            }
        }
    }

    app.shutdown();
    // The engine dropped its renderer, so the printer drains and exits.
    let _ = printer.join();
    Ok(())
}

/// Prints engine events as they arrive, off the input thread.
fn spawn_event_printer(rx: mpsc::Receiver<UiEvent>, view: SharedView) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in rx {
            with_view(&view, |view| view.show_event(&event));
        }
    })
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let input = match line {
                Ok(line) => Input::Line(line),
                Err(err) => {
                    scout_warn!("Failed to read stdin: {}", err);
                    break;
                }
            };
            if tx.send(input).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Eof);
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
    view: SharedView,
}

impl App {
    fn new(state: AppState, runner: EffectRunner, view: SharedView) -> Self {
        Self {
            state,
            runner,
            view,
        }
    }

    fn greet(&self) {
        let title = self.state.view().page_title;
        with_view(&self.view, |view| {
            view.show_text(&format!("{title}\nType help for commands.\n"))
        });
    }

    /// Returns false once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Command::Send(msgs) => {
                for msg in msgs {
                    self.dispatch_msg(msg);
                }
            }
            Command::Status => {
                let current = self.state.view();
                with_view(&self.view, |view| view.show_view(&current));
            }
            Command::Help => with_view(&self.view, |view| view.show_text(&help_text())),
            Command::Invalid(reason) => with_view(&self.view, |view| view.show_warning(&reason)),
            Command::Quit => return false,
        }
        true
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty().then(|| state.view());
        self.state = state;
        if let Some(current) = changed {
            with_view(&self.view, |view| view.show_view(&current));
        }
        self.runner.enqueue(effects);
    }

    fn shutdown(mut self) {
        self.dispatch_msg(Msg::Unload);
        self.runner.shutdown();
    }
}
