use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use clap::Parser;
use validator_core::{update, FormState, FormViewModel, Msg, SubmissionState};
use validator_engine::{resolve_base_url, EngineHandle, SubmitSettings};
use validator_logging::{level_for_verbosity, validator_debug, validator_info};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::input::{command_event, load_requirements, parse_command, HELP};
use super::logging::{self, LogDestination};
use super::ui::render::{render_form, render_result, SUBMIT_DISABLED_NOTICE};

/// Everything the message loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Dispatch(Msg),
    Show,
    Notice(String),
    /// Stdin reached end of file; leave once any pending submission settles.
    InputClosed,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    logging::initialize(
        LogDestination::from_log_file(cli.log_file.as_deref()),
        level_for_verbosity(cli.verbose),
    );

    let base = resolve_base_url(cli.base_url.as_deref())?;
    let mut settings = SubmitSettings::for_base(&base)?;
    settings.request_timeout = cli.request_timeout();
    validator_info!("validation endpoint: {}", settings.endpoint);

    let engine = EngineHandle::new(settings).context("failed to start submission engine")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(EffectRunner::new(engine, event_tx.clone()));

    if let Some(url) = cli.url.clone() {
        app.dispatch(Msg::UrlChanged(url));
    }
    if let Some(path) = cli.file.as_deref() {
        let file = load_requirements(path)?;
        app.dispatch(Msg::FileChosen(Some(file)));
    }

    let mut stdout = io::stdout();
    if cli.interactive {
        spawn_stdin_reader(event_tx);
        run_interactive(&mut app, &event_rx, &mut stdout)
    } else {
        app.dispatch(Msg::SubmitClicked);
        let view = app.wait_until_settled(&event_rx)?;
        writeln!(stdout, "{}", render_result(&view))?;
        Ok(())
    }
}

pub struct App {
    state: FormState,
    runner: EffectRunner,
}

impl App {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: FormState::new(),
            runner,
        }
    }

    pub fn view(&self) -> FormViewModel {
        self.state.view()
    }

    /// Applies one message, runs its effects and returns the view if it needs a redraw.
    pub fn dispatch(&mut self, msg: Msg) -> Option<FormViewModel> {
        validator_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            Some(self.state.view())
        } else {
            None
        }
    }

    /// Pumps loop events until the pending submission settles.
    pub fn wait_until_settled(
        &mut self,
        events: &mpsc::Receiver<AppEvent>,
    ) -> anyhow::Result<FormViewModel> {
        while matches!(self.state.submission(), SubmissionState::Pending { .. }) {
            match events.recv() {
                Ok(AppEvent::Dispatch(msg)) => {
                    self.dispatch(msg);
                }
                Ok(_) => {}
                Err(_) => bail!("submission engine stopped before the request settled"),
            }
        }
        Ok(self.state.view())
    }
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(command)) => command_event(command),
                    Ok(None) => continue,
                    Err(err) => AppEvent::Notice(err.to_string()),
                },
                Err(err) => AppEvent::Notice(format!("failed to read stdin: {err}")),
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

fn run_interactive(
    app: &mut App,
    events: &mpsc::Receiver<AppEvent>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", render_form(&app.view()))?;
    writeln!(out, "{HELP}")?;

    while let Ok(event) = events.recv() {
        match event {
            AppEvent::Dispatch(Msg::SubmitClicked) if !app.view().submit_enabled => {
                writeln!(out, "{SUBMIT_DISABLED_NOTICE}")?;
            }
            AppEvent::Dispatch(msg) => {
                if let Some(view) = app.dispatch(msg) {
                    writeln!(out, "{}", render_form(&view))?;
                }
            }
            AppEvent::Show => writeln!(out, "{}", render_form(&app.view()))?,
            AppEvent::Notice(text) => writeln!(out, "{text}")?,
            AppEvent::InputClosed => {
                if app.view().submitting {
                    let view = app.wait_until_settled(events)?;
                    writeln!(out, "{}", render_form(&view))?;
                    out.flush()?;
                }
                break;
            }
            AppEvent::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}
