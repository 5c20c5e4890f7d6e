use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;
use ga_monitor_core::{update, JobStatus, MonitorState, Msg, SessionState};
use ga_monitor_engine::{ReqwestApiClient, TokenStore};
use monitor_logging::{monitor_debug, monitor_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::login::ClearTokenOnUnauthorized;
use super::render::TerminalRenderer;
use crate::cli::RunArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
    Failed,
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, RunOutcome::Failed)
    }
}

/// Whether the run is over after `last` was applied to `state`.
///
/// A stopped job is only over once the stop request has resolved.
pub fn run_outcome(state: &MonitorState, last: &Msg) -> Option<RunOutcome> {
    if state.session() != SessionState::Idle {
        return None;
    }
    match state.job().map(|job| job.status()) {
        None => Some(RunOutcome::Failed),
        Some(JobStatus::Completed) => Some(RunOutcome::Completed),
        Some(JobStatus::Failed) => Some(RunOutcome::Failed),
        Some(JobStatus::Cancelled) => {
            matches!(last, Msg::StopFinished { .. }).then_some(RunOutcome::Stopped)
        }
        Some(JobStatus::Pending | JobStatus::Active) => None,
    }
}

/// Starts one GA job and follows it until it completes, fails or is stopped.
pub fn run_monitor(
    config: &AppConfig,
    args: &RunArgs,
    tokens: Arc<dyn TokenStore>,
) -> Result<RunOutcome> {
    if tokens.token().is_none() {
        monitor_info!("No stored token; requests are sent unauthenticated");
    }
    let login = Arc::new(ClearTokenOnUnauthorized::new(tokens.clone()));
    let api = ReqwestApiClient::new(&config.api_settings(), tokens, login)
        .context("failed to build HTTP client")?;

    let settings = config.monitor_settings();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut state = MonitorState::with_batch_size(settings.batch_size);
    let effects = EffectRunner::new(Arc::new(api), settings, msg_tx.clone());
    spawn_stdin_reader(msg_tx.clone());

    let (start_date, end_date) = args.dates(Local::now().date_naive());
    println!("Starting GA job for {start_date} to {end_date} (type `stop` to stop)");
    let mut renderer = TerminalRenderer::new();
    let mut next = Msg::RunRequested {
        start_date,
        end_date,
        parameters: args.parameters(),
    };

    loop {
        let last = next.clone();
        let (new_state, pending) = update(state, next);
        state = new_state;
        effects.run(pending);

        if state.consume_dirty() {
            print_lines(&renderer.render(&state.view()));
        }
        if let Some(outcome) = run_outcome(&state, &last) {
            monitor_info!("Run finished: {:?}", outcome);
            return Ok(outcome);
        }

        next = msg_rx.recv().context("engine event channel closed")?;
    }
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "stop" | "q" => {
                    if msg_tx.send(Msg::StopClicked).is_err() {
                        break;
                    }
                }
                "" => {}
                other => monitor_debug!("Ignoring input {:?}", other),
            }
        }
    });
}

fn print_lines(lines: &[String]) {
    let mut stdout = io::stdout().lock();
    for line in lines {
        let _ = writeln!(stdout, "{line}");
    }
    let _ = stdout.flush();
}
