use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use molalign::engine::progress::{Progress, ProgressCallback};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::warn;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    /// Completed steps accumulated by a [`CliProgressHandler`] since the last advance.
    Advance(Arc<AtomicU64>),
    Log(String),
}

/// A phase currently shown on screen.
struct ActivePhase {
    name: &'static str,
    bar: ProgressBar,
    started: Instant,
}

/// Renders workflow progress and routed log lines on stderr.
///
/// Runs as its own task; everything reaches it through the event channel so
/// worker threads never touch the terminal.
pub struct UiManager {
    mp: Arc<MultiProgress>,
    phase: Option<ActivePhase>,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
    // Keeps the MultiProgress alive between phases.
    anchor: ProgressBar,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(1024);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = Arc::new(MultiProgress::with_draw_target(
            ProgressDrawTarget::stderr_with_hz(12),
        ));
        let anchor = mp.add(ProgressBar::hidden());
        let manager = Self {
            mp,
            phase: None,
            event_receiver,
            shutdown_receiver,
            anchor,
        };

        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => self.handle_event(event),
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        self.close_phase();
        self.anchor.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => {
                self.mp.println(line).ok();
            }
            UiEvent::Advance(pending) => {
                let steps = pending.swap(0, Ordering::AcqRel);
                if let Some(phase) = &self.phase {
                    phase.bar.inc(steps);
                }
            }
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.close_phase();
                let bar = self.mp.add(ProgressBar::new_spinner());
                bar.set_style(Self::spinner_style());
                bar.set_message(name);
                bar.enable_steady_tick(Duration::from_millis(80));
                self.phase = Some(ActivePhase {
                    name,
                    bar,
                    started: Instant::now(),
                });
            }
            Progress::PhaseFinish => {
                if let Some(phase) = self.phase.take() {
                    phase.bar.finish_and_clear();
                    self.mp
                        .println(format!(
                            "✓ {} ({:.2}s)",
                            phase.name,
                            phase.started.elapsed().as_secs_f64()
                        ))
                        .ok();
                }
            }
            Progress::TaskStart { total_steps } => {
                if let Some(phase) = &self.phase {
                    phase.bar.disable_steady_tick();
                    phase.bar.set_style(Self::bar_style());
                    phase.bar.set_length(total_steps);
                    phase.bar.reset();
                }
            }
            Progress::TaskIncrement => {
                if let Some(phase) = &self.phase {
                    phase.bar.inc(1);
                }
            }
            Progress::TaskFinish => {
                if let Some(phase) = &self.phase {
                    phase.bar.finish();
                }
            }
        }
    }

    /// Drops a phase that never reported its end, e.g. after a workflow error.
    fn close_phase(&mut self) {
        if let Some(phase) = self.phase.take() {
            phase.bar.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} pairs ({rate}, {eta})",
        )
        .expect("Invalid template")
        .with_key(
            "rate",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.0}/s", state.per_sec());
            },
        )
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s left", state.eta().as_secs_f64());
            },
        )
        .progress_chars("━╸ ")
    }
}

/// Bridges a core [`ProgressReporter`](molalign::engine::progress::ProgressReporter)
/// to the UI channel.
///
/// Step increments arrive from many rayon workers at once, so they are summed
/// into a shared counter and the UI is woken with a single [`UiEvent::Advance`]
/// per batch instead of one message per step.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
    pending: Arc<AtomicU64>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self {
            sender,
            pending: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |progress: Progress| handler.forward(progress))
    }

    fn forward(&self, progress: Progress) {
        let event = match progress {
            Progress::TaskIncrement => {
                // Only the step that finds the counter empty wakes the UI.
                if self.pending.fetch_add(1, Ordering::AcqRel) != 0 {
                    return;
                }
                UiEvent::Advance(self.pending.clone())
            }
            Progress::TaskStart { .. } => {
                self.pending.store(0, Ordering::Release);
                UiEvent::Progress(progress)
            }
            other => UiEvent::Progress(other),
        };
        if let Err(e) = self.sender.try_send(event) {
            warn!("Failed to send progress update to UI channel: {}", e);
        }
    }
}
