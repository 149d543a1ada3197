//! Routing of reducer effects to the backend command queue and the presenter.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::DataUri;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{Intent, UiError, UiErrorCategory},
        reducer::Effect,
        state::ViewModel,
    },
};

/// Rendering substrate: shows the view and performs client-side side effects.
pub trait Presenter {
    fn render(&mut self, view: &ViewModel);
    fn save_file(&mut self, filename: &str, image: &DataUri) -> anyhow::Result<()>;
    fn reveal_final(&mut self);
}

/// Queue a command for the backend worker. A full or closed queue comes back
/// as a failure intent so the UI never waits on a request that was not sent.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Option<Intent> {
    let cmd_name = cmd.name();
    let token = cmd.token();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, token = token.0, "queued ui->backend command");
            None
        }
        Err(TrySendError::Full(_)) => Some(Intent::Fail(UiError::new(
            UiErrorCategory::Transport,
            "UI command queue is full; please retry",
        ))),
        Err(TrySendError::Disconnected(_)) => Some(Intent::Fail(UiError::new(
            UiErrorCategory::Transport,
            "Backend worker is not running; restart the app",
        ))),
    }
}

/// Carry out effects in order. Returns follow-up intents and how many backend
/// commands were queued.
pub fn run_effects<P: Presenter + ?Sized>(
    effects: Vec<Effect>,
    cmd_tx: &Sender<BackendCommand>,
    presenter: &mut P,
) -> (Vec<Intent>, usize) {
    let mut follow_ups = Vec::new();
    let mut queued = 0;

    for effect in effects {
        match effect {
            Effect::Backend(cmd) => match dispatch_backend_command(cmd_tx, cmd) {
                Some(intent) => follow_ups.push(intent),
                None => queued += 1,
            },
            Effect::SaveFile { filename, image } => {
                if let Err(err) = presenter.save_file(filename, &image) {
                    tracing::error!(filename, error = %err, "failed to save image");
                    follow_ups.push(Intent::Fail(UiError::new(
                        UiErrorCategory::Local,
                        format!("Failed to save {filename}"),
                    )));
                }
            }
            Effect::RevealFinal => presenter.reveal_final(),
        }
    }

    (follow_ups, queued)
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
