//! Runtime bridge between the UI command queue and backend event intake.

use std::{io, sync::Arc, thread};

use client_core::BackgroundApi;
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{BackendEvent, UiEvent},
};

/// Spawn the backend worker. Each command runs as its own task, so several
/// requests may be in flight; the reducer's tokens sort out which one counts.
/// The worker exits once every command sender is dropped.
pub fn launch(
    api: Arc<dyn BackgroundApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("backend-bridge".into())
        .spawn(move || run(api, cmd_rx, ui_tx))
}

fn run(api: Arc<dyn BackgroundApi>, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = ui_tx.try_send(UiEvent::Backend(BackendEvent::WorkerFailed(format!(
                "backend worker startup failure: {err}"
            ))));
            return;
        }
    };

    runtime.block_on(async move {
        tracing::debug!("backend worker ready");
        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            tokio::spawn(async move {
                let name = cmd.name();
                let token = cmd.token();
                let event = execute(api.as_ref(), cmd).await;
                if ui_tx.try_send(UiEvent::Backend(event)).is_err() {
                    tracing::warn!(
                        command = name,
                        token = token.0,
                        "ui event queue unavailable; dropping result"
                    );
                }
            });
        }
        tracing::debug!("command queue closed; backend worker stopping");
    });
}

async fn execute(api: &dyn BackgroundApi, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::RemoveBackground { token, file } => BackendEvent::RemovalFinished {
            token,
            outcome: api.remove_background(file).await,
        },
        BackendCommand::AddBackground { token, request } => BackendEvent::CompositeFinished {
            token,
            outcome: api.add_background(request).await,
        },
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
