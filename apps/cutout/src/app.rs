//! Event loop gluing the reducer, the backend worker and a presenter.

use std::{collections::VecDeque, io, sync::Arc, thread};

use client_core::BackgroundApi;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::{
        events::{intent_for, BackendEvent, UiEvent},
        orchestration::{run_effects, Presenter},
        reducer::reduce,
        state::{Session, ViewModel},
    },
};

pub const COMMAND_QUEUE_CAPACITY: usize = 64;

pub struct StudioApp<P: Presenter> {
    session: Session,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    presenter: P,
    in_flight: usize,
}

impl<P: Presenter> StudioApp<P> {
    pub fn new(presenter: P, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            session: Session::new(),
            cmd_tx,
            ui_rx,
            presenter,
            in_flight: 0,
        }
    }

    /// Wire channels, start the backend worker and return the app with the
    /// worker's handle. The worker stops when the app is dropped.
    pub fn launch(
        api: Arc<dyn BackgroundApi>,
        presenter: P,
    ) -> io::Result<(Self, thread::JoinHandle<()>)> {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(COMMAND_QUEUE_CAPACITY);
        let (ui_tx, ui_rx) = unbounded::<UiEvent>();
        let worker = runtime::launch(api, cmd_rx, ui_tx)?;
        let mut app = Self::new(presenter, cmd_tx, ui_rx);
        app.render();
        Ok((app, worker))
    }

    /// Run one event to completion, including any follow-up intents, then
    /// render once.
    pub fn handle(&mut self, event: UiEvent) {
        if let UiEvent::Backend(backend_event) = &event {
            match backend_event {
                BackendEvent::RemovalFinished { .. } | BackendEvent::CompositeFinished { .. } => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                }
                BackendEvent::WorkerFailed(_) => self.in_flight = 0,
            }
        }

        let mut pending: VecDeque<_> = intent_for(event).into();
        while let Some(intent) = pending.pop_front() {
            let effects = reduce(&mut self.session, intent);
            let (follow_ups, queued) = run_effects(effects, &self.cmd_tx, &mut self.presenter);
            self.in_flight += queued;
            pending.extend(follow_ups);
        }

        self.render();
    }

    /// Block until every queued request has reported back. Stale completions
    /// are still counted; the reducer simply ignores them.
    pub fn wait_for_backend(&mut self) {
        while self.in_flight > 0 {
            match self.ui_rx.recv() {
                Ok(event) => self.handle(event),
                Err(_) => {
                    tracing::error!(in_flight = self.in_flight, "backend worker exited early");
                    self.handle(UiEvent::Backend(BackendEvent::WorkerFailed(
                        "Backend worker is not running; restart the app".to_string(),
                    )));
                }
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn view(&self) -> ViewModel {
        self.session.view()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn render(&mut self) {
        let view = self.session.view();
        self.presenter.render(&view);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
