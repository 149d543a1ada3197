use super::*;
use client_core::ImageFile;
use crossbeam_channel::bounded;

use crate::controller::state::RequestToken;

#[derive(Default)]
struct RecordingPresenter {
    saved: Vec<(String, DataUri)>,
    reveals: usize,
    fail_saves: bool,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, _view: &ViewModel) {}

    fn save_file(&mut self, filename: &str, image: &DataUri) -> anyhow::Result<()> {
        if self.fail_saves {
            anyhow::bail!("disk full");
        }
        self.saved.push((filename.to_string(), image.clone()));
        Ok(())
    }

    fn reveal_final(&mut self) {
        self.reveals += 1;
    }
}

fn removal(token: u64) -> BackendCommand {
    BackendCommand::RemoveBackground {
        token: RequestToken(token),
        file: ImageFile::new("cat.png", "image/png", vec![1]),
    }
}

#[test]
fn queued_command_reaches_worker() {
    let (cmd_tx, cmd_rx) = bounded(4);

    assert!(dispatch_backend_command(&cmd_tx, removal(3)).is_none());

    let cmd = cmd_rx.try_recv().expect("command queued");
    assert_eq!(cmd.token(), RequestToken(3));
}

#[test]
fn full_queue_becomes_failure_intent() {
    let (cmd_tx, _cmd_rx) = bounded(1);
    assert!(dispatch_backend_command(&cmd_tx, removal(1)).is_none());

    match dispatch_backend_command(&cmd_tx, removal(2)) {
        Some(Intent::Fail(err)) => {
            assert_eq!(err.category(), UiErrorCategory::Transport);
            assert!(err.message().contains("full"));
        }
        other => panic!("unexpected dispatch result: {other:?}"),
    }
}

#[test]
fn closed_queue_becomes_failure_intent() {
    let (cmd_tx, cmd_rx) = bounded(1);
    drop(cmd_rx);

    match dispatch_backend_command(&cmd_tx, removal(1)) {
        Some(Intent::Fail(err)) => assert!(err.message().contains("not running")),
        other => panic!("unexpected dispatch result: {other:?}"),
    }
}

#[test]
fn effects_run_in_order_and_count_queued_commands() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let mut presenter = RecordingPresenter::default();
    let image = DataUri::png(b"final");

    let (follow_ups, queued) = run_effects(
        vec![
            Effect::Backend(removal(1)),
            Effect::SaveFile {
                filename: "final-image.png",
                image: image.clone(),
            },
            Effect::RevealFinal,
        ],
        &cmd_tx,
        &mut presenter,
    );

    assert!(follow_ups.is_empty());
    assert_eq!(queued, 1);
    assert_eq!(cmd_rx.len(), 1);
    assert_eq!(presenter.saved, vec![("final-image.png".to_string(), image)]);
    assert_eq!(presenter.reveals, 1);
}

#[test]
fn failed_save_surfaces_as_local_error() {
    let (cmd_tx, _cmd_rx) = bounded(1);
    let mut presenter = RecordingPresenter {
        fail_saves: true,
        ..RecordingPresenter::default()
    };

    let (follow_ups, queued) = run_effects(
        vec![Effect::SaveFile {
            filename: "transparent-background.png",
            image: DataUri::png(b"cutout"),
        }],
        &cmd_tx,
        &mut presenter,
    );

    assert_eq!(queued, 0);
    match follow_ups.as_slice() {
        [Intent::Fail(err)] => {
            assert_eq!(err.category(), UiErrorCategory::Local);
            assert_eq!(err.message(), "Failed to save transparent-background.png");
        }
        other => panic!("unexpected follow-ups: {other:?}"),
    }
}
