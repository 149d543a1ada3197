use super::*;
use client_core::Endpoint;

fn file(name: &str, mime: &str) -> ImageFile {
    ImageFile::new(name, mime, vec![1, 2, 3])
}

#[test]
fn file_input_submits_whatever_was_picked() {
    let intents = intent_for(UiEvent::FileInputChanged(Some(file("cat.png", "image/png"))));
    assert!(matches!(intents.as_slice(), [Intent::SubmitImage(f)] if f.name == "cat.png"));

    assert!(intent_for(UiEvent::FileInputChanged(None)).is_empty());
}

#[test]
fn drop_clears_drag_state_and_filters_non_images() {
    let intents = intent_for(UiEvent::UploadBoxDrop(Some(file("cat.webp", "image/webp"))));
    assert!(matches!(
        intents.as_slice(),
        [Intent::SetDragOver(false), Intent::SubmitImage(_)]
    ));

    let intents = intent_for(UiEvent::UploadBoxDrop(Some(file("notes.txt", "text/plain"))));
    assert!(matches!(intents.as_slice(), [Intent::SetDragOver(false)]));

    let intents = intent_for(UiEvent::UploadBoxDrop(None));
    assert!(matches!(intents.as_slice(), [Intent::SetDragOver(false)]));
}

#[test]
fn drag_over_and_leave_toggle_highlight() {
    assert!(matches!(
        intent_for(UiEvent::UploadBoxDragOver).as_slice(),
        [Intent::SetDragOver(true)]
    ));
    assert!(matches!(
        intent_for(UiEvent::UploadBoxDragLeave).as_slice(),
        [Intent::SetDragOver(false)]
    ));
}

#[test]
fn color_input_and_presets_pick_a_color() {
    let intents = intent_for(UiEvent::ColorPickerInput("#00ff00".to_string()));
    assert!(matches!(
        intents.as_slice(),
        [Intent::PickColor(c)] if *c == HexColor::new(0, 0xff, 0)
    ));

    let intents = intent_for(UiEvent::ColorPresetClicked(" #f00 ".to_string()));
    assert!(matches!(
        intents.as_slice(),
        [Intent::PickColor(c)] if *c == HexColor::new(0xff, 0, 0)
    ));

    assert!(intent_for(UiEvent::ColorPickerInput("red".to_string())).is_empty());
}

#[test]
fn tabs_parse_known_names_only() {
    assert!(matches!(
        intent_for(UiEvent::TabClicked("image".to_string())).as_slice(),
        [Intent::SwitchTab(BackgroundTab::Image)]
    ));
    assert!(matches!(
        intent_for(UiEvent::TabClicked("color".to_string())).as_slice(),
        [Intent::SwitchTab(BackgroundTab::Color)]
    ));
    assert!(intent_for(UiEvent::TabClicked("gradient".to_string())).is_empty());
}

#[test]
fn buttons_map_to_their_intents() {
    assert!(matches!(
        intent_for(UiEvent::ApplyColorClicked).as_slice(),
        [Intent::ApplyColor]
    ));
    assert!(matches!(
        intent_for(UiEvent::ApplyImageClicked).as_slice(),
        [Intent::ApplyImage]
    ));
    assert!(matches!(
        intent_for(UiEvent::NewImageClicked).as_slice(),
        [Intent::Reset]
    ));
    assert!(matches!(
        intent_for(UiEvent::DownloadClicked).as_slice(),
        [Intent::DownloadFinal]
    ));
    assert!(matches!(
        intent_for(UiEvent::DownloadTransparentClicked).as_slice(),
        [Intent::DownloadTransparent]
    ));
    assert!(matches!(
        intent_for(UiEvent::BackgroundFileInputChanged(Some(file("b.png", "image/png"))))
            .as_slice(),
        [Intent::ChooseBackgroundImage(_)]
    ));
}

#[test]
fn backend_events_keep_their_token() {
    let intents = intent_for(UiEvent::Backend(BackendEvent::RemovalFinished {
        token: RequestToken(7),
        outcome: Ok(DataUri::png(b"x")),
    }));
    assert!(matches!(
        intents.as_slice(),
        [Intent::RemovalCompleted { token: RequestToken(7), outcome: Ok(_) }]
    ));

    let intents = intent_for(UiEvent::Backend(BackendEvent::WorkerFailed(
        "runtime gone".to_string(),
    )));
    match intents.as_slice() {
        [Intent::Fail(err)] => {
            assert_eq!(err.category(), UiErrorCategory::Transport);
            assert_eq!(err.message(), "runtime gone");
        }
        other => panic!("unexpected intents: {other:?}"),
    }
}

#[test]
fn api_errors_are_categorized() {
    let rejected = UiError::from_api(&ApiCallError::Rejected {
        endpoint: Endpoint::AddBackground,
        message: Some("Invalid hex color value".to_string()),
    });
    assert_eq!(rejected.category(), UiErrorCategory::Backend);
    assert_eq!(rejected.message(), "Invalid hex color value");

    let decode = UiError::from_api(&ApiCallError::Decode {
        endpoint: Endpoint::AddBackground,
        message: "expected value".to_string(),
    });
    assert_eq!(decode.category(), UiErrorCategory::Transport);
    assert_eq!(decode.message(), "Failed to add background");
}
