//! Substrate events, the intents they map to, and error modeling for the studio controller.

use client_core::{ApiCallError, ImageFile};
use shared::domain::{DataUri, HexColor};

use crate::controller::state::{BackgroundTab, RequestToken};

/// Raw events from whatever renders the studio.
#[derive(Debug)]
pub enum UiEvent {
    FileInputChanged(Option<ImageFile>),
    UploadBoxDragOver,
    UploadBoxDragLeave,
    UploadBoxDrop(Option<ImageFile>),
    ColorPickerInput(String),
    ColorPresetClicked(String),
    ApplyColorClicked,
    BackgroundFileInputChanged(Option<ImageFile>),
    ApplyImageClicked,
    TabClicked(String),
    NewImageClicked,
    DownloadClicked,
    DownloadTransparentClicked,
    Backend(BackendEvent),
}

/// Completions delivered by the backend worker.
#[derive(Debug)]
pub enum BackendEvent {
    RemovalFinished {
        token: RequestToken,
        outcome: Result<DataUri, ApiCallError>,
    },
    CompositeFinished {
        token: RequestToken,
        outcome: Result<DataUri, ApiCallError>,
    },
    WorkerFailed(String),
}

/// Input to the reducer.
#[derive(Debug)]
pub enum Intent {
    SubmitImage(ImageFile),
    SetDragOver(bool),
    PickColor(HexColor),
    ApplyColor,
    ChooseBackgroundImage(ImageFile),
    ApplyImage,
    SwitchTab(BackgroundTab),
    Reset,
    DownloadFinal,
    DownloadTransparent,
    RemovalCompleted {
        token: RequestToken,
        outcome: Result<DataUri, ApiCallError>,
    },
    CompositeCompleted {
        token: RequestToken,
        outcome: Result<DataUri, ApiCallError>,
    },
    Fail(UiError),
}

pub fn intent_for(event: UiEvent) -> Vec<Intent> {
    match event {
        UiEvent::FileInputChanged(file) => file.map(Intent::SubmitImage).into_iter().collect(),
        UiEvent::UploadBoxDragOver => vec![Intent::SetDragOver(true)],
        UiEvent::UploadBoxDragLeave => vec![Intent::SetDragOver(false)],
        UiEvent::UploadBoxDrop(file) => {
            let mut intents = vec![Intent::SetDragOver(false)];
            match file {
                Some(file) if file.is_image() => intents.push(Intent::SubmitImage(file)),
                Some(file) => {
                    tracing::debug!(name = %file.name, mime = %file.mime_type, "ignoring non-image drop")
                }
                None => {}
            }
            intents
        }
        UiEvent::ColorPickerInput(raw) | UiEvent::ColorPresetClicked(raw) => {
            match HexColor::parse(raw.trim()) {
                Ok(color) => vec![Intent::PickColor(color)],
                Err(error) => {
                    tracing::warn!(value = %raw, %error, "ignoring invalid color value");
                    Vec::new()
                }
            }
        }
        UiEvent::ApplyColorClicked => vec![Intent::ApplyColor],
        UiEvent::BackgroundFileInputChanged(file) => file
            .map(Intent::ChooseBackgroundImage)
            .into_iter()
            .collect(),
        UiEvent::ApplyImageClicked => vec![Intent::ApplyImage],
        UiEvent::TabClicked(name) => match BackgroundTab::parse(&name) {
            Some(tab) => vec![Intent::SwitchTab(tab)],
            None => {
                tracing::warn!(tab = %name, "ignoring unknown tab");
                Vec::new()
            }
        },
        UiEvent::NewImageClicked => vec![Intent::Reset],
        UiEvent::DownloadClicked => vec![Intent::DownloadFinal],
        UiEvent::DownloadTransparentClicked => vec![Intent::DownloadTransparent],
        UiEvent::Backend(BackendEvent::RemovalFinished { token, outcome }) => {
            vec![Intent::RemovalCompleted { token, outcome }]
        }
        UiEvent::Backend(BackendEvent::CompositeFinished { token, outcome }) => {
            vec![Intent::CompositeCompleted { token, outcome }]
        }
        UiEvent::Backend(BackendEvent::WorkerFailed(message)) => {
            vec![Intent::Fail(UiError::new(UiErrorCategory::Transport, message))]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// Network failure or non-OK status.
    Transport,
    /// The backend answered with `success: false`.
    Backend,
    /// A user action was attempted before its input existed.
    Precondition,
    /// Saving a download on this machine failed.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn new(category: UiErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Precondition, message)
    }

    pub fn from_api(err: &ApiCallError) -> Self {
        let category = match err {
            ApiCallError::Rejected { .. } => UiErrorCategory::Backend,
            _ => UiErrorCategory::Transport,
        };
        Self::new(category, err.user_message())
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
