//! Single state-transition function for the studio session.

use shared::{domain::DataUri, protocol::AddBackgroundRequest};
use tracing::{debug, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{Intent, UiError},
        state::{
            BackgroundSelection, Section, Session, FINAL_IMAGE_FILENAME,
            TRANSPARENT_IMAGE_FILENAME,
        },
    },
};

pub const MISSING_BACKGROUND_IMAGE: &str = "Please select a background image first";
pub const MISSING_FOREGROUND: &str =
    "No processed image to apply a background to. Please upload and process an image first.";
pub const MISSING_FINAL_DOWNLOAD: &str =
    "No final image to download. Please apply a background first.";
pub const MISSING_TRANSPARENT_DOWNLOAD: &str =
    "No processed image to download. Please upload and process an image first.";

/// Work the reducer asks the outside world to do.
#[derive(Debug)]
pub enum Effect {
    Backend(BackendCommand),
    SaveFile {
        filename: &'static str,
        image: DataUri,
    },
    /// Bring the final-result panel into view.
    RevealFinal,
}

pub fn reduce(session: &mut Session, intent: Intent) -> Vec<Effect> {
    match intent {
        Intent::SubmitImage(file) => {
            session.original = Some(file.to_data_uri());
            session.processed = None;
            session.final_image = None;
            session.final_panel_visible = false;
            session.upload_input = Some(file.name.clone());
            session.error = None;
            session.section = Section::Processing;

            let token = session.issue_token();
            info!(token = token.0, name = %file.name, "submitting image for background removal");
            vec![Effect::Backend(BackendCommand::RemoveBackground { token, file })]
        }
        Intent::SetDragOver(over) => {
            session.drag_over = over;
            Vec::new()
        }
        Intent::PickColor(color) => {
            session.background.color = color;
            Vec::new()
        }
        Intent::ApplyColor => {
            let selection = BackgroundSelection::SolidColor(session.background.color);
            request_composite(session, selection)
        }
        Intent::ChooseBackgroundImage(file) => {
            session.background.image = Some(file.to_data_uri());
            session.background_input = Some(file.name);
            session.background_preview_visible = true;
            Vec::new()
        }
        Intent::ApplyImage => {
            let Some(image) = session.background.image.clone() else {
                fail(session, UiError::precondition(MISSING_BACKGROUND_IMAGE));
                return Vec::new();
            };
            request_composite(session, BackgroundSelection::Image(image))
        }
        Intent::SwitchTab(tab) => {
            session.background.tab = tab;
            Vec::new()
        }
        Intent::Reset => {
            reset(session);
            Vec::new()
        }
        Intent::DownloadFinal => match session.final_image.clone() {
            Some(image) => vec![Effect::SaveFile {
                filename: FINAL_IMAGE_FILENAME,
                image,
            }],
            None => {
                fail(session, UiError::precondition(MISSING_FINAL_DOWNLOAD));
                Vec::new()
            }
        },
        Intent::DownloadTransparent => match session.processed.clone() {
            Some(image) => vec![Effect::SaveFile {
                filename: TRANSPARENT_IMAGE_FILENAME,
                image,
            }],
            None => {
                fail(session, UiError::precondition(MISSING_TRANSPARENT_DOWNLOAD));
                Vec::new()
            }
        },
        Intent::RemovalCompleted { token, outcome } => {
            if !session.is_current(token) {
                debug!(
                    token = token.0,
                    current = session.current_token().0,
                    "discarding stale removal result"
                );
                return Vec::new();
            }
            match outcome {
                Ok(image) => {
                    session.processed = Some(image);
                    session.error = None;
                    session.section = Section::Result;
                    info!(token = token.0, "background removed");
                }
                Err(err) => fail(session, UiError::from_api(&err)),
            }
            Vec::new()
        }
        Intent::CompositeCompleted { token, outcome } => {
            if !session.is_current(token) {
                debug!(
                    token = token.0,
                    current = session.current_token().0,
                    "discarding stale composite result"
                );
                return Vec::new();
            }
            match outcome {
                Ok(image) => {
                    session.final_image = Some(image);
                    session.error = None;
                    session.final_panel_visible = true;
                    session.section = Section::Result;
                    info!(token = token.0, "background applied");
                    vec![Effect::RevealFinal]
                }
                Err(err) => {
                    fail(session, UiError::from_api(&err));
                    Vec::new()
                }
            }
        }
        Intent::Fail(err) => {
            fail(session, err);
            Vec::new()
        }
    }
}

fn request_composite(session: &mut Session, selection: BackgroundSelection) -> Vec<Effect> {
    let Some(foreground) = session.processed.as_ref() else {
        fail(session, UiError::precondition(MISSING_FOREGROUND));
        return Vec::new();
    };
    let (request, background) = match &selection {
        BackgroundSelection::SolidColor(color) => (
            AddBackgroundRequest::with_color(foreground, *color),
            color.to_string(),
        ),
        BackgroundSelection::Image(image) => (
            AddBackgroundRequest::with_image(foreground, image),
            "image".to_string(),
        ),
    };

    session.error = None;
    session.section = Section::Processing;
    let token = session.issue_token();
    info!(token = token.0, %background, "requesting composite");
    vec![Effect::Backend(BackendCommand::AddBackground { token, request })]
}

/// An error supersedes whatever request is still in flight; only reset leaves
/// the error section.
fn fail(session: &mut Session, err: UiError) {
    let token = session.issue_token();
    warn!(token = token.0, category = ?err.category(), message = err.message(), "showing error");
    session.error = Some(err);
    session.section = Section::Error;
}

/// Back to the initial section. The color and active tab survive; bumping the
/// generation drops any response still in flight.
fn reset(session: &mut Session) {
    session.original = None;
    session.processed = None;
    session.background.image = None;
    session.final_image = None;
    session.upload_input = None;
    session.background_input = None;
    session.final_panel_visible = false;
    session.background_preview_visible = false;
    session.drag_over = false;
    session.error = None;
    session.section = Section::Upload;
    let token = session.issue_token();
    debug!(token = token.0, "session reset");
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
