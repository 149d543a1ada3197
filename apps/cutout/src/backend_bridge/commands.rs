//! Backend commands queued from UI to backend worker.

use client_core::ImageFile;
use shared::protocol::AddBackgroundRequest;

use crate::controller::state::RequestToken;

#[derive(Debug)]
pub enum BackendCommand {
    RemoveBackground {
        token: RequestToken,
        file: ImageFile,
    },
    AddBackground {
        token: RequestToken,
        request: AddBackgroundRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RemoveBackground { .. } => "remove_background",
            BackendCommand::AddBackground { .. } => "add_background",
        }
    }

    pub fn token(&self) -> RequestToken {
        match self {
            BackendCommand::RemoveBackground { token, .. }
            | BackendCommand::AddBackground { token, .. } => *token,
        }
    }
}
