use std::fmt;

use shared::domain::DataUri;

/// Raw image file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn to_data_uri(&self) -> DataUri {
        DataUri::from_bytes(&self.mime_type, &self.bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RemoveBackground,
    AddBackground,
}

impl Endpoint {
    pub fn route(self) -> &'static str {
        match self {
            Endpoint::RemoveBackground => shared::protocol::REMOVE_BACKGROUND_ROUTE,
            Endpoint::AddBackground => shared::protocol::ADD_BACKGROUND_ROUTE,
        }
    }

    /// Fixed text shown for transport and HTTP-status failures.
    pub fn failure_message(self) -> &'static str {
        match self {
            Endpoint::RemoveBackground => "Failed to remove background",
            Endpoint::AddBackground => "Failed to add background",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}
