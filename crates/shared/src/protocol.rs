use serde::{Deserialize, Serialize};

use crate::domain::{DataUri, HexColor};

pub const REMOVE_BACKGROUND_ROUTE: &str = "/api/remove-background";
pub const ADD_BACKGROUND_ROUTE: &str = "/api/add-background";
/// Multipart field carrying the raw upload.
pub const IMAGE_FIELD: &str = "image";

/// Response body shared by both image endpoints.
///
/// Error responses may omit `success` entirely, so it defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<DataUri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageResponse {
    pub fn ok(image: DataUri) -> Self {
        Self {
            success: true,
            image: Some(image),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `POST /api/add-background`.
///
/// Fields stay loosely typed so the service can report the exact validation
/// failure for each one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBackgroundRequest {
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl AddBackgroundRequest {
    pub fn with_color(foreground: &DataUri, color: HexColor) -> Self {
        Self {
            foreground: Some(foreground.as_str().to_string()),
            background_color: Some(color.to_string()),
            background_image: None,
        }
    }

    pub fn with_image(foreground: &DataUri, background: &DataUri) -> Self {
        Self {
            foreground: Some(foreground.as_str().to_string()),
            background_color: None,
            background_image: Some(background.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_request_uses_camel_case_and_omits_image() {
        let fg = DataUri::new("data:image/png;base64,AAAA");
        let value = serde_json::to_value(AddBackgroundRequest::with_color(
            &fg,
            HexColor::new(0, 0x80, 0xff),
        ))
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "foreground": "data:image/png;base64,AAAA",
                "backgroundColor": "#0080ff"
            })
        );
    }

    #[test]
    fn error_only_body_parses_as_failure() {
        let response: ImageResponse =
            serde_json::from_str(r#"{"error":"No image provided"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("No image provided"));
        assert!(response.image.is_none());
    }
}
