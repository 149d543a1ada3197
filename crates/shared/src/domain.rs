use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Inline image payload of the form `data:<media-type>;base64,<data>`.
///
/// Directly usable as a display source and writable to disk after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataUri(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload has no ',' separator")]
    MissingSeparator,
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
}

impl DataUri {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{media_type};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn png(bytes: &[u8]) -> Self {
        Self::from_bytes(PNG_MEDIA_TYPE, bytes)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Media type between `data:` and the first `;` or `,`, if the header has one.
    pub fn media_type(&self) -> Option<&str> {
        let (header, _) = self.0.split_once(',')?;
        let header = header.strip_prefix("data:")?;
        let media_type = header.split(';').next().unwrap_or_default();
        (!media_type.is_empty()).then_some(media_type)
    }

    /// Everything after the first `,`.
    pub fn payload(&self) -> Result<&str, PayloadError> {
        self.0
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or(PayloadError::MissingSeparator)
    }

    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        STANDARD
            .decode(self.payload()?.trim())
            .map_err(|e| PayloadError::InvalidBase64(e.to_string()))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DataUri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color format. Use #RGB or #RRGGBB")]
    Format,
    #[error("Invalid hex color value")]
    Digits,
}

/// Opaque RGB color written as `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let Some(digits) = raw.strip_prefix('#') else {
            return Err(ColorError::Format);
        };
        let len = raw.chars().count();
        if len != 4 && len != 7 {
            return Err(ColorError::Format);
        }

        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Digits);
        }

        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or(ColorError::Digits)
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands_each_digit() {
        assert_eq!(HexColor::parse("#0f8").unwrap(), HexColor::new(0x00, 0xff, 0x88));
    }

    #[test]
    fn long_hex_is_case_insensitive_and_displays_lowercase() {
        let color = HexColor::parse("#FFaa00").unwrap();
        assert_eq!(color, HexColor::new(0xff, 0xaa, 0x00));
        assert_eq!(color.to_string(), "#ffaa00");
    }

    #[test]
    fn rejects_missing_hash_and_bad_length() {
        assert_eq!(HexColor::parse("ffffff"), Err(ColorError::Format));
        assert_eq!(HexColor::parse("#ffff"), Err(ColorError::Format));
        assert_eq!(HexColor::parse("#"), Err(ColorError::Format));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(HexColor::parse("#éa"), Err(ColorError::Format));
        assert_eq!(HexColor::parse("#éab"), Err(ColorError::Digits));
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert_eq!(HexColor::parse("#ggg"), Err(ColorError::Digits));
        assert_eq!(HexColor::parse("#12345z"), Err(ColorError::Digits));
    }

    #[test]
    fn data_uri_roundtrips_bytes_and_reports_media_type() {
        let uri = DataUri::from_bytes("image/jpeg", b"\xff\xd8raw");
        assert!(uri.as_str().starts_with("data:image/jpeg;base64,"));
        assert_eq!(uri.media_type(), Some("image/jpeg"));
        assert_eq!(uri.decode().unwrap(), b"\xff\xd8raw");
    }

    #[test]
    fn data_uri_without_separator_is_rejected() {
        let uri = DataUri::new("not-a-data-uri");
        assert_eq!(uri.payload(), Err(PayloadError::MissingSeparator));
        assert_eq!(uri.media_type(), None);
    }

    #[test]
    fn data_uri_serializes_as_plain_string() {
        let uri = DataUri::png(b"x");
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, format!("\"{}\"", uri.as_str()));
    }
}
