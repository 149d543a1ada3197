use std::fs;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    pub max_upload_bytes: usize,
    pub key_tolerance: f32,
    pub key_feather: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            max_upload_bytes: 10 * 1024 * 1024,
            key_tolerance: 48.0,
            key_feather: 32.0,
        }
    }
}

impl Settings {
    /// Request bodies may carry two base64 images, so the transport limit sits
    /// well above the per-upload limit.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_upload_bytes.saturating_mul(3).saturating_add(64 * 1024)
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml`, then environment. Unparseable values are
/// skipped with a warning and the previous layer wins.
pub(crate) fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match raw.parse::<toml::Table>() {
            Ok(table) => apply_file(&mut settings, &table),
            Err(error) => tracing::warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__MAX_UPLOAD_BYTES") {
        set_parsed(&mut settings.max_upload_bytes, "APP__MAX_UPLOAD_BYTES", &v);
    }
    if let Some(v) = env("APP__KEY_TOLERANCE") {
        set_parsed(&mut settings.key_tolerance, "APP__KEY_TOLERANCE", &v);
    }
    if let Some(v) = env("APP__KEY_FEATHER") {
        set_parsed(&mut settings.key_feather, "APP__KEY_FEATHER", &v);
    }

    settings
}

fn apply_file(settings: &mut Settings, table: &toml::Table) {
    if let Some(v) = table.get("bind_addr").and_then(|v| v.as_str()) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = table
        .get("max_upload_bytes")
        .and_then(|v| v.as_integer())
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.max_upload_bytes = v;
    }
    if let Some(v) = table.get("key_tolerance").and_then(as_f32) {
        settings.key_tolerance = v;
    }
    if let Some(v) = table.get("key_feather").and_then(as_f32) {
        settings.key_feather = v;
    }
}

fn as_f32(value: &toml::Value) -> Option<f32> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
        .map(|v| v as f32)
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => tracing::warn!(key, value = raw, "ignoring unparseable environment override"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
