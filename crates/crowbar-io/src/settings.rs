//! Page-supplied settings.
//!
//! A page (or the bookmarklet loader) may define a global
//! `window.crowbarConfig` holding a JSON object, or a string containing
//! one.  Missing fields take their defaults; a missing or malformed
//! value means "all defaults".

use crowbar_export::PresenterConfig;
use crowbar_extract::ExtractConfig;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Name of the global the settings are read from.
pub const SETTINGS_GLOBAL: &str = "crowbarConfig";

/// Every tunable of one bookmarklet run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowbarConfig {
    /// Extraction settings.
    pub extract: ExtractConfig,
    /// Presenter settings.
    pub presenter: PresenterConfig,
    /// Maximum level forwarded to the browser console.
    pub log_level: log::LevelFilter,
}

impl Default for CrowbarConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            presenter: PresenterConfig::default(),
            log_level: log::LevelFilter::Info,
        }
    }
}

/// Errors that can occur when parsing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings are not valid JSON for [`CrowbarConfig`].
    #[error("invalid crowbar settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The global holds something other than an object or a string.
    #[error("crowbar settings must be an object or a JSON string")]
    NotAnObject,
}

/// Parse settings from JSON text.
///
/// # Errors
///
/// Returns [`SettingsError::Json`] if `json` is not a valid settings
/// object.
pub fn parse_settings(json: &str) -> Result<CrowbarConfig, SettingsError> {
    Ok(serde_json::from_str(json)?)
}

/// Read settings from `window.crowbarConfig`, falling back to defaults.
///
/// Requires a browser environment.
#[must_use]
pub fn load_settings() -> CrowbarConfig {
    match read_global() {
        Ok(Some(config)) => config,
        Ok(None) => CrowbarConfig::default(),
        Err(e) => {
            log::warn!("ignoring window.{SETTINGS_GLOBAL}: {e}");
            CrowbarConfig::default()
        }
    }
}

fn read_global() -> Result<Option<CrowbarConfig>, SettingsError> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Ok(value) = js_sys::Reflect::get(&window, &JsValue::from_str(SETTINGS_GLOBAL)) else {
        return Ok(None);
    };
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let json = if let Some(text) = value.as_string() {
        text
    } else if value.is_object() {
        js_sys::JSON::stringify(&value)
            .ok()
            .and_then(|s| s.as_string())
            .ok_or(SettingsError::NotAnObject)?
    } else {
        return Err(SettingsError::NotAnObject);
    };
    parse_settings(&json).map(Some)
}
