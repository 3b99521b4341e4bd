//! Editor configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LABEL_CANVAS_WIDTH_MM` | 100 |
//! | `LABEL_CANVAS_HEIGHT_MM` | 50 |
//! | `LABEL_PRINT_DPI` | 96 |
//! | `LABEL_DEFAULT_NAME` | `Nueva etiqueta` |
//!
//! Missing values take the default silently; unparsable or non-positive ones
//! take it with a warning.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use tracing::warn;

use crate::consts::DEFAULT_DPI;
use crate::doc::Canvas;

pub const DEFAULT_CANVAS_WIDTH_MM: f64 = 100.0;
pub const DEFAULT_CANVAS_HEIGHT_MM: f64 = 50.0;
pub const DEFAULT_LABEL_NAME: &str = "Nueva etiqueta";

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Canvas size for a new label, in millimeters.
    pub canvas_width_mm: f64,
    pub canvas_height_mm: f64,
    /// Pixels per inch used to size the print target.
    pub print_dpi: f64,
    /// Name given to new labels and to imports without one.
    pub default_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width_mm: DEFAULT_CANVAS_WIDTH_MM,
            canvas_height_mm: DEFAULT_CANVAS_HEIGHT_MM,
            print_dpi: DEFAULT_DPI,
            default_name: DEFAULT_LABEL_NAME.to_owned(),
        }
    }
}

impl EditorConfig {
    /// Read configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Read configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let default_name = lookup("LABEL_DEFAULT_NAME")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_name);
        Self {
            canvas_width_mm: positive(&lookup, "LABEL_CANVAS_WIDTH_MM", defaults.canvas_width_mm),
            canvas_height_mm: positive(&lookup, "LABEL_CANVAS_HEIGHT_MM", defaults.canvas_height_mm),
            print_dpi: positive(&lookup, "LABEL_PRINT_DPI", defaults.print_dpi),
            default_name,
        }
    }

    /// Canvas for a new label.
    #[must_use]
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width_mm, self.canvas_height_mm)
    }
}

/// Parse `key` through `lookup`, falling back to `default`.
pub(crate) fn env_parse<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            warn!(key, "unparsable configuration value; using default");
            default
        }
        None => default,
    }
}

fn positive<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let v = env_parse(lookup, key, default);
    if v.is_finite() && v > 0.0 {
        v
    } else {
        warn!(key, value = v, "configuration value must be positive; using default");
        default
    }
}
