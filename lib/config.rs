//! Numerical settings passed explicitly to the routines that honor them.
//!
//! There is no process-wide configuration: callers construct a [`Settings`]
//! (usually via [`Default`] or from a TOML file) and hand a reference to e.g.
//! [`Qobj::expm`][crate::qobj::Qobj::expm].
//!
//! ```toml
//! auto_tidyup = true
//! atol = 1e-12
//! ```

use std::path::Path;
use serde::Deserialize;
use crate::error::{ QError, QResult };

fn default_auto_tidyup() -> bool { true }

fn default_atol() -> f64 { 1e-12 }

/// Numerical housekeeping options.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    /// Remove matrix elements (real and imaginary parts separately) smaller
    /// than [`Self::atol`] from the results of operations that honor this
    /// flag.
    #[serde(default = "default_auto_tidyup")]
    pub auto_tidyup: bool,

    /// Absolute tolerance used by tidy-up.
    #[serde(default = "default_atol")]
    pub atol: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self { auto_tidyup: default_auto_tidyup(), atol: default_atol() }
    }
}

impl Settings {
    /// Create settings with auto-tidyup switched off.
    pub fn raw() -> Self { Self { auto_tidyup: false, ..Self::default() } }

    /// Parse settings from a TOML string; missing keys take default values.
    pub fn from_toml_str(s: &str) -> QResult<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> QResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that the tolerance is usable.
    pub fn validate(&self) -> QResult<()> {
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(QError::Setting(
                format!("atol must be finite and non-negative, got {}", self.atol)
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(s.auto_tidyup);
        assert_eq!(s.atol, 1e-12);
        assert!(!Settings::raw().auto_tidyup);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_toml() {
        let s = Settings::from_toml_str("auto_tidyup = false").unwrap();
        assert!(!s.auto_tidyup);
        assert_eq!(s.atol, 1e-12);

        let s = Settings::from_toml_str("atol = 1e-8").unwrap();
        assert!(s.auto_tidyup);
        assert_eq!(s.atol, 1e-8);
    }

    #[test]
    fn negative_atol_rejected() {
        let res = Settings::from_toml_str("atol = -1.0");
        assert!(matches!(res, Err(QError::Setting(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        let res = Settings::from_toml_str("auto_tidyup = \"maybe\"");
        assert!(matches!(res, Err(QError::Config(_))));
    }

    #[test]
    fn missing_file() {
        let res = Settings::load("/nonexistent/quantum/settings.toml");
        assert!(matches!(res, Err(QError::Io(_))));
    }
}
