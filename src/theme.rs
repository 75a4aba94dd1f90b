//! Light/dark theme and high-contrast preferences.
//!
//! The preferences live in an explicit [`Settings`] value. Transitions are
//! pure; persistence goes through a [`KeyValueStore`] the caller passes in,
//! and the DOM side lives in `components`.

use crate::config::{CONTRAST_KEY, THEME_KEY};
use crate::storage::KeyValueStore;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a persisted or applied value. Anything but the two names is `None`.
    pub fn parse(raw: &str) -> Option<Theme> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Theme currently shown, read from the root attribute value.
    ///
    /// Only an explicit `"dark"` counts as dark.
    pub fn from_applied(attribute: Option<&str>) -> Theme {
        match attribute {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn flipped(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub theme: Theme,
    pub high_contrast: bool,
}

impl Settings {
    /// Resolve the startup preferences.
    ///
    /// A persisted theme wins; without one the environment's dark-scheme
    /// signal decides. Contrast is on only when persisted as `"1"`.
    pub fn resolve(store: &dyn KeyValueStore, prefers_dark: bool) -> Settings {
        let theme = store
            .get(THEME_KEY)
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light });
        let high_contrast = store.get(CONTRAST_KEY).as_deref() == Some("1");
        Settings {
            theme,
            high_contrast,
        }
    }

    /// Next settings after toggling the theme that is currently applied.
    pub fn with_theme_toggled(self, applied: Theme) -> Settings {
        Settings {
            theme: applied.flipped(),
            ..self
        }
    }

    pub fn with_contrast_toggled(self, applied: bool) -> Settings {
        Settings {
            high_contrast: !applied,
            ..self
        }
    }
}

pub fn persist_theme(store: &dyn KeyValueStore, theme: Theme) {
    store.set(THEME_KEY, theme.as_str());
}

pub fn persist_contrast(store: &dyn KeyValueStore, enabled: bool) {
    store.set(CONTRAST_KEY, if enabled { "1" } else { "0" });
}
