//! Application-level configuration constants.

// Storage keys
pub const THEME_KEY: &str = "theme";
pub const CONTRAST_KEY: &str = "contrast";
pub const REG_FORM_KEY: &str = "registerForm";

// Theme
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";
pub const DARK_MODE_TOGGLE_ID: &str = "darkModeToggle";
pub const CONTRAST_TOGGLE_ID: &str = "contrastToggle";

// Registration form
pub const PARTICIPANTS_CONTAINER_ID: &str = "participants";
pub const ADD_PARTICIPANT_ID: &str = "addParticipant";
pub const PARTICIPANT_GROUP_CLASS: &str = "participant-group";
pub const PARTICIPANT_INPUT_CLASS: &str = "participant-input";
pub const REMOVE_PARTICIPANT_CLASS: &str = "remove-participant";
pub const PARTICIPANT_INPUT_NAME: &str = "uczestnik";
pub const REMOVE_PARTICIPANT_LABEL: &str = "Usuń";
pub const SIGNATURE_INPUT_ID: &str = "podpis";
pub const SIGNATURE_PREVIEW_ID: &str = "podpisPreview";

// Column widths
pub const WIDTH_INPUT_CLASS: &str = "col-width-input";
pub const TOTAL_WARNING_CLASS: &str = "total-warning";
pub const RESET_WIDTHS_CLASS: &str = "reset-widths";
pub const DANGER_CLASS: &str = "text-danger";
pub const TABLE_ATTRIBUTE: &str = "data-table";
pub const COLUMN_ATTRIBUTE: &str = "data-column";

// Min/Max limits for percentage inputs
pub const MIN_PERCENT: f64 = 0.0;
pub const MAX_PERCENT: f64 = 100.0;

/// Largest deviation from 100% the backend still accepts for a table.
pub const BALANCE_TOLERANCE: f64 = 0.1;
