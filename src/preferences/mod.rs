//! User preferences kept in the local store

pub mod accessibility;
pub mod display;

pub use accessibility::AccessibilitySettings;
pub use display::{Language, Theme};
