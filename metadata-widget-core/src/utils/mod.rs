//! Helpers shared across the widget.

pub mod locale;
