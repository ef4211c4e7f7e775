// Library root: exposes the app loop and the terminal UI so integration
// tests can drive them without a real terminal.

pub mod app;
pub mod tui;
