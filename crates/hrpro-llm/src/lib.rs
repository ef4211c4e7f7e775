// Claude-backed naming: streaming client, prompt templates, and the `Namer`
// implementation used by the app.

pub mod client;
pub mod naming;
pub mod prompt;
