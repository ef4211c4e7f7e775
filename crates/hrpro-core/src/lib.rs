// Library root: roster handling, the draw and grouping engines, CSV export,
// and the shared config and message types used by the other crates.

pub mod config;
pub mod draw;
pub mod export;
pub mod grouping;
pub mod labels;
pub mod naming;
pub mod protocol;
pub mod roster;
