pub mod apply;
pub mod config;
pub mod coords;
pub mod defaults;
pub mod error;
pub mod hist;
pub mod legend;
pub mod log;
pub mod measure;
pub mod setup;
pub mod stack;
pub mod style;

pub use error::{Error, Result};
pub use stack::{StyleGuard, StyleSet, DEFAULT_STYLE};
pub use style::{PropMap, PropValue, Style};
