pub mod config;
pub mod error;
pub mod output;
pub mod race;
pub mod scoring;
pub mod timing;

pub use error::{DataIntegrityWarning, EngineError};
