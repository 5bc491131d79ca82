pub mod snapshot;
pub mod types;

pub use snapshot::{load_snapshot, save_report, RaceSnapshot};
pub use types::{Bib, RaceResult, RaceType, Runner};
