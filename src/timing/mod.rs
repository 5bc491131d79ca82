pub mod clock;
pub mod codec;

pub use clock::RaceClock;
pub use codec::{format_time, parse_time};
