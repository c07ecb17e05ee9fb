pub use measurement::*;
pub use request::*;
pub use timings::*;

mod measurement;
mod request;
mod timings;
