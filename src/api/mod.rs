pub use client::*;
pub use errors::*;

mod client;
mod errors;
