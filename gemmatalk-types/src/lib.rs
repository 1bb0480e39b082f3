#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod app_state;
pub mod error;
pub mod state;
pub mod types;
pub mod wire;

pub use app_state::*;
pub use error::*;
pub use state::*;
pub use types::*;
pub use wire::*;
