#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod classify;
pub mod decode;
pub mod driver;
pub mod lines;
pub mod reveal;
pub mod session;

pub use classify::{Classifier, ClassifierConfig};
pub use decode::decode_stream;
pub use driver::Driver;
pub use lines::LineBuffer;
pub use reveal::{Instant, Pacer, Presenter, Typewriter};
pub use session::{Session, SessionConfig};
