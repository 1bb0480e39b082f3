#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[cfg(feature = "client")]
pub use gemmatalk_client;
#[cfg(feature = "state-fs")]
pub use gemmatalk_state_fs;
#[cfg(feature = "state-memory")]
pub use gemmatalk_state_memory;
#[cfg(feature = "core")]
pub use gemmatalk_stream;
#[cfg(feature = "core")]
pub use gemmatalk_types;

/// Happy-path imports for running chat turns.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use gemmatalk_types::{
        AppState, ChatError, ChatRequest, Event, Phase, Progress, SessionState, StateError,
        StateStore, Update,
    };

    #[cfg(feature = "core")]
    pub use gemmatalk_stream::{
        Classifier, ClassifierConfig, Driver, Presenter, Session, SessionConfig, Typewriter,
    };

    #[cfg(feature = "client")]
    pub use gemmatalk_client::ChatClient;

    #[cfg(feature = "client")]
    pub use gemmatalk_client::CancellationToken;

    #[cfg(feature = "state-memory")]
    pub use gemmatalk_state_memory::MemoryStore;

    #[cfg(feature = "state-fs")]
    pub use gemmatalk_state_fs::FsStore;
}
