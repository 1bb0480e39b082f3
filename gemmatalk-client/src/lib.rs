#![deny(missing_docs)]
//! HTTP client for the GemmaTalk local backend.
//!
//! [`ChatClient::send`] runs one chat turn: it posts the question to
//! `/stream` and feeds the response body through `gemmatalk-stream` into a
//! [`Session`](gemmatalk_stream::Session). The mood and memory endpoints the
//! desktop app uses are wrapped as plain async methods.

mod backend;
mod client;
mod error;

pub use client::ChatClient;
pub use tokio_util::sync::CancellationToken;
