//! Client for the fraud scoring service's transaction submission endpoint.
//!
//! Deliberately independent of the feed consumer: a submitted transaction
//! only ever reaches the live feed through the event stream, if the backend
//! chooses to emit it.

pub mod rest;
pub mod types;

pub use rest::{SubmissionClient, SubmissionError};
pub use types::{SubmissionAck, SubmissionRequest};
