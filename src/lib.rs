//! Fraud Feed Dashboard Core - Main Library
//!
//! Client-side core for the real-time fraud detection dashboard: a live
//! transaction feed consumer and an independent submission client, with the
//! rendering layer kept entirely external.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (env config,
//!   graceful shutdown)
//! - **feedstream**: Live feed consumer and bounded store (re-exported from
//!   workspace)
//! - **scoring_client**: Transaction submission client (re-exported from
//!   workspace)

// Re-export workspace libraries for convenience
pub use feedstream;
pub use scoring_client;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod shutdown;

    pub use cli::{feed_ws_url, parse_args, scoring_api_url};
    pub use shutdown::ShutdownManager;
}
