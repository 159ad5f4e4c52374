//! CLI utilities for binaries
//!
//! Handles the two endpoint environment variables and argument access for
//! the binary executables. Libraries never read the environment; only the
//! binaries resolve configuration here.

/// Default stream endpoint when `FEED_WS_URL` is unset
const DEFAULT_FEED_WS_URL: &str = "ws://127.0.0.1:8000/api/ws";

/// Default scoring endpoint when `SCORING_API_URL` is unset
const DEFAULT_SCORING_API_URL: &str = "http://127.0.0.1:8000";

/// Resolve the transaction event stream URL from the environment
pub fn feed_ws_url() -> String {
    std::env::var("FEED_WS_URL").unwrap_or_else(|_| DEFAULT_FEED_WS_URL.to_string())
}

/// Resolve the scoring service base URL from the environment
pub fn scoring_api_url() -> String {
    std::env::var("SCORING_API_URL").unwrap_or_else(|_| DEFAULT_SCORING_API_URL.to_string())
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        // Only assert the defaults when the variables are not set in the
        // environment running the tests
        if std::env::var("FEED_WS_URL").is_err() {
            assert_eq!(feed_ws_url(), DEFAULT_FEED_WS_URL);
        }
        if std::env::var("SCORING_API_URL").is_err() {
            assert_eq!(scoring_api_url(), DEFAULT_SCORING_API_URL);
        }
    }
}
