use crate::types::{SubmissionAck, SubmissionRequest};
use chrono::Local;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Wire time format the backend expects: local clock, no zone suffix
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Bound on how long one submission may stay in flight
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum SubmissionError {
    /// Inputs failed precondition checks; nothing was sent
    #[error("validation failed: {0}")]
    Validation(String),

    /// Connection failure or timeout
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The scoring service answered with a non-success status
    #[error("scoring service error: {0}")]
    Api(String),

    /// The acknowledgment body could not be decoded
    #[error("malformed acknowledgment: {0}")]
    Deserialize(String),
}

pub type Result<T> = std::result::Result<T, SubmissionError>;

/// REST client for the transaction scoring endpoint
///
/// One call, one outcome: `submit` resolves to exactly one success or
/// failure and never retries — resubmission is the operator's decision.
/// Submissions have no effect on the feed store; the scored transaction
/// comes back through the event stream if the backend emits it.
pub struct SubmissionClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl SubmissionClient {
    /// Create a new submission client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the default request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit a synthetic transaction for scoring
    ///
    /// Validates inputs before any network call: `amount` must be numeric
    /// and greater than zero, `location` and `user_id` non-empty. The
    /// current local time is attached in the backend's zone-less format.
    pub async fn submit(
        &self,
        amount: &str,
        location: &str,
        user_id: &str,
    ) -> Result<SubmissionAck> {
        let amount = validate_submission(amount, location, user_id)?;

        let request = SubmissionRequest {
            amount,
            location: location.trim().to_string(),
            user_id: user_id.trim().to_string(),
            time: Local::now().format(TIME_FORMAT).to_string(),
        };

        let url = format!("{}/api/transaction", self.base_url);
        debug!(%url, "submitting transaction for scoring");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!(%status, "submission rejected");
            return Err(SubmissionError::Api(format!(
                "submission rejected ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SubmissionError::Deserialize(e.to_string()))
    }
}

/// Check submission preconditions and produce the exact wire amount
///
/// The amount text is parsed into a JSON number so the request carries the
/// operator's decimal verbatim; the float view is used only for the
/// positivity check.
fn validate_submission(
    amount: &str,
    location: &str,
    user_id: &str,
) -> Result<serde_json::Number> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(SubmissionError::Validation("amount is required".to_string()));
    }

    let number: serde_json::Number = amount.parse().map_err(|_| {
        SubmissionError::Validation(format!("amount is not numeric: {amount:?}"))
    })?;
    if !number.as_f64().is_some_and(|v| v.is_finite() && v > 0.0) {
        return Err(SubmissionError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    if location.trim().is_empty() {
        return Err(SubmissionError::Validation(
            "location is required".to_string(),
        ));
    }
    if user_id.trim().is_empty() {
        return Err(SubmissionError::Validation(
            "user_id is required".to_string(),
        ));
    }

    Ok(number)
}
