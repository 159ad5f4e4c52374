use serde::{Deserialize, Serialize};

/// Body of `POST /api/transaction`
///
/// `amount` is carried as a [`serde_json::Number`] built from the operator's
/// decimal text, so the wire value is exactly what was typed — no float
/// round-trip. `time` uses the backend's zone-less local format
/// (`YYYY-MM-DDTHH:mm:ss`); callers in other zones must reproduce it
/// verbatim for compatibility.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRequest {
    pub amount: serde_json::Number,
    pub location: String,
    pub user_id: String,
    pub time: String,
}

/// Acknowledgment returned by the scoring service
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionAck {
    pub status: String,
}
