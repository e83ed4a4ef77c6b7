// SPDX-License-Identifier: CC0-1.0

use serde_json::json;

use crate::recovery::{Error, RecoveryResult};

/// Renders a recovery result as a pretty-printed JSON object with the secret and
/// the keys of the mismatching shares:
///
/// ```json
/// {
///   "secret": "3",
///   "wrong_shares": [2]
/// }
/// ```
pub fn encode(result: &RecoveryResult) -> String {
    let report = json!({
        "secret": result.secret.to_string(),
        "wrong_shares": result.mismatching_keys,
    });
    format!("{report:#}")
}

/// Renders an error as a single-line JSON object, e.g. `{"error":"empty_input"}`.
pub fn encode_error(err: &Error) -> String {
    json!({ "error": err.code() }).to_string()
}
