//! JSON result envelope shared by every bridge command

use super::error::{BridgeError, ErrorCode};
use serde::Serialize;

/// Result object written by each command
///
/// Serializes as `{ "success": true, ...data }` or
/// `{ "success": false, "error": "...", "errorCode": "...", "suggestedName"?: "..." }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,

    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> BridgeResponse<T> {
    /// Successful result carrying operation data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            error_code: None,
            suggested_name: None,
            data: Some(data),
        }
    }

    /// Failed result
    pub fn failure(error: &BridgeError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            error_code: Some(error.code()),
            suggested_name: error.suggested_name().map(str::to_string),
            data: None,
        }
    }
}

impl<T: Serialize> From<Result<T, BridgeError>> for BridgeResponse<T> {
    fn from(result: Result<T, BridgeError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::failure(&error),
        }
    }
}
