//! Mapping of scheduler errors onto MCP error responses.

use rota_core::SchedulerError;
use rmcp::ErrorData;

/// Converts a scheduler error into an MCP error.
///
/// Input and state errors (bad dates, overlapping hours, missing schedules)
/// become `invalid_params` so the caller can correct the request; storage
/// and configuration failures become `internal_error`.
pub fn to_mcp_error(message: &str, error: &SchedulerError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_caller_error() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}
