//! JSON-ready response shapes for an import call.

use serde::Serialize;

use super::diagnostics::Diagnostics;
use crate::error::ImportResult;
use crate::types::ParseResult;

/// Body of a successful import, possibly with row-scoped errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary<R> {
    pub success: bool,
    pub file_name: String,
    pub total_rows: usize,
    pub successful_rows: usize,
    pub data: Vec<R>,
    /// `"Row N: message"` for every row that failed extraction.
    pub errors: Vec<String>,
    pub debug: Diagnostics,
}

/// Body of a failed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub success: bool,
    pub error: String,
}

/// Either response shape, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportResponse<R> {
    Success(ImportSummary<R>),
    Failure(ImportFailure),
}

impl<R> ImportResponse<R> {
    /// Build the response for an import outcome.
    pub fn from_result(file_name: impl Into<String>, result: ImportResult<ParseResult<R>>) -> Self {
        match result {
            Ok(parsed) => ImportResponse::Success(ImportSummary {
                success: true,
                file_name: file_name.into(),
                total_rows: parsed.total_rows,
                successful_rows: parsed.successful_rows(),
                errors: parsed.row_errors.iter().map(ToString::to_string).collect(),
                data: parsed.records,
                debug: parsed.diagnostics,
            }),
            Err(err) => ImportResponse::Failure(ImportFailure {
                success: false,
                error: err.user_message(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImportResponse::Success(_))
    }
}
