//! Workflow error taxonomy.
//!
//! Every variant carries (or renders to) the message shown to the user, so
//! presentation layers can surface `err.to_string()` directly.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// File rejected before any network call: MIME type not accepted.
    #[error("请上传 PDF 格式的文件")]
    UnsupportedType { mime: String },

    /// File rejected before any network call: larger than the configured maximum.
    #[error("文件大小不能超过 {}", crate::render::format_size_limit(*.max))]
    TooLarge { size: u64, max: u64 },

    #[error("{0}")]
    AnalysisFailed(String),

    #[error("{0}")]
    MatchFailed(String),

    /// Missing job description, missing selected file or missing prior parse.
    #[error("{0}")]
    EmptyInput(String),

    #[error("读取文件失败: {0}")]
    ReadFailed(String),
}

impl WorkflowError {
    /// Short machine-friendly name, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::UnsupportedType { .. } => "unsupported_type",
            WorkflowError::TooLarge { .. } => "too_large",
            WorkflowError::AnalysisFailed(_) => "analysis_failed",
            WorkflowError::MatchFailed(_) => "match_failed",
            WorkflowError::EmptyInput(_) => "empty_input",
            WorkflowError::ReadFailed(_) => "read_failed",
        }
    }

    /// Extra diagnostic context for logs, not shown to the user.
    pub fn detail(&self) -> Option<String> {
        match self {
            WorkflowError::UnsupportedType { mime } => Some(format!("detected type {mime}")),
            WorkflowError::TooLarge { size, max } => Some(format!("{size} bytes > {max} bytes")),
            _ => None,
        }
    }
}
