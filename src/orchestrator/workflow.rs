//! Workflow state and the operations that move it between stages.
//!
//! [`Workflow`] is the only owner of selection and result state. Every
//! mutation happens at a completion point of one of its methods:
//!
//! * `select` replaces the file and drops prior results (stage 1);
//! * `analyze` stores a [`ParsedResult`] and moves to stage 2;
//! * `match_job` stores a [`MatchResult`] and moves to stage 3;
//! * `clear` resets everything to stage 1.
//!
//! Failures leave state untouched.

use crate::config::ClientConfig;
use crate::engine::{self, intake, Transport};
use crate::error::WorkflowError;
use crate::model::{
    MatchRequest, MatchResult, ParsedResult, SelectedFile, Session, Stage, UploadRequest,
};

/// Limits applied by [`Workflow::select`].
#[derive(Debug, Clone)]
pub struct IntakeLimits {
    pub max_file_size: u64,
    pub supported_types: Vec<String>,
}

impl IntakeLimits {
    pub fn accepts(&self, mime: &str) -> bool {
        self.supported_types.iter().any(|t| t == mime)
    }
}

impl From<&ClientConfig> for IntakeLimits {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            max_file_size: cfg.max_file_size,
            supported_types: cfg.supported_types.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workflow {
    limits: IntakeLimits,
    selected: Option<SelectedFile>,
    parsed: Option<ParsedResult>,
    matched: Option<MatchResult>,
    stage: Stage,
}

impl Workflow {
    pub fn new(limits: IntakeLimits) -> Self {
        Self {
            limits,
            selected: None,
            parsed: None,
            matched: None,
            stage: Stage::Select,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn parsed(&self) -> Option<&ParsedResult> {
        self.parsed.as_ref()
    }

    pub fn matched(&self) -> Option<&MatchResult> {
        self.matched.as_ref()
    }

    /// Check type and size without touching state.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), WorkflowError> {
        if !self.limits.accepts(&file.mime) {
            return Err(WorkflowError::UnsupportedType {
                mime: file.mime.clone(),
            });
        }
        if file.size > self.limits.max_file_size {
            return Err(WorkflowError::TooLarge {
                size: file.size,
                max: self.limits.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate and adopt `file`; prior results belong to the old file and are dropped.
    pub fn select(&mut self, file: SelectedFile) -> Result<&SelectedFile, WorkflowError> {
        self.validate(&file)?;
        tracing::info!(name = %file.name, size = file.size, "file selected");
        self.parsed = None;
        self.matched = None;
        self.stage = Stage::Select;
        Ok(&*self.selected.insert(file))
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.parsed = None;
        self.matched = None;
        self.stage = Stage::Select;
    }

    /// Parse stage: upload the selected file and store the extracted profile.
    pub async fn analyze(
        &mut self,
        transport: &dyn Transport,
    ) -> Result<&ParsedResult, WorkflowError> {
        let file = self
            .selected
            .as_ref()
            .ok_or_else(|| WorkflowError::EmptyInput("请先选择文件".into()))?;

        let encoded = intake::read_base64(file, self.limits.max_file_size).await?;
        let parsed = engine::upload(transport, &UploadRequest { file: encoded }).await?;

        tracing::info!(
            cache_key = parsed.cache_key.as_deref().unwrap_or(""),
            skills = parsed.info.skills.len(),
            "resume parsed"
        );
        // A new parse starts a new cycle; any earlier score no longer applies.
        self.matched = None;
        self.stage = Stage::Parsed;
        Ok(&*self.parsed.insert(parsed))
    }

    /// Build the `/match` payload from stored state.
    pub fn match_request(&self, job_description: &str) -> Result<MatchRequest, WorkflowError> {
        let job_description = job_description.trim();
        if job_description.is_empty() {
            return Err(WorkflowError::EmptyInput("请输入岗位描述".into()));
        }
        let parsed = self
            .parsed
            .as_ref()
            .ok_or_else(|| WorkflowError::EmptyInput("请先解析简历".into()))?;
        Ok(MatchRequest {
            cache_key: parsed.cache_key.clone().unwrap_or_default(),
            job_description: job_description.to_string(),
            resume_text: parsed.raw_text.clone(),
            extracted_info: parsed.extracted_info.clone(),
        })
    }

    /// Match stage: score the stored profile against `job_description`.
    pub async fn match_job(
        &mut self,
        transport: &dyn Transport,
        job_description: &str,
    ) -> Result<&MatchResult, WorkflowError> {
        let req = self.match_request(job_description)?;
        let result = engine::match_resume(transport, &req).await?;
        tracing::info!(overall = result.overall(), "match completed");
        self.stage = Stage::Matched;
        Ok(&*self.matched.insert(result))
    }

    pub fn session(&self, base_url: &str) -> Session {
        Session {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            base_url: base_url.to_string(),
            file: self.selected.as_ref().map(SelectedFile::meta),
            parsed: self.parsed.clone(),
            matched: self.matched.clone(),
        }
    }
}
