use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// A file chosen by the user. Content is read lazily when the parse stage runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl SelectedFile {
    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            size: self.size,
            mime: self.mime.clone(),
        }
    }
}

/// File metadata safe to hand to presentation layers and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireParsedResult")]
pub struct ParsedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Exactly as received; echoed back on match.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extracted_info: Value,
    /// Typed view of `extracted_info` used for display.
    #[serde(skip)]
    pub info: ExtractedInfo,
}

#[derive(Deserialize)]
struct WireParsedResult {
    #[serde(default, deserialize_with = "lenient_text")]
    cache_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    raw_text: Option<String>,
    #[serde(default)]
    extracted_info: Value,
}

impl From<WireParsedResult> for ParsedResult {
    fn from(w: WireParsedResult) -> Self {
        let info = serde_json::from_value(w.extracted_info.clone()).unwrap_or_default();
        Self {
            cache_key: w.cache_key,
            raw_text: w.raw_text,
            extracted_info: w.extracted_info,
            info,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub basic_info: BasicInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub optional_info: OptionalInfo,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BasicInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionalInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_intention: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub experience_years: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub education: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, deserialize_with = "lenient_number")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_match: Option<CategoryMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_match: Option<CategoryMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_match: Option<CategoryMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_match: Option<CategoryMatch>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_similarity_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}

impl MatchResult {
    /// Overall score, 0 when the backend omitted it.
    pub fn overall(&self) -> f64 {
        self.overall_score.unwrap_or(0.0)
    }
}

/// One scoring category. Which lists are populated depends on the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub missing_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub extra_skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub analysis: Option<String>,
}

/// Optional enrichment produced by the backend's language model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub overall_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub skill_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub experience_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub education_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    /// Any truthy value marks the AI sub-analysis as failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl AiAnalysis {
    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(is_truthy)
    }
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    pub file: String,
}

/// Body of `POST /match`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest {
    pub cache_key: String,
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extracted_info: Value,
}

/// Outcome of the `/health` check.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Available {
        message: Option<String>,
        version: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

impl HealthStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Available { .. })
    }

    pub fn to_message(&self) -> String {
        match self {
            HealthStatus::Available { message, version } => {
                let mut out = String::from("服务可用");
                if let Some(m) = message.as_deref().filter(|m| !m.is_empty()) {
                    out.push_str(&format!(": {m}"));
                }
                if let Some(v) = version.as_deref().filter(|v| !v.is_empty()) {
                    out.push_str(&format!(" (v{v})"));
                }
                out
            }
            HealthStatus::Unavailable { reason } => format!("服务不可用: {reason}"),
        }
    }
}

/// Workflow progress. Stage N is reachable only through success of stage N-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Select = 1,
    Parsed = 2,
    Matched = 3,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Select, Stage::Parsed, Stage::Matched];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Select => "选择简历",
            Stage::Parsed => "解析简历",
            Stage::Matched => "岗位匹配",
        }
    }
}

/// Which user-triggered action a busy marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Analyze,
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Transient user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Error => "❌",
            NoticeLevel::Info => "ℹ️",
        }
    }
}

/// Events emitted by the workflow controller and consumed by UI layers.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    FileSelected(FileMeta),
    Busy {
        action: Action,
        busy: bool,
    },
    // Boxed to keep the enum small; results can be large.
    Parsed(Box<ParsedResult>),
    Matched(Box<MatchResult>),
    StageChanged(Stage),
    Cleared,
    Health(HealthStatus),
    Notice(Notice),
}

/// Snapshot of one analysis cycle, used for exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub timestamp_utc: String,
    pub base_url: String,
    #[serde(default)]
    pub file: Option<FileMeta>,
    #[serde(default)]
    pub parsed: Option<ParsedResult>,
    #[serde(default)]
    pub matched: Option<MatchResult>,
}

/// JavaScript-style truthiness, used for the `success` flag of API envelopes.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text rendering of a loose JSON scalar; `None` for null and containers.
pub fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// The backend is loosely typed: years may arrive as numbers, lists may be null.
fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(value_to_text))
}

fn lenient_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    let n: Option<f64> = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    // "NaN" and "inf" parse as floats but are not scores.
    Ok(n.filter(|f| f.is_finite()))
}

fn lenient_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_text).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsed_result_tolerates_missing_and_null_sections() {
        let parsed: ParsedResult = serde_json::from_value(json!({
            "cache_key": "k1",
            "raw_text": "...",
            "extracted_info": { "basic_info": null, "skills": ["Python"] }
        }))
        .unwrap();
        assert_eq!(parsed.cache_key.as_deref(), Some("k1"));
        assert_eq!(parsed.info.basic_info, BasicInfo::default());
        assert_eq!(parsed.info.skills, vec!["Python".to_string()]);
    }

    #[test]
    fn numeric_fields_are_read_as_text() {
        let info: OptionalInfo =
            serde_json::from_value(json!({ "experience_years": 5, "education": null })).unwrap();
        assert_eq!(info.experience_years.as_deref(), Some("5"));
        assert_eq!(info.education, None);
    }

    #[test]
    fn extracted_info_is_kept_verbatim() {
        let received = json!({
            "basic_info": { "gender": "男", "name": "张三" },
            "optional_info": { "education": null, "experience_years": 5 },
            "skills": ["Go", { "name": "Rust" }],
            "projects": [{ "name": "x" }]
        });
        let parsed: ParsedResult =
            serde_json::from_value(json!({ "extracted_info": received.clone() })).unwrap();
        assert_eq!(parsed.extracted_info, received);
        assert_eq!(parsed.info.basic_info.name.as_deref(), Some("张三"));
        assert_eq!(parsed.info.optional_info.experience_years.as_deref(), Some("5"));
        assert_eq!(parsed.info.skills, vec!["Go".to_string()]);

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["extracted_info"], received);
    }

    #[test]
    fn non_object_extracted_info_renders_as_empty() {
        let parsed: ParsedResult =
            serde_json::from_value(json!({ "extracted_info": "oops" })).unwrap();
        assert_eq!(parsed.info, ExtractedInfo::default());
        assert_eq!(parsed.extracted_info, json!("oops"));
    }

    #[test]
    fn non_finite_scores_are_dropped() {
        let c: CategoryMatch = serde_json::from_value(json!({ "score": "NaN" })).unwrap();
        assert_eq!(c.score, None);
        let c: CategoryMatch = serde_json::from_value(json!({ "score": "-inf" })).unwrap();
        assert_eq!(c.score, None);
        let c: CategoryMatch = serde_json::from_value(json!({ "score": " 72.5 " })).unwrap();
        assert_eq!(c.score, Some(72.5));
    }

    #[test]
    fn ai_error_follows_truthiness() {
        let mut ai = AiAnalysis::default();
        assert!(!ai.has_error());
        for falsy in [json!(""), json!(false), json!(0), Value::Null] {
            ai.error = Some(falsy);
            assert!(!ai.has_error());
        }
        for truthy in [json!("timeout"), json!({ "code": 500 }), json!(["quota"]), json!(1)] {
            ai.error = Some(truthy);
            assert!(ai.has_error());
        }
    }

    #[test]
    fn truthiness_follows_javascript() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Select < Stage::Parsed);
        assert!(Stage::Parsed < Stage::Matched);
        assert_eq!(Stage::Matched.number(), 3);
    }
}
