//! Remote analysis API: transport seam, envelope decoding and file intake.

mod http;
pub mod intake;

pub use http::HttpTransport;

use crate::error::WorkflowError;
use crate::model::{
    is_truthy, value_to_text, HealthStatus, MatchRequest, MatchResult, ParsedResult,
    UploadRequest,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const MATCH_ENDPOINT: &str = "/match";
pub const HEALTH_ENDPOINT: &str = "/health";

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves JSON to and from the analysis service.
///
/// `Err` means the exchange itself failed (connection, TLS, body read);
/// any completed response, whatever its status, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, endpoint: &str, payload: &Value) -> anyhow::Result<ApiResponse>;
    async fn get(&self, endpoint: &str) -> anyhow::Result<ApiResponse>;
}

/// `{success, error?, data?}` wrapper used by every endpoint.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl Envelope {
    fn succeeded(&self) -> bool {
        self.success.as_ref().is_some_and(is_truthy)
    }

    fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(value_to_text)
            .filter(|m| !m.is_empty())
    }

    fn take_data<T: DeserializeOwned>(&mut self) -> Option<Result<T, serde_json::Error>> {
        match self.data.take() {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value(v)),
        }
    }
}

const EMPTY_DATA: &str = "返回数据为空";

/// Interpret an `/upload` response.
pub fn decode_upload(resp: &ApiResponse) -> Result<ParsedResult, WorkflowError> {
    let fail = WorkflowError::AnalysisFailed;
    let mut env: Envelope = match serde_json::from_str(&resp.body) {
        Ok(env) => env,
        Err(_) if !resp.is_success() => {
            return Err(fail(format!("请求失败: {}", resp.status)));
        }
        Err(_) => return Err(fail("解析失败，请重试".into())),
    };
    if !resp.is_success() {
        return Err(fail(
            env.error_message()
                .unwrap_or_else(|| format!("请求失败: {}", resp.status)),
        ));
    }
    if !env.succeeded() {
        return Err(fail(env.error_message().unwrap_or_else(|| "解析失败".into())));
    }
    match env.take_data() {
        Some(Ok(parsed)) => Ok(parsed),
        Some(Err(e)) => Err(fail(format!("返回数据格式错误: {e}"))),
        None => Err(fail(EMPTY_DATA.into())),
    }
}

/// Interpret a `/match` response.
pub fn decode_match(resp: &ApiResponse) -> Result<MatchResult, WorkflowError> {
    let fail = WorkflowError::MatchFailed;
    let mut env: Envelope = serde_json::from_str(&resp.body)
        .map_err(|_| fail("匹配分析失败，请重试".into()))?;
    if !resp.is_success() || !env.succeeded() {
        return Err(fail(
            env.error_message().unwrap_or_else(|| "匹配分析失败".into()),
        ));
    }
    match env.take_data() {
        Some(Ok(result)) => Ok(result),
        Some(Err(e)) => Err(fail(format!("返回数据格式错误: {e}"))),
        None => Err(fail(EMPTY_DATA.into())),
    }
}

/// Interpret a `/health` response. Body content is optional.
pub fn decode_health(resp: &ApiResponse) -> HealthStatus {
    if !resp.is_success() {
        return HealthStatus::Unavailable {
            reason: format!("HTTP {}", resp.status),
        };
    }
    let body: Value = serde_json::from_str(&resp.body).unwrap_or(Value::Null);
    let field = |k: &str| body.get(k).and_then(value_to_text);
    HealthStatus::Available {
        message: field("message"),
        version: field("version"),
    }
}

pub async fn upload(
    transport: &dyn Transport,
    req: &UploadRequest,
) -> Result<ParsedResult, WorkflowError> {
    let payload = serde_json::to_value(req)
        .map_err(|e| WorkflowError::AnalysisFailed(e.to_string()))?;
    let resp = transport
        .post_json(UPLOAD_ENDPOINT, &payload)
        .await
        .map_err(|e| WorkflowError::AnalysisFailed(transport_message(&e, "解析失败，请重试")))?;
    tracing::debug!(status = resp.status, "upload response");
    decode_upload(&resp)
}

pub async fn match_resume(
    transport: &dyn Transport,
    req: &MatchRequest,
) -> Result<MatchResult, WorkflowError> {
    let payload =
        serde_json::to_value(req).map_err(|e| WorkflowError::MatchFailed(e.to_string()))?;
    let resp = transport
        .post_json(MATCH_ENDPOINT, &payload)
        .await
        .map_err(|e| WorkflowError::MatchFailed(transport_message(&e, "匹配分析失败，请重试")))?;
    tracing::debug!(status = resp.status, "match response");
    decode_match(&resp)
}

pub async fn health(transport: &dyn Transport) -> HealthStatus {
    match transport.get(HEALTH_ENDPOINT).await {
        Ok(resp) => decode_health(&resp),
        Err(e) => HealthStatus::Unavailable {
            reason: format!("{e:#}"),
        },
    }
}

fn transport_message(e: &anyhow::Error, fallback: &str) -> String {
    let msg = format!("{e:#}");
    if msg.trim().is_empty() {
        fallback.to_string()
    } else {
        msg
    }
}
