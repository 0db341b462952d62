//! Pure data shaping for result display.
//!
//! Nothing here touches the terminal: score tiers, placeholder substitution and
//! list formatting are computed once and consumed by the text summary, the TUI
//! and the HTML report. Escaping happens at each output boundary
//! ([`escape_html`], [`sanitize_terminal`]).

use crate::model::{
    AiAnalysis, BasicInfo, CategoryMatch, MatchResult, OptionalInfo, ParsedResult, Stage,
};

/// Placeholder for a profile field the backend could not extract.
pub const UNRECOGNIZED: &str = "未识别";
pub const NO_SKILLS: &str = "未识别到技能标签";
pub const NO_RAW_TEXT: &str = "无内容";
pub const NONE: &str = "无";
pub const NO_RECOMMENDATIONS: &str = "暂无建议";
pub const AI_EMPTY: &str = "AI 分析结果为空";

/// A labelled profile field, with the placeholder already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoField {
    pub label: &'static str,
    pub value: String,
    /// True when `value` is the placeholder and should be styled as empty.
    pub empty: bool,
}

pub fn info_field(label: &'static str, value: Option<&str>) -> InfoField {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => InfoField {
            label,
            value: v.to_string(),
            empty: false,
        },
        None => InfoField {
            label,
            value: UNRECOGNIZED.to_string(),
            empty: true,
        },
    }
}

pub fn basic_info_fields(info: &BasicInfo) -> Vec<InfoField> {
    vec![
        info_field("姓名", info.name.as_deref()),
        info_field("电话", info.phone.as_deref()),
        info_field("邮箱", info.email.as_deref()),
        info_field("地址", info.address.as_deref()),
    ]
}

pub fn optional_info_fields(info: &OptionalInfo) -> Vec<InfoField> {
    vec![
        info_field("求职意向", info.job_intention.as_deref()),
        info_field("工作年限", info.experience_years.as_deref()),
        info_field("学历背景", info.education.as_deref()),
    ]
}

/// A list rendered as tags, or a single placeholder when it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagList {
    Tags(Vec<String>),
    Empty(&'static str),
}

impl TagList {
    pub fn new(items: &[String], placeholder: &'static str) -> Self {
        if items.is_empty() {
            TagList::Empty(placeholder)
        } else {
            TagList::Tags(items.to_vec())
        }
    }

    #[cfg(test)]
    pub fn contains(&self, tag: &str) -> bool {
        matches!(self, TagList::Tags(tags) if tags.iter().any(|t| t == tag))
    }

    pub fn to_inline(&self) -> String {
        match self {
            TagList::Tags(tags) => tags
                .iter()
                .map(|t| format!("[{t}]"))
                .collect::<Vec<_>>()
                .join(" "),
            TagList::Empty(p) => (*p).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedView {
    pub basic: Vec<InfoField>,
    pub optional: Vec<InfoField>,
    pub skills: TagList,
    pub raw_text: String,
    pub raw_text_empty: bool,
}

pub fn parsed_view(parsed: &ParsedResult) -> ParsedView {
    let info = &parsed.info;
    let raw = parsed.raw_text.as_deref().filter(|t| !t.is_empty());
    ParsedView {
        basic: basic_info_fields(&info.basic_info),
        optional: optional_info_fields(&info.optional_info),
        skills: TagList::new(&info.skills, NO_SKILLS),
        raw_text: raw.unwrap_or(NO_RAW_TEXT).to_string(),
        raw_text_empty: raw.is_none(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreTier {
    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "优秀匹配",
            ScoreTier::Good => "良好匹配",
            ScoreTier::Fair => "一般匹配",
            ScoreTier::Poor => "匹配度较低",
        }
    }

    /// Display accent as an RGB triple.
    pub fn accent(self) -> (u8, u8, u8) {
        match self {
            ScoreTier::Excellent => (0x6b, 0xcb, 0x77),
            ScoreTier::Good => (0x00, 0xd9, 0xff),
            ScoreTier::Fair => (0xff, 0xc7, 0x5f),
            ScoreTier::Poor => (0xff, 0x6b, 0x6b),
        }
    }

    pub fn accent_hex(self) -> String {
        let (r, g, b) = self.accent();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

pub fn tier_for(score: f64) -> ScoreTier {
    if score >= 80.0 {
        ScoreTier::Excellent
    } else if score >= 60.0 {
        ScoreTier::Good
    } else if score >= 40.0 {
        ScoreTier::Fair
    } else {
        ScoreTier::Poor
    }
}

/// Scores are shown as whole numbers.
pub fn display_score(score: f64) -> i64 {
    score.round() as i64
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub label: &'static str,
    pub score: f64,
    /// Bar fill in percent, clamped to 0..=100.
    pub fill: f64,
}

impl CategoryBar {
    fn new(label: &'static str, category: Option<&CategoryMatch>) -> Self {
        let score = category
            .and_then(|c| c.score)
            .filter(|s| s.is_finite())
            .unwrap_or(0.0);
        Self {
            label,
            score,
            fill: score.clamp(0.0, 100.0),
        }
    }

    pub fn display(&self) -> i64 {
        display_score(self.score)
    }
}

pub fn category_bars(result: &MatchResult) -> Vec<CategoryBar> {
    vec![
        CategoryBar::new("技能匹配", result.skill_match.as_ref()),
        CategoryBar::new("关键词匹配", result.keyword_match.as_ref()),
        CategoryBar::new("经验匹配", result.experience_match.as_ref()),
        CategoryBar::new("学历匹配", result.education_match.as_ref()),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiBody {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiSection {
    pub title: &'static str,
    pub body: AiBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiView {
    pub score: Option<String>,
    pub sections: Vec<AiSection>,
}

impl AiView {
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.sections.is_empty()
    }
}

/// The AI block, or `None` when it must stay hidden.
///
/// A failed AI sub-analysis hides the block without any message; the
/// algorithmic scores are still shown.
pub fn ai_view(result: &MatchResult) -> Option<AiView> {
    let ai = result.ai_analysis.as_ref().filter(|ai| !ai.has_error())?;
    Some(build_ai_view(ai))
}

fn build_ai_view(ai: &AiAnalysis) -> AiView {
    let mut sections = Vec::new();
    let texts = [
        ("📊 综合分析", &ai.overall_analysis),
        ("💼 技能匹配分析", &ai.skill_analysis),
        ("📈 经验匹配分析", &ai.experience_analysis),
        ("🎓 学历匹配分析", &ai.education_analysis),
    ];
    for (title, text) in texts {
        if let Some(t) = text.as_deref().filter(|t| !t.is_empty()) {
            sections.push(AiSection {
                title,
                body: AiBody::Text(t.to_string()),
            });
        }
    }
    let lists = [
        ("✅ 优势", &ai.strengths),
        ("⚠️ 不足", &ai.weaknesses),
        ("💡 AI 建议", &ai.recommendations),
    ];
    for (title, items) in lists {
        if !items.is_empty() {
            sections.push(AiSection {
                title,
                body: AiBody::List(items.clone()),
            });
        }
    }
    AiView {
        score: ai.score.map(format_number),
        sections,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchView {
    pub overall: f64,
    pub tier: ScoreTier,
    pub bars: Vec<CategoryBar>,
    pub matched_skills: TagList,
    pub missing_skills: TagList,
    pub extra_skills: TagList,
    pub recommendations: Vec<String>,
    pub ai: Option<AiView>,
}

impl MatchView {
    pub fn overall_display(&self) -> i64 {
        display_score(self.overall)
    }
}

pub fn match_view(result: &MatchResult) -> MatchView {
    let overall = result.overall();
    let skills = result.skill_match.clone().unwrap_or_default();
    let recommendations = if result.recommendations.is_empty() {
        vec![NO_RECOMMENDATIONS.to_string()]
    } else {
        result.recommendations.clone()
    };
    MatchView {
        overall,
        tier: tier_for(overall),
        bars: category_bars(result),
        matched_skills: TagList::new(&skills.matched_skills, NONE),
        missing_skills: TagList::new(&skills.missing_skills, NONE),
        extra_skills: TagList::new(&skills.extra_skills, NONE),
        recommendations,
        ai: ai_view(result),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

pub fn step_status(step: Stage, current: Stage) -> StepStatus {
    use std::cmp::Ordering;
    match step.cmp(&current) {
        Ordering::Less => StepStatus::Completed,
        Ordering::Equal => StepStatus::Active,
        Ordering::Greater => StepStatus::Pending,
    }
}

pub fn steps(current: Stage) -> [(Stage, StepStatus); 3] {
    Stage::ALL.map(|s| (s, step_status(s, current)))
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Upload limit as shown to the user: `10MB` for whole MiB, else like [`format_file_size`].
pub fn format_size_limit(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format_file_size(bytes)
    }
}

/// Whole numbers without a fraction, everything else as-is.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop control characters (including ESC) so server text cannot drive the terminal.
pub fn sanitize_terminal(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
