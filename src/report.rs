//! Self-contained HTML report of a session.
//!
//! Every value that came from the service or the user goes through
//! [`escape_html`] before it is interpolated.

use crate::model::Session;
use crate::render::{
    self, escape_html, format_file_size, AiBody, InfoField, MatchView, ParsedView, TagList,
};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", "PingFang SC", sans-serif; max-width: 900px; margin: 0 auto; padding: 24px; color: #222; }
h1 { font-size: 1.6em; }
section { margin-bottom: 28px; }
.info-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 8px; }
.info-item-label { color: #666; font-size: 0.85em; }
.info-item-value.empty { color: #aaa; font-style: italic; }
.skill-tag { display: inline-block; padding: 2px 10px; margin: 2px; border-radius: 12px; background: #eef6ff; }
.score { font-size: 3em; font-weight: bold; }
.bar { background: #eee; height: 10px; border-radius: 5px; }
.bar > div { height: 10px; border-radius: 5px; background: #00d9ff; }
pre { white-space: pre-wrap; background: #f7f7f7; padding: 12px; }
"#;

fn field_html(out: &mut String, f: &InfoField) {
    let class = if f.empty {
        "info-item-value empty"
    } else {
        "info-item-value"
    };
    let _ = write!(
        out,
        r#"<div class="info-item"><div class="info-item-label">{}</div><div class="{class}">{}</div></div>"#,
        f.label,
        escape_html(&f.value)
    );
}

fn tags_html(out: &mut String, tags: &TagList) {
    match tags {
        TagList::Tags(items) => {
            for t in items {
                let _ = write!(out, r#"<span class="skill-tag">{}</span>"#, escape_html(t));
            }
        }
        TagList::Empty(p) => {
            let _ = write!(out, r#"<span class="info-item-value empty">{p}</span>"#);
        }
    }
}

fn list_html(out: &mut String, items: &[String]) {
    out.push_str("<ul>");
    for i in items {
        let _ = write!(out, "<li>{}</li>", escape_html(i));
    }
    out.push_str("</ul>");
}

fn parsed_html(out: &mut String, view: &ParsedView) {
    out.push_str("<section><h2>基本信息</h2><div class=\"info-grid\">");
    for f in &view.basic {
        field_html(out, f);
    }
    out.push_str("</div><h2>可选信息</h2><div class=\"info-grid\">");
    for f in &view.optional {
        field_html(out, f);
    }
    out.push_str("</div><h2>技能</h2><div>");
    tags_html(out, &view.skills);
    let _ = write!(
        out,
        "</div><h2>原始文本</h2><pre>{}</pre></section>",
        escape_html(&view.raw_text)
    );
}

fn match_html(out: &mut String, view: &MatchView) {
    let _ = write!(
        out,
        r#"<section><h2>综合评分</h2><div class="score" style="color:{accent}">{score}</div><div style="color:{accent}">{label}</div>"#,
        accent = view.tier.accent_hex(),
        score = view.overall_display(),
        label = view.tier.label()
    );
    for bar in &view.bars {
        let _ = write!(
            out,
            r#"<p>{} <strong>{}</strong></p><div class="bar"><div style="width:{}%"></div></div>"#,
            bar.label,
            bar.display(),
            bar.fill
        );
    }
    out.push_str("<h3>匹配技能</h3>");
    tags_html(out, &view.matched_skills);
    out.push_str("<h3>缺失技能</h3>");
    tags_html(out, &view.missing_skills);
    out.push_str("<h3>额外技能</h3>");
    tags_html(out, &view.extra_skills);
    out.push_str("<h3>改进建议</h3>");
    list_html(out, &view.recommendations);

    if let Some(ai) = &view.ai {
        out.push_str("<h2>AI 深度分析</h2>");
        if ai.is_empty() {
            let _ = write!(out, "<p>{}</p>", render::AI_EMPTY);
        }
        if let Some(score) = &ai.score {
            let _ = write!(out, "<p>AI 匹配评分: <strong>{}</strong></p>", escape_html(score));
        }
        for section in &ai.sections {
            let _ = write!(out, "<p><strong>{}:</strong></p>", section.title);
            match &section.body {
                AiBody::Text(t) => {
                    let _ = write!(out, "<p>{}</p>", escape_html(t));
                }
                AiBody::List(items) => list_html(out, items),
            }
        }
    }
    out.push_str("</section>");
}

pub fn build_html(session: &Session) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"UTF-8\">\n<title>简历分析报告</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>简历分析报告</h1>\n<p>{}</p>\n",
        escape_html(&session.timestamp_utc)
    );
    if let Some(file) = &session.file {
        let _ = write!(
            out,
            "<p>{} ({})</p>\n",
            escape_html(&file.name),
            format_file_size(file.size)
        );
    }
    if let Some(parsed) = &session.parsed {
        parsed_html(&mut out, &render::parsed_view(parsed));
    }
    if let Some(matched) = &session.matched {
        match_html(&mut out, &render::match_view(matched));
    }
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(parsed: serde_json::Value, matched: serde_json::Value) -> Session {
        Session {
            timestamp_utc: "2026-10-16T00:00:00Z".into(),
            base_url: String::new(),
            file: None,
            parsed: Some(serde_json::from_value(parsed).unwrap()),
            matched: Some(serde_json::from_value(matched).unwrap()),
        }
    }

    #[test]
    fn server_text_is_escaped() {
        let html = build_html(&session(
            json!({"extracted_info": {"basic_info": {"name": "<script>alert(1)</script>"}}}),
            json!({"recommendations": ["a & b"]}),
        ));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<li>a &amp; b</li>"));
    }

    #[test]
    fn placeholders_and_hidden_ai_block() {
        let html = build_html(&session(
            json!({}),
            json!({"overall_score": 85, "ai_analysis": {"error": "quota"}}),
        ));
        assert!(html.contains(r#"<div class="info-item-value empty">未识别</div>"#));
        assert!(html.contains("优秀匹配"));
        assert!(!html.contains("AI 深度分析"));
    }
}
