//! Text summary builder for CLI output.
//!
//! Formats the render views into human-readable lines. Server-provided text is
//! passed through `sanitize_terminal` before it is printed.

use crate::model::{FileMeta, MatchResult, ParsedResult};
use crate::render::{self, sanitize_terminal as clean, AiBody, InfoField};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn push_field(lines: &mut Vec<String>, f: &InfoField) {
    lines.push(format!("  {}: {}", f.label, clean(&f.value)));
}

pub(crate) fn file_line(meta: &FileMeta) -> String {
    format!(
        "文件: {} ({})",
        clean(&meta.name),
        render::format_file_size(meta.size)
    )
}

/// Lines for the parse stage. `raw_text` is included only when asked for.
pub(crate) fn build_parsed_summary(parsed: &ParsedResult, include_raw_text: bool) -> TextSummary {
    let view = render::parsed_view(parsed);
    let mut lines = vec!["基本信息".to_string()];
    for f in &view.basic {
        push_field(&mut lines, f);
    }
    lines.push("可选信息".into());
    for f in &view.optional {
        push_field(&mut lines, f);
    }
    lines.push(format!("技能: {}", clean(&view.skills.to_inline())));
    if include_raw_text {
        lines.push("原始文本:".into());
        for l in clean(&view.raw_text).lines() {
            lines.push(format!("  {l}"));
        }
    }
    TextSummary { lines }
}

fn bar(fill: f64, width: usize) -> String {
    let filled = ((fill / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub(crate) fn build_match_summary(result: &MatchResult) -> TextSummary {
    let view = render::match_view(result);
    let mut lines = vec![format!(
        "综合评分: {} ({})",
        view.overall_display(),
        view.tier.label()
    )];
    for b in &view.bars {
        lines.push(format!("  {:<6} {} {:>3}", b.label, bar(b.fill, 20), b.display()));
    }
    lines.push(format!("匹配技能: {}", clean(&view.matched_skills.to_inline())));
    lines.push(format!("缺失技能: {}", clean(&view.missing_skills.to_inline())));
    lines.push(format!("额外技能: {}", clean(&view.extra_skills.to_inline())));
    lines.push("改进建议:".into());
    for r in &view.recommendations {
        lines.push(format!("  - {}", clean(r)));
    }

    if let Some(ai) = &view.ai {
        lines.push("AI 深度分析:".into());
        if ai.is_empty() {
            lines.push(format!("  {}", render::AI_EMPTY));
        }
        if let Some(score) = &ai.score {
            lines.push(format!("  AI 匹配评分: {score}"));
        }
        for s in &ai.sections {
            match &s.body {
                AiBody::Text(t) => lines.push(format!("  {}: {}", s.title, clean(t))),
                AiBody::List(items) => {
                    lines.push(format!("  {}:", s.title));
                    for i in items {
                        lines.push(format!("    - {}", clean(i)));
                    }
                }
            }
        }
    }
    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_summary_headline_and_bars() {
        let r: MatchResult = serde_json::from_value(json!({
            "overall_score": 85,
            "skill_match": {"score": 90, "matched_skills": ["Python"], "missing_skills": [], "extra_skills": []}
        }))
        .unwrap();
        let s = build_match_summary(&r);
        assert_eq!(s.lines[0], "综合评分: 85 (优秀匹配)");
        assert!(s.lines[1].contains("技能匹配") && s.lines[1].ends_with(" 90"));
        assert!(s.lines.iter().any(|l| l == "匹配技能: [Python]"));
        assert!(s.lines.iter().any(|l| l == "缺失技能: 无"));
        assert!(s.lines.iter().any(|l| l == "  - 暂无建议"));
        assert!(!s.lines.iter().any(|l| l.starts_with("AI")));
    }

    #[test]
    fn parsed_summary_strips_escape_sequences() {
        let p: ParsedResult = serde_json::from_value(json!({
            "raw_text": "line1\n\u{1b}[31mred",
            "extracted_info": {"basic_info": {"name": "张\u{1b}[2J三"}}
        }))
        .unwrap();
        let s = build_parsed_summary(&p, true);
        assert!(s.lines.iter().all(|l| !l.contains('\u{1b}')));
        assert!(s.lines.contains(&"  姓名: 张[2J三".to_string()));
        assert!(s.lines.contains(&"  电话: 未识别".to_string()));
        assert!(s.lines.contains(&"技能: 未识别到技能标签".to_string()));
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(bar(0.0, 4), "░░░░");
        assert_eq!(bar(50.0, 4), "██░░");
        assert_eq!(bar(100.0, 4), "████");
    }
}
