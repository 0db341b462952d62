//! Session persistence and export.

use crate::model::Session;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// `<data dir>/cv-analysis/sessions`.
pub fn sessions_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("no data directory for this platform")?;
    Ok(base.join("cv-analysis").join("sessions"))
}

fn session_file_name(session: &Session) -> String {
    let stamp = session
        .timestamp_utc
        .replace(':', "-")
        .replace('T', "_");
    let key = session
        .parsed
        .as_ref()
        .and_then(|p| p.cache_key.as_deref())
        .filter(|k| !k.is_empty())
        .map(|k| k.chars().take(8).collect::<String>())
        .unwrap_or_else(|| "nokey".into());
    format!("session-{stamp}-{key}.json")
}

/// Save under the default sessions directory and return the written path.
pub fn save_session(session: &Session) -> Result<PathBuf> {
    let dir = sessions_dir()?;
    save_session_in(&dir, session)
}

pub fn save_session_in(dir: &Path, session: &Session) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(session_file_name(session));
    export_json(&path, session)?;
    Ok(path)
}

pub fn export_json(path: &Path, session: &Session) -> Result<()> {
    let out = serde_json::to_string_pretty(session).context("serialize session")?;
    std::fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn export_html(path: &Path, session: &Session) -> Result<()> {
    let html = crate::report::build_html(session);
    std::fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchResult, ParsedResult};

    fn session() -> Session {
        Session {
            timestamp_utc: "2026-10-16T08:30:00Z".into(),
            base_url: "http://localhost".into(),
            file: None,
            parsed: Some(ParsedResult {
                cache_key: Some("0123456789abcdef".into()),
                ..Default::default()
            }),
            matched: Some(MatchResult {
                overall_score: Some(66.0),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn saved_session_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_session_in(dir.path(), &session()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "session-2026-10-16_08-30-00Z-01234567.json"
        );
        let loaded: Session =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.parsed, session().parsed);
        assert_eq!(loaded.matched.unwrap().overall_score, Some(66.0));
    }

    #[test]
    fn html_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        export_html(&path, &session()).unwrap();
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("良好匹配"));
    }
}
