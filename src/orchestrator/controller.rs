//! Workflow controller.
//!
//! Owns the [`Workflow`] and handles UI commands one at a time, emitting events
//! for presentation layers. All state mutation happens on this task.

use super::workflow::{IntakeLimits, Workflow};
use crate::config::ClientConfig;
use crate::engine::{self, intake, Transport};
use crate::model::{Action, Notice, WorkflowEvent};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    SelectFile(PathBuf),
    Clear,
    Analyze,
    Match(String),
    CheckHealth,
    SaveSession,
    Quit,
}

/// Marks an action busy for its lifetime; the release is sent on every exit path.
pub(crate) struct BusyGuard<'a> {
    tx: &'a UnboundedSender<WorkflowEvent>,
    action: Action,
}

impl<'a> BusyGuard<'a> {
    pub fn new(tx: &'a UnboundedSender<WorkflowEvent>, action: Action) -> Self {
        let _ = tx.send(WorkflowEvent::Busy { action, busy: true });
        Self { tx, action }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkflowEvent::Busy {
            action: self.action,
            busy: false,
        });
    }
}

fn notify(tx: &UnboundedSender<WorkflowEvent>, notice: Notice) {
    let _ = tx.send(WorkflowEvent::Notice(notice));
}

/// Apply one command to the workflow. Returns `false` when the controller should stop.
pub(crate) async fn handle_command(
    cfg: &ClientConfig,
    workflow: &mut Workflow,
    transport: &dyn Transport,
    event_tx: &UnboundedSender<WorkflowEvent>,
    cmd: UiCommand,
) -> bool {
    match cmd {
        UiCommand::SelectFile(path) => {
            let res = match intake::describe(&path).await {
                Ok(file) => workflow.select(file).map(|f| f.meta()),
                Err(e) => Err(e),
            };
            match res {
                Ok(meta) => {
                    let _ = event_tx.send(WorkflowEvent::FileSelected(meta));
                    let _ = event_tx.send(WorkflowEvent::StageChanged(workflow.stage()));
                    notify(event_tx, Notice::info("文件已选择，点击开始解析"));
                }
                Err(e) => {
                    tracing::warn!(
                        kind = e.kind(),
                        detail = %e.detail().unwrap_or_default(),
                        path = %path.display(),
                        "file rejected"
                    );
                    notify(event_tx, Notice::error(e.to_string()));
                }
            }
        }
        UiCommand::Clear => {
            workflow.clear();
            let _ = event_tx.send(WorkflowEvent::Cleared);
            let _ = event_tx.send(WorkflowEvent::StageChanged(workflow.stage()));
        }
        UiCommand::Analyze => {
            let _busy = BusyGuard::new(event_tx, Action::Analyze);
            match workflow.analyze(transport).await {
                Ok(parsed) => {
                    let _ = event_tx.send(WorkflowEvent::Parsed(Box::new(parsed.clone())));
                    let _ = event_tx.send(WorkflowEvent::StageChanged(workflow.stage()));
                    notify(event_tx, Notice::success("简历解析成功！"));
                }
                Err(e) => {
                    tracing::warn!(kind = e.kind(), error = %e, "parse failed");
                    notify(event_tx, Notice::error(e.to_string()));
                }
            }
        }
        UiCommand::Match(job_description) => {
            let _busy = BusyGuard::new(event_tx, Action::Match);
            match workflow.match_job(transport, &job_description).await {
                Ok(result) => {
                    let _ = event_tx.send(WorkflowEvent::Matched(Box::new(result.clone())));
                    let _ = event_tx.send(WorkflowEvent::StageChanged(workflow.stage()));
                    notify(event_tx, Notice::success("匹配分析完成！"));
                }
                Err(e) => {
                    tracing::warn!(kind = e.kind(), error = %e, "match failed");
                    notify(event_tx, Notice::error(e.to_string()));
                }
            }
        }
        UiCommand::CheckHealth => {
            let status = engine::health(transport).await;
            let notice = if status.is_available() {
                Notice::success(status.to_message())
            } else {
                Notice::error(status.to_message())
            };
            let _ = event_tx.send(WorkflowEvent::Health(status));
            notify(event_tx, notice);
        }
        UiCommand::SaveSession => {
            if workflow.selected().is_none() && workflow.parsed().is_none() {
                notify(event_tx, Notice::info("暂无可保存的会话"));
                return true;
            }
            let session = workflow.session(&cfg.base_url);
            match crate::storage::save_session(&session) {
                Ok(p) => notify(event_tx, Notice::success(format!("已保存: {}", p.display()))),
                Err(e) => notify(event_tx, Notice::error(format!("保存失败: {e:#}"))),
            }
        }
        UiCommand::Quit => return false,
    }
    true
}

/// Process commands until `Quit` or until every sender is gone.
pub(crate) async fn run_controller(
    cfg: &ClientConfig,
    transport: Arc<dyn Transport>,
    event_tx: UnboundedSender<WorkflowEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut workflow = Workflow::new(IntakeLimits::from(cfg));
    while let Some(cmd) = cmd_rx.recv().await {
        tracing::debug!(
            ?cmd,
            stage = ?workflow.stage(),
            has_match = workflow.matched().is_some(),
            "command"
        );
        if !handle_command(cfg, &mut workflow, transport.as_ref(), &event_tx, cmd).await {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::FakeTransport;
    use crate::model::{NoticeLevel, Stage};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn drain(rx: &mut UnboundedReceiver<WorkflowEvent>) -> Vec<WorkflowEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn busy_flags(events: &[WorkflowEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::Busy { busy, .. } => Some(*busy),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn busy_is_released_after_failure() {
        let cfg = ClientConfig::default();
        let mut wf = Workflow::new(IntakeLimits::from(&cfg));
        let fake = FakeTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // No file selected: fails before any request, busy still toggles back.
        assert!(handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::Analyze).await);
        let events = drain(&mut rx);
        assert_eq!(busy_flags(&events), vec![true, false]);
        assert!(events.iter().any(|e| matches!(
            e,
            WorkflowEvent::Notice(n) if n.level == NoticeLevel::Error && n.message == "请先选择文件"
        )));
    }

    #[tokio::test]
    async fn select_analyze_and_clear_emit_stage_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.7 test").unwrap();

        let cfg = ClientConfig::default();
        let mut wf = Workflow::new(IntakeLimits::from(&cfg));
        let fake = FakeTransport::new();
        fake.respond(200, json!({"success": true, "data": {"cache_key": "k1"}}));
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::SelectFile(path)).await;
        handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::Analyze).await;
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, WorkflowEvent::FileSelected(m) if m.name == "cv.pdf")));
        assert!(events
            .iter()
            .any(|e| matches!(e, WorkflowEvent::StageChanged(Stage::Parsed))));
        assert!(events.iter().any(|e| matches!(
            e,
            WorkflowEvent::Notice(n) if n.message == "简历解析成功！"
        )));

        handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::Clear).await;
        let events = drain(&mut rx);
        assert!(matches!(events[0], WorkflowEvent::Cleared));
        assert!(matches!(events[1], WorkflowEvent::StageChanged(Stage::Select)));
    }

    #[tokio::test]
    async fn rejected_file_reports_type_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"\x89PNG....").unwrap();

        let cfg = ClientConfig::default();
        let mut wf = Workflow::new(IntakeLimits::from(&cfg));
        let fake = FakeTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::SelectFile(path)).await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            WorkflowEvent::Notice(n) if n.message == "请上传 PDF 格式的文件"
        ));
        assert!(wf.selected().is_none());
    }

    #[tokio::test]
    async fn empty_session_is_not_saved() {
        let cfg = ClientConfig::default();
        let mut wf = Workflow::new(IntakeLimits::from(&cfg));
        let fake = FakeTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_command(&cfg, &mut wf, &fake, &tx, UiCommand::SaveSession).await;
        let events = drain(&mut rx);
        assert!(matches!(
            &events[..],
            [WorkflowEvent::Notice(n)] if n.message == "暂无可保存的会话"
        ));
    }

    #[tokio::test]
    async fn controller_stops_on_quit() {
        let cfg = ClientConfig::default();
        let fake: Arc<dyn Transport> = Arc::new(FakeTransport::new());
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        cmd_tx.send(UiCommand::Clear).unwrap();
        cmd_tx.send(UiCommand::Quit).unwrap();
        // Sender stays alive: only Quit can end the loop.
        run_controller(&cfg, fake, event_tx, cmd_rx).await.unwrap();
        drop(cmd_tx);
    }
}
