use crate::model::{
    Action, FileMeta, HealthStatus, MatchResult, Notice, ParsedResult, Stage, WorkflowEvent,
};
use std::time::{Duration, Instant};

/// Which text input currently receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    None,
    FilePath,
    JobDescription,
}

/// UI-side mirror of the workflow, updated only from controller events.
pub struct UiState {
    pub tab: usize,
    pub focus: Focus,
    pub file_input: String,
    pub job_input: String,
    pub result_scroll: u16,

    pub stage: Stage,
    pub file: Option<FileMeta>,
    pub parsed: Option<ParsedResult>,
    pub matched: Option<MatchResult>,
    pub analyzing: bool,
    pub matching: bool,
    pub health: Option<HealthStatus>,

    pub base_url: String,
    pub toast_duration: Duration,
    pub notices: Vec<(Notice, Instant)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            focus: Focus::None,
            file_input: String::new(),
            job_input: String::new(),
            result_scroll: 0,
            stage: Stage::Select,
            file: None,
            parsed: None,
            matched: None,
            analyzing: false,
            matching: false,
            health: None,
            base_url: String::new(),
            toast_duration: crate::config::DEFAULT_TOAST_DURATION,
            notices: Vec::new(),
        }
    }
}

impl UiState {
    pub fn push_notice(&mut self, notice: Notice) {
        const MAX: usize = 5;
        self.notices.push((notice, Instant::now()));
        if self.notices.len() > MAX {
            let _ = self.notices.drain(0..(self.notices.len() - MAX));
        }
    }

    /// Drop notices older than the display duration.
    pub fn expire_notices(&mut self, now: Instant) {
        let ttl = self.toast_duration;
        self.notices
            .retain(|(_, shown)| now.saturating_duration_since(*shown) < ttl);
    }

    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && !self.analyzing
    }

    /// The match input is offered once a parse result exists.
    pub fn can_match(&self) -> bool {
        self.parsed.is_some() && !self.matching
    }

    pub fn apply_event(&mut self, ev: WorkflowEvent) {
        match ev {
            WorkflowEvent::FileSelected(meta) => {
                self.file = Some(meta);
                self.parsed = None;
                self.matched = None;
                self.result_scroll = 0;
            }
            WorkflowEvent::Busy { action, busy } => match action {
                Action::Analyze => self.analyzing = busy,
                Action::Match => self.matching = busy,
            },
            WorkflowEvent::Parsed(parsed) => {
                self.parsed = Some(*parsed);
                self.matched = None;
                self.result_scroll = 0;
            }
            WorkflowEvent::Matched(result) => {
                self.matched = Some(*result);
                self.result_scroll = 0;
                self.tab = 1;
            }
            WorkflowEvent::StageChanged(stage) => self.stage = stage,
            WorkflowEvent::Cleared => {
                self.file = None;
                self.parsed = None;
                self.matched = None;
                self.file_input.clear();
                self.result_scroll = 0;
            }
            WorkflowEvent::Health(status) => self.health = Some(status),
            WorkflowEvent::Notice(n) => self.push_notice(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoticeLevel;

    fn meta() -> FileMeta {
        FileMeta {
            name: "cv.pdf".into(),
            size: 10,
            mime: "application/pdf".into(),
        }
    }

    #[test]
    fn busy_flags_disable_actions() {
        let mut s = UiState::default();
        assert!(!s.can_analyze());
        s.apply_event(WorkflowEvent::FileSelected(meta()));
        assert!(s.can_analyze());
        s.apply_event(WorkflowEvent::Busy {
            action: Action::Analyze,
            busy: true,
        });
        assert!(!s.can_analyze());
        s.apply_event(WorkflowEvent::Busy {
            action: Action::Analyze,
            busy: false,
        });
        assert!(s.can_analyze());
    }

    #[test]
    fn clear_resets_panels() {
        let mut s = UiState::default();
        s.apply_event(WorkflowEvent::FileSelected(meta()));
        s.apply_event(WorkflowEvent::Parsed(Box::default()));
        s.apply_event(WorkflowEvent::StageChanged(Stage::Parsed));
        assert!(s.can_match());

        s.apply_event(WorkflowEvent::Cleared);
        s.apply_event(WorkflowEvent::StageChanged(Stage::Select));
        assert!(s.file.is_none() && s.parsed.is_none() && s.matched.is_none());
        assert_eq!(s.stage, Stage::Select);
        assert!(!s.can_match());
    }

    #[test]
    fn notices_expire() {
        let mut s = UiState {
            toast_duration: Duration::from_millis(50),
            ..Default::default()
        };
        s.push_notice(Notice::error("x"));
        s.expire_notices(Instant::now());
        assert_eq!(s.notices.len(), 1);
        assert_eq!(s.notices[0].0.level, NoticeLevel::Error);
        s.expire_notices(Instant::now() + Duration::from_millis(100));
        assert!(s.notices.is_empty());
    }
}
