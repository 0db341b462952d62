mod help;
mod state;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::engine::{HttpTransport, Transport};
use crate::model::{Notice, NoticeLevel, WorkflowEvent};
use crate::orchestrator::{self, UiCommand};
use crate::render::{self, sanitize_terminal as clean, AiBody, InfoField, StepStatus, TagList};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{Focus, UiState};
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli, cfg: ClientConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<WorkflowEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&cfg)?);

    let mut ui_state = UiState {
        base_url: cfg.base_url.clone(),
        toast_duration: cfg.toast_duration,
        job_input: crate::cli::job_description(&args)?.unwrap_or_default(),
        ..Default::default()
    };
    if let Some(p) = args.file.as_ref() {
        ui_state.file_input = p.display().to_string();
        let _ = cmd_tx.send(UiCommand::SelectFile(p.clone()));
    }

    // Terminal I/O is blocking, so the UI gets its own thread.
    let ui_handle = std::thread::spawn(move || run_threaded(ui_state, event_rx, cmd_tx));

    let res = orchestrator::run_controller(&cfg, transport, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut state: UiState,
    mut event_rx: UnboundedReceiver<WorkflowEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            state.expire_notices(Instant::now());
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if !handle_key(&mut state, &cmd_tx, k) {
                    let _ = cmd_tx.send(UiCommand::Quit);
                    break Ok(());
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Returns `false` when the user asked to quit.
fn handle_key(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>, k: KeyEvent) -> bool {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return false;
    }

    match state.focus {
        Focus::FilePath => {
            match k.code {
                KeyCode::Esc => state.focus = Focus::None,
                KeyCode::Enter => {
                    state.focus = Focus::None;
                    let input = state.file_input.trim();
                    if !input.is_empty() {
                        let _ = cmd_tx.send(UiCommand::SelectFile(expand_path(input)));
                    }
                }
                KeyCode::Backspace => {
                    state.file_input.pop();
                }
                KeyCode::Char(c) => state.file_input.push(c),
                _ => {}
            }
            return true;
        }
        Focus::JobDescription => {
            match k.code {
                KeyCode::Esc => state.focus = Focus::None,
                KeyCode::Enter => state.job_input.push('\n'),
                KeyCode::Backspace => {
                    state.job_input.pop();
                }
                KeyCode::Char(c) => state.job_input.push(c),
                _ => {}
            }
            return true;
        }
        Focus::None => {}
    }

    match k.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('o') => {
            state.tab = 0;
            state.focus = Focus::FilePath;
        }
        KeyCode::Char('a') => {
            if state.file.is_none() {
                state.push_notice(Notice::error("请先选择文件"));
            } else if state.can_analyze() {
                // Marked busy right away so a repeated key cannot queue a second upload.
                state.analyzing = true;
                let _ = cmd_tx.send(UiCommand::Analyze);
            }
        }
        KeyCode::Char('j') if state.tab == 1 => {
            state.result_scroll = state.result_scroll.saturating_add(1);
        }
        KeyCode::Char('j') => {
            if state.parsed.is_some() {
                state.tab = 0;
                state.focus = Focus::JobDescription;
            }
        }
        KeyCode::Char('m') => {
            if state.can_match() {
                state.matching = true;
                let _ = cmd_tx.send(UiCommand::Match(state.job_input.clone()));
            }
        }
        KeyCode::Char('x') => {
            let _ = cmd_tx.send(UiCommand::Clear);
        }
        KeyCode::Char('h') => {
            let _ = cmd_tx.send(UiCommand::CheckHealth);
        }
        KeyCode::Char('s') => {
            let _ = cmd_tx.send(UiCommand::SaveSession);
        }
        KeyCode::Char('y') => match summary_text(state) {
            Some(text) => match copy_to_clipboard(&text) {
                Ok(()) => state.push_notice(Notice::success("已复制到剪贴板")),
                Err(e) => state.push_notice(Notice::error(format!("复制失败: {e:#}"))),
            },
            None => state.push_notice(Notice::info("暂无可复制的结果")),
        },
        KeyCode::Tab => {
            state.tab = (state.tab + 1) % 3;
        }
        KeyCode::Char('?') => state.tab = 2,
        KeyCode::Up | KeyCode::Char('k') => {
            if state.tab == 1 {
                state.result_scroll = state.result_scroll.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if state.tab == 1 {
                state.result_scroll = state.result_scroll.saturating_add(1);
            }
        }
        _ => {}
    }
    true
}

/// Expand a leading `~/` to the home directory.
fn expand_path(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

/// Plain-text summary of whatever results are on screen.
fn summary_text(state: &UiState) -> Option<String> {
    let parsed = state.parsed.as_ref()?;
    let mut lines = Vec::new();
    if let Some(meta) = state.file.as_ref() {
        lines.push(crate::text_summary::file_line(meta));
    }
    lines.extend(crate::text_summary::build_parsed_summary(parsed, false).lines);
    if let Some(matched) = state.matched.as_ref() {
        lines.push(String::new());
        lines.extend(crate::text_summary::build_match_summary(matched).lines);
    }
    Some(lines.join("\n"))
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(notice_height(state)),
            ]
            .as_ref(),
        )
        .split(area);

    let title = match state.health.as_ref() {
        Some(h) => format!("cv-analysis · {} · {}", state.base_url, clean(&h.to_message())),
        None => format!("cv-analysis · {}", state.base_url),
    };
    let tabs = Tabs::new(vec![
        Line::from("Workflow"),
        Line::from("Result"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_workflow(chunks[1], f, state),
        1 => draw_result(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }

    draw_notices(chunks[2], f, state);
}

fn notice_height(state: &UiState) -> u16 {
    (state.notices.len() as u16).max(1) + 2
}

fn draw_notices(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines: Vec<Line> = state
        .notices
        .iter()
        .map(|(n, _)| {
            let color = match n.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
                NoticeLevel::Info => Color::Cyan,
            };
            Line::from(vec![
                Span::raw(format!("{} ", n.icon())),
                Span::styled(clean(&n.message), Style::default().fg(color)),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "o 选择文件  a 解析  j 岗位描述  m 匹配  x 重置  ? 帮助  q 退出",
            Style::default().fg(Color::Gray),
        )));
    }
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}

fn steps_line(state: &UiState) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (stage, status)) in render::steps(state.stage).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ──── ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = match status {
            StepStatus::Completed => ("✓".to_string(), Style::default().fg(Color::Green)),
            StepStatus::Active => (
                stage.number().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            StepStatus::Pending => (stage.number().to_string(), Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(format!("[{marker}] {}", stage.label()), style));
    }
    Line::from(spans)
}

fn input_block(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title.to_string())
}

fn draw_workflow(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let steps = Paragraph::new(steps_line(state))
        .block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(steps, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)].as_ref())
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(6), Constraint::Min(0)].as_ref())
        .split(cols[0]);

    let cursor = |on: bool| if on { "▏" } else { "" };
    let path_focused = state.focus == Focus::FilePath;
    let path = Paragraph::new(format!("{}{}", state.file_input, cursor(path_focused)))
        .block(input_block("Resume path (o)", path_focused));
    f.render_widget(path, left[0]);

    draw_file_panel(left[1], f, state);

    let job_focused = state.focus == Focus::JobDescription;
    let job_text = if state.parsed.is_none() {
        Paragraph::new(Span::styled(
            "解析简历后可输入岗位描述",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(format!("{}{}", state.job_input, cursor(job_focused)))
            .wrap(Wrap { trim: false })
    };
    let job_title = if state.matching {
        "Job description · 匹配中..."
    } else {
        "Job description (j edit, m match)"
    };
    f.render_widget(job_text.block(input_block(job_title, job_focused)), left[2]);

    draw_parsed_panel(cols[1], f, state);
}

fn draw_file_panel(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines = match state.file.as_ref() {
        Some(meta) => {
            let action = if state.analyzing {
                Span::styled("解析中...", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("按 a 开始解析", Style::default().fg(Color::Gray))
            };
            vec![
                Line::from(vec![
                    Span::raw("📄 "),
                    Span::styled(clean(&meta.name), Style::default().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(format!("{}  {}", render::format_file_size(meta.size), meta.mime)),
                Line::from(action),
                Line::from(Span::styled("x 移除", Style::default().fg(Color::DarkGray))),
            ]
        }
        None => vec![Line::from(Span::styled(
            "未选择文件 (仅支持 PDF)",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("File"));
    f.render_widget(p, area);
}

fn field_line(field: &InfoField) -> Line<'static> {
    let value_style = if field.empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Gray)),
        Span::styled(clean(&field.value), value_style),
    ])
}

fn tags_line(label: &str, tags: &TagList, color: Color) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label}: "),
        Style::default().fg(Color::Gray),
    )];
    match tags {
        TagList::Tags(items) => {
            for t in items {
                spans.push(Span::styled(format!("[{}]", clean(t)), Style::default().fg(color)));
                spans.push(Span::raw(" "));
            }
        }
        TagList::Empty(placeholder) => spans.push(Span::styled(
            (*placeholder).to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    }
    Line::from(spans)
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
}

fn draw_parsed_panel(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Parsed resume");
    let Some(parsed) = state.parsed.as_ref() else {
        let p = Paragraph::new(Span::styled(
            "尚未解析",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(p, area);
        return;
    };

    let view = render::parsed_view(parsed);
    let mut lines = vec![heading("基本信息")];
    lines.extend(view.basic.iter().map(field_line));
    lines.push(Line::from(""));
    lines.push(heading("可选信息"));
    lines.extend(view.optional.iter().map(field_line));
    lines.push(Line::from(""));
    lines.push(tags_line("技能", &view.skills, Color::Cyan));
    lines.push(Line::from(""));
    lines.push(heading("原始文本"));
    let raw_style = if view.raw_text_empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    for l in clean(&view.raw_text).lines() {
        lines.push(Line::from(Span::styled(l.to_string(), raw_style)));
    }

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn draw_result(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let Some(matched) = state.matched.as_ref() else {
        let msg = if state.matching {
            "匹配分析中..."
        } else {
            "尚无匹配结果"
        };
        let p = Paragraph::new(Span::styled(msg, Style::default().fg(Color::DarkGray)))
            .block(Block::default().borders(Borders::ALL).title("Match"));
        f.render_widget(p, area);
        return;
    };

    let view = render::match_view(matched);
    let (r, g, b) = view.tier.accent();
    let accent = Color::Rgb(r, g, b);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Length(view.bars.len() as u16 + 2),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let score = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                view.overall_display().to_string(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" / 100"),
        ]),
        Line::from(Span::styled(view.tier.label(), Style::default().fg(accent))),
    ])
    .block(Block::default().borders(Borders::ALL).title("综合评分"));
    f.render_widget(score, rows[0]);

    let bars_block = Block::default().borders(Borders::ALL).title("分项评分");
    let inner = bars_block.inner(rows[1]);
    f.render_widget(bars_block, rows[1]);
    let bar_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); view.bars.len()])
        .split(inner);
    for (bar, row) in view.bars.iter().zip(bar_rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(accent).bg(Color::Black))
            .ratio(bar.fill / 100.0)
            .label(format!("{} {}", bar.label, bar.display()));
        f.render_widget(gauge, *row);
    }

    let mut lines = vec![
        tags_line("匹配技能", &view.matched_skills, Color::Green),
        tags_line("缺失技能", &view.missing_skills, Color::Red),
        tags_line("额外技能", &view.extra_skills, Color::Cyan),
        Line::from(""),
        heading("改进建议"),
    ];
    for rec in &view.recommendations {
        lines.push(Line::from(format!("  • {}", clean(rec))));
    }

    if let Some(ai) = view.ai.as_ref() {
        lines.push(Line::from(""));
        lines.push(heading("🤖 AI 深度分析"));
        if ai.is_empty() {
            lines.push(Line::from(Span::styled(
                render::AI_EMPTY,
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(s) = ai.score.as_ref() {
            lines.push(Line::from(vec![
                Span::styled("AI 匹配评分: ", Style::default().fg(Color::Gray)),
                Span::styled(s.clone(), Style::default().fg(accent)),
            ]));
        }
        for section in &ai.sections {
            lines.push(Line::from(Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            match &section.body {
                AiBody::Text(t) => {
                    for l in clean(t).lines() {
                        lines.push(Line::from(format!("  {l}")));
                    }
                }
                AiBody::List(items) => {
                    for item in items {
                        lines.push(Line::from(format!("  • {}", clean(item))));
                    }
                }
            }
        }
    }

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("详情 (↑/↓ 滚动)"))
        .wrap(Wrap { trim: false })
        .scroll((state.result_scroll, 0));
    f.render_widget(p, rows[2]);
}

// Clipboard contents on Linux live only as long as the owning handle, so a
// dedicated thread holds each one for a while after setting it.
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;

static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

fn clipboard_sender() -> &'static std_mpsc::Sender<String> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();
        std::thread::spawn(move || {
            for text in rx {
                match arboard::Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(text) {
                            tracing::warn!(error = %e, "clipboard write failed");
                            continue;
                        }
                        std::thread::sleep(Duration::from_secs(2));
                    }
                    Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                }
            }
        });
        tx
    })
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    clipboard_sender()
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("clipboard thread stopped"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileMeta, ParsedResult};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn file_input_sends_select_on_enter() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = UiState::default();
        assert!(handle_key(&mut s, &tx, key(KeyCode::Char('o'))));
        for c in "cv.pdf".chars() {
            handle_key(&mut s, &tx, key(KeyCode::Char(c)));
        }
        // 'q' while typing is text, not quit.
        assert!(handle_key(&mut s, &tx, key(KeyCode::Char('q'))));
        handle_key(&mut s, &tx, key(KeyCode::Backspace));
        handle_key(&mut s, &tx, key(KeyCode::Enter));
        assert_eq!(s.focus, Focus::None);
        match rx.try_recv().unwrap() {
            UiCommand::SelectFile(p) => assert_eq!(p, PathBuf::from("cv.pdf")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn analyze_is_not_resent_while_busy() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = UiState::default();
        handle_key(&mut s, &tx, key(KeyCode::Char('a')));
        assert!(rx.try_recv().is_err());
        assert_eq!(s.notices[0].0.message, "请先选择文件");

        s.file = Some(FileMeta {
            name: "cv.pdf".into(),
            size: 1,
            mime: "application/pdf".into(),
        });
        handle_key(&mut s, &tx, key(KeyCode::Char('a')));
        handle_key(&mut s, &tx, key(KeyCode::Char('a')));
        assert!(matches!(rx.try_recv(), Ok(UiCommand::Analyze)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn match_requires_parse_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut s = UiState::default();
        handle_key(&mut s, &tx, key(KeyCode::Char('m')));
        assert!(rx.try_recv().is_err());

        s.parsed = Some(ParsedResult::default());
        s.job_input = "Rust".into();
        handle_key(&mut s, &tx, key(KeyCode::Char('m')));
        match rx.try_recv().unwrap() {
            UiCommand::Match(jd) => assert_eq!(jd, "Rust"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn quit_keys() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut s = UiState::default();
        assert!(!handle_key(&mut s, &tx, key(KeyCode::Char('q'))));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        s.focus = Focus::JobDescription;
        assert!(!handle_key(&mut s, &tx, ctrl_c));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/cv.pdf"), home.join("cv.pdf"));
        }
        assert_eq!(expand_path("/tmp/cv.pdf"), PathBuf::from("/tmp/cv.pdf"));
    }

    #[test]
    fn summary_requires_parse() {
        let mut s = UiState::default();
        assert!(summary_text(&s).is_none());
        s.file = Some(FileMeta {
            name: "cv.pdf".into(),
            size: 2048,
            mime: "application/pdf".into(),
        });
        s.parsed = Some(ParsedResult::default());
        let text = summary_text(&s).unwrap();
        assert!(text.starts_with("文件: cv.pdf (2.0 KB)"));
        assert!(text.contains("未识别"));
    }
}
