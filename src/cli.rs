use crate::config::{self, ClientConfig, Overrides};
use crate::engine::{self, intake, HttpTransport};
use crate::model::{Notice, Session};
use crate::orchestrator::{IntakeLimits, Workflow};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cv-analysis",
    version,
    about = "Resume parsing and job matching client with optional TUI"
)]
pub struct Cli {
    /// Base URL of the resume analysis service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file (default: <config dir>/cv-analysis/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum upload size in bytes
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// How long notifications stay visible in the TUI
    #[arg(long)]
    pub toast_duration: Option<humantime::Duration>,

    /// Resume PDF to analyze
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Job description to match against
    #[arg(long, conflicts_with = "job_file")]
    pub job: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    pub job_file: Option<PathBuf>,

    /// Print JSON session and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Include the extracted raw text in text output
    #[arg(long)]
    pub raw_text: bool,

    /// Run silently: suppress all output except errors
    #[arg(long)]
    pub silent: bool,

    /// Probe the service health endpoint and exit
    #[arg(long)]
    pub check_health: bool,

    /// Export the session as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export the session as an HTML report
    #[arg(long)]
    pub export_html: Option<PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !(self.json || self.text || self.silent || self.check_health)
    }
}

/// Resolve configuration from defaults, config file and CLI flags.
pub fn build_config(args: &Cli) -> Result<ClientConfig> {
    let file = config::load_file_config(args.config.as_deref())?;
    Ok(ClientConfig::resolve(
        file,
        Overrides {
            base_url: args.base_url.clone(),
            max_file_size: args.max_file_size,
            toast_duration: args.toast_duration.map(Into::into),
        },
    ))
}

pub async fn run(args: Cli) -> Result<()> {
    // Validate that --silent can only be used with --json
    if args.silent && !args.json {
        return Err(anyhow::anyhow!(
            "--silent can only be used with --json. Use --silent --json together."
        ));
    }

    let cfg = build_config(&args)?;
    tracing::debug!(base_url = %cfg.base_url, "configuration resolved");

    if args.check_health {
        return run_health(&cfg).await;
    }

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, cfg).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_batch(args, cfg).await;
        }
    }

    run_batch(args, cfg).await
}

async fn run_health(cfg: &ClientConfig) -> Result<()> {
    let transport = HttpTransport::new(cfg)?;
    let status = engine::health(&transport).await;
    println!("{}: {}", cfg.base_url, status.to_message());
    if status.is_available() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("service unavailable"))
    }
}

pub(crate) fn job_description(args: &Cli) -> Result<Option<String>> {
    if let Some(p) = args.job_file.as_deref() {
        let text = std::fs::read_to_string(p)
            .with_context(|| format!("read job description {}", p.display()))?;
        return Ok(Some(text));
    }
    Ok(args.job.clone())
}

/// Non-interactive run: validate → analyze → match (when a job description is given).
async fn run_batch(args: Cli, cfg: ClientConfig) -> Result<()> {
    let path = args
        .file
        .clone()
        .context("--file is required in --text/--json mode")?;
    let job = job_description(&args)?;
    let transport = HttpTransport::new(&cfg)?;

    let (out_tx, out_handle) = spawn_output_writer();
    let notify = |n: Notice| {
        if !args.silent {
            let _ = out_tx.send(OutputLine::Stderr(format!("{} {}", n.icon(), n.message)));
        }
    };

    let mut workflow = Workflow::new(IntakeLimits::from(&cfg));
    let outcome: Result<()> = async {
        let file = intake::describe(&path).await?;
        workflow.select(file)?;
        notify(Notice::info("文件已选择，开始解析"));

        workflow.analyze(&transport).await?;
        notify(Notice::success("简历解析成功！"));

        if let Some(jd) = job.as_deref() {
            workflow.match_job(&transport, jd).await?;
            notify(Notice::success("匹配分析完成！"));
        }
        Ok(())
    }
    .await;

    let session = workflow.session(&cfg.base_url);
    handle_exports(&args, &session)?;

    if outcome.is_ok() && !args.silent {
        let lines = if args.json {
            vec![serde_json::to_string_pretty(&session)?]
        } else {
            summary_lines(&args, &session)
        };
        for line in lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    outcome
}

fn summary_lines(args: &Cli, session: &Session) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(meta) = session.file.as_ref() {
        lines.push(crate::text_summary::file_line(meta));
    }
    if let Some(parsed) = session.parsed.as_ref() {
        lines.extend(crate::text_summary::build_parsed_summary(parsed, args.raw_text).lines);
    }
    if let Some(matched) = session.matched.as_ref() {
        lines.push(String::new());
        lines.extend(crate::text_summary::build_match_summary(matched).lines);
    }
    lines
}

/// Handle export operations (JSON and HTML) for non-interactive modes.
fn handle_exports(args: &Cli, session: &Session) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, session)?;
    }
    if let Some(p) = args.export_html.as_deref() {
        crate::storage::export_html(p, session)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_requires_json() {
        let args = Cli::parse_from(["cv-analysis", "--silent", "--text"]);
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt.block_on(run(args)).unwrap_err();
        assert!(err.to_string().contains("--silent"));
    }

    #[test]
    fn modes() {
        assert!(Cli::parse_from(["cv-analysis"]).is_interactive());
        assert!(!Cli::parse_from(["cv-analysis", "--text", "--file", "a.pdf"]).is_interactive());
        assert!(!Cli::parse_from(["cv-analysis", "--check-health"]).is_interactive());
    }

    #[test]
    fn job_flags_conflict() {
        assert!(Cli::try_parse_from(["cv-analysis", "--job", "x", "--job-file", "y"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "base_url = \"http://a\"\nmax_file_size = 5\n").unwrap();
        let args = Cli::parse_from([
            "cv-analysis",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "http://b/",
            "--toast-duration",
            "1s",
        ]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.base_url, "http://b");
        assert_eq!(cfg.max_file_size, 5);
        assert_eq!(cfg.toast_duration, std::time::Duration::from_secs(1));
    }
}
