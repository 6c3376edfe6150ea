//! Headless mode - run one command without the TUI
//!
//! Each command drives the same [`Engine`](promptlab_app::Engine) and
//! reducers as the TUI, then reports what happened as one or more events.
//!
//! # Output
//!
//! With `--json` events are written as NDJSON, one event per line, each with
//! an `"event"` tag:
//!
//! ```json
//! {"event":"prompt_created","prompt":{"id":3,"name":"Summarise",...},"timestamp":1704700001000}
//! {"event":"test_run","version_id":7,"run":{...},"timestamp":1704700002000}
//! ```
//!
//! Without it the same events are printed as plain text.

pub mod runner;

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use promptlab_core::{Prompt, PromptId, TestRun, Version, VersionId};
use serde::Serialize;
use tracing::error;

/// Events emitted by headless commands
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// All prompts, as returned by the backend
    PromptList { prompts: Vec<Prompt>, timestamp: i64 },

    /// One prompt with the history of its selected version
    PromptDetail {
        prompt: Prompt,
        history: Vec<TestRun>,
        timestamp: i64,
    },

    PromptCreated { prompt: Prompt, timestamp: i64 },

    VersionSaved {
        prompt_id: PromptId,
        version: Version,
        timestamp: i64,
    },

    /// A finished test run; `version_id` is absent for quick tests
    TestRun {
        version_id: Option<VersionId>,
        run: TestRun,
        timestamp: i64,
    },

    Comparison {
        label_a: String,
        label_b: String,
        a: TestRun,
        b: TestRun,
        timestamp: i64,
    },

    History {
        version_id: VersionId,
        runs: Vec<TestRun>,
        timestamp: i64,
    },

    Exported { path: PathBuf, timestamp: i64 },

    /// The stored API key changed
    ApiKey { stored: bool, timestamp: i64 },

    ConfigInitialized {
        path: PathBuf,
        created: bool,
        timestamp: i64,
    },

    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout, as JSON or text
    pub fn emit(&self, json: bool) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_to(&mut stdout, json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Emit this event to stderr; used for the final error of a command
    pub fn emit_error(&self, json: bool) {
        let mut stderr = io::stderr().lock();
        if let Err(e) = self.write_to(&mut stderr, json) {
            error!("Failed to write headless event to stderr: {}", e);
        }
    }

    pub fn write_to(&self, out: &mut impl Write, json: bool) -> io::Result<()> {
        if json {
            let line = serde_json::to_string(self).map_err(io::Error::other)?;
            writeln!(out, "{}", line)
        } else {
            writeln!(out, "{}", self.to_text())
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn prompt_list(prompts: Vec<Prompt>) -> Self {
        Self::PromptList {
            prompts,
            timestamp: Self::now(),
        }
    }

    pub fn prompt_detail(prompt: Prompt, history: Vec<TestRun>) -> Self {
        Self::PromptDetail {
            prompt,
            history,
            timestamp: Self::now(),
        }
    }

    pub fn prompt_created(prompt: Prompt) -> Self {
        Self::PromptCreated {
            prompt,
            timestamp: Self::now(),
        }
    }

    pub fn version_saved(prompt_id: PromptId, version: Version) -> Self {
        Self::VersionSaved {
            prompt_id,
            version,
            timestamp: Self::now(),
        }
    }

    pub fn test_run(version_id: Option<VersionId>, run: TestRun) -> Self {
        Self::TestRun {
            version_id,
            run,
            timestamp: Self::now(),
        }
    }

    pub fn comparison(label_a: String, label_b: String, a: TestRun, b: TestRun) -> Self {
        Self::Comparison {
            label_a,
            label_b,
            a,
            b,
            timestamp: Self::now(),
        }
    }

    pub fn history(version_id: VersionId, runs: Vec<TestRun>) -> Self {
        Self::History {
            version_id,
            runs,
            timestamp: Self::now(),
        }
    }

    pub fn exported(path: PathBuf) -> Self {
        Self::Exported {
            path,
            timestamp: Self::now(),
        }
    }

    pub fn api_key(stored: bool) -> Self {
        Self::ApiKey {
            stored,
            timestamp: Self::now(),
        }
    }

    pub fn config_initialized(path: PathBuf, created: bool) -> Self {
        Self::ConfigInitialized {
            path,
            created,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Plain-text rendering
    // ─────────────────────────────────────────────────────────

    pub fn to_text(&self) -> String {
        match self {
            Self::PromptList { prompts, .. } => {
                if prompts.is_empty() {
                    return "No prompts yet".to_string();
                }
                prompts
                    .iter()
                    .map(|p| {
                        format!(
                            "{:>5}  {:<24}  {:>3} versions  {}",
                            p.id,
                            p.name,
                            p.versions.len(),
                            p.description_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Self::PromptDetail {
                prompt, history, ..
            } => {
                let mut text = prompt_text(prompt);
                text.push_str(&format!("\n\nHistory ({})", history.len()));
                for run in history {
                    text.push('\n');
                    text.push_str(&run_summary(run));
                }
                text
            }
            Self::PromptCreated { prompt, .. } => {
                format!("Created prompt {} \"{}\"", prompt.id, prompt.name)
            }
            Self::VersionSaved {
                prompt_id, version, ..
            } => format!(
                "Saved {} (id {}) of prompt {}",
                version.label(),
                version.id,
                prompt_id
            ),
            Self::TestRun { run, .. } => run_text(run),
            Self::Comparison {
                label_a,
                label_b,
                a,
                b,
                ..
            } => format!(
                "── {label_a} ──\n{}\n\n── {label_b} ──\n{}",
                run_text(a),
                run_text(b)
            ),
            Self::History {
                version_id, runs, ..
            } => {
                if runs.is_empty() {
                    return format!("No runs for version {version_id}");
                }
                runs.iter().map(run_summary).collect::<Vec<_>>().join("\n")
            }
            Self::Exported { path, .. } => format!("Exported results to {}", path.display()),
            Self::ApiKey { stored: true, .. } => "API key saved".to_string(),
            Self::ApiKey { stored: false, .. } => "API key removed".to_string(),
            Self::ConfigInitialized {
                path,
                created: true,
                ..
            } => format!("Wrote {}", path.display()),
            Self::ConfigInitialized {
                path,
                created: false,
                ..
            } => format!("{} already exists", path.display()),
            Self::Error { message, .. } => format!("error: {message}"),
        }
    }
}

fn prompt_text(prompt: &Prompt) -> String {
    let mut text = format!("{} (id {})", prompt.name, prompt.id);
    if let Some(description) = prompt.description.as_deref().filter(|d| !d.is_empty()) {
        text.push('\n');
        text.push_str(description);
    }
    for version in &prompt.versions {
        text.push_str(&format!("\n\n[{}] id {}\n", version.label(), version.id));
        text.push_str(&version.content);
    }
    text
}

/// One line per run: id, model and headline metrics
fn run_summary(run: &TestRun) -> String {
    let metrics = run.metrics();
    let id = run
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let when = run
        .started_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "#{id:<5} {when:<16}  {}/{}  {}  quality {:.2}  {:.0} ms  ${:.4}",
        run.ai_provider,
        run.model_name,
        run.status_label(),
        metrics.average_quality_score,
        metrics.average_response_time_ms,
        metrics.total_cost_usd
    )
}

fn run_text(run: &TestRun) -> String {
    let metrics = run.metrics();
    let mut text = format!(
        "{}/{}  avg {:.0} ms  quality {:.2}  {} tokens  ${:.4}",
        run.ai_provider,
        run.model_name,
        metrics.average_response_time_ms,
        metrics.average_quality_score,
        metrics.total_tokens,
        metrics.total_cost_usd
    );
    for (i, result) in run.results.iter().enumerate() {
        text.push_str(&format!(
            "\n\n{}. {}\n{}\n   {} ms · {} tokens · quality {:.2}",
            i + 1,
            result.question(),
            result.ai_response,
            result.response_time_ms,
            result.token_count,
            result.quality_score
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::sample_prompt;
    use promptlab_core::TestResult;

    fn render(event: &HeadlessEvent, json: bool) -> String {
        let mut out = Vec::new();
        event.write_to(&mut out, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_event_serialization() {
        let event = HeadlessEvent::prompt_created(sample_prompt(3, 1));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"prompt_created\""));
        assert!(json.contains("\"name\":\"Prompt 3\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn test_json_output_is_one_line() {
        let event = HeadlessEvent::prompt_list(vec![sample_prompt(1, 2), sample_prompt(2, 1)]);
        let out = render(&event, true);
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["event"], "prompt_list");
        assert_eq!(value["prompts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_quick_test_run_has_null_version() {
        let event = HeadlessEvent::test_run(None, TestRun::default());
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "test_run");
        assert!(value["version_id"].is_null());
    }

    #[test]
    fn test_error_event() {
        let event = HeadlessEvent::error("Backend returned 500: boom".into(), true);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"error\""));
        assert!(json.contains("\"fatal\":true"));
        assert_eq!(render(&event, false), "error: Backend returned 500: boom\n");
    }

    #[test]
    fn test_prompt_list_text() {
        let text = HeadlessEvent::prompt_list(vec![sample_prompt(1, 2)]).to_text();
        assert!(text.contains("Prompt 1"));
        assert!(text.contains("2 versions"));
        assert_eq!(HeadlessEvent::prompt_list(vec![]).to_text(), "No prompts yet");
    }

    #[test]
    fn test_run_text_lists_each_result() {
        let run = TestRun {
            ai_provider: "openai".into(),
            model_name: "gpt-4".into(),
            results: vec![TestResult {
                ai_response: "Rust is a systems language".into(),
                response_time_ms: 850,
                token_count: 12,
                quality_score: 0.9,
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = HeadlessEvent::test_run(None, run).to_text();
        assert!(text.starts_with("openai/gpt-4"));
        assert!(text.contains("Rust is a systems language"));
        assert!(text.contains("850 ms · 12 tokens · quality 0.90"));
    }

    #[test]
    fn test_prompt_detail_text_shows_versions() {
        let text = HeadlessEvent::prompt_detail(sample_prompt(1, 2), vec![]).to_text();
        assert!(text.contains("[v1]"));
        assert!(text.contains("v2: answer {{question}}"));
        assert!(text.contains("History (0)"));
    }
}
