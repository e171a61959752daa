//! Heuristic scrollback analysis.
//!
//! Fixed, ordered pattern rules over the most recent lines of a session's
//! captured output: error occurrences, tool categories, shell commands, and
//! the `working_on` / `sentiment` labels derived from them.

use std::sync::LazyLock;

use regex::Regex;

use crate::panes::split_panes;
use crate::types::{
    ErrorFinding, ErrorKind, PaneMap, ScrollbackAnalysis, Sentiment, ToolCategory, WorkingOn,
};

/// Only the trailing lines of the concatenated panes are examined.
pub const ANALYSIS_WINDOW: usize = 50;

/// A pane with more lines than this counts as the primary activity.
pub const SIGNIFICANT_PANE_LINES: usize = 10;

/// Prompt lines at or above this length are not treated as commands.
pub const MAX_COMMAND_LEN: usize = 100;

/// More error records than this reads as frustration.
const FRUSTRATION_THRESHOLD: usize = 3;

const COMMAND_PREFIXES: [&str; 2] = ["$ ", "# "];

// ─── Rules ───────────────────────────────────────────────────────

/// Priority order: the first matching rule claims the line.
const ERROR_RULES: &[(&str, ErrorKind)] = &[
    ("error:", ErrorKind::CompileOrRuntime),
    ("permission denied", ErrorKind::Permission),
    ("no such file", ErrorKind::MissingPath),
    ("command not found", ErrorKind::MissingCommand),
    ("segmentation fault", ErrorKind::MemoryAccess),
    ("killed", ErrorKind::ProcessKilled),
];

static TOOL_RULES: LazyLock<Vec<(Regex, ToolCategory)>> = LazyLock::new(|| {
    [
        (r"(?i)gcc|clang", ToolCategory::CCompilation),
        (r"(?i)python|pip", ToolCategory::PythonDevelopment),
        (r"(?i)git", ToolCategory::VersionControl),
        (r"(?i)make|cmake", ToolCategory::BuildSystem),
        (r"(?i)gdb|valgrind", ToolCategory::Debugging),
        (r"(?i)nvim|vim", ToolCategory::TextEditing),
        (r"(?i)tmux", ToolCategory::TerminalMultiplexing),
    ]
    .into_iter()
    .map(|(pattern, category)| (Regex::new(pattern).expect("valid tool regex"), category))
    .collect()
});

// ─── Analyzer ────────────────────────────────────────────────────

/// Stateless analyzer; every call recomputes from its argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollbackAnalyzer;

impl ScrollbackAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze raw scrollback, splitting any multi-pane envelope first.
    pub fn analyze(&self, scrollback: &str) -> ScrollbackAnalysis {
        if scrollback.is_empty() {
            return ScrollbackAnalysis::default();
        }
        self.analyze_panes(&split_panes(scrollback))
    }

    /// Analyze already-split panes.
    pub fn analyze_panes(&self, panes: &PaneMap) -> ScrollbackAnalysis {
        let mut analysis = ScrollbackAnalysis {
            panes_analyzed: panes.keys().map(String::from).collect(),
            ..ScrollbackAnalysis::default()
        };

        let mut all_lines: Vec<&str> = Vec::new();
        for (pane_id, body) in panes.iter() {
            let before = all_lines.len();
            all_lines.extend(body.split('\n'));
            if all_lines.len() - before > SIGNIFICANT_PANE_LINES {
                analysis.primary_activity = pane_id.to_string();
            }
        }

        let start = all_lines.len().saturating_sub(ANALYSIS_WINDOW);
        let recent = &all_lines[start..];

        for line in recent {
            if let Some(kind) = classify_error(line) {
                analysis.errors_found.push(ErrorFinding {
                    line: line.trim().to_string(),
                    kind,
                });
            }

            for (pattern, category) in TOOL_RULES.iter() {
                if pattern.is_match(line) && !analysis.tools_detected.contains(category) {
                    analysis.tools_detected.push(*category);
                }
            }

            if let Some(cmd) = extract_command(line) {
                analysis.recent_commands.push(cmd.to_string());
            }
        }

        analysis.working_on = working_on(&analysis.tools_detected);
        analysis.sentiment = sentiment(analysis.errors_found.len(), analysis.recent_commands.len());

        tracing::debug!(
            panes = analysis.panes_analyzed.len(),
            lines = recent.len(),
            errors = analysis.errors_found.len(),
            tools = analysis.tools_detected.len(),
            commands = analysis.recent_commands.len(),
            "scrollback analyzed"
        );

        analysis
    }
}

fn classify_error(line: &str) -> Option<ErrorKind> {
    let lower = line.to_lowercase();
    ERROR_RULES
        .iter()
        .find(|(pattern, _)| lower.contains(*pattern))
        .map(|&(_, kind)| kind)
}

/// `"$ make all"` → `Some("make all")`.
fn extract_command(line: &str) -> Option<&str> {
    let rest = COMMAND_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(*prefix))?;
    let cmd = rest.trim();
    if cmd.is_empty() || cmd.chars().count() >= MAX_COMMAND_LEN {
        return None;
    }
    Some(cmd)
}

fn working_on(tools: &[ToolCategory]) -> WorkingOn {
    if tools.contains(&ToolCategory::CCompilation) {
        WorkingOn::CDevelopment
    } else if tools.contains(&ToolCategory::PythonDevelopment) {
        WorkingOn::PythonDevelopment
    } else if tools.contains(&ToolCategory::Debugging) {
        WorkingOn::DebuggingSession
    } else if tools.contains(&ToolCategory::BuildSystem) {
        WorkingOn::BuildingProject
    } else {
        WorkingOn::Unknown
    }
}

fn sentiment(error_count: usize, command_count: usize) -> Sentiment {
    if error_count > FRUSTRATION_THRESHOLD {
        Sentiment::Frustrated
    } else if error_count > 0 {
        Sentiment::Debugging
    } else if command_count > 0 {
        Sentiment::Productive
    } else {
        Sentiment::Neutral
    }
}
