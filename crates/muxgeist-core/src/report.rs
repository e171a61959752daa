//! Combined per-session record handed to the summarization step.

use serde::{Deserialize, Serialize};

use crate::analyze::ScrollbackAnalyzer;
use crate::project::{DirLister, ProjectProbe};
use crate::types::{ProjectContext, ScrollbackAnalysis, Sentiment, SessionContext};

const CONFIDENCE_WITH_TOOLS: f64 = 0.8;
const CONFIDENCE_WITHOUT_TOOLS: f64 = 0.5;

const MAX_SUGGESTIONS: usize = 3;
const SUGGESTION_MARKERS: [&str; 6] = ["suggestion", "recommend", "try", "1.", "2.", "3."];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub context: SessionContext,
    pub scrollback: ScrollbackAnalysis,
    pub project: ProjectContext,
    pub requires_attention: bool,
    pub confidence: f64,
}

impl SessionReport {
    /// Analyze a decoded context: scrollback heuristics plus a probe of its cwd.
    pub fn build<L: DirLister>(
        context: SessionContext,
        analyzer: &ScrollbackAnalyzer,
        probe: &ProjectProbe<L>,
    ) -> Self {
        let scrollback = analyzer.analyze(&context.scrollback);
        let project = probe.probe(&context.cwd);
        Self::from_parts(context, scrollback, project)
    }

    pub fn from_parts(
        context: SessionContext,
        scrollback: ScrollbackAnalysis,
        project: ProjectContext,
    ) -> Self {
        let requires_attention =
            !scrollback.errors_found.is_empty() || scrollback.sentiment == Sentiment::Frustrated;
        let confidence = if scrollback.tools_detected.is_empty() {
            CONFIDENCE_WITHOUT_TOOLS
        } else {
            CONFIDENCE_WITH_TOOLS
        };
        Self {
            context,
            scrollback,
            project,
            requires_attention,
            confidence,
        }
    }
}

/// Pull up to three suggestion lines out of an assistant reply.
pub fn extract_suggestions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            SUGGESTION_MARKERS.iter().any(|m| lower.contains(*m))
        })
        .map(|line| line.trim().to_string())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// One-screen overview of tracked sessions. Sessions whose context could not
/// be fetched are counted but not listed.
pub fn session_summary(sessions: &[(String, Option<SessionContext>)]) -> String {
    if sessions.is_empty() {
        return "No active tmux sessions found.".to_string();
    }

    let mut summary = format!("Tracking {} session(s):", sessions.len());
    for (id, context) in sessions {
        if let Some(ctx) = context {
            summary.push_str(&format!("\n  \u{2022} {id}: {}", ctx.cwd));
        }
    }
    summary
}
