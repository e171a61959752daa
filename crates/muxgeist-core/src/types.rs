use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Session context ─────────────────────────────────────────────

/// One decoded `context:<id>` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub cwd: String,
    pub pane: String,
    /// Unix timestamp (seconds) of the last activity seen by the daemon.
    pub last_activity: i64,
    pub scrollback: String,
    pub scrollback_length: usize,
}

// ─── Pane map ────────────────────────────────────────────────────

/// Pane key used when the scrollback carries no pane envelope.
pub const MAIN_PANE: &str = "main";

/// Pane identifier → pane text, in envelope order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneMap {
    entries: Vec<(String, String)>,
}

impl PaneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding `body` under the `"main"` key.
    pub fn single(body: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(MAIN_PANE, body);
        map
    }

    /// Insert a pane. A repeated key replaces the body in place, keeping the
    /// position of the first occurrence.
    pub fn insert(&mut self, key: impl Into<String>, body: impl Into<String>) {
        let key = key.into();
        let body = body.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = body,
            None => self.entries.push((key, body)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, body)| body.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Analysis labels ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorKind {
    #[serde(rename = "compilation or runtime error")]
    CompileOrRuntime,
    #[serde(rename = "permission issue")]
    Permission,
    #[serde(rename = "missing file or path")]
    MissingPath,
    #[serde(rename = "missing command or typo")]
    MissingCommand,
    #[serde(rename = "memory access error")]
    MemoryAccess,
    #[serde(rename = "process terminated")]
    ProcessKilled,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompileOrRuntime => "compilation or runtime error",
            Self::Permission => "permission issue",
            Self::MissingPath => "missing file or path",
            Self::MissingCommand => "missing command or typo",
            Self::MemoryAccess => "memory access error",
            Self::ProcessKilled => "process terminated",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ToolCategory {
    #[serde(rename = "c compilation")]
    CCompilation,
    #[serde(rename = "python development")]
    PythonDevelopment,
    #[serde(rename = "version control")]
    VersionControl,
    #[serde(rename = "build system")]
    BuildSystem,
    #[serde(rename = "debugging")]
    Debugging,
    #[serde(rename = "text editing")]
    TextEditing,
    #[serde(rename = "terminal multiplexing")]
    TerminalMultiplexing,
}

impl ToolCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CCompilation => "c compilation",
            Self::PythonDevelopment => "python development",
            Self::VersionControl => "version control",
            Self::BuildSystem => "build system",
            Self::Debugging => "debugging",
            Self::TextEditing => "text editing",
            Self::TerminalMultiplexing => "terminal multiplexing",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkingOn {
    #[serde(rename = "c/c++ development")]
    CDevelopment,
    #[serde(rename = "python development")]
    PythonDevelopment,
    #[serde(rename = "debugging session")]
    DebuggingSession,
    #[serde(rename = "building project")]
    BuildingProject,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl WorkingOn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CDevelopment => "c/c++ development",
            Self::PythonDevelopment => "python development",
            Self::DebuggingSession => "debugging session",
            Self::BuildingProject => "building project",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkingOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Neutral,
    Productive,
    Debugging,
    Frustrated,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Productive => "productive",
            Self::Debugging => "debugging",
            Self::Frustrated => "frustrated",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Analysis records ────────────────────────────────────────────

/// A scrollback line that matched an error rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFinding {
    pub line: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

/// Pane key reported when no pane had significant content.
pub const UNKNOWN_ACTIVITY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollbackAnalysis {
    pub errors_found: Vec<ErrorFinding>,
    /// First-seen order, no duplicates.
    pub tools_detected: Vec<ToolCategory>,
    pub recent_commands: Vec<String>,
    pub working_on: WorkingOn,
    pub sentiment: Sentiment,
    pub panes_analyzed: Vec<String>,
    pub primary_activity: String,
}

impl Default for ScrollbackAnalysis {
    fn default() -> Self {
        Self {
            errors_found: Vec::new(),
            tools_detected: Vec::new(),
            recent_commands: Vec::new(),
            working_on: WorkingOn::Unknown,
            sentiment: Sentiment::Neutral,
            panes_analyzed: Vec::new(),
            primary_activity: UNKNOWN_ACTIVITY.to_string(),
        }
    }
}

/// Project type label used when no classification rule matched.
pub const UNKNOWN_PROJECT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project_type: String,
    pub build_system: Option<String>,
    pub files_of_interest: Vec<String>,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self {
            project_type: UNKNOWN_PROJECT.to_string(),
            build_system: None,
            files_of_interest: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_map_preserves_insertion_order() {
        let mut map = PaneMap::new();
        map.insert("2.1 - editor", "b");
        map.insert("1.0 - shell", "a");
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, ["2.1 - editor", "1.0 - shell"]);
    }

    #[test]
    fn pane_map_repeated_key_keeps_first_position() {
        let mut map = PaneMap::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("a", "3");
        assert_eq!(map.len(), 2);
        let entries: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(entries, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn pane_map_single_uses_main_key() {
        let map = PaneMap::single("hello");
        assert_eq!(map.get(MAIN_PANE), Some("hello"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn labels_serialize_as_strings() {
        let finding = ErrorFinding {
            line: "main.c:1: error: boom".into(),
            kind: ErrorKind::CompileOrRuntime,
        };
        let json = serde_json::to_value(&finding).expect("serialize");
        assert_eq!(json["type"], "compilation or runtime error");

        let json = serde_json::to_value(ToolCategory::CCompilation).expect("serialize");
        assert_eq!(json, "c compilation");
        let json = serde_json::to_value(WorkingOn::CDevelopment).expect("serialize");
        assert_eq!(json, "c/c++ development");
        let json = serde_json::to_value(Sentiment::Frustrated).expect("serialize");
        assert_eq!(json, "frustrated");
    }

    #[test]
    fn default_analysis_is_neutral_unknown() {
        let a = ScrollbackAnalysis::default();
        assert_eq!(a.working_on, WorkingOn::Unknown);
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert_eq!(a.primary_activity, "unknown");
        assert!(a.panes_analyzed.is_empty());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ErrorKind::ProcessKilled.to_string(), "process terminated");
        assert_eq!(ToolCategory::TerminalMultiplexing.to_string(), "terminal multiplexing");
        assert_eq!(WorkingOn::BuildingProject.to_string(), "building project");
        assert_eq!(Sentiment::Productive.to_string(), "productive");
    }
}
