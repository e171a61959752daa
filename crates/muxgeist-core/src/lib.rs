//! muxgeist-core: daemon response decoding and scrollback heuristics.
//! Turns the daemon's `context:<id>` reply into a typed session record and
//! the captured scrollback into structured signals for summarization.
//! No sockets, no subprocesses; IO collaborators are injected.

pub mod analyze;
pub mod config;
pub mod decode;
pub mod error;
pub mod panes;
pub mod project;
pub mod report;
pub mod types;

pub use analyze::ScrollbackAnalyzer;
pub use config::{ConfigResolver, EnvSource, ProcessEnv, Provider};
pub use decode::{ResponseDecoder, ScrollbackFallback};
pub use error::{ConfigError, DecodeError};
pub use panes::split_panes;
pub use project::{ProjectProbe, probe_project};
pub use report::{SessionReport, extract_suggestions, session_summary};
pub use types::{
    ErrorFinding, ErrorKind, PaneMap, ProjectContext, ScrollbackAnalysis, Sentiment,
    SessionContext, ToolCategory, WorkingOn,
};
