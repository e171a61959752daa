//! Wires the daemon client to the analyzer and project probe.

use muxgeist_core::project::{DirLister, FsLister};
use muxgeist_core::{
    ProjectProbe, ScrollbackAnalyzer, SessionContext, SessionReport, session_summary,
};

use crate::client::DaemonClient;

#[derive(Debug)]
pub struct SessionService<L = FsLister> {
    client: DaemonClient,
    analyzer: ScrollbackAnalyzer,
    probe: ProjectProbe<L>,
}

impl SessionService {
    pub fn new(client: DaemonClient) -> Self {
        Self::with_probe(client, ProjectProbe::new())
    }
}

impl<L: DirLister> SessionService<L> {
    pub fn with_probe(client: DaemonClient, probe: ProjectProbe<L>) -> Self {
        Self {
            client,
            analyzer: ScrollbackAnalyzer::new(),
            probe,
        }
    }

    pub fn client(&self) -> &DaemonClient {
        &self.client
    }

    /// Fetch, decode, and analyze one session.
    pub fn analyze_session(&self, session_id: &str) -> Option<SessionReport> {
        let context = self.client.get_context(session_id)?;
        let report = SessionReport::build(context, &self.analyzer, &self.probe);
        tracing::debug!(
            session_id,
            requires_attention = report.requires_attention,
            working_on = %report.scrollback.working_on,
            "session analyzed"
        );
        Some(report)
    }

    /// Every tracked session paired with its context, if it could be fetched.
    pub fn sessions(&self) -> Vec<(String, Option<SessionContext>)> {
        self.client
            .list_sessions()
            .into_iter()
            .map(|id| {
                let context = self.client.get_context(&id);
                (id, context)
            })
            .collect()
    }

    pub fn summary(&self) -> String {
        session_summary(&self.sessions())
    }
}
