//! Daemon-backed subcommands: status, list, summary, context, analyze.

use muxgeist::{DaemonClient, SessionService};

/// `muxgeist status`. Exit 1 when the daemon is unreachable.
pub fn cmd_status(client: &DaemonClient) -> i32 {
    match client.status() {
        Some(line) => {
            println!("{line}");
            0
        }
        None => {
            eprintln!("daemon unavailable at {}", client.socket_path().display());
            1
        }
    }
}

pub fn cmd_list(client: &DaemonClient) -> i32 {
    for id in client.list_sessions() {
        println!("{id}");
    }
    0
}

pub fn cmd_summary(service: &SessionService) -> i32 {
    println!("{}", service.summary());
    0
}

pub fn cmd_context(client: &DaemonClient, session: &str) -> anyhow::Result<i32> {
    let Some(context) = client.get_context(session) else {
        eprintln!("no context available for session {session}");
        return Ok(1);
    };
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(0)
}

pub fn cmd_analyze(service: &SessionService, session: &str, pretty: bool) -> anyhow::Result<i32> {
    let Some(report) = service.analyze_session(session) else {
        eprintln!("no context available for session {session}");
        return Ok(1);
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(0)
}
