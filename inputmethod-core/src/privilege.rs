//! Privilege gate in front of every privileged shim operation
//!
//! Each call opens a fresh policy-service session, resolves the caller's
//! identity, issues one synchronous check against the IME privilege, and
//! drops the session. No result is cached; a service outage is treated the
//! same as a denial (fail closed).

use std::fs;
use std::io;

use log::warn;

/// Privilege identifier every gated operation is checked against.
pub const IME_PRIVILEGE: &str = "http://tizen.org/privilege/ime";

/// Identity of the calling process as presented to the policy service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRequest {
    /// Security label of the caller.
    pub client: String,
    /// Session token derived from the process id.
    pub session: String,
    /// Numeric user identity.
    pub user: String,
    /// Privilege being requested.
    pub privilege: &'static str,
}

impl PolicyRequest {
    /// Resolves the identity of the current process.
    pub fn for_current_process() -> Self {
        Self {
            client: read_security_label().unwrap_or_else(|| String::from("unconfined")),
            session: format!("session-{}", std::process::id()),
            user: read_uid()
                .map(|uid| uid.to_string())
                .unwrap_or_else(|| String::from("0")),
            privilege: IME_PRIVILEGE,
        }
    }
}

/// Outcome of one policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// One open connection to the policy service.
pub trait PolicySession {
    fn check(&mut self, request: &PolicyRequest) -> Decision;
}

/// Connects to the platform's policy service.
pub trait PolicyService {
    /// Opens a session; the connection is dropped after a single check.
    fn connect(&self) -> io::Result<Box<dyn PolicySession + '_>>;
}

/// Result of [`PrivilegeGate::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
    ServiceUnavailable,
}

/// Stateless per-call authorization check.
pub struct PrivilegeGate;

impl PrivilegeGate {
    /// Runs one open/check/close round against the policy service.
    pub fn authorize(service: &dyn PolicyService) -> Authorization {
        let mut session = match service.connect() {
            Ok(session) => session,
            Err(err) => {
                warn!("policy service unreachable: {err}");
                return Authorization::ServiceUnavailable;
            }
        };
        let request = PolicyRequest::for_current_process();
        match session.check(&request) {
            Decision::Allowed => Authorization::Granted,
            Decision::Denied => {
                warn!(
                    "privilege {} denied for client {}",
                    request.privilege, request.client
                );
                Authorization::Denied
            }
        }
    }
}

fn read_security_label() -> Option<String> {
    let label = fs::read_to_string("/proc/self/attr/current").ok()?;
    let label = label.trim_end_matches('\0').trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

fn read_uid() -> Option<u32> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("Uid:"))?;
    line.split_whitespace().nth(1)?.parse().ok()
}
