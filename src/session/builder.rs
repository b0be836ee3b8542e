//! Builder for [`ReconstructSession`].

use super::progress::{ConsoleReporter, ProgressReporter, SilentReporter};
use super::types::{CancelToken, RecoveryPolicy};
use super::ReconstructSession;
use crate::codec::DEFAULT_FEC_LEN;

/// Configures a reconstruction session.
///
/// Every knob has a default, so `SessionBuilder::new().build()` gives a
/// working best-effort session for unencrypted transfers.
///
/// # Example
///
/// ```
/// use qrstitch::session::{RecoveryPolicy, SessionBuilder};
///
/// let session = SessionBuilder::new()
///     .policy(RecoveryPolicy::Strict)
///     .password("hunter2")
///     .build();
/// assert_eq!(session.received_chunks(), 0);
/// ```
pub struct SessionBuilder {
    policy: RecoveryPolicy,
    password: Option<String>,
    fec_len: usize,
    cancel: Option<CancelToken>,
    reporter: Option<Box<dyn ProgressReporter>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            policy: RecoveryPolicy::default(),
            password: None,
            fec_len: DEFAULT_FEC_LEN,
            cancel: None,
            reporter: None,
        }
    }

    /// What to do when a chunk cannot be corrected.
    pub fn policy(mut self, policy: RecoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Password for encrypted transfers.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Parity symbol count; must match the producer's.
    pub fn fec_len(mut self, fec_len: usize) -> Self {
        self.fec_len = fec_len;
        self
    }

    /// Share a cancellation token with the host.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Custom progress reporter.
    pub fn reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Convenience: silent when true, console output when false.
    pub fn quiet(mut self, quiet: bool) -> Self {
        if quiet {
            self.reporter = Some(Box::new(SilentReporter::new()));
        } else {
            self.reporter = Some(Box::new(ConsoleReporter::new(false)));
        }
        self
    }

    pub fn build(self) -> ReconstructSession {
        ReconstructSession::from_parts(
            self.policy,
            self.password,
            self.fec_len,
            self.cancel.unwrap_or_default(),
            self.reporter
                .unwrap_or_else(|| Box::new(SilentReporter::new())),
        )
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
