//! Session lifecycle state

use std::fmt;

/// Lifecycle of a [`DeviceSession`](crate::DeviceSession)
///
/// `Unopened -> Open -> Closed`; there is no way back from `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Constructed, holding only the no-driver sentinel
    #[default]
    Unopened,
    /// Driver and packet contexts are live
    Open,
    /// Driver context released
    Closed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unopened => "unopened",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
