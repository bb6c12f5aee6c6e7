//! # Session Entities

use shared_types::{ChainId, WalletIdentity};

/// Result of a successful `connect`: the first authorized account and the
/// active chain.
pub type Connection = WalletIdentity;

/// Identity lifecycle state.
///
/// `Disconnected → Connecting → Connected → Disconnected`. A failed connect
/// falls back to `Disconnected`; there is no error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(WalletIdentity),
}

impl SessionState {
    pub fn identity(&self) -> Option<WalletIdentity> {
        match self {
            SessionState::Connected(identity) => Some(*identity),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected(_))
    }
}

/// Notification published by [`crate::WalletSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A connect or restore produced an identity.
    Connected(WalletIdentity),
    /// The wallet switched to another account.
    AccountChanged(WalletIdentity),
    /// The wallet switched networks.
    ChainChanged(ChainId),
    /// The identity was cleared.
    Disconnected,
}
