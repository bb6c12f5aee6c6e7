//! # Wallet Session
//!
//! Owns the identity lifecycle and broadcasts its transitions.
//!
//! ```text
//! Disconnected ──connect()──▶ Connecting ──ok──▶ Connected
//!      ▲                          │                 │
//!      └────────── error ─────────┘                 │
//!      └──── disconnect() / accountsChanged([]) ────┘
//! ```

use crate::domain::entities::{SessionEvent, SessionState};
use crate::domain::errors::WalletError;
use crate::events::Subscription;
use crate::service::WalletProvider;
use parking_lot::Mutex;
use shared_types::{Address, ChainId, WalletIdentity};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Default capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

struct Inner {
    state: SessionState,
    /// Last chain seen from connect or a chainChanged event.
    last_chain_id: Option<ChainId>,
}

/// A single wallet identity and its lifecycle.
///
/// Cloning yields another handle to the same session. State sits behind a
/// mutex so provider callbacks from any task can drive it.
#[derive(Clone)]
pub struct WalletSession {
    wallet: WalletProvider,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<SessionEvent>,
}

impl WalletSession {
    pub fn new(wallet: WalletProvider) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            wallet,
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Disconnected,
                last_chain_id: None,
            })),
            events,
        }
    }

    pub fn wallet(&self) -> &WalletProvider {
        &self.wallet
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    pub fn identity(&self) -> Option<WalletIdentity> {
        self.state().identity()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Receive session notifications from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn set_connected(&self, identity: WalletIdentity) {
        let mut inner = self.inner.lock();
        inner.state = SessionState::Connected(identity);
        inner.last_chain_id = Some(identity.chain_id);
    }

    /// Connect through the wallet. May prompt.
    ///
    /// The session is `Connecting` while the prompt is open and returns to
    /// `Disconnected` if it fails.
    pub async fn connect(&self) -> Result<WalletIdentity, WalletError> {
        let was_connected = {
            let mut inner = self.inner.lock();
            let was = matches!(inner.state, SessionState::Connected(_));
            inner.state = SessionState::Connecting;
            was
        };

        match self.wallet.connect().await {
            Ok(identity) => {
                self.set_connected(identity);
                self.publish(SessionEvent::Connected(identity));
                Ok(identity)
            }
            Err(e) => {
                self.inner.lock().state = SessionState::Disconnected;
                debug!(error = %e, "connect failed");
                if was_connected {
                    self.publish(SessionEvent::Disconnected);
                }
                Err(e)
            }
        }
    }

    /// Re-establish an identity the wallet already authorized, without prompting.
    ///
    /// Returns `None` and leaves the session untouched when there is nothing to
    /// restore.
    pub async fn restore(&self) -> Option<WalletIdentity> {
        let address = self.wallet.current_address().await?;
        let chain_id = match self.wallet.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(e) => {
                debug!(error = %e, "restore could not read chain id");
                return None;
            }
        };

        let identity = WalletIdentity { address, chain_id };
        self.set_connected(identity);
        info!(%address, chain_id, "wallet session restored");
        self.publish(SessionEvent::Connected(identity));
        Some(identity)
    }

    /// User-initiated disconnect. Nothing is sent to the wallet.
    pub fn disconnect(&self) {
        let was_connected = {
            let mut inner = self.inner.lock();
            let was = inner.state != SessionState::Disconnected;
            inner.state = SessionState::Disconnected;
            was
        };

        if was_connected {
            info!("wallet disconnected");
            self.publish(SessionEvent::Disconnected);
        }
    }

    /// Apply an `accountsChanged` event.
    ///
    /// An empty list clears the identity and publishes exactly one
    /// [`SessionEvent::Disconnected`], even if the session was already
    /// disconnected. Otherwise the first account becomes the identity.
    pub fn handle_accounts_changed(&self, accounts: &[Address]) {
        let Some(address) = accounts.first().copied() else {
            self.inner.lock().state = SessionState::Disconnected;
            info!("wallet reported no accounts, session cleared");
            self.publish(SessionEvent::Disconnected);
            return;
        };

        let identity = {
            let mut inner = self.inner.lock();
            // 0 until the wallet reports a chain
            let chain_id = match inner.state {
                SessionState::Connected(current) => current.chain_id,
                _ => inner.last_chain_id.unwrap_or_default(),
            };
            let identity = WalletIdentity { address, chain_id };
            inner.state = SessionState::Connected(identity);
            identity
        };

        info!(%address, "wallet account changed");
        self.publish(SessionEvent::AccountChanged(identity));
    }

    /// Apply a `chainChanged` event.
    pub fn handle_chain_changed(&self, chain_id: ChainId) {
        {
            let mut inner = self.inner.lock();
            inner.last_chain_id = Some(chain_id);
            if let SessionState::Connected(identity) = &mut inner.state {
                identity.chain_id = chain_id;
            }
        }

        info!(chain_id, "wallet chain changed");
        self.publish(SessionEvent::ChainChanged(chain_id));
    }

    /// Drive this session from the wallet's provider events.
    ///
    /// Keep the returned handles alive for as long as the session should follow
    /// the wallet; dropping them detaches it. Empty without a provider.
    ///
    /// Each handle registers a listener that owns a clone of this session, and
    /// the provider holds that listener until the handle is dropped. A session
    /// with live handles is therefore never freed, even after every other clone
    /// is gone. Drop the handles to release it.
    pub fn attach(&self) -> Vec<Subscription> {
        if !self.wallet.is_installed() {
            return Vec::new();
        }

        let session = self.clone();
        let accounts = self
            .wallet
            .on_accounts_changed(move |accounts| session.handle_accounts_changed(&accounts));

        let session = self.clone();
        let chain = self
            .wallet
            .on_chain_changed(move |chain_id| session.handle_chain_changed(chain_id));

        vec![accounts, chain]
    }
}
