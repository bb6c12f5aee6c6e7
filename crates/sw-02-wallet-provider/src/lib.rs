//! # Wallet Provider Subsystem (SW-02)
//!
//! Talks to a host wallet through an EIP-1193 style provider and turns its
//! answers into a wallet identity.
//!
//! ## Responsibilities
//!
//! - **Provider Adapter** ([`WalletProvider`]): install check, connect, account
//!   and chain lookups, network switching, event subscriptions
//! - **Message Signer** ([`WalletProvider::sign_message`]): `personal_sign` over
//!   the currently authorized account
//! - **Identity Session** ([`WalletSession`]): the
//!   `Disconnected → Connecting → Connected` state machine and its notifications
//! - **Address Formatter** ([`format_address`])
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): errors, identity types, formatting, parsing
//! - **Ports Layer** (`ports/`): the [`Eip1193Provider`] trait the host implements
//! - **Adapters** (`adapters/`): [`LocalWallet`] (in-process k256 dev wallet) and
//!   [`HttpJsonRpcProvider`] (node JSON-RPC over HTTP)
//!
//! Provider access is always injected. A missing provider is a normal state:
//! lookups return `None` and actions fail with [`WalletError::NoProvider`].

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod session;

// Re-export public API
pub use adapters::http::HttpJsonRpcProvider;
pub use adapters::local::LocalWallet;
pub use domain::entities::{Connection, SessionEvent, SessionState};
pub use domain::errors::{ProviderRpcError, WalletError};
pub use domain::format::format_address;
pub use events::{Listener, ListenerRegistry, Subscription};
pub use ports::outbound::{Eip1193Provider, ProviderEvent};
pub use service::WalletProvider;
pub use session::WalletSession;
