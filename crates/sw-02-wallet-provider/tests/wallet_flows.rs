//! End-to-end wallet flows against the in-process wallet.

use shared_types::authorship_message;
use shared_types::ReportType;
use std::sync::Arc;
use std::time::Duration;
use sw_01_signature_verification::verify_signature;
use sw_02_wallet_provider::{
    Eip1193Provider, LocalWallet, SessionEvent, SessionState, WalletError, WalletProvider,
    WalletSession,
};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::timeout;

fn local(chain_id: u64) -> (Arc<LocalWallet>, WalletProvider) {
    let wallet = Arc::new(LocalWallet::random(chain_id));
    let provider: Arc<dyn Eip1193Provider> = wallet.clone();
    (wallet, WalletProvider::new(Some(provider)))
}

#[tokio::test]
async fn no_provider_environment() {
    let wallet = WalletProvider::new(None);
    assert!(!wallet.is_installed());
    assert_eq!(wallet.current_address().await, None);
    assert_eq!(wallet.connect().await, Err(WalletError::NoProvider));
}

#[tokio::test]
async fn sign_and_verify_round_trip() {
    let (local, wallet) = local(11_155_111);
    let connection = wallet.connect().await.unwrap();
    assert_eq!(connection.address, local.addresses()[0]);

    let message = authorship_message(
        ReportType::PhishingUrl,
        "https://examp1e-wallet.io",
        "Fake airdrop claim page",
        &connection.address,
    );
    let signed = wallet.sign_message(&message).await.unwrap();

    let lower = connection.address.to_string();
    let upper = format!("0x{}", lower[2..].to_uppercase());
    assert!(verify_signature(signed.message(), signed.signature(), &lower));
    assert!(verify_signature(signed.message(), signed.signature(), &upper));
    assert!(!verify_signature("tampered", signed.signature(), &lower));
}

#[tokio::test]
async fn rejected_connect_returns_to_disconnected() {
    let (local, wallet) = local(1);
    local.set_rejecting(true);
    let session = WalletSession::new(wallet);

    assert_eq!(session.connect().await, Err(WalletError::UserRejected));
    assert_eq!(session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn rejected_reconnect_announces_disconnect() {
    let (local, wallet) = local(1);
    let session = WalletSession::new(wallet);
    let mut events = session.subscribe();

    let identity = session.connect().await.unwrap();
    assert_eq!(events.try_recv(), Ok(SessionEvent::Connected(identity)));

    local.set_rejecting(true);
    assert_eq!(session.connect().await, Err(WalletError::UserRejected));
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(events.try_recv(), Ok(SessionEvent::Disconnected));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

    // already disconnected, so a second failure stays quiet
    assert_eq!(session.connect().await, Err(WalletError::UserRejected));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn switch_to_unknown_network() {
    let (_, wallet) = local(1);
    assert_eq!(
        wallet.switch_network(999_999).await,
        Err(WalletError::NetworkNotAdded { chain_id: 999_999 })
    );
}

#[tokio::test]
async fn wallet_lock_disconnects_attached_session() {
    let (local, wallet) = local(1);
    let session = WalletSession::new(wallet);
    let _handles = session.attach();
    let mut events = session.subscribe();

    let identity = session.connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Connected(identity));
    assert_eq!(
        timeout(Duration::from_millis(100), events.recv()).await.unwrap(),
        Ok(SessionEvent::Connected(identity))
    );

    local.lock();

    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(events.try_recv(), Ok(SessionEvent::Disconnected));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn chain_switch_reaches_attached_session() {
    let (local, wallet) = local(1);
    local.add_chain(137);
    let session = WalletSession::new(wallet.clone());
    let _handles = session.attach();

    session.connect().await.unwrap();
    wallet.switch_network(137).await.unwrap();

    assert_eq!(session.identity().map(|i| i.chain_id), Some(137));
}

#[tokio::test]
async fn dropped_handles_detach_session() {
    let (local, wallet) = local(1);
    let session = WalletSession::new(wallet);
    let handles = session.attach();

    session.connect().await.unwrap();
    drop(handles);
    local.lock();

    assert!(session.is_connected());
}

#[tokio::test]
async fn restore_uses_existing_authorization() {
    let (_, wallet) = local(5);
    wallet.connect().await.unwrap();

    let session = WalletSession::new(wallet);
    let identity = session.restore().await.unwrap();
    assert_eq!(identity.chain_id, 5);
    assert!(session.is_connected());
}
