//! In-process stand-in for an observer node, enabled with
//! `--test-http-server-enable`.
//!
//! Answers the two observer endpoints the gateway calls:
//! `GET /address/{address}` with a synthetic zero account and
//! `POST /transaction/send` with a fresh hash per submission.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chainproxy_core::{Account, AccountResponse, Transaction, TransactionResponse};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Clone, Default)]
struct MockState {
    submitted: Arc<AtomicU64>,
}

fn router() -> Router {
    Router::new()
        .route("/address/:address", get(account))
        .route("/transaction/send", post(send))
        .with_state(MockState::default())
}

async fn account(Path(address): Path<String>) -> Json<AccountResponse> {
    Json(AccountResponse {
        account: Account {
            address,
            nonce: 0,
            balance: "0".into(),
        },
    })
}

async fn send(State(state): State<MockState>, Json(tx): Json<Transaction>) -> Json<TransactionResponse> {
    let n = state.submitted.fetch_add(1, Ordering::Relaxed) + 1;
    info!(sender = %tx.sender, nonce = tx.nonce, "mock observer accepted transaction");
    Json(TransactionResponse {
        tx_hash: format!("{n:064x}"),
    })
}

/// Start the mock observer on an ephemeral loopback port and return its base URL.
///
/// The server stops when `shutdown` is cancelled.
pub async fn spawn(shutdown: CancellationToken) -> std::io::Result<String> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    info!(addr = %addr, "mock observer listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router())
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
        {
            error!(error = ?e, "mock observer error");
        }
    });

    Ok(format!("http://{addr}"))
}
