//! HTTP request handlers for the REST API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chainproxy_core::{Account, ErrorKind, NewTransaction, ProxyError};

use super::state::ApiState;
use super::types::*;

/// Prefix of errors from a malformed transaction body.
pub const ERR_VALIDATION: &str = "validation error";
/// Prefix of errors from a failed transaction submission.
pub const ERR_TX_GENERATION_FAILED: &str = "transaction generation failed";

/// Status code for a gateway error.
pub fn status_for(err: &ProxyError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::Resolution | ErrorKind::Dispatch => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

async fn fetch_account(state: &ApiState, address: &str) -> Result<Account, Response> {
    let cancel = state.request_token();
    state
        .handler
        .get_account(address, &cancel)
        .await
        .map_err(|e| {
            tracing::debug!(address, error = %e, kind = %e.kind(), "account lookup failed");
            error_response(status_for(&e), e.to_string())
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// Address Handlers
// ═══════════════════════════════════════════════════════════════════════════

/// Handler for `GET /address/{address}`.
pub async fn get_account_handler(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Response {
    match fetch_account(&state, &address).await {
        Ok(account) => Json(AccountEnvelope { account }).into_response(),
        Err(resp) => resp,
    }
}

/// Handler for `GET /address/{address}/balance`.
pub async fn get_balance_handler(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Response {
    match fetch_account(&state, &address).await {
        Ok(account) => Json(BalanceResponse {
            balance: account.balance,
        })
        .into_response(),
        Err(resp) => resp,
    }
}

/// Handler for `GET /address/{address}/nonce`.
pub async fn get_nonce_handler(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> Response {
    match fetch_account(&state, &address).await {
        Ok(account) => Json(NonceResponse {
            nonce: account.nonce,
        })
        .into_response(),
        Err(resp) => resp,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Transaction Handlers
// ═══════════════════════════════════════════════════════════════════════════

/// Handler for `POST /transaction/send`.
///
/// The body is parsed by hand so that malformed input gets the same
/// `{"error": ..}` envelope as every other failure, with a 400 status.
pub async fn send_transaction_handler(State(state): State<ApiState>, body: Bytes) -> Response {
    let request: SendTransactionRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("{ERR_VALIDATION}: {e}"));
        }
    };

    let signature = match hex::decode(&request.signature) {
        Ok(sig) => sig,
        Err(e) => {
            let err = ProxyError::InvalidSignature(e);
            return error_response(status_for(&err), err.to_string());
        }
    };

    let tx = NewTransaction {
        nonce: request.nonce,
        sender: request.sender,
        receiver: request.receiver,
        value: request.value,
        data: request.data,
        signature,
    };

    let cancel = state.request_token();
    match state.handler.send_transaction(tx, &cancel).await {
        Ok(tx_hash) => Json(SendTransactionResponse { tx_hash }).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, kind = %e.kind(), "transaction submission failed");
            error_response(status_for(&e), format!("{ERR_TX_GENERATION_FAILED}: {e}"))
        }
    }
}
