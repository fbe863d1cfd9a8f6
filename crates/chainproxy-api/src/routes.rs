//! Route configuration for the REST API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::*;
use super::state::ApiState;

/// Create the full router with all API routes.
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/address", address_routes())
        .nest("/transaction", transaction_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn address_routes() -> Router<ApiState> {
    Router::new()
        .route("/:address", get(get_account_handler))
        .route("/:address/balance", get(get_balance_handler))
        .route("/:address/nonce", get(get_nonce_handler))
}

fn transaction_routes() -> Router<ApiState> {
    Router::new().route("/send", post(send_transaction_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, http::StatusCode};
    use chainproxy_core::{Account, NewTransaction, ProxyError, ProxyHandler, TxValue};
    use std::sync::{Arc, Mutex};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    /// Facade stub: canned results plus a record of what it was asked.
    struct StubFacade {
        account: Result<Account, ProxyError>,
        tx_hash: Result<String, ProxyError>,
        sent: Mutex<Vec<NewTransaction>>,
        lookups: Mutex<Vec<String>>,
    }

    impl StubFacade {
        fn ok() -> Self {
            Self {
                account: Ok(Account {
                    address: "test".into(),
                    nonce: 1,
                    balance: "100".into(),
                }),
                tx_hash: Ok("tx hash".into()),
                sent: Mutex::new(Vec::new()),
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: ProxyError) -> Self {
            Self {
                account: Err(err.clone()),
                tx_hash: Err(err),
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl ProxyHandler for StubFacade {
        async fn get_account(
            &self,
            address: &str,
            _cancel: &CancellationToken,
        ) -> Result<Account, ProxyError> {
            self.lookups.lock().unwrap().push(address.to_string());
            self.account.clone()
        }

        async fn send_transaction(
            &self,
            tx: NewTransaction,
            _cancel: &CancellationToken,
        ) -> Result<String, ProxyError> {
            self.sent.lock().unwrap().push(tx);
            self.tx_hash.clone()
        }
    }

    fn app(facade: Arc<StubFacade>) -> Router {
        create_router(ApiState::new(facade, CancellationToken::new()))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_tx(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/transaction/send")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn account_envelope() {
        let facade = Arc::new(StubFacade::ok());
        let (status, body) = call(app(facade.clone()), get("/address/abcd")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"account": {"address": "test", "nonce": 1, "balance": "100"}})
        );
        assert_eq!(*facade.lookups.lock().unwrap(), ["abcd"]);
    }

    #[tokio::test]
    async fn balance_and_nonce_projections() {
        let facade = Arc::new(StubFacade::ok());
        let (_, body) = call(app(facade.clone()), get("/address/abcd/balance")).await;
        assert_eq!(body, serde_json::json!({"balance": "100"}));

        let (_, body) = call(app(facade), get("/address/abcd/nonce")).await;
        assert_eq!(body, serde_json::json!({"nonce": 1}));
    }

    #[tokio::test]
    async fn invalid_address_is_bad_request() {
        let err = ProxyError::InvalidAddress(hex::decode("test").unwrap_err());
        let (status, body) = call(app(Arc::new(StubFacade::failing(err))), get("/address/test")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid byte"));
    }

    #[tokio::test]
    async fn status_follows_error_kind() {
        let cases = [
            (ProxyError::DispatchFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (ProxyError::NoObservers { shard: 1 }, StatusCode::INTERNAL_SERVER_ERROR),
            (ProxyError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            let message = err.to_string();
            let (status, body) =
                call(app(Arc::new(StubFacade::failing(err))), get("/address/ab/nonce")).await;
            assert_eq!(status, expected);
            assert_eq!(body["error"], message);
        }
    }

    #[tokio::test]
    async fn send_transaction_returns_hash() {
        let facade = Arc::new(StubFacade::ok());
        let (status, body) = call(
            app(facade.clone()),
            post_tx(
                r#"{"nonce":1,"sender":"sender","receiver":"receiver","value":10,"signature":"aabbccdd","data":"data"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"txHash": "tx hash"}));
        assert_eq!(
            *facade.sent.lock().unwrap(),
            vec![NewTransaction {
                nonce: 1,
                sender: "sender".into(),
                receiver: "receiver".into(),
                value: TxValue::from(10),
                data: "data".into(),
                signature: vec![0xaa, 0xbb, 0xcc, 0xdd],
            }]
        );
    }

    #[tokio::test]
    async fn wrong_value_type_is_validation_error() {
        let facade = Arc::new(StubFacade::ok());
        let (status, body) = call(
            app(facade.clone()),
            post_tx(r#"{"sender":"sender","receiver":"receiver","value":"ishouldbeint","data":"data"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with(ERR_VALIDATION));
        assert!(facade.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_body_is_validation_error() {
        let (status, body) = call(app(Arc::new(StubFacade::ok())), post_tx("")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with(ERR_VALIDATION));
    }

    #[tokio::test]
    async fn non_hex_signature_never_reaches_facade() {
        let facade = Arc::new(StubFacade::ok());
        let (status, body) = call(
            app(facade.clone()),
            post_tx(
                r#"{"sender":"sender","receiver":"receiver","value":10,"signature":"not#only$hex%characters^","data":"data"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid signature"));
        assert!(facade.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn facade_failure_on_send() {
        let (status, body) = call(
            app(Arc::new(StubFacade::failing(ProxyError::DispatchFailed))),
            post_tx(r#"{"sender":"aa","receiver":"bb","value":"10","signature":"00"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            format!("{ERR_TX_GENERATION_FAILED}: {}", ProxyError::DispatchFailed)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app(Arc::new(StubFacade::ok()))
            .oneshot(get("/blocks/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
