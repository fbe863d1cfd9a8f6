//! chainproxy-api: the REST surface of the gateway.
//!
//! | Route | Success |
//! |---|---|
//! | `GET /address/{address}` | `{"account": Account}` |
//! | `GET /address/{address}/balance` | `{"balance": string}` |
//! | `GET /address/{address}/nonce` | `{"nonce": u64}` |
//! | `POST /transaction/send` | `{"txHash": string}` |
//!
//! Every failure is `{"error": string}` with a status chosen from the
//! error's [`ErrorKind`](chainproxy_core::ErrorKind).

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use server::{ApiServer, ApiServerConfig, ApiServerError};
pub use state::ApiState;
