//! HTTP API Module
//!
//! Routing and response envelope for the gateway. Every endpoint answers
//! with the uniform `{code, message, result}` envelope over HTTP 200:
//! code 0 on success, 1 for parameter errors, 500 for system errors.

pub mod handlers;
pub mod requests;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warp::{http::StatusCode, Filter, Rejection, Reply};

use crate::config::Config;
use crate::crypto::KeyPair;
use crate::error::{GatewayError, CODE_PARAM_ERROR, CODE_SUCCESS, CODE_SYSTEM_ERROR};
use crate::node::NodeClient;

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Uniform response envelope for all API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespBody<T> {
    /// 0 success, 1 parameter error, 500 system error
    pub code: i64,
    /// Human-readable outcome
    pub message: String,
    /// Endpoint-specific payload (absent on failure)
    pub result: Option<T>,
}

/// Wraps a handler outcome into the response envelope.
pub(crate) fn respond<T: Serialize>(result: Result<T, GatewayError>) -> warp::reply::Json {
    match result {
        Ok(value) => warp::reply::json(&RespBody {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            result: Some(value),
        }),
        Err(err) => warp::reply::json(&RespBody::<T> {
            code: err.code(),
            message: err.to_string(),
            result: None,
        }),
    }
}

// ============================================================================
// SHARED STATE
// ============================================================================

/// State shared by all handlers: the node client and the ephemeral keypair
/// used only for read-only token-balance queries.
///
/// The keypair is constructed at startup and passed in explicitly; it never
/// signs a transfer.
pub struct GatewayState {
    pub node: NodeClient,
    pub query_keys: KeyPair,
}

/// Creates a warp filter that injects the shared gateway state.
fn with_state(
    state: Arc<GatewayState>,
) -> impl Filter<Extract = (Arc<GatewayState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler.
///
/// Malformed request bodies and query strings are caller input, so they map
/// to the parameter error code; anything unrecognized is a system error.
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, code, message) = if let Some(err) = rej.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::OK, CODE_PARAM_ERROR, format!("invalid request body: {}", err))
    } else if rej.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::OK, CODE_PARAM_ERROR, "invalid query string".to_string())
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, CODE_PARAM_ERROR, "endpoint not found".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, CODE_PARAM_ERROR, "method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (StatusCode::INTERNAL_SERVER_ERROR, CODE_SYSTEM_ERROR, "internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&RespBody::<()> {
            code,
            message,
            result: None,
        }),
        status,
    ))
}

// ============================================================================
// API SERVER
// ============================================================================

/// REST API server for the gateway.
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Shared handler state
    state: Arc<GatewayState>,
}

impl ApiServer {
    /// Creates a new API server.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `node` - Downstream node client
    /// * `query_keys` - Ephemeral keypair for read-only balance queries
    pub fn new(config: Config, node: NodeClient, query_keys: KeyPair) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(GatewayState { node, query_keys }),
        }
    }

    /// Starts the API server and handles HTTP requests until shutdown.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr = format!("{}:{}", self.config.api.host, self.config.api.port)
            .parse()
            .context("Failed to parse API server address")?;

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Creates all API routes under the /v1 prefix.
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        let state = self.state.clone();

        let gen_key = warp::path!("v1" / "genkey")
            .and(warp::get())
            .and_then(handlers::gen_key);

        let valid_address = warp::path!("v1" / "validaddress")
            .and(warp::get())
            .and(warp::query())
            .and_then(handlers::valid_address);

        let olo_balance = warp::path!("v1" / "olobalance")
            .and(warp::get())
            .and(warp::query())
            .and(with_state(state.clone()))
            .and_then(handlers::olo_balance);

        let token_balance = warp::path!("v1" / "tokenbalance")
            .and(warp::get())
            .and(warp::query())
            .and(with_state(state.clone()))
            .and_then(handlers::token_balance);

        let build_olo_tx = warp::path!("v1" / "buildolotx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_olo_tx);

        let build_token_tx = warp::path!("v1" / "buildtokentx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_token_tx);

        let build_token_issue_tx = warp::path!("v1" / "buildtokenissuetx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_token_issue_tx);

        let build_token_redeem_tx = warp::path!("v1" / "buildtokenredeemtx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_token_redeem_tx);

        let build_token_batch_tx = warp::path!("v1" / "buildtokenbatchtx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_token_batch_tx);

        let build_token_batch_txs = warp::path!("v1" / "buildtokenbatchtxs")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::build_token_batch_txs);

        let send_tx = warp::path!("v1" / "sendtx")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::send_tx);

        let check_tx = warp::path!("v1" / "checktx")
            .and(warp::get())
            .and(warp::query())
            .and(with_state(state))
            .and_then(handlers::check_tx);

        gen_key
            .or(valid_address)
            .or(olo_balance)
            .or(token_balance)
            .or(build_olo_tx)
            .or(build_token_tx)
            .or(build_token_issue_tx)
            .or(build_token_redeem_tx)
            .or(build_token_batch_tx)
            .or(build_token_batch_txs)
            .or(send_tx)
            .or(check_tx)
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
