//! Shared helpers for integration tests
//!
//! Dummy constants, config builders pointed at a wiremock node, and mock
//! mounts for the downstream node API endpoints.

use olo_gateway::api::ApiServer;
use olo_gateway::config::{ApiConfig, Config, LimiterConfig, NodeConfig};
use olo_gateway::crypto::KeyPair;
use olo_gateway::node::NodeClient;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A valid 32-byte private key for request payloads.
#[allow(dead_code)]
pub const DUMMY_PRIVATE_KEY: &str =
    "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

#[allow(dead_code)]
pub const DUMMY_TOKEN_ADDR: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

#[allow(dead_code)]
pub const DUMMY_RECIPIENT_ADDR: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

#[allow(dead_code)]
pub const DUMMY_TX_HASH: &str =
    "0x1111111111111111111111111111111111111111111111111111111111111111";

/// Last used nonce reported by the mock node account endpoint.
#[allow(dead_code)]
pub const DUMMY_ACCOUNT_NONCE: u64 = 7;

#[allow(dead_code)]
pub const DUMMY_ACCOUNT_BALANCE: &str = "5000";

/// Builds a gateway config pointed at the given mock node URL.
pub fn build_test_config(node_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        node: NodeConfig {
            api_url: node_url.to_string(),
            request_timeout_ms: 5_000,
        },
        limiter: LimiterConfig {
            interval_ms: 1000,
            capacity: 100,
        },
    }
}

/// Creates an API server wired to the given mock node.
#[allow(dead_code)]
pub fn build_test_api_server(node_url: &str) -> ApiServer {
    let config = build_test_config(node_url);
    let node = NodeClient::new(&config.node).unwrap();
    ApiServer::new(config, node, KeyPair::generate())
}

/// Mounts the account endpoint with a known balance and nonce.
#[allow(dead_code)]
pub async fn mount_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": {
                "address": DUMMY_RECIPIENT_ADDR,
                "balance": DUMMY_ACCOUNT_BALANCE,
                "nonce": DUMMY_ACCOUNT_NONCE,
            }
        })))
        .mount(server)
        .await;
}

/// Mounts the account endpoint answering as the node does for an address it
/// has never seen: success with a null result.
#[allow(dead_code)]
pub async fn mount_missing_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": null,
        })))
        .mount(server)
        .await;
}

/// Mounts a successful broadcast endpoint.
#[allow(dead_code)]
pub async fn mount_broadcast_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": { "hash": DUMMY_TX_HASH },
        })))
        .mount(server)
        .await;
}

/// Mounts the transaction lookup endpoint with the given execution code.
#[allow(dead_code)]
pub async fn mount_tx_status(server: &MockServer, code: i64) {
    Mock::given(method("GET"))
        .and(path("/v1/transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": { "hash": DUMMY_TX_HASH, "code": code, "height": 42 },
        })))
        .mount(server)
        .await;
}

/// Mounts the transaction lookup endpoint for an unknown hash.
#[allow(dead_code)]
pub async fn mount_tx_missing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": null,
        })))
        .mount(server)
        .await;
}

/// Mounts the read-only contract query endpoint returning one uint256 word.
#[allow(dead_code)]
pub async fn mount_contract_query(server: &MockServer, value: u64) {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    Mock::given(method("POST"))
        .and(path("/v1/contract/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "result": { "ret": hex::encode(word) },
        })))
        .mount(server)
        .await;
}
