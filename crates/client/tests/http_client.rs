use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use vaultops_client::{ClientConfig, HttpMutationClient};
use vaultops_core::{CharacterId, ItemHash, ItemInstanceId, MembershipId};
use vaultops_transfer::{EquipArgs, EquipManyArgs, RemoteError, RemoteMutationClient, TransferArgs};

#[derive(Debug)]
struct CapturedRequest {
    method: Method,
    target: String,
    body: Value,
}

struct Reply {
    status: StatusCode,
    body: &'static str,
    requests: mpsc::UnboundedSender<CapturedRequest>,
}

type Shared = State<Arc<Reply>>;

async fn capture_post(
    State(reply): Shared,
    OriginalUri(uri): OriginalUri,
    axum::Json(body): axum::Json<Value>,
) -> (StatusCode, &'static str) {
    let _ = reply.requests.send(CapturedRequest {
        method: Method::POST,
        target: uri.to_string(),
        body,
    });
    (reply.status, reply.body)
}

async fn capture_get(
    State(reply): Shared,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, &'static str) {
    let _ = reply.requests.send(CapturedRequest {
        method: Method::GET,
        target: uri.to_string(),
        body: Value::Null,
    });
    (reply.status, reply.body)
}

/// Stand-in for the account service proxy: answers every route with a fixed
/// status and body and reports what it received.
struct TestServer {
    base_url: String,
    requests: mpsc::UnboundedReceiver<CapturedRequest>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(status: StatusCode, body: &'static str) -> Self {
        let (tx, requests) = mpsc::unbounded_channel();
        let reply = Arc::new(Reply {
            status,
            body,
            requests: tx,
        });

        let app = Router::new()
            .route("/api/user/bungie/post/transfer/", post(capture_post))
            .route("/api/user/bungie/post/equip/", post(capture_post))
            .route("/api/user/bungie/post/equipmany/", post(capture_post))
            .route("/api/user/bungie/get/", get(capture_get))
            .with_state(reply);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    fn client(&self) -> HttpMutationClient {
        let config = ClientConfig::new(&self.base_url, MembershipId::new("4611686018467000000"))
            .with_timeout(Duration::from_secs(5));
        HttpMutationClient::new(config).unwrap()
    }

    async fn next_request(&mut self) -> CapturedRequest {
        self.requests.recv().await.expect("server stopped")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn transfer_posts_the_service_payload() {
    let mut server = TestServer::spawn(StatusCode::OK, "{}").await;
    let client = server.client();

    client
        .transfer(TransferArgs {
            item_id: Some(ItemInstanceId::new("6917529000000000001")),
            item_template_hash: ItemHash(1_363_886_209),
            character_id: CharacterId::new("2305843009300000001"),
            to_shared_pool: true,
        })
        .await
        .unwrap();

    let request = server.next_request().await;
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.target, "/api/user/bungie/post/transfer/");
    assert_eq!(
        request.body,
        json!({
            "username": "4611686018467000000",
            "itemReferenceHash": 1_363_886_209u32,
            "stackSize": 1,
            "transferToVault": true,
            "itemId": "6917529000000000001",
            "characterId": "2305843009300000001",
            "membershipType": 3
        })
    );
}

#[tokio::test]
async fn equip_calls_hit_their_endpoints() {
    let mut server = TestServer::spawn(StatusCode::OK, "{}").await;
    let client = server.client();
    let character_id = CharacterId::new("1");

    client
        .equip(EquipArgs {
            item_id: ItemInstanceId::new("10"),
            character_id: character_id.clone(),
        })
        .await
        .unwrap();
    client
        .equip_many(EquipManyArgs {
            item_ids: vec![ItemInstanceId::new("10"), ItemInstanceId::new("11")],
            character_id,
        })
        .await
        .unwrap();

    let equip = server.next_request().await;
    assert_eq!(equip.target, "/api/user/bungie/post/equip/");
    assert_eq!(equip.body["itemId"], json!("10"));

    let many = server.next_request().await;
    assert_eq!(many.target, "/api/user/bungie/post/equipmany/");
    assert_eq!(many.body["itemIds"], json!(["10", "11"]));
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = TestServer::spawn(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"DestinyItemNotFound"}"#).await;

    let err = server
        .client()
        .equip(EquipArgs {
            item_id: ItemInstanceId::new("10"),
            character_id: CharacterId::new("1"),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RemoteError::Api {
            status: 500,
            body: r#"{"error":"DestinyItemNotFound"}"#.to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}"), MembershipId::new("1"))
        .with_timeout(Duration::from_secs(2));
    let err = HttpMutationClient::new(config)
        .unwrap()
        .equip(EquipArgs {
            item_id: ItemInstanceId::new("10"),
            character_id: CharacterId::new("1"),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Network(_)));
}

#[tokio::test]
async fn fetches_and_decodes_the_profile() {
    let profile = r#"{
        "Response": {
            "profileInventory": { "data": { "items": [
                { "itemHash": 5, "itemInstanceId": "300", "bucketHash": 138197802 }
            ] } },
            "characterEquipment": { "data": { "2305843009300000001": { "items": [
                { "itemHash": 6, "itemInstanceId": "100", "bucketHash": 3448274439 }
            ] } } },
            "characterInventories": { "data": { "2305843009300000001": { "items": [] } } }
        }
    }"#;
    let mut server = TestServer::spawn(StatusCode::OK, profile).await;

    let response = server.client().fetch_profile().await.unwrap();

    let request = server.next_request().await;
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.target, "/api/user/bungie/get/?username=4611686018467000000");

    let snapshot = vaultops_inventory::AccountSnapshot::from_profile(&response);
    assert_eq!(snapshot.vault().len(), 1);
    assert!(snapshot.has_character(&CharacterId::new("2305843009300000001")));
}
