use openstack_client::{Account, Container, OpenStackClient, OpenStackError, TokenAuth};
use std::collections::BTreeMap;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT_PATH: &str = "/v1/AUTH_demo/";

/// Helper to create a client bound to the mock Swift endpoint
async fn create_test_client() -> (MockServer, OpenStackClient) {
    let _ = env_logger::try_init();

    let server = MockServer::start().await;
    let endpoint = format!("{}/v1/AUTH_demo", server.uri());
    let client = OpenStackClient::new(endpoint, TokenAuth::new("swift-token"))
        .expect("Failed to create client");
    (server, client)
}

#[tokio::test]
async fn test_get_account() {
    let (server, client) = create_test_client().await;

    Mock::given(method("HEAD"))
        .and(path(ACCOUNT_PATH))
        .and(header("X-Auth-Token", "swift-token"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-Account-Container-Count", "3")
                .insert_header("X-Account-Bytes-Used", "2048"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let account = client.accounts().get().await.expect("Failed to get account");

    assert_eq!(
        account,
        Account::builder().container_count(3).bytes_used(2048).build()
    );
    assert!(account.to_string().contains("containerCount=3"));
    assert!(account.to_string().contains("bytesUsed=2048"));
}

#[tokio::test]
async fn test_get_account_without_usage_headers() {
    let (server, client) = create_test_client().await;

    Mock::given(method("HEAD"))
        .and(path(ACCOUNT_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let account = client.accounts().get().await.expect("Failed to get account");
    assert_eq!(account, Account::builder().build());
}

#[tokio::test]
async fn test_get_account_with_malformed_header() {
    let (server, client) = create_test_client().await;

    Mock::given(method("HEAD"))
        .and(path(ACCOUNT_PATH))
        .respond_with(ResponseTemplate::new(204).insert_header("X-Account-Bytes-Used", "lots"))
        .mount(&server)
        .await;

    let result = client.accounts().get().await;
    assert!(
        matches!(result, Err(OpenStackError::InvalidResponse(_))),
        "Malformed header should be rejected, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_unauthorized_account() {
    let (server, client) = create_test_client().await;

    Mock::given(method("HEAD"))
        .and(path(ACCOUNT_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.accounts().get().await;
    assert!(matches!(result, Err(OpenStackError::Auth(_))));
}

#[tokio::test]
async fn test_update_and_delete_account_metadata() {
    let (server, client) = create_test_client().await;

    Mock::given(method("POST"))
        .and(path(ACCOUNT_PATH))
        .and(header("X-Account-Meta-Owner", "ops"))
        .and(header("X-Account-Meta-Tier", "gold"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(ACCOUNT_PATH))
        .and(header("X-Remove-Account-Meta-Owner", "ignored"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = BTreeMap::from([
        ("Owner".to_string(), "ops".to_string()),
        ("Tier".to_string(), "gold".to_string()),
    ]);
    assert!(client.accounts().update_metadata(&metadata).await.unwrap());
    assert!(client.accounts().delete_metadata(["Owner"]).await.unwrap());
}

#[tokio::test]
async fn test_list_containers() {
    let (server, client) = create_test_client().await;

    Mock::given(method("GET"))
        .and(path(ACCOUNT_PATH))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "photos", "count": 12, "bytes": 40960},
            {"name": "backups", "count": 0, "bytes": 0}
        ])))
        .mount(&server)
        .await;

    let containers = client.containers().list().await.expect("Failed to list containers");

    assert_eq!(containers.len(), 2);
    assert_eq!(
        containers[0],
        Container::builder()
            .name("photos")
            .object_count(12)
            .bytes_used(40960)
            .build()
    );
    assert_eq!(containers[1].name(), "backups");
}

#[tokio::test]
async fn test_list_containers_empty_account() {
    let (server, client) = create_test_client().await;

    Mock::given(method("GET"))
        .and(path(ACCOUNT_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let containers = client.containers().list().await.expect("Failed to list containers");
    assert!(containers.is_empty());
}

#[tokio::test]
async fn test_get_container() {
    let (server, client) = create_test_client().await;

    Mock::given(method("HEAD"))
        .and(path("/v1/AUTH_demo/photos"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-Container-Object-Count", "12")
                .insert_header("X-Container-Bytes-Used", "40960"),
        )
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/v1/AUTH_demo/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let container = client
        .containers()
        .get("photos")
        .await
        .expect("Failed to get container")
        .expect("Container should exist");
    assert_eq!(container.object_count(), 12);
    assert_eq!(container.bytes_used(), 40960);

    let missing = client.containers().get("missing").await.expect("Lookup should not fail");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_container_name_is_encoded() {
    let (server, client) = create_test_client().await;

    Mock::given(method("PUT"))
        .and(path("/v1/AUTH_demo/my%20photos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.containers().create("my photos").await.unwrap());
}

#[tokio::test]
async fn test_create_container() {
    let (server, client) = create_test_client().await;

    Mock::given(method("PUT"))
        .and(path("/v1/AUTH_demo/new"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/AUTH_demo/existing"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    assert!(client.containers().create("new").await.unwrap(), "201 means created");
    assert!(!client.containers().create("existing").await.unwrap(), "202 means it already existed");
}

#[tokio::test]
async fn test_delete_container_if_empty() {
    let (server, client) = create_test_client().await;

    for (name, status) in [("empty", 204), ("missing", 404), ("full", 409)] {
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/AUTH_demo/{}", name)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    Mock::given(method("DELETE"))
        .and(path("/v1/AUTH_demo/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let containers = client.containers();
    assert!(containers.delete_if_empty("empty").await.unwrap());
    assert!(!containers.delete_if_empty("missing").await.unwrap());
    assert!(!containers.delete_if_empty("full").await.unwrap());

    match containers.delete_if_empty("broken").await {
        Err(OpenStackError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal failure");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_relative_container_names_are_rejected() {
    let (server, client) = create_test_client().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let containers = client.containers();
    for name in ["", ".", ".."] {
        assert!(matches!(
            containers.get(name).await,
            Err(OpenStackError::InvalidParameter(_))
        ));
        assert!(matches!(
            containers.create(name).await,
            Err(OpenStackError::InvalidParameter(_))
        ));
        assert!(matches!(
            containers.delete_if_empty(name).await,
            Err(OpenStackError::InvalidParameter(_))
        ));
    }
}
