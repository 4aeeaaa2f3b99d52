//! Integration tests for the identity export against a mock Ory server

use serde_json::{Value, json};
use source_migrate::cli::export_identities;
use source_migrate::client::{Auth, OryClient};
use source_migrate::etl::Extractor;
use source_migrate::ory::IdentitiesExtractor;
use source_migrate::storage::{DumpPaths, read_json};
use tempfile::TempDir;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param, query_param_is_missing},
};

const TOKEN: &str = "ory_pat_test";

fn client(server: &MockServer) -> OryClient {
    let url = Url::parse(&server.uri()).unwrap();
    OryClient::try_new(url, Auth::Bearer(TOKEN.to_string())).unwrap()
}

fn identity(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "schema_id": "default",
        "traits": {"email": email, "name": {"first_name": "Ann", "last_name": "Lee"}}
    })
}

/// Two pages linked by `rel="next"`; the last page only links back to the first
async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .and(query_param_is_missing("page_token"))
        .and(header("authorization", "Bearer ory_pat_test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    "</admin/identities?page_size=2&page_token=p1>; rel=\"first\",\
                     </admin/identities?page_size=2&page_token=p2>; rel=\"next\"",
                )
                .set_body_json(json!([identity("i1", "a@x.com"), identity("i2", "b@x.com")])),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .and(query_param("page_token", "p2"))
        .and(header("authorization", "Bearer ory_pat_test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    "</admin/identities?page_size=2&page_token=p1>; rel=\"first\"",
                )
                .set_body_json(json!([identity("i2", "b2@x.com"), identity("i3", "c@x.com")])),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_extract_follows_next_links() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let identities = IdentitiesExtractor::new(client(&server))
        .extract()
        .await
        .unwrap();

    let ids: Vec<&str> = identities
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["i1", "i2", "i2", "i3"]);
}

#[tokio::test]
async fn test_export_writes_union_keyed_by_id() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    let dir = TempDir::new().unwrap();
    let dump = DumpPaths::new(dir.path().join("dump"));

    let count = export_identities(&dump, client(&server), None)
        .await
        .unwrap();
    assert_eq!(count, 3);

    let written: Value = read_json(dump.identities()).unwrap();
    let map = written.as_object().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map["i1"], identity("i1", "a@x.com"));
    // Later pages win on duplicate ids
    assert_eq!(map["i2"]["traits"]["email"], "b2@x.com");
    assert_eq!(map["i3"]["id"], "i3");
}

#[tokio::test]
async fn test_export_sends_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .and(query_param("page_size", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([identity("i1", "a@x.com")])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump = DumpPaths::new(dir.path());

    let count = export_identities(&dump, client(&server), Some(250))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_export_empty_project_writes_empty_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump = DumpPaths::new(dir.path());

    let count = export_identities(&dump, client(&server), None)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let written: Value = read_json(dump.identities()).unwrap();
    assert_eq!(written, json!({}));
}

#[tokio::test]
async fn test_export_fails_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "status": "Unauthorized"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump = DumpPaths::new(dir.path());

    let err = export_identities(&dump, client(&server), None)
        .await
        .unwrap_err();
    assert!(format!("{:?}", err).contains("401"));
    assert!(!dump.identities().exists());
}

#[tokio::test]
async fn test_export_detects_cursor_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", "</admin/identities>; rel=\"next\"")
                .set_body_json(json!([identity("i1", "a@x.com")])),
        )
        .mount(&server)
        .await;

    let result = IdentitiesExtractor::new(client(&server)).extract().await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Pagination cursor loops")
    );
}

#[tokio::test]
async fn test_extract_reads_every_link_header_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .and(query_param_is_missing("page_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("link", "</admin/identities?page_size=1&page_token=p1>; rel=\"first\"")
                .append_header("link", "</admin/identities?page_size=1&page_token=p2>; rel=\"next\"")
                .set_body_json(json!([identity("i1", "a@x.com")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .and(query_param("page_token", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([identity("i2", "b@x.com")])))
        .expect(1)
        .mount(&server)
        .await;

    let identities = IdentitiesExtractor::new(client(&server))
        .extract()
        .await
        .unwrap();
    assert_eq!(identities.len(), 2);
    assert_eq!(identities[1]["id"], "i2");
}

#[tokio::test]
async fn test_extract_stays_on_base_origin() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/identities"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}/admin/identities?page_token=p2>; rel=\"next\"", elsewhere.uri()).as_str(),
                )
                .set_body_json(json!([identity("i1", "a@x.com")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let err = IdentitiesExtractor::new(client(&server))
        .extract()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("another origin"));
    assert!(elsewhere.received_requests().await.unwrap().is_empty());
}
