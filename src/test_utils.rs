#![cfg(test)]

use crate::{client::ClientBuilder, Client, Torrent};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) fn torrent(hash: &str, name: &str, up_limit: i64) -> Torrent {
    Torrent {
        hash: hash.to_string(),
        name: name.to_string(),
        up_limit,
    }
}

/// A client pointing at the mock server, not logged in yet
pub(crate) fn client_for(server: &MockServer) -> Client {
    ClientBuilder::default()
        .host(server.uri())
        .port(server.address().port())
        .build()
        .expect("Expected a valid client for the mock server")
}

/// A mock Web UI that accepts any login, plus a client logged into it
pub(crate) async fn mock_session() -> (MockServer, Client) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ok."))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login("admin", "adminadmin")
        .await
        .expect("Expected mock login to succeed");
    (server, client)
}

pub(crate) async fn mount_trackers(server: &MockServer, hash: &str, urls: &[&str]) {
    let trackers: Vec<_> = urls
        .iter()
        .map(|url| serde_json::json!({ "url": url, "status": 2 }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v2/torrents/trackers"))
        .and(query_param("hash", hash))
        .respond_with(ResponseTemplate::new(200).set_body_json(trackers))
        .mount(server)
        .await;
}
