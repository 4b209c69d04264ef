//! The shipped ureq transport against a live mock server.

use std::time::Duration;

use board_cli::commands::{self, Command, PostAction};
use board_cli::transport::UreqTransport;
use board_core::http::JSON_CONTENT_TYPE;
use board_core::{ApiClient, Post, PostDraft, ResourceType, Synchronizer, Transport};
use mock_server::Persistence;

/// Start a seeded mock server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, Persistence::Durable).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn transport() -> UreqTransport {
    UreqTransport::new(Duration::from_secs(5))
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn draft() -> PostDraft {
    PostDraft {
        user_id: 1,
        title: "A".to_string(),
        body: "B".to_string(),
    }
}

#[test]
fn create_list_remove_round_trip() {
    let base = spawn_server();
    let mut sync = Synchronizer::new(ApiClient::new(&base), transport());

    let created: Post = sync.create(&draft()).unwrap();
    assert_eq!(created.id, 101);

    let posts: Vec<Post> = sync.list().unwrap();
    assert_eq!(posts.iter().filter(|p| **p == created).count(), 1);

    sync.remove::<Post>(101).unwrap();
    let posts: Vec<Post> = sync.list().unwrap();
    assert!(posts.iter().all(|p| p.id != 101));
}

#[test]
fn error_status_comes_back_as_data() {
    let base = spawn_server();
    let client = ApiClient::new(&base);

    let response = transport()
        .execute(client.build_get(ResourceType::Posts, 9999))
        .unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[test]
fn request_headers_reach_the_server() {
    let base = spawn_server();
    let client = ApiClient::new(&base);

    let request = client.build_create(ResourceType::Posts, &draft()).unwrap();
    assert_eq!(header(&request.headers, "content-type"), Some(JSON_CONTENT_TYPE));
    let response = transport().execute(request.clone()).unwrap();
    assert_eq!(response.status, 201);
    let returned = header(&response.headers, "content-type").unwrap();
    assert!(returned.starts_with("application/json"));

    // Without the content type the JSON extractor refuses the body.
    let mut bare = request;
    bare.headers.clear();
    assert_eq!(transport().execute(bare).unwrap().status, 415);
}

#[test]
fn unreachable_host_is_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = ApiClient::new(&format!("http://127.0.0.1:{port}"));
    assert!(transport()
        .execute(client.build_list(ResourceType::Users))
        .is_err());
}

#[test]
fn posts_list_command_over_http() {
    let base = spawn_server();
    let mut sync = Synchronizer::new(ApiClient::new(&base), transport());
    let mut out = Vec::new();

    let command = Command::Posts {
        action: PostAction::List { limit: 2 },
    };
    commands::run(command, &mut sync, &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#1 [user 1] "));
}
