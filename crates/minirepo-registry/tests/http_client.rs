//! `RepositoryClient` against HTTP upstreams.
//!
//! | Request | Response | Test |
//! |---------|----------|------|
//! | `PACKAGES.gz` | 404, `PACKAGES` 200 | `index_falls_back_to_plain_packages` |
//! | `PACKAGES.gz` | 200 | `gz_index_preferred` |
//! | both indexes | 404 | `missing_index_contributes_nothing` |
//! | `PACKAGES.gz` | 500 | `server_error_on_index_is_reported` |
//! | artifact | 200 | `download_lands_in_dest_dir` |
//! | artifact | 404 | `missing_artifact_is_reported` |
//! | artifact | body cut short | `truncated_download_leaves_nothing_behind` |

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use minirepo_registry::{
    AvailabilityQuery, AvailabilityTable, ArtifactFlavor, Fetcher, RepoError, RepositoryClient,
    RuntimeVersion, UpstreamRepository,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const V43: RuntimeVersion = RuntimeVersion::new(4, 3);
const ARTIFACT: &[u8] = b"pretend tarball bytes";

async fn serve(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

fn gzip(text: &str) -> Vec<u8> {
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(text.as_bytes()).unwrap();
    gz.finish().unwrap()
}

fn query(uri: String) -> minirepo_registry::Result<AvailabilityTable> {
    let repo = UpstreamRepository::parse(&uri).unwrap();
    RepositoryClient::new()
        .unwrap()
        .query(&[repo], ArtifactFlavor::Source, V43)
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test(flavor = "multi_thread")]
async fn index_falls_back_to_plain_packages() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/src/contrib/PACKAGES",
        ResponseTemplate::new(200).set_body_string("Package: pkgA\nVersion: 1.0\n"),
    )
    .await;

    let uri = server.uri();
    let table = tokio::task::spawn_blocking(move || query(uri)).await.unwrap().unwrap();
    let record = table.get("pkgA").unwrap();
    assert_eq!(record.version.as_str(), "1.0");
    assert!(record.repository.path().ends_with("/src/contrib"));
}

#[tokio::test(flavor = "multi_thread")]
async fn gz_index_preferred() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/src/contrib/PACKAGES.gz",
        ResponseTemplate::new(200).set_body_bytes(gzip("Package: zipped\nVersion: 2.0\n")),
    )
    .await;
    serve(
        &server,
        "/src/contrib/PACKAGES",
        ResponseTemplate::new(200).set_body_string("Package: plain\nVersion: 1.0\n"),
    )
    .await;

    let uri = server.uri();
    let table = tokio::task::spawn_blocking(move || query(uri)).await.unwrap().unwrap();
    assert!(table.contains("zipped"));
    assert!(!table.contains("plain"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_index_contributes_nothing() {
    let server = MockServer::start().await;

    let uri = server.uri();
    let table = tokio::task::spawn_blocking(move || query(uri)).await.unwrap().unwrap();
    assert!(table.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_on_index_is_reported() {
    let server = MockServer::start().await;
    serve(&server, "/src/contrib/PACKAGES.gz", ResponseTemplate::new(500)).await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || query(uri)).await.unwrap().unwrap_err();
    assert!(matches!(err, RepoError::HttpStatus { status: 500, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn download_lands_in_dest_dir() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/src/contrib/PACKAGES",
        ResponseTemplate::new(200).set_body_string("Package: pkgA\nVersion: 1.0\n"),
    )
    .await;
    serve(
        &server,
        "/src/contrib/pkgA_1.0.tar.gz",
        ResponseTemplate::new(200).set_body_bytes(ARTIFACT.to_vec()),
    )
    .await;

    let uri = server.uri();
    let dest = tempfile::tempdir().unwrap();
    let dest_dir = dest.path().to_path_buf();
    let fetched = tokio::task::spawn_blocking(move || {
        let repo = UpstreamRepository::parse(&uri).unwrap();
        let client = RepositoryClient::new().unwrap();
        let table = client.query(&[repo], ArtifactFlavor::Source, V43)?;
        client.fetch(&["pkgA".to_string()], &dest_dir, &table, ArtifactFlavor::Source, true)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].path, dest.path().join("pkgA_1.0.tar.gz"));
    assert_eq!(std::fs::read(&fetched[0].path).unwrap(), ARTIFACT);
    assert_eq!(entries(dest.path()), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_artifact_is_reported() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/src/contrib/PACKAGES",
        ResponseTemplate::new(200).set_body_string("Package: pkgA\nVersion: 1.0\n"),
    )
    .await;

    let uri = server.uri();
    let dest = tempfile::tempdir().unwrap();
    let dest_dir = dest.path().to_path_buf();
    let err = tokio::task::spawn_blocking(move || {
        let repo = UpstreamRepository::parse(&uri).unwrap();
        let client = RepositoryClient::new().unwrap();
        let table = client.query(&[repo], ArtifactFlavor::Source, V43)?;
        client.fetch(&["pkgA".to_string()], &dest_dir, &table, ArtifactFlavor::Source, true)
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, RepoError::HttpStatus { status: 404, .. }));
    assert_eq!(entries(dest.path()), 0);
}

#[test]
fn truncated_download_leaves_nothing_behind() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\npartial bytes")
            .unwrap();
    });

    let contrib = Url::parse(&format!("http://{addr}/src/contrib/")).unwrap();
    let mut table = AvailabilityTable::new();
    table.merge_index("Package: pkgA\nVersion: 1.0\n", &contrib).unwrap();

    let dest = tempfile::tempdir().unwrap();
    let client = RepositoryClient::new().unwrap();
    let result = client.fetch(&["pkgA".to_string()], dest.path(), &table, ArtifactFlavor::Source, true);
    server.join().unwrap();

    assert!(result.is_err());
    assert!(!dest.path().join("pkgA_1.0.tar.gz").exists());
    assert_eq!(entries(dest.path()), 0);
}
