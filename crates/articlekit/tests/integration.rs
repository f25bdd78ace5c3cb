//! Integration tests for ArticleKit using wiremock

use articlekit::{BatchError, ConvertRequest, Converter, OutputFormat};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
    <nav><a href="/">Home</a> | <a href="/news">News</a></nav>
    <article>
        <h1>{title}</h1>
        <p>The first paragraph explains what happened & why it matters to readers.</p>
        <p>The second paragraph adds detail, quotes and enough text to pass the minimum length check.</p>
    </article>
    <footer>Copyright Example News</footer>
</body>
</html>"#
    )
}

async fn mount_article(server: &MockServer, route: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article_html(title), "text/html"))
        .mount(server)
        .await;
}

fn converter(root: &Path) -> Converter {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Converter::builder().workspace_root(root).build()
}

fn zip_entries(archive: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_single_txt_article() {
    let server = MockServer::start().await;
    mount_article(&server, "/story", "Rust Ships New Release").await;

    let root = tempfile::tempdir().unwrap();
    let url = format!("{}/story", server.uri());
    let conversion = converter(root.path())
        .process(&[url], OutputFormat::Txt)
        .await
        .unwrap();

    let artifact = &conversion.artifact;
    assert!(!artifact.is_archive());
    assert_eq!(artifact.file_name(), "Rust_Ships_New_Release.txt");
    assert_eq!(artifact.content_type(), "text/plain");
    assert!(artifact.path().starts_with(artifact.workspace_path()));

    let content = std::fs::read_to_string(artifact.path()).unwrap();
    assert!(content.starts_with("Rust Ships New Release\n======================\n\n"));
    assert!(content.contains("what happened & why it matters"));
    assert!(!content.contains("Home"));
    assert!(!content.contains("Copyright"));

    let entries: Vec<_> = std::fs::read_dir(artifact.workspace_path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["Rust_Ships_New_Release.txt"]);
}

#[tokio::test]
async fn test_invalid_middle_url_is_isolated() {
    let server = MockServer::start().await;
    mount_article(&server, "/one", "First Story").await;
    mount_article(&server, "/three", "Third Story").await;

    let root = tempfile::tempdir().unwrap();
    let urls = vec![
        format!("{}/one", server.uri()),
        "htp://broken".to_string(),
        format!("{}/three", server.uri()),
    ];
    let conversion = converter(root.path())
        .process(&urls, OutputFormat::Txt)
        .await
        .unwrap();

    assert_eq!(conversion.failures.len(), 1);
    assert!(conversion.failures[0].contains("htp://broken"));
    assert!(conversion.artifact.is_archive());
    assert_eq!(
        zip_entries(conversion.artifact.path()),
        vec!["First_Story.txt", "Third_Story.txt"]
    );
}

#[tokio::test]
async fn test_pdf_batch_end_to_end() {
    let server = MockServer::start().await;
    mount_article(&server, "/a", "a-title").await;
    mount_article(&server, "/b", "b-title").await;

    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let urls = vec![
        format!("{}/a", server.uri()),
        "not-a-url".to_string(),
        format!("{}/b", server.uri()),
    ];
    let conversion = converter(root.path())
        .process(&urls, OutputFormat::Pdf)
        .await
        .unwrap();

    assert_eq!(conversion.failures.len(), 1);
    assert!(conversion.failures[0].contains("not-a-url"));
    assert!(conversion.failures[0].contains("invalid"));

    let artifact = conversion.artifact;
    assert!(artifact.is_archive());
    assert!(artifact.file_name().ends_with(".zip"));
    assert_eq!(artifact.download_name(), "articles.zip");
    assert_eq!(zip_entries(artifact.path()), vec!["a-title.pdf", "b-title.pdf"]);

    let mut zip = zip::ZipArchive::new(File::open(artifact.path()).unwrap()).unwrap();
    let mut pdf = Vec::new();
    zip.by_name("a-title.pdf")
        .unwrap()
        .read_to_end(&mut pdf)
        .unwrap();
    let doc = lopdf::Document::load_mem(&pdf).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let delivered = artifact.deliver_to(out.path()).unwrap();
    assert_eq!(delivered, out.path().join("articles.zip"));
    assert!(delivered.exists());
    assert!(dir_is_empty(root.path()));
}

#[tokio::test]
async fn test_http_error_is_recorded() {
    let server = MockServer::start().await;
    mount_article(&server, "/ok", "Fine Story").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let gone = format!("{}/gone", server.uri());
    let conversion = converter(root.path())
        .process(&[format!("{}/ok", server.uri()), gone.clone()], OutputFormat::Txt)
        .await
        .unwrap();

    assert!(!conversion.artifact.is_archive());
    assert_eq!(
        conversion.failures,
        vec![format!("Failed to process {}: HTTP error 404", gone)]
    );
}

#[tokio::test]
async fn test_fetch_timeout_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(article_html("Slow Story"), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let converter = Converter::builder()
        .workspace_root(root.path())
        .timeout(Duration::from_secs(1))
        .build();

    let err = converter
        .process(&[format!("{}/slow", server.uri())], OutputFormat::Txt)
        .await
        .unwrap_err();

    assert_eq!(err.failures().len(), 1);
    assert!(err.failures()[0].contains("timed out"));
    assert!(dir_is_empty(root.path()));
}

#[tokio::test]
async fn test_no_successes_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><p>Too short.</p></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let result = converter(root.path())
        .process(
            &[format!("{}/empty", server.uri()), "nope".to_string()],
            OutputFormat::Pdf,
        )
        .await;
    let err = tokio_test::assert_err!(result);

    assert!(matches!(err, BatchError::Processing { .. }));
    let message = err.to_string();
    assert!(message.starts_with("No articles could be processed."));
    assert!(message.contains("too short"));
    assert!(message.contains("nope"));
    assert!(dir_is_empty(root.path()));
}

#[tokio::test]
async fn test_concurrent_batches_use_separate_workspaces() {
    let server = MockServer::start().await;
    mount_article(&server, "/x", "Story X").await;
    mount_article(&server, "/y", "Story Y").await;

    let root = tempfile::tempdir().unwrap();
    let out_a = tempfile::tempdir().unwrap();
    let out_b = tempfile::tempdir().unwrap();
    let converter = converter(root.path());

    let batch_a = vec![format!("{}/x", server.uri()), format!("{}/y", server.uri())];
    let batch_b = vec![format!("{}/y", server.uri())];
    let (a, b) = tokio::join!(
        converter.process(&batch_a, OutputFormat::Txt),
        converter.process(&batch_b, OutputFormat::Pdf),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.artifact.workspace_path(), b.artifact.workspace_path());
    assert!(a.artifact.path().starts_with(a.artifact.workspace_path()));
    assert!(b.artifact.path().starts_with(b.artifact.workspace_path()));

    a.artifact.deliver_to(out_a.path()).unwrap();
    b.artifact.deliver_to(out_b.path()).unwrap();

    assert!(out_a.path().join("articles.zip").exists());
    assert!(out_b.path().join("Story_Y.pdf").exists());
    assert!(dir_is_empty(root.path()));
}

#[tokio::test]
async fn test_user_agent_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "ArticleTest/2.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(article_html("Agent Story"), "text/html"),
        )
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let converter = Converter::builder()
        .workspace_root(root.path())
        .user_agent("ArticleTest/2.0")
        .build();

    let conversion = converter
        .process(&[format!("{}/ua", server.uri())], OutputFormat::Txt)
        .await
        .unwrap();
    assert_eq!(conversion.successes[0].title, "Agent Story");
}

#[tokio::test]
async fn test_block_list_is_per_url_failure() {
    let server = MockServer::start().await;
    mount_article(&server, "/kept", "Kept Story").await;

    let root = tempfile::tempdir().unwrap();
    let converter = Converter::builder()
        .workspace_root(root.path())
        .block_prefix("https://blocked.example.com")
        .build();

    let conversion = converter
        .process(
            &[
                "https://blocked.example.com/a".to_string(),
                format!("{}/kept", server.uri()),
            ],
            OutputFormat::Txt,
        )
        .await
        .unwrap();

    assert_eq!(conversion.failures.len(), 1);
    assert!(conversion.failures[0].contains("prefix not allowed"));
}

#[tokio::test]
async fn test_execute_request_from_text() {
    let server = MockServer::start().await;
    mount_article(&server, "/text", "Text Story").await;

    let root = tempfile::tempdir().unwrap();
    let input = format!("\n  {}/text  \n\n", server.uri());
    let request = ConvertRequest::from_text(&input, "PDF");

    let conversion = tokio_test::assert_ok!(converter(root.path()).execute(request).await);
    assert_eq!(conversion.artifact.file_name(), "Text_Story.pdf");
    assert_eq!(conversion.artifact.content_type(), "application/pdf");
    conversion.artifact.close().unwrap();
    assert!(dir_is_empty(root.path()));
}
