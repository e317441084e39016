// Tests for crawl orchestration

use sitecrawl_core::crawl::{
    execute_crawl, extract_url_path, fetch_page_data, CrawlOptions, CrawlProgressCallback,
};
use std::sync::{Arc, Mutex};
use url::Url;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/blog?page=2#top"), "/blog");
}

#[test]
fn test_extract_url_path_keeps_trailing_slash() {
    assert_eq!(extract_url_path("http://example.com/blog/"), "/blog/");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    // Should return original string for invalid URLs
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Crawl Execution Tests
// ============================================================================

async fn html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(body.as_bytes().to_vec()),
        )
        .mount(server)
        .await;
}

/// Visit-map key of the mock server's root: `host:port`.
fn site_key(server: &MockServer) -> String {
    let uri = Url::parse(&server.uri()).unwrap();
    format!("{}:{}", uri.host_str().unwrap(), uri.port().unwrap())
}

#[tokio::test]
async fn test_execute_crawl_collects_visits_and_pages() {
    let server = MockServer::start().await;
    html(
        &server,
        "/",
        r#"<h1>Home</h1><p>Welcome.</p><a href="/blog">Blog</a><a href="/about/">About</a>"#,
    )
    .await;
    html(
        &server,
        "/blog",
        r#"<h1>Blog</h1><a href="/">Home</a><a href="/about">About</a><img src="/cover.png">"#,
    )
    .await;
    html(&server, "/about", "<main><p>Who we are.</p></main>").await;

    let options = CrawlOptions {
        url: server.uri(),
        collect_pages: true,
        ..Default::default()
    };

    let outcome = execute_crawl(options, None).await.unwrap();
    let host = site_key(&server);

    assert_eq!(outcome.visits.get(&host), Some(&2));
    assert_eq!(outcome.visits.get(&format!("{}/blog", host)), Some(&1));
    assert_eq!(outcome.visits.get(&format!("{}/about", host)), Some(&2));

    assert_eq!(outcome.pages.len(), 3);
    assert_eq!(outcome.pages[0].h1, "Home");
    assert_eq!(outcome.pages[1].h1, "Blog");
    assert_eq!(
        outcome.pages[1].image_urls,
        vec![format!("{}/cover.png", server.uri())]
    );
    assert_eq!(outcome.pages[2].first_paragraph, "Who we are.");
}

#[tokio::test]
async fn test_execute_crawl_without_page_collection() {
    let server = MockServer::start().await;
    html(&server, "/", "<h1>Only page</h1>").await;

    let options = CrawlOptions {
        url: server.uri(),
        ..Default::default()
    };

    let outcome = execute_crawl(options, None).await.unwrap();

    assert_eq!(outcome.visits.len(), 1);
    assert!(outcome.pages.is_empty());
}

#[tokio::test]
async fn test_execute_crawl_reports_progress() {
    let server = MockServer::start().await;
    html(&server, "/", r#"<a href="/next">next</a>"#).await;
    html(&server, "/next", "<p>end</p>").await;

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let callback: CrawlProgressCallback = Arc::new(move |url: String| {
        seen_clone.lock().unwrap().push(url);
    });

    let options = CrawlOptions {
        url: server.uri(),
        ..Default::default()
    };
    execute_crawl(options, Some(callback)).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], format!("{}/next", server.uri()));
}

#[tokio::test]
async fn test_execute_crawl_max_pages() {
    let server = MockServer::start().await;
    html(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>"#).await;
    html(&server, "/a", "").await;
    html(&server, "/b", "").await;
    html(&server, "/c", "").await;

    let options = CrawlOptions {
        url: server.uri(),
        max_pages: Some(2),
        ..Default::default()
    };

    let outcome = execute_crawl(options, None).await.unwrap();
    assert_eq!(outcome.visits.len(), 2);
}

#[tokio::test]
async fn test_execute_crawl_invalid_url() {
    let options = CrawlOptions {
        url: "definitely not a url".to_string(),
        ..Default::default()
    };

    let err = execute_crawl(options, None).await.unwrap_err();
    assert!(err.contains("Invalid URL"));
}

// ============================================================================
// Single Page Extraction Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_data() {
    let server = MockServer::start().await;
    html(
        &server,
        "/post",
        r#"<h1>Test Title</h1><p>This is the first paragraph.</p><a href="/link1">Link 1</a><img src="/image1.jpg">"#,
    )
    .await;

    let url = format!("{}/post", server.uri());
    let page = fetch_page_data(&url, None, None).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.h1, "Test Title");
    assert_eq!(page.first_paragraph, "This is the first paragraph.");
    assert_eq!(page.outgoing_links, vec![format!("{}/link1", server.uri())]);
    assert_eq!(page.image_urls, vec![format!("{}/image1.jpg", server.uri())]);
}

#[tokio::test]
async fn test_fetch_page_data_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let err = fetch_page_data(&format!("{}/gone", server.uri()), None, None)
        .await
        .unwrap_err();
    assert!(err.contains("HTTP 410"));
}

#[tokio::test]
async fn test_fetch_page_data_not_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_bytes(b"<rss/>".to_vec()),
        )
        .mount(&server)
        .await;

    let err = fetch_page_data(&format!("{}/feed.xml", server.uri()), None, None)
        .await
        .unwrap_err();
    assert!(err.contains("not an HTML page"));
    assert!(err.contains("application/xml"));
}
