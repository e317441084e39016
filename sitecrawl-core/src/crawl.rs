use indicatif::{ProgressBar, ProgressStyle};
use sitecrawl_scanner::fetch::DEFAULT_USER_AGENT;
use sitecrawl_scanner::{extract_page_data, Crawler, FetchOutcome, Fetcher, HttpFetcher, PageData, VisitMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    pub url: String,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<usize>,
    pub user_agent: Option<String>,
    /// Keep the extracted data of every fetched page.
    pub collect_pages: bool,
    pub show_progress: bool,
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a finished crawl produced.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub visits: VisitMap,
    pub pages: Vec<PageData>,
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn build_fetcher(timeout_secs: Option<u64>, user_agent: Option<&str>) -> Result<HttpFetcher, String> {
    HttpFetcher::with_config(user_agent.unwrap_or(DEFAULT_USER_AGENT), timeout_secs)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Execute a crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, String> {
    let fetcher = build_fetcher(options.timeout_secs, options.user_agent.as_deref())?;
    execute_crawl_with(fetcher, options, progress_callback).await
}

/// [`execute_crawl`] over any fetcher.
pub async fn execute_crawl_with<F: Fetcher>(
    fetcher: F,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, String> {
    let CrawlOptions {
        url,
        max_pages,
        collect_pages,
        show_progress,
        ..
    } = options;

    // Spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| format!("Invalid progress template: {}", e))?;
        pb.set_style(style);
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let pb_clone = progress_bar.clone();
    let count_clone = processed_count.clone();
    let user_callback = progress_callback;
    let internal_progress_callback: sitecrawl_scanner::ProgressCallback =
        Arc::new(move |page_url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Crawling... {} pages fetched ({})",
                    count,
                    extract_url_path(&page_url)
                ));
                pb.tick();
            }
            if let Some(ref callback) = user_callback {
                callback(page_url);
            }
        });

    let pages: Arc<Mutex<Vec<PageData>>> = Arc::new(Mutex::new(Vec::new()));

    let mut crawler = Crawler::with_fetcher(fetcher)
        .with_max_pages(max_pages)
        .with_progress_callback(internal_progress_callback);

    if collect_pages {
        let pages_clone = pages.clone();
        crawler = crawler.with_page_callback(Arc::new(move |page: PageData| {
            if let Ok(mut pages) = pages_clone.lock() {
                pages.push(page);
            }
        }));
    }

    let result = crawler.crawl(&url).await;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} pages fetched", total));
    }

    let visits = result.map_err(|e| format!("Failed to crawl {}: {}", url, e))?;
    let pages = pages
        .lock()
        .map(|mut pages| std::mem::take(&mut *pages))
        .unwrap_or_default();

    Ok(CrawlOutcome { visits, pages })
}

/// Fetch a single page and extract its data.
pub async fn fetch_page_data(
    url: &str,
    timeout_secs: Option<u64>,
    user_agent: Option<&str>,
) -> Result<PageData, String> {
    let fetcher = build_fetcher(timeout_secs, user_agent)?;
    fetch_page_data_with(&fetcher, url).await
}

/// [`fetch_page_data`] over any fetcher.
pub async fn fetch_page_data_with<F: Fetcher>(fetcher: &F, url: &str) -> Result<PageData, String> {
    match fetcher.fetch_html(url).await {
        Ok(FetchOutcome::Page(body)) => Ok(extract_page_data(&body, url)),
        Ok(FetchOutcome::HttpStatus(status)) => Err(format!("{} returned HTTP {}", url, status)),
        Ok(FetchOutcome::NotHtml(content_type)) => Err(format!(
            "{} is not an HTML page (content-type: {})",
            url,
            content_type.as_deref().unwrap_or("none")
        )),
        Err(e) => Err(format!("Failed to fetch {}: {}", url, e)),
    }
}
