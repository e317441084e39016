use crate::error::{Result, ScanError};
use crate::extract::{extract_page_data, get_urls_from_html};
use crate::fetch::{FetchOutcome, Fetcher, HttpFetcher};
use crate::normalize::{host_of, normalize_url};
use crate::result::{PageData, VisitMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;
pub type PageCallback = Arc<dyn Fn(PageData) + Send + Sync>;

/// Sequential, depth-first crawler confined to the host of its base URL.
pub struct Crawler<F: Fetcher> {
    fetcher: F,
    progress_callback: Option<ProgressCallback>,
    page_callback: Option<PageCallback>,
    max_pages: Option<usize>,
}

impl Crawler<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            progress_callback: None,
            page_callback: None,
            max_pages: None,
        }
    }

    /// Called with each URL right before it is fetched.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Called with the extracted data of every page that was fetched.
    pub fn with_page_callback(mut self, callback: PageCallback) -> Self {
        self.page_callback = Some(callback);
        self
    }

    /// Stop recording new URLs once `max_pages` distinct ones are known.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Crawl every page reachable from `base_url` on the same host.
    ///
    /// Returns how many times each normalized URL was encountered. Fails only
    /// when `base_url` itself is not an absolute URL with a host.
    pub async fn crawl(&self, base_url: &str) -> Result<VisitMap> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.host_str().is_none() {
            return Err(ScanError::InvalidUrl(format!("{}: URL has no host", base_url)));
        }

        info!("Starting crawl of {}", base_url);

        let mut visited = VisitMap::new();
        self.visit(base_url, base_url, &mut visited).await;

        info!("Crawl complete. Found {} distinct pages", visited.len());
        Ok(visited)
    }

    /// Walk the site from `start_url` depth-first, in document order.
    ///
    /// Each fetched page pushes an iterator over its links onto an explicit
    /// stack, so the crawl depth is bounded by memory rather than the thread
    /// stack.
    pub async fn visit(&self, base_url: &str, start_url: &str, visited: &mut VisitMap) {
        let mut pending: Vec<std::vec::IntoIter<String>> = Vec::new();

        if let Some(links) = self.step(base_url, start_url, visited).await {
            pending.push(links.into_iter());
        }

        while let Some(links) = pending.last_mut() {
            let Some(link) = links.next() else {
                pending.pop();
                continue;
            };

            if let Some(links) = self.step(base_url, &link, visited).await {
                pending.push(links.into_iter());
            }
        }
    }

    /// Record `current_url` and, on first sight, fetch it.
    ///
    /// Returns the page's links resolved against `base_url`, or `None` when
    /// nothing should be followed. A URL is marked before it is fetched, so
    /// pages that fail to load or link back to themselves are never fetched
    /// twice.
    async fn step(
        &self,
        base_url: &str,
        current_url: &str,
        visited: &mut VisitMap,
    ) -> Option<Vec<String>> {
        let (Some(base_host), Some(current_host)) = (host_of(base_url), host_of(current_url)) else {
            debug!("Out of scope (no host): {}", current_url);
            return None;
        };
        if base_host != current_host {
            debug!("Out of scope: {}", current_url);
            return None;
        }

        let key = match normalize_url(current_url) {
            Ok(key) => key,
            Err(e) => {
                warn!("Not visiting {}: {}", current_url, e);
                return None;
            }
        };

        if let Some(count) = visited.get_mut(&key) {
            *count += 1;
            return None;
        }

        if let Some(max) = self.max_pages
            && visited.len() >= max
        {
            debug!("Page limit of {} reached, ignoring {}", max, current_url);
            return None;
        }

        visited.insert(key, 1);

        if let Some(ref callback) = self.progress_callback {
            callback(current_url.to_string());
        }

        let body = match self.fetcher.fetch_html(current_url).await {
            Ok(FetchOutcome::Page(body)) => body,
            Ok(outcome) => {
                debug!("No page at {}: {:?}", current_url, outcome);
                return None;
            }
            Err(e) => {
                warn!("Crawl error for {}: {}", current_url, e);
                return None;
            }
        };

        if let Some(ref callback) = self.page_callback {
            callback(extract_page_data(&body, current_url));
        }

        let links = get_urls_from_html(&body, base_url);
        debug!("{} links on {}", links.len(), current_url);
        Some(links)
    }
}

/// Crawl `base_url` with the default HTTP fetcher.
pub async fn crawl_site(base_url: &str) -> Result<VisitMap> {
    Crawler::new()?.crawl(base_url).await
}
