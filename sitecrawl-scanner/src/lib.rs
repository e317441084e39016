pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod resolve;
pub mod result;

pub use crawler::{crawl_site, Crawler, PageCallback, ProgressCallback};
pub use error::ScanError;
pub use extract::extract_page_data;
pub use fetch::{FetchOutcome, Fetcher, HttpFetcher};
pub use normalize::normalize_url;
pub use result::{PageData, VisitMap};
