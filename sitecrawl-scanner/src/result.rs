use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized URL -> number of times it was encountered during a crawl.
pub type VisitMap = BTreeMap<String, usize>;

/// Structured data pulled out of a single HTML page.
///
/// Missing elements are represented by empty strings and empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    pub url: String,
    pub h1: String,
    pub first_paragraph: String,
    pub outgoing_links: Vec<String>,
    pub image_urls: Vec<String>,
}

impl PageData {
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.h1.is_empty()
            && self.first_paragraph.is_empty()
            && self.outgoing_links.is_empty()
            && self.image_urls.is_empty()
    }
}
