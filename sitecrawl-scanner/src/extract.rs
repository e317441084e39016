use crate::error::{Result, ScanError};
use crate::resolve::resolve_reference;
use crate::result::PageData;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("selector '{}': {:?}", css, e)))
}

fn selector(css: &str) -> Option<Selector> {
    match parse_selector(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn h1_of(document: &Html) -> String {
    let Some(h1) = selector("h1") else {
        return String::new();
    };

    document
        .select(&h1)
        .next()
        .map(trimmed_text)
        .unwrap_or_default()
}

fn first_paragraph_of(document: &Html) -> String {
    let (Some(main), Some(p)) = (selector("main"), selector("p")) else {
        return String::new();
    };

    // A <main> without paragraphs falls through to the whole document.
    if let Some(main_element) = document.select(&main).next()
        && let Some(paragraph) = main_element.select(&p).next()
    {
        return trimmed_text(paragraph);
    }

    document
        .select(&p)
        .next()
        .map(trimmed_text)
        .unwrap_or_default()
}

/// Resolve the `attr` value of every `tag` element, in document order.
///
/// Elements without the attribute are skipped silently, values that do not
/// resolve against `base` are logged and skipped.
fn resolved_attrs(document: &Html, tag: &str, attr: &str, base: &Url) -> Vec<String> {
    let Some(tag_selector) = selector(tag) else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    for element in document.select(&tag_selector) {
        let Some(value) = element.value().attr(attr) else {
            continue;
        };

        match resolve_reference(base, value) {
            Ok(absolute_url) => {
                debug!("Found <{} {}>: {}", tag, attr, absolute_url);
                urls.push(absolute_url);
            }
            Err(e) => warn!("Skipping <{}> on {}: {}", tag, base, e),
        }
    }
    urls
}

fn parse_base(base_url: &str) -> Option<Url> {
    match Url::parse(base_url) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Cannot resolve references against '{}': {}", base_url, e);
            None
        }
    }
}

/// Text of the first `<h1>`, trimmed, or an empty string.
pub fn get_h1_from_html(html: &str) -> String {
    h1_of(&Html::parse_document(html))
}

/// Text of the first `<p>` inside `<main>`, else the first `<p>` anywhere.
pub fn get_first_paragraph_from_html(html: &str) -> String {
    first_paragraph_of(&Html::parse_document(html))
}

/// Absolute URLs of every `<a href>` on the page.
pub fn get_urls_from_html(html: &str, base_url: &str) -> Vec<String> {
    let Some(base) = parse_base(base_url) else {
        return Vec::new();
    };
    resolved_attrs(&Html::parse_document(html), "a", "href", &base)
}

/// Absolute URLs of every `<img src>` on the page.
pub fn get_images_from_html(html: &str, base_url: &str) -> Vec<String> {
    let Some(base) = parse_base(base_url) else {
        return Vec::new();
    };
    resolved_attrs(&Html::parse_document(html), "img", "src", &base)
}

/// Extract everything [`PageData`] holds from one HTML document.
///
/// Pure function of its inputs. An unusable `page_url` only empties the link
/// and image lists; the title and first paragraph are still computed.
pub fn extract_page_data(html: &str, page_url: &str) -> PageData {
    let document = Html::parse_document(html);

    let mut page = PageData::new(page_url.to_string());
    page.h1 = h1_of(&document);
    page.first_paragraph = first_paragraph_of(&document);

    if let Some(base) = parse_base(page_url) {
        page.outgoing_links = resolved_attrs(&document, "a", "href", &base);
        page.image_urls = resolved_attrs(&document, "img", "src", &base);
    }

    page
}
