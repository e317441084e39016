pub mod commands;
// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{parse_report_format, render_page_data, resolve_output_path};

// Re-export crawl functionality from sitecrawl-core
pub use sitecrawl_core::crawl::{
    execute_crawl, extract_url_path, fetch_page_data, CrawlOptions, CrawlOutcome,
    CrawlProgressCallback,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
