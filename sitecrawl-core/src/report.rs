// Report generation from crawl results

use colored::Colorize;
use serde::{Deserialize, Serialize};
use sitecrawl_scanner::{normalize_url, PageData, VisitMap};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const HEAVY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const LIGHT_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Normalized URL.
    pub url: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub base_url: String,
    pub total_pages: usize,
    pub total_links: usize,
    pub entries: Vec<ReportEntry>,
}

/// Collect a crawl's visit counts, and any extracted pages, into report order:
/// most-linked pages first, ties broken by URL.
pub fn build_report_data(base_url: &str, visits: &VisitMap, pages: &[PageData]) -> ReportData {
    let mut pages_by_key: HashMap<String, &PageData> = HashMap::new();
    for page in pages {
        if let Ok(key) = normalize_url(&page.url) {
            pages_by_key.entry(key).or_insert(page);
        }
    }

    let mut entries: Vec<ReportEntry> = visits
        .iter()
        .map(|(url, count)| ReportEntry {
            url: url.clone(),
            count: *count,
            page: pages_by_key.get(url).map(|p| (*p).clone()),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.url.cmp(&b.url)));

    ReportData {
        base_url: base_url.to_string(),
        total_pages: visits.len(),
        total_links: visits.values().sum(),
        entries,
    }
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data),
        ReportFormat::Csv => Ok(generate_csv_report(data)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(HEAVY_RULE);
    report.push('\n');
    report.push_str(&format!("  REPORT for {}\n", data.base_url.bright_white().bold()));
    report.push_str(HEAVY_RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Pages found:  {}\n", data.total_pages));
    report.push_str(&format!("Total links:  {}\n\n", data.total_links));

    report.push_str(HEAVY_RULE);
    report.push_str("\n\n");

    for entry in &data.entries {
        let noun = if entry.count == 1 { "link" } else { "links" };
        report.push_str(&format!(
            "Found {} internal {} to {}\n",
            entry.count.to_string().cyan().bold(),
            noun,
            entry.url
        ));

        if let Some(ref page) = entry.page {
            if !page.h1.is_empty() {
                report.push_str(&format!("  {} {}\n", "Title:".blue(), page.h1));
            }
            if !page.first_paragraph.is_empty() {
                report.push_str(&wrap_text(&page.first_paragraph, 80, "    "));
            }
            report.push_str(&format!(
                "  {} {} outgoing, {} images\n",
                "Links:".blue(),
                page.outgoing_links.len(),
                page.image_urls.len()
            ));
            report.push_str(LIGHT_RULE);
            report.push('\n');
        }
    }

    report.push('\n');
    report.push_str(HEAVY_RULE);
    report.push('\n');
    report.push_str("                          End of Report\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitecrawl",
                "version": env!("CARGO_PKG_VERSION"),
                "format": "json",
            },
            "base_url": data.base_url,
            "summary": {
                "total_pages": data.total_pages,
                "total_links": data.total_links,
            },
            "pages": data.entries,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(data: &ReportData) -> String {
    let mut report =
        String::from("page_url,count,h1,first_paragraph,outgoing_link_urls,image_urls\n");

    for entry in &data.entries {
        let (h1, first_paragraph, links, images) = match entry.page {
            Some(ref page) => (
                page.h1.as_str(),
                page.first_paragraph.as_str(),
                page.outgoing_links.join(";"),
                page.image_urls.join(";"),
            ),
            None => ("", "", String::new(), String::new()),
        };

        let row = [
            csv_field(&entry.url),
            entry.count.to_string(),
            csv_field(h1),
            csv_field(first_paragraph),
            csv_field(&links),
            csv_field(&images),
        ];
        report.push_str(&row.join(","));
        report.push('\n');
    }

    report
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Crawl report for {}\n\n", data.base_url));
    report.push_str(&format!("- **Pages found:** {}\n", data.total_pages));
    report.push_str(&format!("- **Total links:** {}\n\n", data.total_links));

    report.push_str("| Page | Links | Title |\n");
    report.push_str("|------|------:|-------|\n");
    for entry in &data.entries {
        let title = entry
            .page
            .as_ref()
            .map(|p| p.h1.replace('|', "\\|"))
            .unwrap_or_default();
        report.push_str(&format!("| {} | {} | {} |\n", entry.url, entry.count, title));
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("one two three four", 14, "  ");
        assert_eq!(wrapped, "  one two\n  three four\n");
    }
}
