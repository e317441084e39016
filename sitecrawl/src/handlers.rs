use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use sitecrawl_core::crawl::{execute_crawl, fetch_page_data, CrawlOptions};
use sitecrawl_core::report::{build_report_data, generate_report, save_report, ReportFormat};
use sitecrawl_scanner::PageData;
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

/// Install the fmt subscriber on stderr; `verbose` raises the level to DEBUG.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand a leading `~` in a user-supplied output path
pub fn resolve_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

pub fn parse_report_format(name: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(name).ok_or_else(|| anyhow!("Unknown report format '{}'", name))
}

/// Render one page's extracted data as `text` or `json`.
pub fn render_page_data(page: &PageData, format: &str) -> Result<String> {
    if format == "json" {
        return serde_json::to_string_pretty(page).context("Failed to serialize page data");
    }

    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", "URL:".blue().bold(), page.url));
    out.push_str(&format!("{}  {}\n", "Title:".blue().bold(), display_or_none(&page.h1)));
    out.push_str(&format!(
        "{}  {}\n",
        "First paragraph:".blue().bold(),
        display_or_none(&page.first_paragraph)
    ));

    out.push_str(&format!("{} ({})\n", "Links".blue().bold(), page.outgoing_links.len()));
    for link in &page.outgoing_links {
        out.push_str(&format!("  {} {}\n", "•".bright_black(), link));
    }

    out.push_str(&format!("{} ({})\n", "Images".blue().bold(), page.image_urls.len()));
    for image in &page.image_urls {
        out.push_str(&format!("  {} {}\n", "•".bright_black(), image));
    }

    Ok(out)
}

fn display_or_none(value: &str) -> String {
    if value.is_empty() {
        "(none)".bright_black().to_string()
    } else {
        value.to_string()
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let url = sub_matches
        .get_one::<Url>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let timeout_secs = sub_matches.get_one::<u64>("timeout").copied();
    let max_pages = sub_matches.get_one::<usize>("max-pages").copied();
    let user_agent = sub_matches.get_one::<String>("user-agent").cloned();
    let collect_pages = sub_matches.get_flag("pages");
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = parse_report_format(
        sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;

    // Keep the user's spelling of the base URL; `Url` adds a trailing slash.
    let base_url = sub_matches
        .get_raw("url")
        .and_then(|mut raw| raw.next())
        .and_then(|raw| raw.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    if !quiet {
        println!("🕷️  Crawling {}", url.host_str().unwrap_or("unknown").bright_white());
        match max_pages {
            Some(max) => println!("Max pages: {}", max),
            None => println!("Max pages: unlimited"),
        }
        println!();
    }

    let options = CrawlOptions {
        url: base_url.clone(),
        timeout_secs,
        max_pages,
        user_agent,
        collect_pages,
        show_progress: !quiet,
    };

    let outcome = execute_crawl(options, None)
        .await
        .map_err(|e| anyhow!(e))?;

    if !quiet {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
    }

    let data = build_report_data(&base_url, &outcome.visits, &outcome.pages);
    let report = generate_report(&data, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            let path = resolve_output_path(path);
            save_report(&report, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}

pub async fn handle_extract(sub_matches: &ArgMatches) -> Result<()> {
    let url = sub_matches
        .get_one::<Url>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let timeout_secs = sub_matches.get_one::<u64>("timeout").copied();
    let user_agent = sub_matches.get_one::<String>("user-agent");
    let format = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    let page = fetch_page_data(url.as_str(), timeout_secs, user_agent.map(String::as_str))
        .await
        .map_err(|e| anyhow!(e))?;

    print!("{}", render_page_data(&page, format)?);
    if format == "json" {
        println!();
    }
    Ok(())
}
