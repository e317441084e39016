pub mod crawl;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "sitecrawl".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "maps the internal links of a single site".bright_black());
    println!();
}
