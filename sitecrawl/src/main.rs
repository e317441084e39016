use colored::Colorize;
use sitecrawl::commands::command_argument_builder;
use sitecrawl::handlers::{handle_crawl, handle_extract, init_logging};
use sitecrawl_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    init_logging(verbose);

    let result = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        Some(("extract", primary_command)) => handle_extract(primary_command).await,
        // No subcommand provided, just show the banner
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
