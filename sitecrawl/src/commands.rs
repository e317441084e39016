use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecrawl")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log every fetch and discovered link").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Recursively crawl every page on the host of the given URL and count the \
                internal links pointing at each one.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The base URL to start crawling from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds (default: wait indefinitely)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"max-pages" <NUM_PAGES>)
                        .required(false)
                        .help("Stop recording new pages once this many are known")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"user-agent" <AGENT>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(--"pages")
                        .required(false)
                        .help("Include title, first paragraph, links and images of each page")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown", "md"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("extract")
                .about("Fetch a single page and print the data extracted from it")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page to extract")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds (default: wait indefinitely)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"user-agent" <AGENT>)
                        .required(false)
                        .help("User-Agent header sent with the request"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
}
