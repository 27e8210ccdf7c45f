use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use newsreel::cli::Cli;
use newsreel::config::Config;
use newsreel::crawler::CrawlCoordinator;
use newsreel::errors::AggregatorResult;
use newsreel::index::InvertedIndex;
use newsreel::logging;
use newsreel::sources::{HtmlDocumentSource, OpmlFeedListSource, RssFeedSource};

fn main() {
    let cli = Cli::parse();
    logging::initialize(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> AggregatorResult<()> {
    let config = Config::from_env()?;
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let coordinator = CrawlCoordinator::new(
        &config,
        Arc::new(OpmlFeedListSource::new(timeout)),
        Arc::new(RssFeedSource::new(timeout)),
        Arc::new(HtmlDocumentSource::new(timeout)),
    );

    let index = coordinator.crawl(&cli.url)?;
    query_loop(&index)
}

const MAX_MATCHES_TO_SHOW: usize = 15;
const MAX_DISPLAY_WIDTH: usize = 80;

/// Interactive term lookup against the built index. An empty line or EOF
/// quits.
fn query_loop(index: &InvertedIndex) -> AggregatorResult<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("Enter a search term [or just hit <enter> to quit]: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let term = line.trim();
        if term.is_empty() {
            break;
        }

        let matches = index.matching_articles(term);
        if matches.is_empty() {
            println!("Ah, we didn't find the term \"{}\". Try again.", term);
            continue;
        }

        print!(
            "That term appears in {} article{}.  ",
            matches.len(),
            if matches.len() == 1 { "" } else { "s" }
        );
        if matches.len() > MAX_MATCHES_TO_SHOW {
            println!("Here are the top {} of them:", MAX_MATCHES_TO_SHOW);
        } else if matches.len() > 1 {
            println!("Here they are:");
        } else {
            println!("Here it is:");
        }

        for (rank, (article, count)) in matches.iter().take(MAX_MATCHES_TO_SHOW).enumerate() {
            let times = if *count == 1 { "time" } else { "times" };
            println!(
                "  {:>2}.) \"{}\" [appears {} {}].",
                rank + 1,
                truncate(&article.title),
                count,
                times
            );
            println!("       \"{}\"", truncate(&article.url));
        }
    }

    Ok(())
}

/// Clip a title or URL for single-line display.
fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DISPLAY_WIDTH {
        return text.to_string();
    }
    let clipped: String = text.chars().take(MAX_DISPLAY_WIDTH - 3).collect();
    format!("{}...", clipped)
}
