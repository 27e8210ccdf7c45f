use clap::Parser;

#[derive(Parser)]
#[command(name = "newsreel")]
#[command(about = "Concurrent news aggregator with interactive term search")]
#[command(version)]
pub struct Cli {
    /// Print per-feed and per-article progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Feed list location: a local OPML file or an http(s) URL
    #[arg(short, long, default_value = "small-feed.xml")]
    pub url: String,
}
