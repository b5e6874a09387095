use clap::Parser;
use std::path::PathBuf;

use vidsum::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "vidsum",
    about = "Summarize YouTube videos from their captions",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Language to write the summary in (ISO-639-1 code)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// What kind of content the URL points at
    #[arg(long, value_enum, default_value_t = Mode::Video)]
    pub mode: Mode,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Netscape cookies.txt to send with caption requests
    #[arg(long, env = "COOKIE_PATH")]
    pub cookies: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show resolved settings and result metadata
    #[arg(short, long)]
    pub verbose: bool,
}
