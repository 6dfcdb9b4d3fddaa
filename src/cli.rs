use clap::Parser;
use ytscribe::output::TranscriptFormat;

#[derive(Parser)]
#[command(name = "ytscribe", about = "YouTube transcript provider for LLM tools", version)]
pub struct Cli {
    /// YouTube video URL (reads the first line of stdin if omitted)
    pub url: Option<String>,

    /// Transcript layout: text (default) or chunks
    #[arg(short, long, value_enum)]
    pub format: Option<TranscriptFormat>,

    /// Window length in seconds for the chunks layout
    #[arg(long)]
    pub chunk_seconds: Option<u64>,

    /// Transcript endpoint to query instead of the configured one
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Print title and transcript as JSON instead of the tool payload
    #[arg(long)]
    pub json: bool,

    /// Emit status events as JSON lines on stderr
    #[arg(short, long)]
    pub events: bool,

    /// Show the selected track and metadata
    #[arg(short, long)]
    pub verbose: bool,
}
