use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::Cli;
use ytscribe::events::{EventEmitter, JsonLinesEmitter, LogEmitter};
use ytscribe::tool::TranscriptTool;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytscribe.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytscribe")
        .join("logs")
}

fn read_url(cli: &Cli) -> Result<String> {
    if let Some(ref url) = cli.url {
        return Ok(url.clone());
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let url = line.trim().to_string();
    if url.is_empty() {
        bail!("no URL provided\n\nUsage: ytscribe <URL>\n       echo <URL> | ytscribe");
    }
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    // Load config file (non-fatal if missing/invalid)
    let mut config = ytscribe::config::Config::load().unwrap_or_else(|e| {
        debug!("Ignoring config: {e}");
        Default::default()
    });

    // CLI flags take priority
    if cli.format.is_some() {
        config.format = cli.format;
    }
    if cli.chunk_seconds.is_some() {
        config.chunk_seconds = cli.chunk_seconds;
    }
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint.clone();
    }

    let url = read_url(&cli)?;

    if cli.verbose {
        let config_path = ytscribe::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Endpoint: {}\nFormat: {:?}\nVideo: {}",
            config.endpoint(),
            config.format(),
            ytscribe::extract_video_id(&url).unwrap_or_else(|| "(none)".to_string()),
        );
    }

    let tool = TranscriptTool::from_config(&config)?;

    if cli.json {
        let result = tool.fetch(&url).await?;
        println!("{}", ytscribe::output::render_json(&result));
        return Ok(());
    }

    let emitter: &dyn EventEmitter = if cli.events { &JsonLinesEmitter } else { &LogEmitter };
    let rendered = tool.get_youtube_transcript(&url, emitter).await;
    println!("{rendered}");

    Ok(())
}
