use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};
use vidsum::SummaryRequest;
use vidsum::pipeline::Pipeline;
use vidsum::summarize::OpenAiCompatible;
use vidsum::youtube::YouTubeCaptions;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("vidsum.log");

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
        .join("vidsum")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match std::env::var(vidsum::config::API_KEY_ENV) {
        Ok(_) => format!("  \x1b[32m✅\x1b[0m {}", vidsum::config::API_KEY_ENV),
        Err(_) => format!(
            "  \x1b[31m❌\x1b[0m {}   (not set, may also come from .env)",
            vidsum::config::API_KEY_ENV
        ),
    };

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        vidsum::config::config_path().display(),
        log_dir().join("vidsum.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // CLI flags take priority over the config file
    let mut config = vidsum::config::Config::load()?;
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if cli.cookies.is_some() {
        config.cookies_path = cli.cookies.clone();
    }
    let settings = config.resolve()?;
    let lang = cli.lang.clone().unwrap_or_else(|| settings.default_lang.clone());

    if cli.verbose {
        let config_path = vidsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {} via {}", settings.model, settings.api_base);
        if let Some(ref path) = settings.cookies_path {
            eprintln!("Cookies: {}", path.display());
        }
    }
    debug!("Resolved settings: {settings:?}");

    let api_key = vidsum::config::api_key()?;

    // One client for the whole process; the timeout bounds every network call.
    let client = reqwest::Client::builder().timeout(settings.call_timeout).build()?;

    let model = OpenAiCompatible::new(client.clone(), api_key, settings.model.clone())
        .with_api_base(settings.api_base.clone())
        .with_sampling(settings.temperature, settings.max_tokens);
    let captions = match settings.cookies_path {
        Some(ref path) => YouTubeCaptions::new(client).with_cookies_file(path),
        None => YouTubeCaptions::new(client),
    };
    let pipeline = Pipeline::new(captions, model, settings);

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL or video ID provided\n\nUsage: vidsum <URL>\n       echo <URL> | vidsum");
    }

    let mut rendered = Vec::new();
    let mut failed = 0;

    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        let request = SummaryRequest {
            video_url: url_input.to_string(),
            target_language: lang.clone(),
            mode: cli.mode,
        };
        let result = pipeline.summarize(&request).await;

        if cli.verbose {
            eprintln!(
                "Video: {} ({url_input})\nStatus: {:?}\nSource language: {}\nChunks: {}",
                result.title.as_deref().unwrap_or("untitled"),
                result.status,
                result.source_language.as_deref().unwrap_or("-"),
                result.chunks,
            );
        }

        if !result.is_success() {
            failed += 1;
        }

        rendered.push(match cli.format {
            OutputFormat::Text => vidsum::output::render_text(&result),
            OutputFormat::Json => vidsum::output::render_json(&result),
        });
    }

    let rendered = rendered.join("\n\n");
    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    if failed > 0 {
        bail!("{failed} of {} request(s) failed", rendered_count(&urls));
    }

    Ok(())
}

fn rendered_count(urls: &[String]) -> usize {
    urls.iter().filter(|u| !u.trim().is_empty()).count()
}
