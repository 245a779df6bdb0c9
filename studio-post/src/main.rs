//! studio-post - Publish a portfolio announcement to LinkedIn or Twitter/X

use std::io::{IsTerminal, Read};

use clap::Parser;
use libstudiocast::credentials::{Credentials, EnvSource};
use libstudiocast::logging::LoggingConfig;
use libstudiocast::{Config, PublishOutcome, PublishRequest, Publisher, Result, StudiocastError};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "studio-post")]
#[command(version)]
#[command(about = "Publish a portfolio announcement to LinkedIn or Twitter/X", long_about = None)]
#[command(after_help = "\
CREDENTIALS:
    LinkedIn: LINKEDIN_ACCESS_TOKEN, LINKEDIN_USER_ID
    Twitter:  TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET,
              TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_TOKEN_SECRET

EXIT CODES:
    0 - Published
    1 - Configuration, network or provider error
    2 - Provider rejected the credentials (401/403)
    3 - Invalid input or unsupported platform")]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

    /// Target platform (linkedin, twitter)
    #[arg(short, long)]
    platform: String,

    /// Public image URL to attach (LinkedIn only)
    #[arg(short, long, value_name = "URL")]
    image: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env("error").verbose(cli.verbose);
    if cli.format == "json" {
        logging = logging.plain();
    }
    logging.init();

    match run(&cli).await {
        Ok(outcome) => print_outcome(&cli.format, &cli.platform, &outcome),
        Err(e) => {
            if cli.format == "json" {
                println!(
                    "{}",
                    serde_json::json!({"success": false, "error": e.to_string(), "details": e.details()})
                );
            }
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: &Cli) -> Result<PublishOutcome> {
    let content = match &cli.content {
        Some(content) => content.clone(),
        None => read_stdin()?,
    };

    let mut request = PublishRequest::new(cli.platform.clone(), content);
    if let Some(image) = &cli.image {
        request = request.with_image(image.clone());
    }

    let config = Config::load()?;
    let credentials = Credentials::load(&EnvSource::new());
    let publisher = Publisher::new(config, credentials)?;

    debug!(platform = %request.platform, "Dispatching publish request");
    publisher.publish(&request).await
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(StudiocastError::InvalidInput(
            "No content provided (pass it as an argument or pipe it on stdin)".to_string(),
        ));
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| StudiocastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_outcome(format: &str, platform: &str, outcome: &PublishOutcome) {
    if format == "json" {
        match serde_json::to_string(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to encode result: {}", e),
        }
        return;
    }

    let platform = platform.to_lowercase();
    match &outcome.post_id {
        Some(id) => println!("{}:{} ({})", platform, id, outcome.kind.as_str()),
        None => println!("{}: posted ({})", platform, outcome.kind.as_str()),
    }
}
