use anyhow::Result;
use clap::Parser;
use packpub::config::Config;
use packpub::github::GitHub;
use packpub::modrinth::Modrinth;
use packpub::publish::Publisher;
use std::env;
use std::path::PathBuf;

/// packpub - modpack release publisher
///
/// Publishes a new modpack version to Modrinth and mirrors it as a tagged
/// GitHub release. Credentials are read from the MODRINTH_TOKEN and
/// GITHUB_TOKEN environment variables; everything else comes from the
/// config file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the publish configuration file
    #[arg(
        long = "config",
        short = 'c',
        value_name = "PATH",
        default_value = "packpub.json"
    )]
    config: PathBuf,

    /// Modrinth API URL (defaults to https://api.modrinth.com/v2)
    #[arg(long = "modrinth-api-url", value_name = "URL", env = "MODRINTH_API_URL")]
    modrinth_api_url: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "github-api-url", value_name = "URL", env = "GITHUB_API_URL")]
    github_api_url: Option<String>,
}

fn token_from_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|token| !token.is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    // Credential precondition: the only failure besides an unreadable config
    // that affects the exit status.
    let (Some(modrinth_token), Some(github_token)) = (
        token_from_env("MODRINTH_TOKEN"),
        token_from_env("GITHUB_TOKEN"),
    ) else {
        eprintln!("Please set the MODRINTH_TOKEN and GITHUB_TOKEN environment variables.");
        std::process::exit(1);
    };

    let config = Config::load(&cli.config)?;
    let modrinth = Modrinth::new(&modrinth_token, cli.modrinth_api_url)?;
    let github = GitHub::new(&github_token, cli.github_api_url)?;

    Publisher::new(&modrinth, &github, &config).run().await;

    println!("\nDone.");
    Ok(())
}
