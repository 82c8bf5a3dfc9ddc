use anyhow::Result;
use clap::Parser;
use log::debug;

use nightly_post::forum::topics::{
    CreateTopicOptions, create_topic_for_version, find_topic_by_id, find_topic_for_version,
    update_topic_for_version,
};
use nightly_post::forum::{ForumClient, Visibility};
use nightly_post::http::HttpClient;
use nightly_post::version::version_build_hash;

/// nightly-post - forum announcements for nightly builds
///
/// Finds or creates the nightly-builds topic for a version on the
/// ascensiongamedev.com forums and posts the download links for a build.
/// Intended to run as a CI step after a successful nightly build.
#[derive(Parser, Debug)]
#[command(author, about)]
struct Cli {
    /// Forum REST API key
    #[arg(long = "api-key", env = "NIGHTLY_POST_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Version being announced, e.g. "0.7.2-beta"
    #[arg(long)]
    version: String,

    /// Nightly build number
    #[arg(long)]
    build: u64,

    /// Commit hash the build was produced from
    #[arg(long)]
    hash: String,

    /// Comma-separated runtime identifiers, e.g. "linux-x64,osx-x64,win-x64"
    #[arg(long = "runtime-identifiers", value_delimiter = ',')]
    runtime_identifiers: Vec<String>,

    /// Known topic id; when it resolves, the title search is skipped
    #[arg(long = "topic-id")]
    topic_id: Option<u64>,

    /// Forum API base URL (defaults to the production forum)
    #[arg(long = "api-base-url", value_name = "URL")]
    api_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let http = HttpClient::new(reqwest::Client::new(), &cli.api_key);
    let forum = ForumClient::new(http, cli.api_base_url.clone());

    debug!(
        "Posting builds for the following runtime identifiers: {}",
        if cli.runtime_identifiers.is_empty() {
            "None specified".to_string()
        } else {
            cli.runtime_identifiers.join(",")
        }
    );

    let topic = match cli.topic_id {
        Some(topic_id) => {
            let topic = find_topic_by_id(&forum, topic_id).await?;
            if topic.is_some() {
                debug!(
                    "Found topic with id '{}', will skip looking for a topic matching version '{}'.",
                    topic_id, cli.version
                );
            } else {
                debug!(
                    "Did not find topic with id '{}', looking for topic for version '{}'...",
                    topic_id, cli.version
                );
            }
            topic
        }
        None => None,
    };

    let topic = match topic {
        Some(topic) => Some(topic),
        None => find_topic_for_version(&forum, &cli.version).await?,
    };

    match topic {
        Some(topic) => {
            let update = update_topic_for_version(
                &forum,
                &cli.version,
                cli.build,
                &cli.hash,
                topic.id,
                &cli.runtime_identifiers,
            )
            .await?;
            debug!(
                "Updated {}/{} and created new post {} to replace the original for v{}",
                topic.id,
                update.topic.id,
                update.post.id,
                version_build_hash(&cli.version, cli.build, &cli.hash)
            );
        }
        None => {
            let topic = create_topic_for_version(
                &forum,
                &cli.version,
                cli.build,
                &cli.hash,
                &cli.runtime_identifiers,
                CreateTopicOptions {
                    hidden: Visibility::Visible,
                    ..Default::default()
                },
            )
            .await?;
            debug!(
                "Created new topic {} for v{}",
                topic.id,
                version_build_hash(&cli.version, cli.build, &cli.hash)
            );
        }
    }

    Ok(())
}
