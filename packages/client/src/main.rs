//! One-shot classroom client: join a session, submit a generation, wait
//! for the video and print its URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand};
use common::{GenerationKind, PollPolicy};
use tracing::info;

use client::{ClassroomClient, PollOutcome, TokioSleeper, poll_until_terminal};

#[derive(Parser)]
#[command(name = "reelroom", about = "Submit video generations to a Reelroom classroom")]
struct Cli {
    /// Base URL of the classroom server.
    #[arg(long, env = "REELROOM_SERVER", default_value = "http://localhost:3001")]
    server: String,

    /// 8-digit classroom code shared by the teacher.
    #[arg(long)]
    code: String,

    /// Nickname to claim in the classroom.
    #[arg(long)]
    name: String,

    /// Seconds between status polls.
    #[arg(long, default_value_t = 3)]
    poll_interval: u64,

    /// Give up after this many status polls.
    #[arg(long, default_value_t = 200)]
    max_polls: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a video from a text prompt.
    Text {
        /// The prompt to animate.
        prompt: String,
        /// Provider model name, e.g. "kling-v1".
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate a video from a still image.
    Image {
        /// Path to the source image file.
        image: PathBuf,
        /// Optional prompt guiding the animation.
        #[arg(long)]
        prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = ClassroomClient::connect(&cli.server)?;
    client
        .join(&cli.code, &cli.name)
        .await
        .context("Could not join the classroom")?;
    info!(code = %cli.code, name = %cli.name, "Joined classroom");

    let (kind, task_id) = match &cli.command {
        Command::Text { prompt, model } => {
            let task_id = client.submit_text(prompt, model.as_deref()).await?;
            (GenerationKind::Text2Video, task_id)
        }
        Command::Image { image, prompt } => {
            let bytes = std::fs::read(image)
                .with_context(|| format!("Could not read image {}", image.display()))?;
            let task_id = client
                .submit_image(&BASE64.encode(bytes), prompt.as_deref())
                .await?;
            (GenerationKind::Image2Video, task_id)
        }
    };
    info!(%kind, task_id, "Generation submitted, waiting for the video");

    let policy = PollPolicy::new(Duration::from_secs(cli.poll_interval), cli.max_polls);
    match poll_until_terminal(&client, kind, &task_id, policy, &TokioSleeper).await? {
        PollOutcome::Succeeded { video_url } => match video_url {
            Some(url) => println!("{url}"),
            None => bail!("Generation succeeded but the provider sent no video URL"),
        },
        PollOutcome::Failed { message } => {
            bail!(
                "Generation failed: {}",
                message.unwrap_or_else(|| "no reason given".into())
            )
        }
        PollOutcome::TimedOut => bail!("Gave up after {} polls", cli.max_polls),
    }

    Ok(())
}
