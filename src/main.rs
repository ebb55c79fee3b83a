use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use talk_relay::{ApiServerBuilder, Config, TurnOrchestrator};

/// Talk Relay - speak to a chat model, hear it answer
#[derive(Parser)]
#[command(name = "talk-relay", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Path of the transcript document (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored conversation
    History,
    /// Synthesize text and write the MP3 to a file
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
        /// Output file
        #[arg(short, long, default_value = "speech.mp3")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials commonly live in a .env next to the transcript
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 => "info,talk_relay=info",
        1 => "info,talk_relay=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.transcript_path = database;
    }
    tracing::debug!(?config, "loaded configuration");

    let orchestrator = TurnOrchestrator::from_config(&config);

    match cli.command {
        Some(Command::History) => history(&orchestrator).await,
        Some(Command::TestTts { text, output }) => test_tts(&orchestrator, &text, &output).await,
        None => {
            tracing::info!(
                port = config.server.port,
                llm_model = %config.llm.model,
                stt_model = %config.voice.stt_model,
                "starting talk relay"
            );
            ApiServerBuilder::new(orchestrator)
                .config(&config)
                .build()
                .run()
                .await?;
            Ok(())
        }
    }
}

/// Print the transcript, one turn per line
async fn history(orchestrator: &TurnOrchestrator) -> anyhow::Result<()> {
    let turns = orchestrator.store().load().await?;
    for turn in &turns {
        println!("[{}] {}", turn.role, turn.content);
    }
    println!("---");
    println!(
        "{} turns in {}",
        turns.len(),
        orchestrator.store().path().display()
    );
    Ok(())
}

/// Synthesize text to a file
async fn test_tts(
    orchestrator: &TurnOrchestrator,
    text: &str,
    output: &std::path::Path,
) -> anyhow::Result<()> {
    println!("Synthesizing: \"{text}\"");

    let audio = orchestrator.synthesizer().synthesize(text).await?;
    tokio::fs::write(output, &audio).await?;

    println!("Wrote {} bytes to {}", audio.len(), output.display());
    Ok(())
}
