use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use riverwood_agent::{
    CommandPlayer, Config, ElevenLabsTts, GeminiClient, Session, SessionSettings,
};

/// Riverwood - text-in, voice-out real-estate assistant
///
/// Credentials and settings come from the environment (or a `.env` file):
/// `GEMINI_API_KEY`, `ELEVEN_API_KEY`, `ELEVEN_VOICE_ID`, `MEMORY_SIZE`, `OUTPUT_AUDIO`.
#[derive(Parser)]
#[command(name = "riverwood", version, about)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so the conversation on stdout stays readable
    let filter = match cli.verbose {
        0 => "warn,riverwood_agent=info",
        1 => "info,riverwood_agent=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let completer = GeminiClient::from_config(&config.llm);
    let synthesizer = ElevenLabsTts::from_config(&config.voice)?;
    let player = CommandPlayer::from_command_line(&config.voice.player);

    tracing::info!(
        model = completer.model(),
        voice_id = synthesizer.voice_id(),
        player = player.program(),
        memory_size = config.memory_size,
        "starting session"
    );

    let mut session = Session::new(
        Box::new(completer),
        Box::new(synthesizer),
        Box::new(player),
        SessionSettings::from_config(&config),
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let turns = session.run(stdin, &mut stdout).await?;

    tracing::info!(turns, "session ended");
    Ok(())
}
