//! Audio playback through an external media player

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::Player;
use crate::{Error, Result};

/// Plays audio files by running a media player command to completion
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// Player running `program` with `args`, followed by the audio path
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `ffplay` without a window, exiting when playback ends
    #[must_use]
    pub fn ffplay() -> Self {
        Self::new("ffplay", vec!["-nodisp".to_string(), "-autoexit".to_string()])
    }

    /// Parse a whitespace-separated command line such as `"ffplay -nodisp -autoexit"`
    ///
    /// Falls back to [`CommandPlayer::ffplay`] for a blank command line.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Self {
        let mut words = command_line.split_whitespace();
        match words.next() {
            Some(program) => Self::new(program, words.map(ToString::to_string).collect()),
            None => Self::ffplay(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    async fn try_play(&self, path: &Path) -> Result<()> {
        let program = which::which(&self.program)
            .map_err(|e| Error::Playback(format!("{} not found: {e}", self.program)))?;

        let status = Command::new(&program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::Playback(format!("failed to spawn {}: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::Playback(format!("{} exited with {status}", self.program)));
        }

        Ok(())
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::ffplay()
    }
}

#[async_trait]
impl Player for CommandPlayer {
    async fn play(&self, path: &Path) -> bool {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        match self.try_play(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "playback complete");
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not auto-play audio, open the file manually"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line() {
        let player = CommandPlayer::from_command_line("mpv --no-video --really-quiet");
        assert_eq!(player.program(), "mpv");
        assert_eq!(player.args(), &["--no-video", "--really-quiet"]);
    }

    #[test]
    fn test_blank_command_line_is_ffplay() {
        let player = CommandPlayer::from_command_line("   ");
        assert_eq!(player.program(), "ffplay");
        assert_eq!(player.args(), &["-nodisp", "-autoexit"]);
    }

    #[tokio::test]
    async fn test_missing_player_fails_softly() {
        let player = CommandPlayer::new("riverwood-no-such-player", vec![]);
        assert!(!player.play(Path::new("agent_reply.mp3")).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides_success() {
        assert!(CommandPlayer::new("true", vec![]).play(Path::new("x.mp3")).await);
        assert!(!CommandPlayer::new("false", vec![]).play(Path::new("x.mp3")).await);
    }
}
