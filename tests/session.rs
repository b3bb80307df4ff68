//! Session loop tests with in-memory input/output and fake backends

use std::path::PathBuf;

use riverwood_agent::agent::{FAREWELL, GREETING};
use riverwood_agent::completion::APOLOGY;
use riverwood_agent::{Completion, Exchange, Session, SessionSettings};
use tokio::io::BufReader;

mod common;

use common::{FakePlayer, FakeSynthesizer, ScriptedCompleter};

struct Harness {
    completer: ScriptedCompleter,
    synthesizer: FakeSynthesizer,
    player: FakePlayer,
    session: Session,
}

impl Harness {
    fn new(completer: ScriptedCompleter, synthesizer: FakeSynthesizer, player: FakePlayer) -> Self {
        Self::with_settings(completer, synthesizer, player, SessionSettings::default())
    }

    fn with_settings(
        completer: ScriptedCompleter,
        synthesizer: FakeSynthesizer,
        player: FakePlayer,
        settings: SessionSettings,
    ) -> Self {
        let session = Session::new(
            Box::new(completer.clone()),
            Box::new(synthesizer.clone()),
            Box::new(player.clone()),
            settings,
        );
        Self {
            completer,
            synthesizer,
            player,
            session,
        }
    }

    async fn run(&mut self, input: &str) -> (usize, String) {
        let mut output = Vec::new();
        let turns = self
            .session
            .run(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();
        (turns, String::from_utf8(output).unwrap())
    }
}

#[tokio::test]
async fn test_exit_right_after_greeting() {
    let mut h = Harness::new(
        ScriptedCompleter::default(),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    let (turns, output) = h.run("exit\n").await;

    assert_eq!(turns, 0);
    assert!(output.contains(&format!("Agent: {GREETING}")));
    assert!(output.trim_end().ends_with(FAREWELL));
    assert_eq!(h.synthesizer.texts(), vec![GREETING.to_string()]);
    assert_eq!(h.player.played().len(), 1);
    assert!(h.completer.prompts().is_empty());
}

#[tokio::test]
async fn test_blank_lines_ignored_and_exit_case_insensitive() {
    let mut h = Harness::new(
        ScriptedCompleter::numbered(1),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    let (turns, output) = h.run("\n   \nhello\n\nQuIt\nnever read\n").await;

    assert_eq!(turns, 1);
    assert_eq!(h.completer.prompts().len(), 1);
    assert!(output.contains("Agent (text): a1"));
    assert_eq!(h.session.memory().len(), 1);
}

#[tokio::test]
async fn test_end_of_input_terminates() {
    let mut h = Harness::new(
        ScriptedCompleter::numbered(2),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    let (turns, output) = h.run("first\nsecond").await;

    assert_eq!(turns, 2);
    assert!(output.trim_end().ends_with(FAREWELL));
}

#[tokio::test]
async fn test_first_prompt_ends_with_user_message() {
    let mut h = Harness::new(
        ScriptedCompleter::numbered(1),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    h.run("ghar ka loan kaise milega?\nexit\n").await;

    let prompts = h.completer.prompts();
    assert!(prompts[0].ends_with("\nUser: ghar ka loan kaise milega?\nAssistant:"));
    assert!(!prompts[0].contains("Previous brief conversation"));
}

#[tokio::test]
async fn test_memory_window_trims_oldest() {
    let mut h = Harness::new(
        ScriptedCompleter::numbered(4),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    let (turns, _) = h.run("q1\nq2\nq3\nq4\nexit\n").await;
    assert_eq!(turns, 4);

    let remembered: Vec<Exchange> = h.session.memory().iter().cloned().collect();
    assert_eq!(
        remembered,
        vec![
            Exchange::new("q2", "a2"),
            Exchange::new("q3", "a3"),
            Exchange::new("q4", "a4"),
        ]
    );

    // Fourth prompt sees the three previous exchanges, oldest first
    let prompts = h.completer.prompts();
    let fourth = &prompts[3];
    let q1 = fourth.find("User: q1\nAssistant: a1").unwrap();
    let q3 = fourth.find("User: q3\nAssistant: a3").unwrap();
    assert!(q1 < q3);
    assert!(fourth.ends_with("User: q4\nAssistant:"));
}

#[tokio::test]
async fn test_custom_window_size() {
    let settings = SessionSettings {
        memory_size: 1,
        ..SessionSettings::default()
    };
    let mut h = Harness::with_settings(
        ScriptedCompleter::numbered(3),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
        settings,
    );

    h.run("q1\nq2\nq3\nexit\n").await;

    let remembered: Vec<Exchange> = h.session.memory().iter().cloned().collect();
    assert_eq!(remembered, vec![Exchange::new("q3", "a3")]);
    assert!(!h.completer.prompts()[2].contains("q1"));
}

#[tokio::test]
async fn test_synthesis_failure_skips_playback() {
    let mut h = Harness::new(
        ScriptedCompleter::numbered(2),
        FakeSynthesizer::failing(),
        FakePlayer::new(true),
    );

    let (turns, output) = h.run("q1\nq2\nexit\n").await;

    assert_eq!(turns, 2);
    assert!(h.player.played().is_empty());
    assert!(output.contains("TTS failed - skipping audio playback."));
    assert_eq!(h.session.memory().len(), 2);
}

#[tokio::test]
async fn test_playback_failure_points_to_file() {
    let settings = SessionSettings {
        output_audio: PathBuf::from("reply.mp3"),
        ..SessionSettings::default()
    };
    let mut h = Harness::with_settings(
        ScriptedCompleter::numbered(1),
        FakeSynthesizer::default(),
        FakePlayer::new(false),
        settings,
    );

    let (turns, output) = h.run("q1\nexit\n").await;

    assert_eq!(turns, 1);
    assert!(output.contains("Could not auto-play audio. Open"));
    assert!(output.contains("reply.mp3"));
    assert!(h.player.played().iter().all(|p| p.is_absolute()));
}

#[tokio::test]
async fn test_fallback_reply_is_spoken_and_remembered() {
    let mut h = Harness::new(
        ScriptedCompleter::new([Completion::Fallback(APOLOGY.to_string())]),
        FakeSynthesizer::default(),
        FakePlayer::new(true),
    );

    let (_, output) = h.run("kuch bhi\nexit\n").await;

    assert!(output.contains(&format!("Agent (text): {APOLOGY}")));
    assert_eq!(h.synthesizer.texts(), vec![GREETING.to_string(), APOLOGY.to_string()]);
    let remembered: Vec<Exchange> = h.session.memory().iter().cloned().collect();
    assert_eq!(remembered, vec![Exchange::new("kuch bhi", APOLOGY)]);
}
