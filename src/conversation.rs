//! Voice conversation loop.
//!
//! Wires the pieces together: microphone → realtime transcription session →
//! utterance segmenter → analysis team → console. One utterance is analyzed
//! at a time; partial events keep buffering while the team is thinking.

use crate::agent::AnalysisTeam;
use crate::audio::MicrophoneCapture;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::transcription::{
    RealtimeSession, StreamingConfig, StreamingEvent, UtteranceSegmenter,
};
use console::style;
use tracing::{info, warn};

/// Handles a realtime conversation between voice input and an analysis team.
pub struct ConversationHandler {
    team: AnalysisTeam,
    settings: Settings,
}

impl ConversationHandler {
    /// Create a handler for one team and user.
    pub fn new(team: AnalysisTeam, settings: Settings) -> Self {
        Self { team, settings }
    }

    /// Run the conversation until Ctrl-C or upstream termination.
    pub async fn run(&mut self) -> Result<()> {
        println!(
            "\n{}",
            style(format!("Conversation mode ({} team)", self.team.kind()))
                .bold()
                .cyan()
        );
        println!("{}", style(format!("User: {}", self.team.user())).dim());
        println!(
            "{}\n",
            style("Speak into your microphone. Press Ctrl+C to stop.").dim()
        );

        if let Some(disclaimer) = self.team.disclaimer() {
            Output::warning(disclaimer);
        }

        let streaming = &self.settings.streaming;
        let config = StreamingConfig::from_env(
            &streaming.endpoint,
            streaming.sample_rate,
            streaming.format_turns,
        )?;

        let mut session = RealtimeSession::connect(config).await?;
        let (capture, mut audio_rx) = MicrophoneCapture::start(streaming.sample_rate)?;
        let mut segmenter = UtteranceSegmenter::new(streaming.pause_duration());
        let input = segmenter.input();

        // Forward microphone frames until the session goes away.
        let sender = session.audio_sender();
        let audio_task = tokio::spawn(async move {
            while let Some(frame) = audio_rx.recv().await {
                if !sender.is_active() || sender.send(&frame).await.is_err() {
                    break;
                }
            }
        });

        let mut upstream_done = false;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    Output::info("Conversation stopped by user");
                    break;
                }
                event = session.next_event(), if !upstream_done => match event {
                    Some(StreamingEvent::Begin { session_id }) => {
                        info!("Session started: {}", session_id);
                    }
                    Some(StreamingEvent::Turn { transcript, .. }) => {
                        input.push_transcript(&transcript);
                    }
                    Some(StreamingEvent::Termination { audio_duration_seconds }) => {
                        info!(
                            "Session terminated: {} seconds of audio processed",
                            audio_duration_seconds
                        );
                        input.finish();
                        upstream_done = true;
                    }
                    None => {
                        warn!("Streaming session closed");
                        input.finish();
                        upstream_done = true;
                    }
                },
                utterance = segmenter.next_utterance(None) => match utterance {
                    Some(text) => self.process_utterance(&text).await,
                    // Segmenter finished and drained: the session is over.
                    None => break,
                },
            }
        }

        // Flush whatever was still accumulating and answer it before leaving.
        segmenter.finish().await;
        while let Some(text) = segmenter.next_utterance(Some(std::time::Duration::ZERO)).await {
            self.process_utterance(&text).await;
        }

        capture.stop();
        audio_task.abort();
        session.disconnect(true).await?;

        Output::info("Conversation session ended.");
        Ok(())
    }

    async fn process_utterance(&self, text: &str) {
        println!(
            "\n{} {}",
            style("You said:").blue().bold(),
            style(text).bold()
        );

        let spinner = Output::spinner(&format!("Processing with {} team...", self.team.kind()));
        let result = self.team.analyze(text).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                println!("{} {}\n", style("Team:").cyan().bold(), response.content);
                Output::success("Analysis complete. Ready for next input.");
            }
            Err(e) => {
                Output::error(&format!("Error during analysis: {}", e));
            }
        }
    }
}
