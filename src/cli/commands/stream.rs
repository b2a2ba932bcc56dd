//! Live transcription command implementation.
//!
//! Streams microphone audio to the speech service and prints each finalized
//! utterance as it is detected.

use crate::audio::MicrophoneCapture;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::{RealtimeSession, StreamingConfig, StreamingEvent, UtteranceSegmenter};
use anyhow::Result;
use console::style;
use tracing::info;

/// Run live transcription until Ctrl-C or upstream termination.
pub async fn run_stream(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Stream) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let streaming = &settings.streaming;
    let config = StreamingConfig::from_env(
        &streaming.endpoint,
        streaming.sample_rate,
        streaming.format_turns,
    )?;

    Output::info("Starting realtime transcription");
    Output::info("Press Ctrl+C to stop");

    let mut session = RealtimeSession::connect(config).await?;
    let (capture, mut audio_rx) = MicrophoneCapture::start(streaming.sample_rate)?;
    let mut segmenter = UtteranceSegmenter::new(streaming.pause_duration());
    let input = segmenter.input();

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
                Output::info("Streaming stopped by user");
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
                    Output::info(&format!(
                        "Session terminated: {} seconds of audio processed",
                        audio_duration_seconds
                    ));
                    input.finish();
                    upstream_done = true;
                }
                None => {
                    input.finish();
                    upstream_done = true;
                }
            },
            utterance = segmenter.next_utterance(None) => match utterance {
                Some(text) => println!("{} {}", style(">>").green().bold(), text),
                None => break,
            },
        }
    }

    segmenter.finish().await;
    while let Some(text) = segmenter.next_utterance(Some(std::time::Duration::ZERO)).await {
        println!("{} {}", style(">>").green().bold(), text);
    }

    capture.stop();
    audio_task.abort();
    session.disconnect(true).await?;

    Ok(())
}
