//! Realtime speech streaming session.
//!
//! Websocket client for a v3-style streaming transcription API. The session
//! forwards raw PCM16 audio frames upstream and decodes lifecycle events
//! (`Begin`, `Turn`, `Termination`) into [`StreamingEvent`]s delivered over
//! a channel.
//!
//! When a turn arrives unformatted, the session asks the service once to
//! format subsequent turns. Upstream errors mark the session inactive; there
//! is no automatic reconnect.

use crate::error::{Result, SamtaleError};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Configuration for a realtime streaming session.
#[derive(Debug, Clone)]
pub struct StreamingConfig {
    /// API key for the speech service.
    pub api_key: String,
    /// Websocket endpoint.
    pub endpoint: String,
    /// Audio sample rate in Hz.
    pub sample_rate: u32,
    /// Ask the service to format turns (punctuation, casing).
    pub format_turns: bool,
}

impl StreamingConfig {
    /// Build a config from the environment and the given parameters.
    ///
    /// A missing API key is an unrecoverable configuration error.
    pub fn from_env(endpoint: &str, sample_rate: u32, format_turns: bool) -> Result<Self> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                SamtaleError::Config(
                    "ASSEMBLYAI_API_KEY not set. Set it with: export ASSEMBLYAI_API_KEY='...'"
                        .to_string(),
                )
            })?;

        Ok(Self {
            api_key,
            endpoint: endpoint.to_string(),
            sample_rate,
            format_turns,
        })
    }

    fn session_url(&self) -> String {
        format!(
            "{}?sample_rate={}&format_turns={}",
            self.endpoint, self.sample_rate, self.format_turns
        )
    }
}

/// Lifecycle events of a streaming session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamingEvent {
    /// Session established.
    Begin { session_id: String },
    /// Partial (or completed) transcript for the current utterance.
    Turn {
        transcript: String,
        end_of_turn: bool,
        turn_is_formatted: bool,
    },
    /// Session ended by the service.
    Termination { audio_duration_seconds: f64 },
}

/// Wire messages received from the service.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WireMessage {
    Begin {
        id: String,
    },
    Turn {
        #[serde(default)]
        transcript: String,
        #[serde(default)]
        end_of_turn: bool,
        #[serde(default)]
        turn_is_formatted: bool,
    },
    Termination {
        #[serde(default)]
        audio_duration_seconds: f64,
    },
    #[serde(other)]
    Unknown,
}

impl WireMessage {
    fn into_event(self) -> Option<StreamingEvent> {
        match self {
            WireMessage::Begin { id } => Some(StreamingEvent::Begin { session_id: id }),
            WireMessage::Turn {
                transcript,
                end_of_turn,
                turn_is_formatted,
            } => Some(StreamingEvent::Turn {
                transcript,
                end_of_turn,
                turn_is_formatted,
            }),
            WireMessage::Termination {
                audio_duration_seconds,
            } => Some(StreamingEvent::Termination {
                audio_duration_seconds,
            }),
            WireMessage::Unknown => None,
        }
    }
}

/// An open realtime transcription session.
pub struct RealtimeSession {
    sink: Arc<Mutex<WsSink>>,
    events: mpsc::UnboundedReceiver<StreamingEvent>,
    active: Arc<AtomicBool>,
}

/// Cloneable handle for feeding audio into a session from another task.
#[derive(Clone)]
pub struct AudioSender {
    sink: Arc<Mutex<WsSink>>,
    active: Arc<AtomicBool>,
}

impl AudioSender {
    /// Whether the session is still live.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Send a frame of PCM16 mono audio.
    pub async fn send(&self, samples: &[i16]) -> Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Binary(pcm_to_bytes(samples)))
            .await
            .map_err(|e| SamtaleError::Streaming(format!("Audio send failed: {}", e)))
    }
}

impl RealtimeSession {
    /// Connect to the streaming service with api-key authentication.
    pub async fn connect(config: StreamingConfig) -> Result<Self> {
        let mut request = config
            .session_url()
            .into_client_request()
            .map_err(|e| SamtaleError::Streaming(format!("Invalid endpoint: {}", e)))?;
        request.headers_mut().insert(
            "Authorization",
            config.api_key.parse().map_err(|_| {
                SamtaleError::Streaming("API key is not a valid header value".to_string())
            })?,
        );

        let (ws, _) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| SamtaleError::Streaming(format!("Connection failed: {}", e)))?;

        info!("Streaming session connected ({} Hz)", config.sample_rate);

        let (sink, source) = ws.split();
        let sink = Arc::new(Mutex::new(sink));
        let active = Arc::new(AtomicBool::new(true));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(read_loop(
            source,
            sink.clone(),
            event_tx,
            active.clone(),
            config.format_turns,
        ));

        Ok(Self {
            sink,
            events: event_rx,
            active,
        })
    }

    /// Whether the session is still live.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// A handle for feeding audio from another task.
    pub fn audio_sender(&self) -> AudioSender {
        AudioSender {
            sink: self.sink.clone(),
            active: self.active.clone(),
        }
    }

    /// Send a frame of PCM16 mono audio.
    pub async fn send_audio(&self, samples: &[i16]) -> Result<()> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Binary(pcm_to_bytes(samples)))
            .await
            .map_err(|e| SamtaleError::Streaming(format!("Audio send failed: {}", e)))
    }

    /// Ask the service to (stop) formatting turns for the rest of the session.
    pub async fn set_formatted_turns(&self, format_turns: bool) -> Result<()> {
        let mut sink = self.sink.lock().await;
        send_format_request(&mut sink, format_turns).await
    }

    /// Receive the next lifecycle event, or `None` once the session is over.
    pub async fn next_event(&mut self) -> Option<StreamingEvent> {
        self.events.recv().await
    }

    /// Close the session, optionally telling the service to terminate and
    /// flush its final results first.
    pub async fn disconnect(self, terminate: bool) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        let mut sink = self.sink.lock().await;

        if terminate {
            let message = json!({ "type": "Terminate" }).to_string();
            if let Err(e) = sink.send(Message::Text(message)).await {
                warn!("Terminate message failed: {}", e);
            }
        }

        sink.close()
            .await
            .map_err(|e| SamtaleError::Streaming(format!("Close failed: {}", e)))
    }
}

async fn read_loop(
    mut source: WsSource,
    sink: Arc<Mutex<WsSink>>,
    events: mpsc::UnboundedSender<StreamingEvent>,
    active: Arc<AtomicBool>,
    format_turns: bool,
) {
    let mut formatting_requested = false;

    while let Some(message) = source.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                error!("Streaming error: {}", e);
                break;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let wire: WireMessage = match serde_json::from_str(&text) {
            Ok(wire) => wire,
            Err(e) => {
                warn!("Unparseable streaming message: {}", e);
                continue;
            }
        };

        if let WireMessage::Turn {
            turn_is_formatted: false,
            ..
        } = &wire
        {
            // The service sometimes drops formatting mid-session; ask once
            // to turn it back on.
            if format_turns && !formatting_requested {
                formatting_requested = true;
                let mut sink = sink.lock().await;
                if let Err(e) = send_format_request(&mut sink, true).await {
                    warn!("Formatted-turns request failed: {}", e);
                }
            }
        }

        let terminated = matches!(wire, WireMessage::Termination { .. });
        if let Some(event) = wire.into_event() {
            debug!("Streaming event: {:?}", event);
            if events.send(event).is_err() {
                break;
            }
        }
        if terminated {
            break;
        }
    }

    active.store(false, Ordering::SeqCst);
    info!("Streaming session closed");
}

async fn send_format_request(sink: &mut WsSink, format_turns: bool) -> Result<()> {
    let message = json!({
        "type": "UpdateConfiguration",
        "format_turns": format_turns,
    })
    .to_string();

    sink.send(Message::Text(message))
        .await
        .map_err(|e| SamtaleError::Streaming(format!("Configuration update failed: {}", e)))
}

/// Encode PCM16 samples as little-endian bytes.
fn pcm_to_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_message_turn() {
        let wire: WireMessage = serde_json::from_str(
            r#"{"type": "Turn", "transcript": "hello world", "end_of_turn": true, "turn_is_formatted": false}"#,
        )
        .unwrap();

        assert_eq!(
            wire.into_event(),
            Some(StreamingEvent::Turn {
                transcript: "hello world".to_string(),
                end_of_turn: true,
                turn_is_formatted: false,
            })
        );
    }

    #[test]
    fn test_wire_message_begin_and_termination() {
        let begin: WireMessage =
            serde_json::from_str(r#"{"type": "Begin", "id": "abc-123", "expires_at": 1}"#).unwrap();
        assert_eq!(
            begin.into_event(),
            Some(StreamingEvent::Begin {
                session_id: "abc-123".to_string()
            })
        );

        let term: WireMessage =
            serde_json::from_str(r#"{"type": "Termination", "audio_duration_seconds": 12.5}"#)
                .unwrap();
        assert_eq!(
            term.into_event(),
            Some(StreamingEvent::Termination {
                audio_duration_seconds: 12.5
            })
        );
    }

    #[test]
    fn test_unknown_wire_message_is_dropped() {
        let wire: WireMessage = serde_json::from_str(r#"{"type": "Heartbeat"}"#).unwrap();
        assert!(wire.into_event().is_none());
    }

    #[test]
    fn test_session_url() {
        let config = StreamingConfig {
            api_key: "key".to_string(),
            endpoint: "wss://streaming.example.com/v3/ws".to_string(),
            sample_rate: 16000,
            format_turns: true,
        };
        assert_eq!(
            config.session_url(),
            "wss://streaming.example.com/v3/ws?sample_rate=16000&format_turns=true"
        );
    }

    #[test]
    fn test_pcm_to_bytes_little_endian() {
        assert_eq!(pcm_to_bytes(&[1, -2]), vec![0x01, 0x00, 0xFE, 0xFF]);
    }
}
