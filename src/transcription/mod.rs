//! Transcription module for Samtale.
//!
//! Two paths into text:
//!
//! - **File**: one-shot transcription of a local audio file via the OpenAI
//!   Whisper API.
//! - **Streaming**: a realtime websocket session that emits partial
//!   transcript events, fed through an utterance segmenter that detects
//!   pauses and emits one finalized transcript per utterance.

mod segmenter;
mod stream;
mod whisper;

pub use segmenter::{SegmenterInput, UtteranceCallback, UtteranceSegmenter, DEFAULT_PAUSE};
pub use stream::{AudioSender, RealtimeSession, StreamingConfig, StreamingEvent};
pub use whisper::FileTranscriber;
