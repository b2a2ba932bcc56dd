//! Pause-based utterance segmentation for streaming transcripts.
//!
//! The upstream speech service re-sends the full text of the current
//! utterance on every partial event, and its own end-of-turn signal is not
//! reliable. The segmenter therefore keeps only the latest partial and
//! treats a quiet period longer than the debounce duration as the end of an
//! utterance.
//!
//! State lives in a single actor task: one inbound event channel and one
//! re-armed sleep deadline, selected over in a loop. At most one deadline
//! exists at a time and only the actor touches it, so there is no timer
//! handle to race on.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default quiet period that ends an utterance.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(3);

/// Consumer invoked with each finalized utterance, from the actor context.
pub type UtteranceCallback = Box<dyn Fn(&str) + Send + Sync>;

enum Input {
    Transcript(String),
    Finish,
}

/// Cloneable handle for feeding partial transcripts into a segmenter.
#[derive(Clone)]
pub struct SegmenterInput {
    tx: mpsc::UnboundedSender<Input>,
}

impl SegmenterInput {
    /// Feed the latest partial transcript for the in-progress utterance.
    pub fn push_transcript(&self, text: &str) {
        let _ = self.tx.send(Input::Transcript(text.to_string()));
    }

    /// Signal session teardown; any pending text is flushed.
    pub fn finish(&self) {
        let _ = self.tx.send(Input::Finish);
    }
}

/// Turns a stream of partial transcript events into finalized utterances.
pub struct UtteranceSegmenter {
    input: SegmenterInput,
    utterances: mpsc::UnboundedReceiver<String>,
    task: Option<JoinHandle<()>>,
}

impl UtteranceSegmenter {
    /// Create a segmenter with the given debounce duration.
    pub fn new(pause_duration: Duration) -> Self {
        Self::spawn(pause_duration, None)
    }

    /// Create a segmenter that also invokes `callback` on each utterance.
    pub fn with_callback(pause_duration: Duration, callback: UtteranceCallback) -> Self {
        Self::spawn(pause_duration, Some(callback))
    }

    fn spawn(pause_duration: Duration, callback: Option<UtteranceCallback>) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (utterance_tx, utterance_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(input_rx, utterance_tx, pause_duration, callback));

        Self {
            input: SegmenterInput { tx: input_tx },
            utterances: utterance_rx,
            task: Some(task),
        }
    }

    /// A cloneable input handle for the event-delivery side.
    pub fn input(&self) -> SegmenterInput {
        self.input.clone()
    }

    /// Feed the latest partial transcript.
    pub fn push_transcript(&self, text: &str) {
        self.input.push_transcript(text);
    }

    /// Receive the next finalized utterance, waiting at most `timeout` when
    /// given. Returns `None` on timeout or after the segmenter has finished
    /// and drained.
    pub async fn next_utterance(&mut self, timeout: Option<Duration>) -> Option<String> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.utterances.recv())
                .await
                .ok()
                .flatten(),
            None => self.utterances.recv().await,
        }
    }

    /// Tear the session down, flushing any pending text first. Queued
    /// utterances remain consumable via [`next_utterance`].
    ///
    /// [`next_utterance`]: UtteranceSegmenter::next_utterance
    pub async fn finish(&mut self) {
        self.input.finish();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for UtteranceSegmenter {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

async fn run(
    mut events: mpsc::UnboundedReceiver<Input>,
    utterances: mpsc::UnboundedSender<String>,
    pause_duration: Duration,
    callback: Option<UtteranceCallback>,
) {
    // Single-slot accumulator: one in-progress utterance at a time.
    let mut accumulated = String::new();
    let mut deadline: Option<Instant> = None;

    loop {
        // Copy the deadline into the sleep future so the event arm below can
        // re-arm it freely.
        let armed = deadline;
        let pause = async move {
            match armed {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = events.recv() => match event {
                Some(Input::Transcript(text)) => {
                    if !text.trim().is_empty() {
                        // Latest wins: the service re-sends the cumulative
                        // text of the current utterance on each event.
                        accumulated = text;
                        deadline = Some(Instant::now() + pause_duration);
                    }
                }
                Some(Input::Finish) | None => {
                    flush(&mut accumulated, &utterances, &callback);
                    break;
                }
            },
            _ = pause => {
                debug!("Pause detected after {:?}", pause_duration);
                flush(&mut accumulated, &utterances, &callback);
                deadline = None;
            }
        }
    }
}

fn flush(
    accumulated: &mut String,
    utterances: &mpsc::UnboundedSender<String>,
    callback: &Option<UtteranceCallback>,
) {
    let text = accumulated.trim();
    if text.is_empty() {
        accumulated.clear();
        return;
    }

    info!("Finalized utterance: {}", text);
    let _ = utterances.send(text.to_string());
    if let Some(callback) = callback {
        callback(text);
    }
    accumulated.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const PAUSE: Duration = DEFAULT_PAUSE;
    const LONG: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_latest_wins_single_flush() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);

        segmenter.push_transcript("a");
        segmenter.push_transcript("ab");
        segmenter.push_transcript("abc");

        let utterance = segmenter.next_utterance(Some(LONG)).await;
        assert_eq!(utterance.as_deref(), Some("abc"));

        // No second emission after the flush.
        let next = segmenter.next_utterance(Some(Duration::from_secs(10))).await;
        assert_eq!(next, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_event_resets_deadline() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);

        segmenter.push_transcript("a");
        // Wait out 2s of the 3s window, then speak again.
        assert_eq!(segmenter.next_utterance(Some(Duration::from_secs(2))).await, None);
        segmenter.push_transcript("ab");

        // The original deadline (t=3s) passes without a flush because it was
        // re-armed at t=2s.
        assert_eq!(segmenter.next_utterance(Some(Duration::from_secs(2))).await, None);

        // The re-armed deadline (t=5s) fires.
        let utterance = segmenter.next_utterance(Some(LONG)).await;
        assert_eq!(utterance.as_deref(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_termination_flushes_pending_text_once() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);

        segmenter.push_transcript("unfinished thought");
        segmenter.finish().await;

        assert_eq!(
            segmenter.next_utterance(None).await.as_deref(),
            Some("unfinished thought")
        );
        // Exactly once: the channel is closed after the final flush.
        assert_eq!(segmenter.next_utterance(None).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_partials_never_emit() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);

        segmenter.push_transcript("");
        segmenter.push_transcript("   ");
        segmenter.finish().await;

        assert_eq!(segmenter.next_utterance(None).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_utterances_are_fifo() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);

        segmenter.push_transcript("first");
        assert_eq!(
            segmenter.next_utterance(Some(LONG)).await.as_deref(),
            Some("first")
        );

        segmenter.push_transcript("second");
        assert_eq!(
            segmenter.next_utterance(Some(LONG)).await.as_deref(),
            Some("second")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_receives_each_utterance() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut segmenter = UtteranceSegmenter::with_callback(
            PAUSE,
            Box::new(move |text| sink.lock().unwrap().push(text.to_string())),
        );

        segmenter.push_transcript("hello there");
        assert!(segmenter.next_utterance(Some(LONG)).await.is_some());

        assert_eq!(seen.lock().unwrap().as_slice(), ["hello there"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_handle_feeds_actor() {
        let mut segmenter = UtteranceSegmenter::new(PAUSE);
        let input = segmenter.input();

        input.push_transcript("via handle");
        input.finish();

        assert_eq!(
            segmenter.next_utterance(None).await.as_deref(),
            Some("via handle")
        );
    }
}
