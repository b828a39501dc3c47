//! `Transcriber` — session lifecycle controller.
//!
//! ## Streaming lifecycle
//!
//! ```text
//! Transcriber::new()
//!     └─► initialize(engine)     → engine handle attached
//!         └─► start_stream()     → Idle → Active, buffer/transcript reset
//!             └─► feed_audio()*  → buffer chunk, run pass, emit partials
//!                 └─► finish_stream() → Active → Finishing → Idle,
//!                                       final transcript delivered once
//! ```
//!
//! Calls are serialised by `&mut self`: the caller is the single logical
//! writer, typically funnelling an audio-capture thread and a control thread
//! through one owner. Both callbacks fire synchronously inside
//! `feed_audio`/`finish_stream` — a slow callback stalls the calling thread,
//! which is the intended trade-off, not an accident.
//!
//! ## Context carryover
//!
//! The first pass of a session honors the caller's `no_context` preference
//! (start fresh, or continue from an earlier unrelated call). Every later
//! pass in the same session forces context-carry on, because the chunks
//! belong to one conversation. The engine's own decoder state persisting
//! across calls on the same handle is what makes this work.

pub(crate) mod pass;

use tracing::{debug, error, info};

use crate::error::{OratioError, Result};
use crate::inference::{DecodeParams, EngineHandle};
use crate::transcript::{FinalTranscript, Segment};

/// Invoked synchronously for each newly recognized segment during a session.
pub type PartialCallback = Box<dyn FnMut(&str) + Send>;

/// Invoked synchronously exactly once per session, with the accumulated
/// transcript and, on failure paths, an error.
pub type FinalCallback = Box<dyn FnOnce(FinalTranscript) + Send>;

/// Streaming session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// No session running. Initial and terminal state.
    Idle,
    /// Between `start_stream` and `finish_stream` (or a mid-stream failure).
    Active,
    /// Transient, inside `finish_stream` only.
    Finishing,
}

/// Speech-to-text front end: one-shot transcription plus the streaming
/// session state machine, over a borrowed recognition engine.
///
/// At most one session is Active per `Transcriber` (and therefore per engine
/// handle it wraps); `start_stream` refuses to stack sessions.
pub struct Transcriber {
    /// Borrowed engine; `None` until `initialize` is called.
    engine: Option<EngineHandle>,
    /// Persistent vocabulary prompt. Independent of session params, read at
    /// every invocation. Empty means "no prompt".
    vocabulary: String,
    state: StreamState,
    /// Samples accumulated since the last recognition pass. Non-empty only
    /// between a `feed_audio` call and the pass it triggers.
    audio_buffer: Vec<f32>,
    /// Full text recognized in the current session. Append-only until the
    /// session ends.
    transcript: String,
    /// Processing configuration for the current session.
    params: DecodeParams,
    /// Engine invocations performed in the current session. Drives the
    /// two-phase context policy.
    passes_run: usize,
    partial_cb: Option<PartialCallback>,
    final_cb: Option<FinalCallback>,
}

impl Default for Transcriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber {
    /// Create a transcriber with no engine attached. Every recognition entry
    /// point fails with `NotInitialized` until `initialize` is called.
    pub fn new() -> Self {
        Self {
            engine: None,
            vocabulary: String::new(),
            state: StreamState::Idle,
            audio_buffer: Vec::new(),
            transcript: String::new(),
            params: DecodeParams::default(),
            passes_run: 0,
            partial_cb: None,
            final_cb: None,
        }
    }

    /// Attach (or replace) the recognition engine.
    ///
    /// # Errors
    /// `AlreadyActive` if a streaming session is running — swapping the
    /// engine mid-session would discard the decoder context the session
    /// depends on.
    pub fn initialize(&mut self, engine: EngineHandle) -> Result<()> {
        if self.state != StreamState::Idle {
            return Err(OratioError::AlreadyActive);
        }
        info!("recognition engine attached");
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Set the persistent vocabulary prompt. An empty string clears it; the
    /// invoker then omits the prompt entirely rather than sending `""`.
    pub fn set_vocabulary(&mut self, vocabulary: &str) {
        debug!(chars = vocabulary.len(), "vocabulary prompt updated");
        self.vocabulary = vocabulary.to_owned();
    }

    pub fn vocabulary(&self) -> &str {
        &self.vocabulary
    }

    /// True while a streaming session is Active.
    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Active
    }

    /// Samples currently buffered and not yet run through the engine.
    pub fn buffered_samples(&self) -> usize {
        self.audio_buffer.len()
    }

    // ── One-shot transcription ───────────────────────────────────────────

    /// Transcribe a complete clip with default parameters, returning the
    /// concatenated text.
    pub fn transcribe(&mut self, samples: &[f32]) -> Result<String> {
        let segments = self.transcribe_with_params(samples, &DecodeParams::default())?;
        Ok(segments.iter().map(|s| s.text.as_str()).collect())
    }

    /// Transcribe a complete clip: a single blocking recognition pass, no
    /// session state. `params.no_context` is honored verbatim.
    ///
    /// # Errors
    /// - `NotInitialized` without an engine.
    /// - `EmptyAudio` for zero samples.
    /// - `AlreadyActive` while a streaming session runs (a one-shot call
    ///   would clobber the session's decoder context).
    /// - `RecognitionFailed` when the engine call fails.
    pub fn transcribe_with_params(
        &mut self,
        samples: &[f32],
        params: &DecodeParams,
    ) -> Result<Vec<Segment>> {
        if self.state != StreamState::Idle {
            return Err(OratioError::AlreadyActive);
        }
        let engine = self.engine.clone().ok_or(OratioError::NotInitialized)?;
        if samples.is_empty() {
            return Err(OratioError::EmptyAudio);
        }

        let config = pass::build_pass_config(params, params.no_context, &self.vocabulary);
        pass::invoke(&engine, &config, samples)
    }

    // ── Streaming session ────────────────────────────────────────────────

    /// Begin a streaming session.
    ///
    /// Resets the audio buffer and transcript, stores `params` and the two
    /// callbacks, and transitions to Active. No audio is processed yet.
    ///
    /// # Errors
    /// - `NotInitialized` without an engine.
    /// - `AlreadyActive` if a session is running; the running session's
    ///   buffer, transcript, and callbacks are left untouched.
    pub fn start_stream(
        &mut self,
        params: DecodeParams,
        partial_cb: PartialCallback,
        final_cb: FinalCallback,
    ) -> Result<()> {
        if self.engine.is_none() {
            return Err(OratioError::NotInitialized);
        }
        if self.state != StreamState::Idle {
            return Err(OratioError::AlreadyActive);
        }

        self.audio_buffer.clear();
        self.transcript.clear();
        self.passes_run = 0;
        self.params = params;
        self.partial_cb = Some(partial_cb);
        self.final_cb = Some(final_cb);
        self.state = StreamState::Active;

        info!(
            no_context = self.params.no_context,
            has_vocabulary = !self.vocabulary.is_empty(),
            "streaming session started"
        );
        Ok(())
    }

    /// Feed one chunk of captured audio into the active session.
    ///
    /// An empty chunk is a no-op: no pass, no buffer change, no callbacks.
    /// Otherwise the chunk is appended to the buffer and the whole buffer is
    /// run through the engine; the buffer is empty again when this returns,
    /// whether the pass succeeded or not. New segments are reported through
    /// the partial callback before this returns.
    ///
    /// # Errors
    /// - `StreamNotActive` outside an Active session.
    /// - `RecognitionFailed` when the engine call fails. This terminates the
    ///   session: state returns to Idle and the final callback fires once
    ///   with the text accumulated so far plus the error.
    pub fn feed_audio(&mut self, chunk: &[f32]) -> Result<()> {
        if self.state != StreamState::Active {
            return Err(OratioError::StreamNotActive);
        }
        if chunk.is_empty() {
            debug!("empty audio chunk ignored");
            return Ok(());
        }
        // Active implies an engine was present at start_stream.
        let engine = self.engine.clone().ok_or(OratioError::NotInitialized)?;

        self.audio_buffer.extend_from_slice(chunk);

        let config =
            pass::build_pass_config(&self.params, self.resolve_no_context(), &self.vocabulary);
        // Whole-buffer reprocessing: the pass consumes everything accumulated
        // so far, and the buffer is left empty on both outcomes.
        let samples = std::mem::take(&mut self.audio_buffer);
        self.passes_run += 1;

        match pass::run_pass(
            &engine,
            &config,
            &samples,
            &mut self.transcript,
            &mut self.partial_cb,
        ) {
            Ok(segments) => {
                debug!(
                    fed = chunk.len(),
                    processed = samples.len(),
                    segments,
                    transcript_chars = self.transcript.len(),
                    "audio chunk processed"
                );
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "recognition failed mid-stream, terminating session");
                self.deliver_final(Some(&e));
                Err(e)
            }
        }
    }

    /// End the active session.
    ///
    /// Runs one last pass if any audio remains buffered, then delivers the
    /// full accumulated transcript through the final callback (exactly once,
    /// on every path), clears all session state, and returns to Idle.
    ///
    /// # Errors
    /// - `StreamNotActive` outside an Active session.
    /// - `RecognitionFailed` when the terminal pass fails; the final
    ///   callback still fires, carrying the text accumulated so far and the
    ///   error.
    pub fn finish_stream(&mut self) -> Result<()> {
        if self.state != StreamState::Active {
            return Err(OratioError::StreamNotActive);
        }
        // Active implies an engine was present at start_stream.
        let engine = self.engine.clone().ok_or(OratioError::NotInitialized)?;
        self.state = StreamState::Finishing;

        let mut pass_error = None;
        if !self.audio_buffer.is_empty() {
            let config =
                pass::build_pass_config(&self.params, self.resolve_no_context(), &self.vocabulary);
            let samples = std::mem::take(&mut self.audio_buffer);
            self.passes_run += 1;

            if let Err(e) = pass::run_pass(
                &engine,
                &config,
                &samples,
                &mut self.transcript,
                &mut self.partial_cb,
            ) {
                error!(error = %e, "recognition failed during finalization");
                pass_error = Some(e);
            }
        }

        self.deliver_final(pass_error.as_ref());

        match pass_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    /// Two-phase context policy: pass 1 honors the caller's preference,
    /// passes 2..N always carry context forward.
    fn resolve_no_context(&self) -> bool {
        if self.passes_run == 0 {
            self.params.no_context
        } else {
            false
        }
    }

    /// Tear down the session and fire the final callback exactly once.
    ///
    /// The `FnOnce` callback is `take`n out of the session before invocation,
    /// so a second delivery is impossible by construction.
    fn deliver_final(&mut self, error: Option<&OratioError>) {
        let text = std::mem::take(&mut self.transcript);
        let final_cb = self.final_cb.take();

        self.audio_buffer.clear();
        self.partial_cb = None;
        self.passes_run = 0;
        self.state = StreamState::Idle;

        info!(
            transcript_chars = text.len(),
            failed = error.is_some(),
            "streaming session ended"
        );

        if let Some(cb) = final_cb {
            let outcome = match error {
                None => FinalTranscript::ok(text),
                Some(e) => FinalTranscript::failed(text, e.to_string()),
            };
            cb(outcome);
        }
    }
}

impl std::fmt::Debug for Transcriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriber")
            .field("initialized", &self.engine.is_some())
            .field("state", &self.state)
            .field("buffered_samples", &self.audio_buffer.len())
            .field("transcript_chars", &self.transcript.len())
            .finish_non_exhaustive()
    }
}
