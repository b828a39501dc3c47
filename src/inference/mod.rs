//! Recognition engine abstraction.
//!
//! The `RecognitionEngine` trait decouples the session core from any specific
//! backend (stub echo, whisper.cpp, ONNX Whisper, a remote service, etc.).
//!
//! `&mut self` on `recognize` intentionally expresses that decoders are
//! stateful — the engine keeps its own context across calls on the same
//! handle, which is exactly what the session's context-carry policy relies
//! on. All mutation is serialised through `EngineHandle`'s
//! `parking_lot::Mutex`.

pub mod stub;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::transcript::Segment;

/// Contract for speech recognition backends.
///
/// One call = one blocking recognition pass over `samples`. The engine owns
/// model loading, decoding, and hardware placement; callers only see ordered
/// text segments. Errors are opaque — the session core converts them to
/// [`OratioError::RecognitionFailed`](crate::error::OratioError) and never
/// retries on its own.
pub trait RecognitionEngine: Send + 'static {
    /// Recognize mono f32 PCM samples (engine-mandated rate, e.g. 16 kHz).
    ///
    /// Returns the segments produced by this pass, in order. May be empty
    /// (e.g. silence). Callers guarantee `samples` is non-empty.
    fn recognize(&mut self, samples: &[f32], config: &PassConfig) -> anyhow::Result<Vec<Segment>>;
}

/// Thread-safe reference-counted handle to any `RecognitionEngine` implementor.
///
/// The handle is shared between the engine's owner and the session that
/// borrows it for the session's duration; `parking_lot::Mutex` keeps the
/// lock non-poisoning on panic.
#[derive(Clone)]
pub struct EngineHandle(pub Arc<Mutex<dyn RecognitionEngine>>);

impl EngineHandle {
    /// Wrap any `RecognitionEngine` in an `EngineHandle`.
    pub fn new<E: RecognitionEngine>(engine: E) -> Self {
        Self(Arc::new(Mutex::new(engine)))
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle").finish_non_exhaustive()
    }
}

/// Per-session processing configuration.
///
/// Fixed for the lifetime of one streaming session; a new session may use
/// different values. `0` means "engine default / unlimited" for the capacity
/// fields, matching common decoder conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeParams {
    /// Decoder thread count.
    pub n_threads: usize,
    /// Sampling temperature (0.0 = deterministic greedy).
    pub temperature: f32,
    /// Request token-level timestamps from the engine.
    pub token_timestamps: bool,
    /// Trade accuracy for speed (engine-specific fast path).
    pub speed_up: bool,
    /// Audio context size (0 = full context).
    pub audio_ctx: usize,
    /// Maximum segment length in characters (0 = unlimited).
    pub max_segment_len: usize,
    /// Maximum tokens per segment (0 = unlimited).
    pub max_tokens: usize,
    /// Start without pre-existing decoder context.
    ///
    /// Honored verbatim for one-shot transcription and for the *first* pass
    /// of a streaming session; later passes in the same session always carry
    /// context forward regardless of this flag.
    pub no_context: bool,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            n_threads: 4,
            temperature: 0.0,
            token_timestamps: false,
            speed_up: false,
            audio_ctx: 0,
            max_segment_len: 0,
            max_tokens: 0,
            no_context: true,
        }
    }
}

/// Fully resolved configuration for a single recognition pass.
///
/// Built by the invoker from [`DecodeParams`] plus session state: `no_context`
/// is the outcome of the two-phase context policy, and `initial_prompt` is
/// the vocabulary prompt — `None` when no vocabulary is set. An empty
/// vocabulary must never arrive here as `Some("")`; engines may treat a
/// zero-length prompt differently from "no prompt".
#[derive(Debug, Clone, PartialEq)]
pub struct PassConfig {
    pub n_threads: usize,
    pub temperature: f32,
    pub token_timestamps: bool,
    pub speed_up: bool,
    pub audio_ctx: usize,
    pub max_segment_len: usize,
    pub max_tokens: usize,
    pub no_context: bool,
    pub initial_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_params_defaults_match_engine_conventions() {
        let params = DecodeParams::default();
        assert_eq!(params.n_threads, 4);
        assert_eq!(params.temperature, 0.0);
        assert!(!params.token_timestamps);
        assert!(!params.speed_up);
        assert_eq!(params.audio_ctx, 0);
        assert_eq!(params.max_segment_len, 0);
        assert_eq!(params.max_tokens, 0);
        assert!(params.no_context);
    }

    #[test]
    fn decode_params_deserializes_missing_fields_to_defaults() {
        let params: DecodeParams =
            serde_json::from_str(r#"{"nThreads": 8, "noContext": false}"#)
                .expect("deserialize decode params");
        assert_eq!(params.n_threads, 8);
        assert!(!params.no_context);
        assert_eq!(params.temperature, 0.0);
        assert_eq!(params.max_tokens, 0);
    }
}
