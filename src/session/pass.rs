//! Recognition invoker.
//!
//! One function pair: `build_pass_config` resolves session policy into the
//! engine's per-invocation configuration, `run_pass` executes exactly one
//! blocking engine call and delivers the newly produced segments. Retry and
//! backoff are caller policy — nothing here ever calls the engine twice for
//! the same request.

use tracing::{debug, error};

use crate::error::{OratioError, Result};
use crate::inference::{DecodeParams, EngineHandle, PassConfig};
use crate::session::PartialCallback;
use crate::transcript::Segment;

/// Resolve session params, context policy, and vocabulary into the
/// configuration for one engine invocation.
///
/// `no_context` arrives already resolved by the session's two-phase policy;
/// everything else passes straight through. An empty vocabulary becomes
/// `None`, never `Some("")`.
pub(crate) fn build_pass_config(
    params: &DecodeParams,
    no_context: bool,
    vocabulary: &str,
) -> PassConfig {
    PassConfig {
        n_threads: params.n_threads,
        temperature: params.temperature,
        token_timestamps: params.token_timestamps,
        speed_up: params.speed_up,
        audio_ctx: params.audio_ctx,
        max_segment_len: params.max_segment_len,
        max_tokens: params.max_tokens,
        no_context,
        initial_prompt: if vocabulary.is_empty() {
            None
        } else {
            Some(vocabulary.to_owned())
        },
    }
}

/// Execute one blocking recognition call over `samples`.
///
/// Engine failures are converted to `RecognitionFailed` and surfaced, never
/// swallowed. The engine lock is released before any callback runs.
pub(crate) fn invoke(
    engine: &EngineHandle,
    config: &PassConfig,
    samples: &[f32],
) -> Result<Vec<Segment>> {
    debug_assert!(!samples.is_empty(), "empty passes are filtered by the caller");

    let result = {
        let mut engine = engine.0.lock();
        engine.recognize(samples, config)
    };

    match result {
        Ok(segments) => {
            debug!(
                samples = samples.len(),
                segments = segments.len(),
                no_context = config.no_context,
                has_prompt = config.initial_prompt.is_some(),
                "recognition pass completed"
            );
            Ok(segments)
        }
        Err(e) => {
            error!(samples = samples.len(), error = %e, "engine recognition call failed");
            Err(OratioError::RecognitionFailed(e.to_string()))
        }
    }
}

/// Run one pass and deliver its output: every new segment is appended to the
/// session transcript and reported through the partial callback, in segment
/// order, on the calling thread.
pub(crate) fn run_pass(
    engine: &EngineHandle,
    config: &PassConfig,
    samples: &[f32],
    transcript: &mut String,
    partial_cb: &mut Option<PartialCallback>,
) -> Result<usize> {
    let segments = invoke(engine, config, samples)?;

    for segment in &segments {
        transcript.push_str(&segment.text);
        if let Some(cb) = partial_cb.as_mut() {
            cb(&segment.text);
        }
    }

    Ok(segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_config_passes_params_through() {
        let params = DecodeParams {
            n_threads: 8,
            temperature: 0.4,
            token_timestamps: true,
            speed_up: true,
            audio_ctx: 768,
            max_segment_len: 60,
            max_tokens: 32,
            no_context: true,
        };

        let config = build_pass_config(&params, false, "");
        assert_eq!(config.n_threads, 8);
        assert_eq!(config.temperature, 0.4);
        assert!(config.token_timestamps);
        assert!(config.speed_up);
        assert_eq!(config.audio_ctx, 768);
        assert_eq!(config.max_segment_len, 60);
        assert_eq!(config.max_tokens, 32);
        // Resolved flag wins over the params field.
        assert!(!config.no_context);
    }

    #[test]
    fn empty_vocabulary_is_omitted_not_sent_as_empty_string() {
        let config = build_pass_config(&DecodeParams::default(), true, "");
        assert_eq!(config.initial_prompt, None);
    }

    #[test]
    fn vocabulary_is_attached_as_initial_prompt() {
        let config = build_pass_config(&DecodeParams::default(), true, "rustc, borrowck");
        assert_eq!(config.initial_prompt.as_deref(), Some("rustc, borrowck"));
    }
}
