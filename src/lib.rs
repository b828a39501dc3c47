//! # oratio-core
//!
//! Streaming speech-to-text session core.
//!
//! ## Architecture
//!
//! ```text
//! capture source → Transcriber::feed_audio(chunk)
//!                      │ append to audio buffer
//!                      ▼
//!                recognition pass (whole buffer, buffer cleared after)
//!                      │ RecognitionEngine::recognize
//!                      ▼
//!            new segments → partial callback + accumulated transcript
//!                      ⋮
//!                Transcriber::finish_stream()
//!                      └─► final callback (exactly once)
//! ```
//!
//! The recognition engine itself is a black box behind [`RecognitionEngine`]:
//! model loading, decoding, and hardware placement live on the other side of
//! that trait. Audio arrives as mono f32 PCM at the engine's fixed rate;
//! capture and resampling are the caller's problem.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod inference;
pub mod session;
pub mod transcript;

// Convenience re-exports for downstream crates
pub use error::OratioError;
pub use inference::{stub::StubEngine, DecodeParams, EngineHandle, PassConfig, RecognitionEngine};
pub use session::{FinalCallback, PartialCallback, Transcriber};
pub use transcript::{FinalTranscript, Segment};
