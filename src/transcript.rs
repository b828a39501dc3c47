//! Value types produced by recognition passes.
//!
//! These are the crate's outward-facing results: `Segment` for each newly
//! recognized span of speech, `FinalTranscript` for the exactly-once terminal
//! outcome of a streaming session. Both serialize as camelCase JSON so host
//! applications can forward them over IPC unchanged.

use serde::{Deserialize, Serialize};

/// A single recognized speech segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Recognized text, exactly as the engine emitted it (including any
    /// leading space the decoder produces between segments).
    pub text: String,
    /// Segment start time in milliseconds, when the engine provides timing.
    pub start_ms: Option<i64>,
    /// Segment end time in milliseconds, when the engine provides timing.
    pub end_ms: Option<i64>,
}

impl Segment {
    /// A segment carrying only text, no timing information.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_ms: None,
            end_ms: None,
        }
    }
}

/// Terminal outcome of a streaming session, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalTranscript {
    /// Everything recognized during the session, in emission order.
    /// May be partial when `error` is set.
    pub text: String,
    /// Set when a recognition pass failed before or during finalization.
    pub error: Option<String>,
}

impl FinalTranscript {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failed(text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: Some(error.into()),
        }
    }

    /// True when the session terminated because of a recognition failure.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_serializes_with_camel_case_fields() {
        let segment = Segment {
            text: " hello world".into(),
            start_ms: Some(0),
            end_ms: Some(1200),
        };

        let json = serde_json::to_value(&segment).expect("serialize segment");
        assert_eq!(json["text"], " hello world");
        assert_eq!(json["startMs"], 0);
        assert_eq!(json["endMs"], 1200);

        let round_trip: Segment = serde_json::from_value(json).expect("deserialize segment");
        assert_eq!(round_trip, segment);
    }

    #[test]
    fn text_only_segment_has_no_timing() {
        let segment = Segment::text_only("hi");
        assert_eq!(segment.text, "hi");
        assert!(segment.start_ms.is_none());
        assert!(segment.end_ms.is_none());

        let json = serde_json::to_value(&segment).expect("serialize segment");
        assert_eq!(json["startMs"], serde_json::Value::Null);
    }

    #[test]
    fn final_transcript_error_round_trips() {
        let outcome = FinalTranscript::failed("so far", "decoder exploded");
        assert!(outcome.is_err());

        let json = serde_json::to_value(&outcome).expect("serialize final transcript");
        assert_eq!(json["text"], "so far");
        assert_eq!(json["error"], "decoder exploded");

        let round_trip: FinalTranscript =
            serde_json::from_value(json).expect("deserialize final transcript");
        assert_eq!(round_trip, outcome);
    }

    #[test]
    fn successful_final_transcript_is_not_err() {
        let outcome = FinalTranscript::ok("done");
        assert!(!outcome.is_err());
        assert_eq!(outcome.error, None);
    }
}
