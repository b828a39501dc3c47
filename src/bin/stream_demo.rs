//! Feed a few seconds of synthetic audio through a streaming session backed
//! by the stub engine and print what comes out. Useful as a smoke test of
//! the session machinery without any model files.

use std::sync::Arc;

use parking_lot::Mutex;

use oratio_core::{DecodeParams, EngineHandle, FinalTranscript, StubEngine, Transcriber};

fn main() {
    if let Err(e) = run() {
        eprintln!("stream demo failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut transcriber = Transcriber::new();
    transcriber.initialize(EngineHandle::new(StubEngine::new()))?;
    transcriber.set_vocabulary("oratio, transcriber");

    let final_out: Arc<Mutex<Option<FinalTranscript>>> = Arc::new(Mutex::new(None));
    let final_sink = Arc::clone(&final_out);

    transcriber.start_stream(
        DecodeParams::default(),
        Box::new(|text| println!("partial: {text}")),
        Box::new(move |outcome| *final_sink.lock() = Some(outcome)),
    )?;

    // Three one-second chunks of a 440 Hz tone at 16 kHz.
    for _ in 0..3 {
        let chunk: Vec<f32> = (0..16_000)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 16_000.0).sin() * 0.3)
            .collect();
        transcriber.feed_audio(&chunk)?;
    }

    transcriber.finish_stream()?;

    let taken = final_out.lock().take();
    match taken {
        Some(outcome) if !outcome.is_err() => {
            println!("final:   {}", outcome.text);
            Ok(())
        }
        Some(outcome) => Err(format!("session failed: {:?}", outcome.error).into()),
        None => Err("final callback never fired".into()),
    }
}
