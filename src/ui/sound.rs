/// Sound engine: short procedural effects via rodio.
///
/// Every effect is synthesized into an in-memory WAV buffer once, at
/// startup. Playback is fire-and-forget through a detached Sink.
///
/// Build without the "sound" feature to drop rodio; the stub engine
/// below then ignores every event.

use crate::sim::event::GameEvent;

#[cfg(any(feature = "sound", test))]
const SAMPLE_RATE: u32 = 22050;

/// Which effect (if any) an event triggers.
#[cfg(any(feature = "sound", test))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Start,
    Food,
    Crash,
    HighScore,
}

#[cfg(any(feature = "sound", test))]
impl Sfx {
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::Started => Some(Sfx::Start),
            GameEvent::FoodEaten { .. } => Some(Sfx::Food),
            GameEvent::Crashed { .. } => Some(Sfx::Crash),
            GameEvent::NewHighScore { .. } => Some(Sfx::HighScore),
            GameEvent::FoodOnSnake { .. } => None,
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{make_wav, synth, Sfx};
    use crate::sim::event::GameEvent;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_start: Arc<Vec<u8>>,
        sfx_food: Arc<Vec<u8>>,
        sfx_crash: Arc<Vec<u8>>,
        sfx_high_score: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// None when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_start: Arc::new(make_wav(&synth(Sfx::Start))),
                sfx_food: Arc::new(make_wav(&synth(Sfx::Food))),
                sfx_crash: Arc::new(make_wav(&synth(Sfx::Crash))),
                sfx_high_score: Arc::new(make_wav(&synth(Sfx::HighScore))),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_start(&self) { self.play(&self.sfx_start); }
        pub fn play_food(&self) { self.play(&self.sfx_food); }
        pub fn play_crash(&self) { self.play(&self.sfx_crash); }
        pub fn play_high_score(&self) { self.play(&self.sfx_high_score); }

        pub fn on_event(&self, event: &GameEvent) {
            match Sfx::for_event(event) {
                Some(Sfx::Start) => self.play_start(),
                Some(Sfx::Food) => self.play_food(),
                Some(Sfx::Crash) => self.play_crash(),
                Some(Sfx::HighScore) => self.play_high_score(),
                None => {}
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveforms (mono f32 samples)
// ════════════════════════════════════════════════════════════

/// Sine sweep from `f0` to `f1` Hz with a linear fade-out.
/// `bright` mixes in the 3rd harmonic for a squarer tone.
#[cfg(any(feature = "sound", test))]
fn sweep(f0: f32, f1: f32, duration: f32, volume: f32, bright: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = f0 + (f1 - f0) * t;
            phase += freq / SAMPLE_RATE as f32;
            let p = phase * std::f32::consts::TAU;
            let wave = p.sin() * (1.0 - bright) + (p * 3.0).sin() * bright;
            wave * (1.0 - t) * volume
        })
        .collect()
}

#[cfg(any(feature = "sound", test))]
fn synth(sfx: Sfx) -> Vec<f32> {
    match sfx {
        // Two rising notes: G4 then D5
        Sfx::Start => {
            let mut s = sweep(392.0, 392.0, 0.07, 0.25, 0.2);
            s.extend(sweep(587.0, 587.0, 0.11, 0.25, 0.2));
            s
        }
        // Quick upward chirp
        Sfx::Food => sweep(660.0, 1320.0, 0.06, 0.22, 0.3),
        // Noisy downward thud
        Sfx::Crash => {
            let tone = sweep(300.0, 60.0, 0.35, 0.35, 0.0);
            let mut rng: u32 = 0x2545_f491;
            let n = tone.len();
            tone.into_iter()
                .enumerate()
                .map(|(i, v)| {
                    rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                    let noise = (rng >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
                    let env = 1.0 - i as f32 / n as f32;
                    v * 0.6 + noise * env * 0.15
                })
                .collect()
        }
        // C5 E5 G5 C6 arpeggio
        Sfx::HighScore => [523.0_f32, 659.0, 784.0, 1047.0]
            .iter()
            .flat_map(|&f| sweep(f, f, 0.08, 0.25, 0.25))
            .collect(),
    }
}

/// Wrap f32 samples in a 16-bit PCM mono WAV container.
#[cfg(any(feature = "sound", test))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (bits_per_sample as u32) / 8;
    let block_align = bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&1u16.to_le_bytes()); // mono
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn on_event(&self, _event: &GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::CollisionKind;

    #[test]
    fn events_pick_their_effect() {
        assert_eq!(Sfx::for_event(&GameEvent::Started), Some(Sfx::Start));
        assert_eq!(
            Sfx::for_event(&GameEvent::Crashed { kind: CollisionKind::Wall, score: 0 }),
            Some(Sfx::Crash)
        );
        assert_eq!(Sfx::for_event(&GameEvent::FoodOnSnake { x: 0, y: 0 }), None);
    }

    #[test]
    fn wav_header_matches_payload() {
        let samples = synth(Sfx::Food);
        let wav = make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size as usize, samples.len() * 2);
    }

    #[test]
    fn effects_stay_in_range() {
        for sfx in [Sfx::Start, Sfx::Food, Sfx::Crash, Sfx::HighScore] {
            let s = synth(sfx);
            assert!(!s.is_empty());
            assert!(s.iter().all(|v| v.abs() <= 1.0));
        }
    }
}
