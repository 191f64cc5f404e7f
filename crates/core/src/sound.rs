//! Audio cue descriptions.
//!
//! The server never plays audio. It tells the page which cue fired and
//! what tone to synthesize for it; the page owns the oscillator.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Bid,
    Step,
    Proof,
    Reward,
    /// Manual "test sound" button.
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub waveform: Waveform,
}

impl SoundCue {
    pub fn tone(self) -> Tone {
        let (frequency_hz, duration_ms, waveform) = match self {
            SoundCue::Bid => (440, 120, Waveform::Square),
            SoundCue::Step => (660, 40, Waveform::Sine),
            SoundCue::Proof => (520, 200, Waveform::Triangle),
            SoundCue::Reward => (880, 350, Waveform::Sine),
            SoundCue::Test => (440, 250, Waveform::Sine),
        };
        Tone {
            frequency_hz,
            duration_ms,
            waveform,
        }
    }
}
