//! The feed's notification chime, synthesized once at startup and served
//! as a static asset. Playback is cosmetic: anything that goes wrong on
//! the client side is simply ignored.

const SAMPLE_RATE: u32 = 44_100;
const FREQ_HZ: f64 = 880.0;
const DURATION_SECS: f64 = 0.35;
const ATTACK_SECS: f64 = 0.010;
const DECAY_RATE: f64 = 9.0;
const AMPLITUDE: f64 = 0.8;

/// A short sine chime with a linear attack and exponential decay,
/// encoded as 16-bit mono PCM WAV.
pub fn alert_tone_wav() -> Vec<u8> {
    let n_samples = (SAMPLE_RATE as f64 * DURATION_SECS) as usize;
    let data_len = (n_samples * 2) as u32;

    let mut wav = Vec::with_capacity(44 + n_samples * 2);

    // RIFF/WAVE header for 16-bit mono PCM.
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());

    for i in 0..n_samples {
        let t = i as f64 / SAMPLE_RATE as f64;
        let envelope = if t < ATTACK_SECS {
            t / ATTACK_SECS
        } else {
            (-(t - ATTACK_SECS) * DECAY_RATE).exp()
        };
        let value = (std::f64::consts::TAU * FREQ_HZ * t).sin() * envelope * AMPLITUDE;
        let sample = (value * i16::MAX as f64) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}
