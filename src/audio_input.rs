// Band-limited sample rate conversion of a WAV file with `dasp`'s sinc
// interpolator. Channels are converted independently and interleaved again.

use std::path::Path;

use dasp::{interpolate::sinc::Sinc, ring_buffer, signal, Sample, Signal};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{Error, Result};

const SINC_TAPS: usize = 100;

/// Sample rate of a WAV file, read from its header.
pub fn wav_sample_rate(path: &Path) -> Result<u32> {
    Ok(WavReader::open(path)?.spec().sample_rate)
}

/// Converts `input` to `target_hz` and writes it to `output` with the same
/// channel count and sample format.
pub fn resample_wav(input: &Path, output: &Path, target_hz: u32) -> Result<()> {
    if target_hz == 0 {
        return Err(Error::audio(input, "target sample rate is 0"));
    }
    let mut reader = WavReader::open(input)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(Error::audio(input, "no channels"));
    }

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(i16::to_sample::<f64>))
            .collect::<std::result::Result<Vec<f64>, hound::Error>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f32::to_sample::<f64>))
            .collect::<std::result::Result<Vec<f64>, hound::Error>>()?,
        (format, bits) => {
            return Err(Error::audio(
                input,
                format!("{:?} samples of {} bits", format, bits),
            ))
        }
    };

    let from_hz = spec.sample_rate as f64;
    let to_hz = target_hz as f64;
    let converted: Vec<Vec<f64>> = (0..channels)
        .map(|c| {
            let channel: Vec<f64> = interleaved.iter().skip(c).step_by(channels).copied().collect();
            resample_channel(&channel, from_hz, to_hz)
        })
        .collect();
    let frames = converted.iter().map(Vec::len).min().unwrap_or(0);

    let out_spec = WavSpec {
        sample_rate: target_hz,
        ..spec
    };
    let mut writer = WavWriter::create(output, out_spec)?;
    for i in 0..frames {
        for channel in &converted {
            match spec.sample_format {
                SampleFormat::Int => writer.write_sample(channel[i].to_sample::<i16>())?,
                SampleFormat::Float => writer.write_sample(channel[i].to_sample::<f32>())?,
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

fn resample_channel(samples: &[f64], from_hz: f64, to_hz: f64) -> Vec<f64> {
    let signal = signal::from_iter(samples.iter().map(|&s| [s]));

    let ring_buffer = ring_buffer::Fixed::from([[0.0]; SINC_TAPS]);
    let sinc = Sinc::new(ring_buffer);

    signal
        .from_hz_to_hz(sinc, from_hz, to_hz)
        .until_exhausted()
        .map(|frame| frame[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_sine(path: &Path, spec: WavSpec, seconds: f64) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        let frames = (spec.sample_rate as f64 * seconds) as usize;
        for i in 0..frames {
            let t = i as f64 / spec.sample_rate as f64;
            let v = (t * 440.0 * std::f64::consts::TAU).sin() * 0.5;
            for _ in 0..spec.channels {
                match spec.sample_format {
                    SampleFormat::Int => writer.write_sample(v.to_sample::<i16>()).unwrap(),
                    SampleFormat::Float => writer.write_sample(v as f32).unwrap(),
                }
            }
        }
        writer.finalize().unwrap();
    }

    fn int16(channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_upsample_mono() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_sine(&input, int16(1, 16000), 0.5);

        resample_wav(&input, &output, 22050).unwrap();

        let reader = WavReader::open(&output).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        let expected = 22050 / 2;
        let len = reader.len() as i64;
        assert!((len - expected).abs() < 200, "got {} samples", len);
    }

    #[test]
    fn test_stereo_float_keeps_layout() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 24000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        write_sine(&input, spec, 0.25);

        resample_wav(&input, &output, 16000).unwrap();

        let reader = WavReader::open(&output).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_format, SampleFormat::Float);
        assert_eq!(reader.len() % 2, 0);
        assert_eq!(wav_sample_rate(&output).unwrap(), 16000);
    }

    #[test]
    fn test_rejects_zero_target_rate() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_sine(&input, int16(1, 16000), 0.1);

        let result = resample_wav(&input, &output, 0);

        assert!(matches!(result, Err(Error::Audio { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_rejects_24_bit() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&input, spec).unwrap();
        writer.write_sample(0i32).unwrap();
        writer.finalize().unwrap();

        let result = resample_wav(&input, &dir.path().join("out.wav"), 22050);
        assert!(matches!(result, Err(Error::Audio { .. })));
    }
}
