// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use crate::error::AudioProbeError;

/// What the feed needs to know about an audio file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    /// File size in bytes
    pub size: u64,
    /// Playback length in seconds
    pub duration_secs: f64,
}

/// Audio file inspection abstraction for testability
pub trait AudioProbe: Send + Sync {
    /// Read the size and playback duration of the file at `path`
    fn probe(&self, path: &Path) -> Result<AudioInfo, AudioProbeError>;
}

/// Default probe implementation using symphonia's container readers
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaProbe;

impl SymphoniaProbe {
    pub fn new() -> Self {
        Self
    }
}

impl AudioProbe for SymphoniaProbe {
    fn probe(&self, path: &Path) -> Result<AudioInfo, AudioProbeError> {
        let file = File::open(path).map_err(|e| AudioProbeError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let size = file
            .metadata()
            .map_err(|e| AudioProbeError::OpenFailed {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioProbeError::Undecodable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut reader = probed.format;
        let duration_secs = track_duration(reader.as_mut(), path)?;

        debug!(
            "Probed {}: {} bytes, {} seconds",
            path.display(),
            size,
            duration_secs
        );

        Ok(AudioInfo {
            size,
            duration_secs,
        })
    }
}

/// Duration of the first audio track. Uses the declared frame count when
/// the container has one, otherwise sums the packet durations.
fn track_duration(reader: &mut dyn FormatReader, path: &Path) -> Result<f64, AudioProbeError> {
    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioProbeError::NoAudioTrack {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let params = track.codec_params.clone();

    let time_base = params
        .time_base
        .or_else(|| params.sample_rate.map(|rate| TimeBase::new(1, rate)))
        .ok_or_else(|| AudioProbeError::UnknownDuration {
            path: path.to_path_buf(),
        })?;

    let frames = match params.n_frames {
        Some(n_frames) => n_frames,
        None => count_frames(reader, track_id, path)?,
    };

    let time = time_base.calc_time(frames);
    Ok(time.seconds as f64 + time.frac)
}

fn count_frames(
    reader: &mut dyn FormatReader,
    track_id: u32,
    path: &Path,
) -> Result<u64, AudioProbeError> {
    let mut frames = 0u64;

    loop {
        match reader.next_packet() {
            Ok(packet) => {
                if packet.track_id() == track_id {
                    frames += packet.dur;
                }
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => {
                return Err(AudioProbeError::Undecodable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if frames == 0 {
        return Err(AudioProbeError::UnknownDuration {
            path: path.to_path_buf(),
        });
    }

    Ok(frames)
}

/// Render a duration the way it appears in `itunes:duration`: plain
/// seconds with the shortest exact decimal form
pub fn format_duration(duration_secs: f64) -> String {
    duration_secs.to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Write a silent 16-bit mono PCM WAV file of `frames` samples
    pub(crate) fn write_wav(path: &Path, sample_rate: u32, frames: u32) {
        let data_len = frames * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);

        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);

        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn probes_wav_size_and_duration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 8000, 16000);

        let info = SymphoniaProbe::new().probe(&path).unwrap();

        assert_eq!(info.size, 44 + 32000);
        assert!((info.duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = tempdir().unwrap();
        let err = SymphoniaProbe::new()
            .probe(&dir.path().join("missing.mp3"))
            .unwrap_err();

        assert!(matches!(err, AudioProbeError::OpenFailed { .. }));
    }

    #[test]
    fn non_audio_file_is_undecodable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.mp3");
        std::fs::write(&path, b"these are not the frames you are looking for").unwrap();

        let err = SymphoniaProbe::new().probe(&path).unwrap_err();
        assert!(matches!(
            err,
            AudioProbeError::Undecodable { .. }
                | AudioProbeError::NoAudioTrack { .. }
                | AudioProbeError::UnknownDuration { .. }
        ));
    }

    #[test]
    fn format_duration_uses_shortest_decimal() {
        assert_eq!(format_duration(125.4), "125.4");
        assert_eq!(format_duration(0.5), "0.5");
        assert_eq!(format_duration(3600.0), "3600");
    }
}
