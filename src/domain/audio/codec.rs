//! Wire codec for the raw PCM container
//!
//! Samples are serialized as 16-bit signed integers, high byte first.
//! A file is a flat sequence of such samples with no header and no length
//! field; consumers read until end-of-stream.

use super::format::BYTES_PER_SAMPLE;

/// Number of bytes needed to serialize `sample_count` samples
pub const fn encoded_len(sample_count: usize) -> usize {
    sample_count * BYTES_PER_SAMPLE
}

/// Append the big-endian serialization of `samples` to `out`.
pub fn encode_samples(samples: &[i16], out: &mut Vec<u8>) {
    out.reserve(encoded_len(samples.len()));
    for &sample in samples {
        out.extend_from_slice(&sample.to_be_bytes());
    }
}

/// Decode big-endian samples from `bytes` into `out`.
///
/// Returns the number of samples decoded. A trailing byte that does not
/// form a complete sample is ignored; `out` is never filled past the
/// decodable count.
pub fn decode_samples(bytes: &[u8], out: &mut [i16]) -> usize {
    let count = (bytes.len() / BYTES_PER_SAMPLE).min(out.len());
    for (slot, pair) in out[..count].iter_mut().zip(bytes.chunks_exact(2)) {
        *slot = i16::from_be_bytes([pair[0], pair[1]]);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_vector_encoding() {
        let samples = [1i16, -1, 32767, -32768, 0];
        let mut bytes = Vec::new();
        encode_samples(&samples, &mut bytes);

        assert_eq!(
            bytes,
            [0x00, 0x01, 0xFF, 0xFF, 0x7F, 0xFF, 0x80, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn golden_vector_round_trip() {
        let samples = [1i16, -1, 32767, -32768, 0];
        let mut bytes = Vec::new();
        encode_samples(&samples, &mut bytes);
        assert_eq!(bytes.len(), 10);

        let mut decoded = [0i16; 5];
        let n = decode_samples(&bytes, &mut decoded);
        assert_eq!(n, 5);
        assert_eq!(decoded, samples);
    }

    #[test]
    fn decode_ignores_trailing_byte() {
        let bytes = [0x00, 0x01, 0x7F];
        let mut decoded = [0i16; 4];
        let n = decode_samples(&bytes, &mut decoded);
        assert_eq!(n, 1);
        assert_eq!(decoded[0], 1);
    }

    #[test]
    fn decode_is_bounded_by_output_len() {
        let mut bytes = Vec::new();
        encode_samples(&[10, 20, 30], &mut bytes);

        let mut decoded = [0i16; 2];
        let n = decode_samples(&bytes, &mut decoded);
        assert_eq!(n, 2);
        assert_eq!(decoded, [10, 20]);
    }

    #[test]
    fn encode_appends_without_clearing() {
        let mut bytes = vec![0xAA];
        encode_samples(&[1], &mut bytes);
        assert_eq!(bytes, [0xAA, 0x00, 0x01]);
    }

    #[test]
    fn encoded_len_is_two_bytes_per_sample() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1024), 2048);
    }
}
