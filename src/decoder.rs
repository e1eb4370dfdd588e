use core::time::Duration;

use crate::{
    error::{FrameError, RESPONSE_TRANSITIONS},
    frame::RawFrame,
    sampler::FRAME_TRANSITIONS,
};

/// Decodes a captured transition sequence into the sensor's five bytes.
///
/// The first three transitions belong to the handshake response and are
/// skipped. Each data bit then spans a low pulse followed by a high pulse;
/// only the high pulse matters: longer than `threshold` is a `1`, anything
/// else a `0`. Bits arrive most significant first. Transitions past the
/// 83rd are ignored.
///
/// The checksum is not checked here, see [`extract`](crate::frame::extract).
pub fn decode(transitions: &[Duration], threshold: Duration) -> Result<RawFrame, FrameError> {
    if transitions.len() < FRAME_TRANSITIONS {
        return Err(FrameError::InsufficientTransitions(transitions.len()));
    }

    let mut frame = RawFrame::default();
    let bits = transitions[RESPONSE_TRANSITIONS..FRAME_TRANSITIONS].chunks_exact(2);

    for (i, pulses) in bits.enumerate() {
        let high = pulses[1];
        if high > threshold {
            frame.0[i / 8] |= 1 << (7 - i % 8);
        }
    }

    Ok(frame)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::frame::extract;

    const THRESHOLD: Duration = Duration::from_micros(50);

    /// Transition sequence a sensor sends for `bytes`, with nominal widths.
    pub(crate) fn encode_frame(bytes: [u8; 5]) -> Vec<Duration> {
        let mut transitions = vec![
            Duration::from_micros(30),
            Duration::from_micros(80),
            Duration::from_micros(80),
        ];
        for byte in bytes {
            for i in 0..8 {
                let bit = (byte >> (7 - i)) & 1;
                transitions.push(Duration::from_micros(50));
                transitions.push(Duration::from_micros(if bit == 1 { 70 } else { 27 }));
            }
        }
        transitions
    }

    fn first_bit_with_high_pulse(high: Duration) -> u8 {
        let mut transitions = encode_frame([0; 5]);
        transitions[4] = high;
        decode(&transitions, THRESHOLD).unwrap().0[0] >> 7
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(first_bit_with_high_pulse(Duration::from_micros(50)), 0);
        assert_eq!(first_bit_with_high_pulse(Duration::from_nanos(50_001)), 1);
    }

    #[test]
    fn test_low_pulse_is_ignored() {
        let mut transitions = encode_frame([0; 5]);
        transitions[3] = Duration::from_micros(120);
        assert_eq!(decode(&transitions, THRESHOLD).unwrap(), RawFrame([0; 5]));
    }

    #[test]
    fn test_bits_are_msb_first() {
        let bytes = [0b1011_1010, 0x01, 0x80, 0x00, 0x3B];
        assert_eq!(
            decode(&encode_frame(bytes), THRESHOLD).unwrap(),
            RawFrame(bytes)
        );
    }

    #[test]
    fn test_one_short_is_insufficient() {
        let transitions = encode_frame([0x01, 0x90, 0x00, 0xF6, 0x87]);
        assert_eq!(
            decode(&transitions[..82], THRESHOLD),
            Err(FrameError::InsufficientTransitions(82))
        );
    }

    #[test]
    fn test_extra_transitions_are_ignored() {
        let bytes = [0x01, 0x90, 0x00, 0xF6, 0x87];
        let mut transitions = encode_frame(bytes);
        transitions.push(Duration::from_micros(70));
        transitions.push(Duration::from_micros(70));
        assert_eq!(decode(&transitions, THRESHOLD).unwrap(), RawFrame(bytes));
    }

    #[test]
    fn test_round_trip_through_extract() {
        let humidity = 453u16.to_be_bytes();
        let temperature = 237u16.to_be_bytes();
        let mut bytes = [humidity[0], humidity[1], temperature[0], temperature[1], 0];
        bytes[4] = RawFrame(bytes).checksum();

        let frame = decode(&encode_frame(bytes), THRESHOLD).unwrap();
        let reading = extract(&frame).unwrap();

        assert!((reading.relative_humidity - 45.3).abs() < 0.01);
        assert!((reading.temperature - 23.7).abs() < 0.01);
    }

    #[test]
    fn test_round_trip_negative_temperature() {
        let humidity = 453u16.to_be_bytes();
        let temperature = (237u16 | 0x8000).to_be_bytes();
        let mut bytes = [humidity[0], humidity[1], temperature[0], temperature[1], 0];
        bytes[4] = RawFrame(bytes).checksum();

        let reading = extract(&decode(&encode_frame(bytes), THRESHOLD).unwrap()).unwrap();

        assert!((reading.relative_humidity - 45.3).abs() < 0.01);
        assert!((reading.temperature + 23.7).abs() < 0.01);
    }
}
