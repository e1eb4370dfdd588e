use crate::error::FrameError;

/// The five bytes sent by the sensor: humidity, temperature and checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawFrame(pub [u8; 5]);

impl RawFrame {
    /// Sum of the four payload bytes, modulo 256.
    pub fn checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Whether the trailing byte matches the payload checksum.
    pub fn is_valid(&self) -> bool {
        self.checksum() == self.0[4]
    }
}

/// Reading returned by the DHT22 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

/// Validates the checksum and converts the frame into a [`Reading`].
///
/// Humidity is an unsigned big-endian value in tenths of a percent. The
/// temperature is a 15-bit big-endian magnitude in tenths of a degree with
/// the sign carried in the top bit.
pub fn extract(frame: &RawFrame) -> Result<Reading, FrameError> {
    let computed = frame.checksum();
    let [hum_hi, hum_lo, temp_hi, temp_lo, expected] = frame.0;
    if computed != expected {
        return Err(FrameError::ChecksumMismatch { expected, computed });
    }

    let joined_humidity = u16::from_be_bytes([hum_hi, hum_lo]);
    let relative_humidity = joined_humidity as f32 / 10.0;

    let is_temp_negative = (temp_hi >> 7) != 0;
    let temp_hi = temp_hi & 0b0111_1111;
    let joined_temp = u16::from_be_bytes([temp_hi, temp_lo]);
    let mut temperature = joined_temp as f32 / 10.0;
    if is_temp_negative {
        temperature = -temperature;
    }

    Ok(Reading {
        temperature,
        relative_humidity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_checksum(data: [u8; 4]) -> RawFrame {
        let mut frame = RawFrame([data[0], data[1], data[2], data[3], 0]);
        frame.0[4] = frame.checksum();
        frame
    }

    #[test]
    fn test_extract_positive_temp() {
        // Humidity: 55.5% -> [0x02, 0x2B] => 555
        // Temperature: 24.6C -> [0x00, 0xF6] => 246
        let frame = with_checksum([0x02, 0x2B, 0x00, 0xF6]);

        assert_eq!(
            extract(&frame).unwrap(),
            Reading {
                relative_humidity: 55.5,
                temperature: 24.6,
            }
        );
    }

    #[test]
    fn test_extract_negative_temp() {
        // Temperature: -1.0C -> [0x80, 0x0A]
        // Clear sign bit: 0x80 & 0x7F = 0x00, so [0x00, 0x0A] = 10 => 1.0 then negated
        let frame = with_checksum([0x01, 0x90, 0x80, 0x0A]);

        assert_eq!(
            extract(&frame).unwrap(),
            Reading {
                relative_humidity: 40.0,
                temperature: -1.0,
            }
        );
    }

    #[test]
    fn test_checksum_wraps() {
        let frame = with_checksum([0xFF, 0xFF, 0x00, 0x02]);
        assert_eq!(frame.0[4], 0x00);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_checksum_mismatch_never_yields_reading() {
        let payloads = [
            [0x01, 0x90, 0x00, 0xF6],
            [0x02, 0x2B, 0x80, 0x0A],
            [0xFF, 0xFF, 0xFF, 0xFF],
            [0x00, 0x00, 0x00, 0x00],
        ];
        for data in payloads {
            let valid = with_checksum(data);
            for delta in [1u8, 0x10, 0x80, 0xFF] {
                let mut frame = valid;
                frame.0[4] = frame.0[4].wrapping_add(delta);
                assert_eq!(
                    extract(&frame),
                    Err(FrameError::ChecksumMismatch {
                        expected: frame.0[4],
                        computed: valid.0[4],
                    })
                );
            }
        }
    }

    #[test]
    fn test_sign_bit_only_affects_temperature() {
        let positive = with_checksum([0x01, 0xC5, 0x00, 0xED]);
        let negative = with_checksum([0x01, 0xC5, 0x80, 0xED]);

        let positive = extract(&positive).unwrap();
        let negative = extract(&negative).unwrap();

        assert_eq!(negative.temperature, -positive.temperature);
        assert_eq!(negative.relative_humidity, positive.relative_humidity);
        assert!(negative.relative_humidity >= 0.0);
    }
}
