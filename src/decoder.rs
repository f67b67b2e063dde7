// Accelink - Sample Decoder
//
// Pure conversion of MMA8451 register contents into physical units.
//
// The MMA8451 delivers 14-bit readings left-justified in a 16-bit register
// pair. They are recovered with an arithmetic shift right by 2 and divided by
// the native sensitivity (4096 LSB/g at ±2 g). Every axis goes through the
// same path; dividing the unshifted value by 16384 would be equivalent, but
// the two must never be mixed.

use crate::config::DeviceConfig;
use crate::events::{Face, OrientationStatus, Position, RawFrame, Sample};

/// Bits discarded by the left justification of the 14-bit reading.
const JUSTIFICATION_SHIFT: u32 = 2;

/// Combine one axis register pair into the signed 14-bit count.
pub fn axis_counts(msb: u8, lsb: u8) -> i16 {
    i16::from_be_bytes([msb, lsb]) >> JUSTIFICATION_SHIFT
}

fn counts_to_ms2(counts: i16, device: &DeviceConfig) -> f32 {
    counts as f32 / device.sensitivity * device.gravity
}

/// Convert a 6-byte data burst into acceleration in m/s².
///
/// No rounding happens here; values keep full `f32` precision until they
/// are serialized.
pub fn decode_sample(raw: &RawFrame, device: &DeviceConfig) -> Sample {
    Sample {
        x: counts_to_ms2(axis_counts(raw[0], raw[1]), device),
        y: counts_to_ms2(axis_counts(raw[2], raw[3]), device),
        z: counts_to_ms2(axis_counts(raw[4], raw[5]), device),
    }
}

/// Decode the PL_STATUS byte: bits 2:1 select the position, bit 0 the face.
pub fn decode_orientation(status: u8) -> OrientationStatus {
    let position = match (status >> 1) & 0x03 {
        0 => Position::PortraitUp,
        1 => Position::PortraitDown,
        2 => Position::LandscapeRight,
        _ => Position::LandscapeLeft,
    };
    let face = if status & 0x01 == 0 { Face::Front } else { Face::Back };

    OrientationStatus { position, face }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: DeviceConfig = DeviceConfig::mma8451();

    fn frame_from_counts(x: i16, y: i16, z: i16) -> RawFrame {
        let [xh, xl] = x.to_be_bytes();
        let [yh, yl] = y.to_be_bytes();
        let [zh, zl] = z.to_be_bytes();
        [xh, xl, yh, yl, zh, zl]
    }

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn known_frame_decodes_to_m_s2() {
        let sample = decode_sample(&[0x10, 0x00, 0x20, 0x00, 0x30, 0x00], &DEVICE);
        assert!(approx(sample.x, 2.4517, 1e-3), "x = {}", sample.x);
        assert!(approx(sample.y, 4.9033, 1e-3), "y = {}", sample.y);
        assert!(approx(sample.z, 7.3550, 1e-3), "z = {}", sample.z);
    }

    #[test]
    fn one_g_reads_standard_gravity() {
        // 4096 counts << 2 = 0x4000
        let sample = decode_sample(&[0x40, 0x00, 0x00, 0x00, 0xC0, 0x00], &DEVICE);
        assert!(approx(sample.x, 9.80665, 1e-5));
        assert_eq!(sample.y, 0.0);
        assert!(approx(sample.z, -9.80665, 1e-5));
    }

    #[test]
    fn negative_values_sign_extend() {
        assert_eq!(axis_counts(0xFF, 0xFC), -1);
        assert_eq!(axis_counts(0x80, 0x00), -8192);
        assert_eq!(axis_counts(0x7F, 0xFC), 8191);
        // The two unused low bits never leak into the count.
        assert_eq!(axis_counts(0x00, 0x07), 1);
    }

    #[test]
    fn decoding_is_linear_in_raw_value() {
        let base: i16 = 0x0104; // multiple of 4, shift is exact
        let unit = decode_sample(&frame_from_counts(base, -base, base * 2), &DEVICE);

        for k in [-8i16, -3, -1, 0, 1, 2, 5, 15] {
            let scaled = decode_sample(&frame_from_counts(base * k, -base * k, base * 2 * k), &DEVICE);
            let kf = k as f32;
            assert!(approx(scaled.x, unit.x * kf, 1e-4), "x, k = {k}");
            assert!(approx(scaled.y, unit.y * kf, 1e-4), "y, k = {k}");
            assert!(approx(scaled.z, unit.z * kf, 1e-4), "z, k = {k}");
        }
    }

    #[test]
    fn axes_share_one_scaling_policy() {
        let raw: i16 = -0x1234 & !0x3;
        let s = decode_sample(&frame_from_counts(raw, raw, raw), &DEVICE);
        assert_eq!(s.x, s.y);
        assert_eq!(s.y, s.z);
        // Equivalent to dividing the unshifted value by 16384.
        let alt = raw as f32 / 16384.0 * DEVICE.gravity;
        assert!(approx(s.x, alt, 1e-5));
    }

    // PL_STATUS: bit 0 is BAFRO (0 front, 1 back), bits 2:1 are LAPO
    // (portrait up/down, landscape right/left). The 0b011 and 0b101 rows
    // follow that layout: bit 0 set means Back.
    #[test]
    fn orientation_table_covers_low_three_bits() {
        use Face::*;
        use Position::*;

        let table = [
            (0b000, PortraitUp, Front),
            (0b001, PortraitUp, Back),
            (0b010, PortraitDown, Front),
            (0b011, PortraitDown, Back),
            (0b100, LandscapeRight, Front),
            (0b101, LandscapeRight, Back),
            (0b110, LandscapeLeft, Front),
            (0b111, LandscapeLeft, Back),
        ];

        for (bits, position, face) in table {
            let expected = OrientationStatus { position, face };
            assert_eq!(decode_orientation(bits), expected, "bits {bits:03b}");
            // Upper bits (LO, NEWLP, ...) are ignored.
            for high in [0x08u8, 0x40, 0x80, 0xF8] {
                assert_eq!(decode_orientation(bits | high), expected);
            }
        }
    }

    #[test]
    fn orientation_display() {
        let status = decode_orientation(0b111);
        assert_eq!(status.to_string(), "Landscape Left, Back");
    }
}
