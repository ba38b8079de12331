//! sRGB transfer curve (IEC 61966-2-1), backed by `linear-srgb`.
//!
//! Channel helpers clamp to the unit range and round to nearest.

pub use linear_srgb::{linear_to_srgb, srgb_to_linear};

#[inline]
pub(crate) fn srgb_u8_to_linear(v: u8) -> f32 {
    srgb_to_linear(f32::from(v) / 255.0)
}

#[inline]
pub(crate) fn srgb_u16_to_linear(v: u16) -> f32 {
    srgb_to_linear(f32::from(v) / 65535.0)
}

/// Encode linear light to an 8-bit sRGB channel.
#[inline]
pub(crate) fn linear_to_srgb_u8(v: f32) -> u8 {
    unit_to_u8(linear_to_srgb(v.clamp(0.0, 1.0)))
}

#[inline]
pub(crate) fn linear_to_srgb_u16(v: f32) -> u16 {
    unit_to_u16(linear_to_srgb(v.clamp(0.0, 1.0)))
}

/// Quantize a unit-range float (alpha, or an already encoded channel) to 8 bits.
#[inline]
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[inline]
pub(crate) fn unit_to_u16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0 + 0.5) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert!(srgb_to_linear(0.0).abs() < 1e-6);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(linear_to_srgb(0.0).abs() < 1e-6);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn u8_roundtrip_is_exact() {
        for i in 0..=255u8 {
            assert_eq!(linear_to_srgb_u8(srgb_u8_to_linear(i)), i, "value {i}");
        }
    }

    #[test]
    fn monotonic() {
        let mut prev = srgb_to_linear(0.0);
        for i in 1..=1000 {
            let curr = srgb_to_linear(i as f32 / 1000.0);
            assert!(curr >= prev, "srgb_to_linear not monotonic at {i}");
            prev = curr;
        }
    }

    #[test]
    fn u8_decoding_hits_known_points() {
        assert_eq!(srgb_u8_to_linear(0), 0.0);
        assert!((srgb_u8_to_linear(255) - 1.0).abs() < 1e-6);
        // 188 / 255 encodes roughly half of linear light.
        assert!((srgb_u8_to_linear(188) - 0.5).abs() < 0.01);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(linear_to_srgb_u8(-1.0), 0);
        assert_eq!(linear_to_srgb_u8(7.5), 255);
        assert_eq!(unit_to_u16(2.0), 65535);
    }
}
