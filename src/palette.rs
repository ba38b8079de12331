//! Color tables for indexed pixel formats.
//!
//! A [`Palette`] is immutable once built. Bitmap data shares it through an
//! `Arc`, and raw copies between indexed bitmaps are only taken when both
//! sides hold the *same* `Arc`.

use std::collections::HashMap;

use crate::color::{Color32, WorkingColorSpace};
use crate::error::BitmapError;

/// Largest palette any indexed format can address (16 bits per pixel).
pub const MAX_PALETTE_SIZE: usize = 1 << 16;

/// Ordered color table with nearest-color lookup.
///
/// Entries keep their insertion order; the position is the color index.
/// Alpha handling during lookup follows the palette's own back color and
/// alpha threshold: a color below the threshold maps to the first fully
/// transparent entry (when there is one), anything else is blended onto
/// the back color before matching.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<Color32>,
    back_color: Color32,
    alpha_threshold: u8,
    color_space: WorkingColorSpace,
    transparent_index: Option<usize>,
    grayscale: bool,
    exact: HashMap<Color32, usize>,
    linear: Vec<[f32; 3]>,
}

impl Palette {
    /// Build a palette from its entries. Fails on an empty or oversized list.
    pub fn new(entries: Vec<Color32>) -> Result<Self, BitmapError> {
        if entries.is_empty() {
            return Err(BitmapError::InvalidArgument(
                "palette must have at least one entry".into(),
            ));
        }
        if entries.len() > MAX_PALETTE_SIZE {
            return Err(BitmapError::InvalidArgument(std::format!(
                "palette has {} entries, at most {MAX_PALETTE_SIZE} are supported",
                entries.len()
            )));
        }
        Ok(Self::build(entries))
    }

    // Callers guarantee a non-empty list within MAX_PALETTE_SIZE.
    fn build(entries: Vec<Color32>) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        for (i, c) in entries.iter().enumerate() {
            exact.entry(*c).or_insert(i);
        }
        let transparent_index = entries.iter().position(|c| c.a == 0);
        let grayscale = entries
            .iter()
            .all(|c| c.a == 0 || (c.r == c.g && c.g == c.b));
        let linear = entries
            .iter()
            .map(|c| {
                let f = c.to_color_f();
                [f.r, f.g, f.b]
            })
            .collect();

        Self {
            entries,
            back_color: Color32::BLACK,
            alpha_threshold: 128,
            color_space: WorkingColorSpace::Default,
            transparent_index,
            grayscale,
            exact,
            linear,
        }
    }

    /// Background for blending partially transparent colors. Stored opaque.
    pub fn with_back_color(mut self, color: Color32) -> Self {
        self.back_color = color.to_opaque();
        self
    }

    /// Colors with alpha below this map to the transparent entry, if any.
    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    pub fn with_working_color_space(mut self, space: WorkingColorSpace) -> Self {
        self.color_space = space;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a palette has at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Color32> {
        self.entries.get(index).copied()
    }

    #[inline]
    pub fn entries(&self) -> &[Color32] {
        &self.entries
    }

    #[inline]
    pub fn back_color(&self) -> Color32 {
        self.back_color
    }

    #[inline]
    pub fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    #[inline]
    pub fn working_color_space(&self) -> WorkingColorSpace {
        self.color_space
    }

    /// First fully transparent entry.
    #[inline]
    pub fn transparent_index(&self) -> Option<usize> {
        self.transparent_index
    }

    /// Whether every visible entry is a shade of gray.
    #[inline]
    pub fn is_grayscale(&self) -> bool {
        self.grayscale
    }

    /// Whether any entry is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.entries.iter().any(|c| c.a != 255)
    }

    /// Index of the entry closest to `color`.
    ///
    /// Total and deterministic: exact matches win, otherwise the entry with
    /// the smallest squared channel distance is chosen and ties go to the
    /// lowest index. Grayscale palettes compare brightness only.
    pub fn nearest_index(&self, color: Color32) -> usize {
        let mut c = color;
        if c.a != 255 {
            if c.a < self.alpha_threshold {
                if let Some(index) = self.transparent_index {
                    return index;
                }
            }
            c = c.blend_with_background(self.back_color, self.color_space);
        }

        if let Some(&index) = self.exact.get(&c) {
            return index;
        }

        let linear = self.color_space == WorkingColorSpace::Linear;
        let mut best = self.transparent_index.unwrap_or(0);
        let mut best_distance = u64::MAX;

        if self.grayscale {
            let target = u64::from(c.brightness(self.color_space));
            for (i, entry) in self.entries.iter().enumerate() {
                if entry.a == 0 {
                    continue;
                }
                let d = target.abs_diff(u64::from(entry.brightness(self.color_space)));
                if d < best_distance {
                    best = i;
                    best_distance = d;
                    if d == 0 {
                        break;
                    }
                }
            }
            return best;
        }

        if linear {
            let f = c.to_color_f();
            let mut best_f = f32::INFINITY;
            for (i, (entry, lin)) in self.entries.iter().zip(&self.linear).enumerate() {
                if entry.a == 0 {
                    continue;
                }
                let d = (f.r - lin[0]).powi(2) + (f.g - lin[1]).powi(2) + (f.b - lin[2]).powi(2);
                if d < best_f {
                    best = i;
                    best_f = d;
                }
            }
            return best;
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.a == 0 {
                continue;
            }
            let d = sq(c.r, entry.r) + sq(c.g, entry.g) + sq(c.b, entry.b);
            if d < best_distance {
                best = i;
                best_distance = d;
                if d == 0 {
                    break;
                }
            }
        }
        best
    }

    /// The entry closest to `color`.
    #[inline]
    pub fn nearest_color(&self, color: Color32) -> Color32 {
        self.entries[self.nearest_index(color)]
    }

    // ── Predefined palettes ─────────────────────────────────────────

    /// Black and white.
    pub fn black_and_white() -> Self {
        Self::build(vec![Color32::BLACK, Color32::WHITE])
    }

    /// The 16 standard system colors.
    pub fn system_4bpp() -> Self {
        Self::build(SYSTEM_16.iter().map(|&argb| Color32::from_argb(argb)).collect())
    }

    /// 16 system colors, the 216 web-safe colors and 24 grays.
    pub fn system_8bpp() -> Self {
        let mut entries: Vec<Color32> =
            SYSTEM_16.iter().map(|&argb| Color32::from_argb(argb)).collect();
        for r in 0..6u8 {
            for g in 0..6u8 {
                for b in 0..6u8 {
                    entries.push(Color32::from_rgb(r * 51, g * 51, b * 51));
                }
            }
        }
        entries.extend((0..24u8).map(|i| Color32::from_gray(8 + i * 10)));
        Self::build(entries)
    }

    /// Evenly spaced grays from black to white.
    pub fn grayscale(levels: usize) -> Result<Self, BitmapError> {
        if !(2..=256).contains(&levels) {
            return Err(BitmapError::InvalidArgument(std::format!(
                "grayscale levels must be in 2..=256, got {levels}"
            )));
        }
        let last = levels - 1;
        Ok(Self::build(
            (0..levels)
                .map(|i| Color32::from_gray(((i * 255 + last / 2) / last) as u8))
                .collect(),
        ))
    }

    pub fn grayscale4() -> Self {
        Self::build((0..4u8).map(|i| Color32::from_gray(i * 85)).collect())
    }

    pub fn grayscale16() -> Self {
        Self::build((0..16u8).map(|i| Color32::from_gray(i * 17)).collect())
    }

    pub fn grayscale256() -> Self {
        Self::build((0..=255u8).map(Color32::from_gray).collect())
    }

    /// 3 bits red, 3 bits green, 2 bits blue.
    pub fn rgb332() -> Self {
        let mut entries = Vec::with_capacity(256);
        for i in 0..=255u32 {
            entries.push(Color32::from_rgb(
                crate::color::packed::expand_to_u8(i >> 5, 3),
                crate::color::packed::expand_to_u8((i >> 2) & 7, 3),
                crate::color::packed::expand_to_u8(i & 3, 2),
            ));
        }
        Self::build(entries)
    }

    /// Default palette for an indexed format of `bits_per_pixel` bits.
    pub(crate) fn default_for_bits(bits_per_pixel: u32) -> Option<Self> {
        match bits_per_pixel {
            1 => Some(Self::black_and_white()),
            2 => Some(Self::grayscale4()),
            4 => Some(Self::system_4bpp()),
            8 => Some(Self::system_8bpp()),
            _ => None,
        }
    }
}

#[inline]
fn sq(a: u8, b: u8) -> u64 {
    let d = u64::from(a.abs_diff(b));
    d * d
}

const SYSTEM_16: [u32; 16] = [
    0xFF00_0000,
    0xFF80_0000,
    0xFF00_8000,
    0xFF80_8000,
    0xFF00_0080,
    0xFF80_0080,
    0xFF00_8080,
    0xFFC0_C0C0,
    0xFF80_8080,
    0xFFFF_0000,
    0xFF00_FF00,
    0xFFFF_FF00,
    0xFF00_00FF,
    0xFFFF_00FF,
    0xFF00_FFFF,
    0xFFFF_FFFF,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_palette_is_rejected() {
        assert!(matches!(
            Palette::new(Vec::new()),
            Err(BitmapError::InvalidArgument(_))
        ));
    }

    #[test]
    fn predefined_sizes() {
        assert_eq!(Palette::black_and_white().len(), 2);
        assert_eq!(Palette::system_4bpp().len(), 16);
        assert_eq!(Palette::system_8bpp().len(), 256);
        assert_eq!(Palette::grayscale16().len(), 16);
        assert_eq!(Palette::rgb332().len(), 256);
        assert!(Palette::grayscale256().is_grayscale());
        assert!(!Palette::system_4bpp().is_grayscale());
    }

    #[test]
    fn exact_match_prefers_first_duplicate() {
        let red = Color32::from_rgb(255, 0, 0);
        let p = Palette::new(vec![Color32::BLACK, red, red]).unwrap();
        assert_eq!(p.nearest_index(red), 1);
    }

    #[test]
    fn nearest_ties_go_to_lowest_index() {
        let p = Palette::new(vec![Color32::from_gray(10), Color32::from_gray(20)]).unwrap();
        assert_eq!(p.nearest_index(Color32::from_gray(15)), 0);
        assert_eq!(p.nearest_index(Color32::from_gray(16)), 1);
    }

    #[test]
    fn transparent_entry_receives_low_alpha() {
        let p = Palette::new(vec![
            Color32::BLACK,
            Color32::WHITE,
            Color32::TRANSPARENT,
        ])
        .unwrap();
        assert_eq!(p.transparent_index(), Some(2));
        assert_eq!(p.nearest_index(Color32::new(10, 255, 255, 255)), 2);
        // Above the threshold the color is blended onto black.
        assert_eq!(p.nearest_index(Color32::new(200, 255, 255, 255)), 1);
        assert_eq!(p.nearest_index(Color32::new(130, 200, 200, 200)), 0);
    }

    #[test]
    fn low_alpha_without_transparent_entry_uses_back_color() {
        let p = Palette::black_and_white().with_back_color(Color32::WHITE);
        assert_eq!(p.nearest_index(Color32::TRANSPARENT), 1);
    }

    #[test]
    fn grayscale_palette_matches_brightness() {
        let p = Palette::grayscale4();
        assert_eq!(p.nearest_color(Color32::from_rgb(0, 255, 0)), Color32::from_gray(170));
    }

    #[test]
    fn linear_space_changes_matching() {
        let p = Palette::new(vec![Color32::BLACK, Color32::from_rgb(255, 0, 0), Color32::WHITE])
            .unwrap();
        let dark_red = Color32::from_rgb(100, 0, 0);
        assert_eq!(p.nearest_index(dark_red), 0);
        let linear = p.with_working_color_space(WorkingColorSpace::Linear);
        assert_eq!(linear.nearest_index(Color32::from_rgb(200, 0, 0)), 1);
    }

    #[test]
    fn grayscale_levels() {
        let p = Palette::grayscale(3).unwrap();
        assert_eq!(p.entries(), &[
            Color32::from_gray(0),
            Color32::from_gray(128),
            Color32::from_gray(255)
        ]);
        assert!(Palette::grayscale(1).is_err());
    }
}
