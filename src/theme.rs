//! Prompt-derived run theme
//!
//! The prompt's SHA-256 fixes the run seed; a generator seeded from it picks
//! the palette and shape style, so the same prompt always looks and plays
//! the same.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::sim::ItemKind;

/// 16-colour target palette (RGB)
pub const PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (29, 43, 83),
    (126, 37, 83),
    (0, 135, 81),
    (171, 82, 54),
    (95, 87, 79),
    (194, 195, 199),
    (255, 241, 232),
    (255, 0, 77),
    (255, 163, 0),
    (255, 236, 39),
    (0, 228, 54),
    (41, 173, 255),
    (131, 118, 156),
    (255, 119, 168),
    (255, 204, 170),
];

const VOCAB: [&str; 10] = [
    "魔導", "蒸気", "海底", "古代", "砂漠", "夜会", "蛍光", "毒霧", "お菓子", "機械",
];

/// Silhouette family for generated sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStyle {
    Round,
    Blocky,
    Spiky,
}

/// Seed and palette for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub prompt: String,
    pub seed: u64,
    /// Palette indices
    pub bg: u8,
    pub fg: u8,
    pub accent: u8,
    pub danger: u8,
    pub shape_style: ShapeStyle,
    /// Flavour word used in item names
    pub word: String,
}

impl Theme {
    /// Derive a theme from a free-text prompt
    pub fn build(prompt: &str) -> Self {
        let seed = seed_from_text(prompt);
        let mut rng = Pcg32::seed_from_u64(seed);

        let base_h: f32 = rng.random();
        let bg = nearest_palette_index(hsv_to_rgb255(base_h, 0.35, 0.12));
        let fg = nearest_palette_index(hsv_to_rgb255((base_h + 0.08).fract(), 0.30, 0.82));
        let accent = nearest_palette_index(hsv_to_rgb255((base_h + 0.52).fract(), 0.70, 0.92));
        let danger = nearest_palette_index(hsv_to_rgb255((base_h + 0.95).fract(), 0.85, 0.92));

        let shape_style = *[ShapeStyle::Round, ShapeStyle::Blocky, ShapeStyle::Spiky]
            .choose(&mut rng)
            .unwrap_or(&ShapeStyle::Round);
        let word = VOCAB.choose(&mut rng).copied().unwrap_or(VOCAB[0]);

        log::debug!(
            "Theme for {:?}: seed={} accent={} style={:?}",
            prompt,
            seed,
            accent,
            shape_style
        );

        Self {
            prompt: prompt.to_string(),
            seed,
            bg,
            fg,
            accent,
            danger,
            shape_style,
            word: word.to_string(),
        }
    }

    /// Themed display name for an item
    pub fn item_name(&self, kind: ItemKind) -> String {
        let suffix = match kind {
            ItemKind::Speed => "脚",
            ItemKind::Jump => "跳躍",
            ItemKind::Phase => "虚ろ",
            ItemKind::Invuln => "護り",
            ItemKind::Hp => "心臓",
        };
        format!("{}の{}", self.word, suffix)
    }
}

/// First 8 bytes (big-endian) of SHA-256 over the trimmed text
pub fn seed_from_text(text: &str) -> u64 {
    let digest = Sha256::digest(text.trim().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn hsv_to_rgb255(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let to255 = |c: f32| (c * 255.0) as u8;
    if s == 0.0 {
        return (to255(v), to255(v), to255(v));
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    (to255(r), to255(g), to255(b))
}

fn nearest_palette_index((r, g, b): (u8, u8, u8)) -> u8 {
    let dist = |&(pr, pg, pb): &(u8, u8, u8)| {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2);
        d(r, pr) + d(g, pg) + d(b, pb)
    };
    PALETTE
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| dist(c))
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ignores_surrounding_whitespace() {
        assert_eq!(seed_from_text("  deep sea  "), seed_from_text("deep sea"));
        assert_ne!(seed_from_text("deep sea"), seed_from_text("desert"));
    }

    #[test]
    fn test_seed_is_sha256_prefix() {
        // sha256("") = e3b0c44298fc1c14...
        assert_eq!(seed_from_text(""), 0xe3b0_c442_98fc_1c14);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Theme::build("steampunk library");
        let b = Theme::build("steampunk library");
        assert_eq!(a, b);
        assert_eq!(a.prompt, "steampunk library");
        for idx in [a.bg, a.fg, a.accent, a.danger] {
            assert!((idx as usize) < PALETTE.len());
        }
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb255(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb255(0.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(nearest_palette_index((250, 240, 230)), 7);
        assert_eq!(nearest_palette_index((0, 0, 0)), 0);
    }

    #[test]
    fn test_item_names_use_theme_word() {
        let theme = Theme::build("candy");
        assert!(theme.item_name(ItemKind::Hp).starts_with(&theme.word));
    }
}
