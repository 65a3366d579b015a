//! RGB/CMYK conversion and ink limiting.
//!
//! This is the simplified device-independent approximation used across the
//! export pipeline, not ICC-profile color management. The RGB/CMYK
//! round trip is lossy by a few values per channel; that is expected.

use serde::{Deserialize, Serialize};

/// Maximum total ink coverage (c+m+y+k, in percent) considered safe for
/// common press stock.
pub const MAX_INK_TOTAL: u16 = 280;

/// A CMYK color in integer percent per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cmyk {
    /// Cyan, 0..=100.
    pub c: u8,
    /// Magenta, 0..=100.
    pub m: u8,
    /// Yellow, 0..=100.
    pub y: u8,
    /// Key (black), 0..=100.
    pub k: u8,
}

impl Cmyk {
    /// Construct from channel percentages, clamping each to 0..=100.
    #[must_use]
    pub fn new(c: u8, m: u8, y: u8, k: u8) -> Self {
        Self {
            c: c.min(100),
            m: m.min(100),
            y: y.min(100),
            k: k.min(100),
        }
    }

    /// Total ink coverage in percent.
    #[must_use]
    pub fn ink_total(self) -> u16 {
        u16::from(self.c) + u16::from(self.m) + u16::from(self.y) + u16::from(self.k)
    }
}

/// Convert an RGB triple to CMYK percentages.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> Cmyk {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let k = 1.0 - rf.max(gf).max(bf);
    if (k - 1.0).abs() < f32::EPSILON {
        // Pure black; the channel formula would divide by zero.
        return Cmyk::new(0, 0, 0, 100);
    }

    let percent = |channel: f32| -> u8 {
        let value = (1.0 - channel - k) / (1.0 - k) * 100.0;
        value.round().clamp(0.0, 100.0) as u8
    };

    Cmyk::new(
        percent(rf),
        percent(gf),
        percent(bf),
        (k * 100.0).round().clamp(0.0, 100.0) as u8,
    )
}

/// Convert CMYK percentages back to an RGB triple.
///
/// This is the lossy inverse of [`rgb_to_cmyk`]; round trips are close but
/// not exact.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cmyk_to_rgb(cmyk: Cmyk) -> (u8, u8, u8) {
    let k = f32::from(cmyk.k) / 100.0;
    let channel = |ink: u8| -> u8 {
        let value = 255.0 * (1.0 - f32::from(ink) / 100.0) * (1.0 - k);
        value.round().clamp(0.0, 255.0) as u8
    };
    (channel(cmyk.c), channel(cmyk.m), channel(cmyk.y))
}

/// Whether the total ink coverage is at or below the press ceiling.
#[must_use]
pub fn is_print_safe(cmyk: Cmyk) -> bool {
    cmyk.ink_total() <= MAX_INK_TOTAL
}

/// Scale an over-inked color down to the press ceiling.
///
/// All four channels are scaled proportionally, which shifts hue slightly;
/// this is the documented reproducible policy, not professional ink
/// limiting. Already-safe colors are returned unchanged, which also makes
/// the function idempotent.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn make_print_safe(cmyk: Cmyk) -> Cmyk {
    let total = cmyk.ink_total();
    if total <= MAX_INK_TOTAL {
        return cmyk;
    }

    let factor = f32::from(MAX_INK_TOTAL) / f32::from(total);
    let scale = |ink: u8| -> u8 { (f32::from(ink) * factor).round().clamp(0.0, 100.0) as u8 };
    let mut safe = Cmyk::new(scale(cmyk.c), scale(cmyk.m), scale(cmyk.y), scale(cmyk.k));

    // Per-channel rounding can overshoot the ceiling by a point or two;
    // trim the excess from the heaviest channels.
    while safe.ink_total() > MAX_INK_TOTAL {
        let max = safe.c.max(safe.m).max(safe.y).max(safe.k);
        if safe.c == max {
            safe.c -= 1;
        } else if safe.m == max {
            safe.m -= 1;
        } else if safe.y == max {
            safe.y -= 1;
        } else {
            safe.k -= 1;
        }
    }
    safe
}

/// Parse a `#RGB` or `#RRGGBB` hex color.
#[must_use]
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
            let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

/// Convert a hex color to CMYK. Returns `None` for unparseable input.
#[must_use]
pub fn hex_to_cmyk(hex: &str) -> Option<Cmyk> {
    let (r, g, b) = parse_hex(hex)?;
    Some(rgb_to_cmyk(r, g, b))
}

/// Convert a CMYK color to its approximate hex representation.
#[must_use]
pub fn cmyk_to_hex(cmyk: Cmyk) -> String {
    let (r, g, b) = cmyk_to_rgb(cmyk);
    format!("#{r:02x}{g:02x}{b:02x}")
}
