// 🎨 Palette - Discrete Color Cycles
// Ships the CARTOColors "Vivid" qualitative scheme and parses user overrides

use anyhow::{bail, Result};
use image::Rgb;

// ============================================================================
// BUILT-IN PALETTE
// ============================================================================

/// CARTOColors "Vivid" qualitative palette (10 colors).
///
/// Colors are assigned to phrases by cycling this list in layout order, so
/// the 11th phrase reuses the 1st color.
pub const VIVID: [Rgb<u8>; 10] = [
    Rgb([0xE5, 0x86, 0x06]), // orange
    Rgb([0x5D, 0x69, 0xB1]), // indigo
    Rgb([0x52, 0xBC, 0xA3]), // teal
    Rgb([0x99, 0xC9, 0x45]), // green
    Rgb([0xCC, 0x61, 0xB0]), // magenta
    Rgb([0x24, 0x79, 0x6C]), // dark teal
    Rgb([0xDA, 0xA5, 0x1B]), // gold
    Rgb([0x2F, 0x8A, 0xC4]), // blue
    Rgb([0x76, 0x4E, 0x9F]), // purple
    Rgb([0xED, 0x64, 0x5A]), // red
];

// ============================================================================
// PARSING
// ============================================================================

/// Parse a single color: a named color or a hex triplet ("#RRGGBB" / "RRGGBB")
pub fn parse_color(input: &str) -> Result<Rgb<u8>> {
    let trimmed = input.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "white" => return Ok(Rgb([0xFF, 0xFF, 0xFF])),
        "black" => return Ok(Rgb([0x00, 0x00, 0x00])),
        _ => {}
    }

    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!(
            "Invalid color {:?} (expected 'white', 'black', or a hex triplet like '#1A2B3C')",
            input
        );
    }

    let channel = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&hex[range], 16).map_err(Into::into)
    };

    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Parse a comma-separated color list into a palette
pub fn parse_palette(input: &str) -> Result<Vec<Rgb<u8>>> {
    let colors = input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_color)
        .collect::<Result<Vec<_>>>()?;

    if colors.is_empty() {
        bail!("Palette must contain at least one color");
    }
    Ok(colors)
}

// ============================================================================
// TESTS
// ============================================================================
