//! Text measurement.
//!
//! Legend layout needs rendered label widths. [`FontRuler`] resolves a face
//! through the system font database and walks glyph advances; when no face
//! matches it falls back to [`CalibratedRuler`], a table of per-character
//! width factors that needs no font files and is fully deterministic.

use std::collections::HashMap;
use std::sync::Mutex;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::Face;

/// Font family stack (CSS-style, comma separated) plus size in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// A zero or negative size means "no explicit font"; callers substitute
    /// a default.
    pub fn is_unset(&self) -> bool {
        self.size <= 0.0
    }
}

/// The text-measurement capability the legend layout engine depends on.
pub trait TextMeasure {
    /// Rendered width of `text` at `font`, in pixels.
    fn text_width(&self, text: &str, font: &FontSpec) -> f32;

    /// Width of a single space glyph, the unit label padding is counted in.
    fn space_width(&self, font: &FontSpec) -> f32 {
        self.text_width(" ", font)
    }
}

/// Per-character width factors, calibrated against common sans-serif faces
/// at a 16px baseline. Coarser than real glyph advances but deterministic.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' | '(' | ')' | '[' | ']' => 0.321,
        'i' | 'j' | 'l' => 0.278,
        'f' | 't' | 'r' => 0.360,
        'm' | 'w' => 0.818,
        'M' | 'W' => 0.884,
        'I' => 0.272,
        '0'..='9' => 0.524,
        'A'..='Z' => 0.680,
        _ => 0.520,
    }
}

/// Deterministic fallback ruler built on [`char_width_factor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibratedRuler;

impl TextMeasure for CalibratedRuler {
    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        if font.size <= 0.0 {
            return 0.0;
        }
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| char_width_factor(ch) * font.size)
            .sum()
    }
}

static FACE_CACHE: Lazy<Mutex<FaceCache>> = Lazy::new(|| Mutex::new(FaceCache::new()));

/// Ruler backed by the system font database. Face lookups are cached
/// process-wide; measurement itself is cheap (advance sums).
#[derive(Debug, Clone, Copy, Default)]
pub struct FontRuler;

impl TextMeasure for FontRuler {
    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() || font.size <= 0.0 {
            return 0.0;
        }
        let measured = FACE_CACHE
            .lock()
            .ok()
            .and_then(|mut cache| cache.measure(text, font));
        measured.unwrap_or_else(|| CalibratedRuler.text_width(text, font))
    }
}

struct FaceCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<RulerFace>>,
}

impl FaceCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font: &FontSpec) -> Option<f32> {
        let key = family_key(&font.family);
        if !self.faces.contains_key(&key) {
            let face = self.load(&font.family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get(&key)?.as_ref()?;
        Some(face.width(&text.replace('\t', "    "), font.size))
    }

    fn load(&mut self, family: &str) -> Option<RulerFace> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let families = family_stack(family);
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| RulerFace::parse(data.to_vec(), index))?
    }
}

/// Splits a CSS-style family stack into fontdb queries, mapping generic
/// family keywords onto fontdb's generic families.
fn family_stack(family: &str) -> Vec<Family<'_>> {
    let mut families = Vec::new();
    for part in family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        match raw.to_ascii_lowercase().as_str() {
            "serif" => families.push(Family::Serif),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                families.push(Family::SansSerif)
            }
            "monospace" | "ui-monospace" => families.push(Family::Monospace),
            "cursive" => families.push(Family::Cursive),
            "fantasy" => families.push(Family::Fantasy),
            _ => families.push(Family::Name(raw)),
        }
    }
    if families.is_empty() {
        families.push(Family::SansSerif);
    }
    families
}

fn family_key(family: &str) -> String {
    let trimmed = family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

struct RulerFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    // Advance units for the ASCII range, so the common case never reparses.
    ascii_advances: [u16; 128],
}

impl RulerFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        drop(face);
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn width(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.units_per_em as f32;
        let fallback = size * 0.56;

        if text.is_ascii() {
            let width: f32 = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| {
                    let advance = self.ascii_advances[byte as usize];
                    if advance == 0 {
                        fallback
                    } else {
                        advance as f32 * scale
                    }
                })
                .sum();
            return width.max(0.0);
        }

        // Rare path: reparse the owned face data and walk glyphs.
        let Ok(face) = Face::parse(&self.data, self.index) else {
            return fallback * text.chars().filter(|ch| *ch != '\n').count() as f32;
        };
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(fallback)
            })
            .sum()
    }
}
