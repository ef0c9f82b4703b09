//! Font-backed text measurement
//!
//! Widths are the sum of horizontal glyph advances read via ttf-parser,
//! scaled to the requested pixel size. No shaping or kerning is applied,
//! which is close enough for deciding whether a chip fits.

use std::sync::Arc;
#[cfg(feature = "system-fonts")]
use std::sync::{Mutex, OnceLock, PoisonError};

#[cfg(feature = "system-fonts")]
use rustc_hash::FxHashMap;

use crate::measure::{FontSpec, TextMeasurer, TextMetrics};
use crate::{Result, TextError};

/// Ascender - descender + line gap, widened so extreme metrics can't overflow
fn line_height_units(ascender: i16, descender: i16, line_gap: i16) -> i32 {
    i32::from(ascender) - i32::from(descender) + i32::from(line_gap)
}

/// Installed fonts, scanned once per process
#[cfg(feature = "system-fonts")]
fn system_database() -> &'static fontdb::Database {
    static DATABASE: OnceLock<fontdb::Database> = OnceLock::new();
    DATABASE.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        db
    })
}

/// A parsed font face, reduced to what width measurement needs
#[derive(Clone)]
pub struct FontFace {
    /// Raw font data (kept alive for ttf-parser)
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    /// Units per em (typically 1000 or 2048)
    units_per_em: u16,
    /// Ascender - descender + line gap, in font units
    line_height: i32,
    /// Font family name
    family_name: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family_name", &self.family_name)
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontFace {
    /// Load a font from raw TTF/OTF data (uses face index 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Load a font from raw TTF/OTF data with a specific face index
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        if face.units_per_em() == 0 {
            return Err(TextError::FontParseError("units per em is zero".to_string()));
        }

        let family_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let units_per_em = face.units_per_em();
        let line_height = line_height_units(face.ascender(), face.descender(), face.line_gap());

        Ok(Self {
            data,
            face_index,
            units_per_em,
            line_height,
            family_name,
        })
    }

    /// Load a font from a file path
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TextError::FontLoadError(format!("{}: {}", path.display(), e)))?;
        Self::from_data(data)
    }

    /// Find an installed font for `family`, falling back to the system sans-serif
    #[cfg(feature = "system-fonts")]
    pub fn from_system(family: &str) -> Result<Self> {
        let db = system_database();

        let families = [fontdb::Family::Name(family), fontdb::Family::SansSerif];
        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };

        let id = db
            .query(&query)
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))?;

        db.with_face_data(id, |data, index| Self::from_data_with_index(data.to_vec(), index))
            .unwrap_or_else(|| Err(TextError::FontLoadError(format!("face data for {family:?}"))))
    }

    /// Like [`from_system`](Self::from_system), but each family is resolved
    /// once per process and the face shared by every caller
    ///
    /// Failures are remembered too and logged only on the first lookup.
    #[cfg(feature = "system-fonts")]
    pub fn shared_system(family: &str) -> Option<Self> {
        static FACES: OnceLock<Mutex<FxHashMap<String, Option<FontFace>>>> = OnceLock::new();

        let mut faces = FACES
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        faces
            .entry(family.to_string())
            .or_insert_with(|| match Self::from_system(family) {
                Ok(face) => {
                    tracing::debug!(
                        requested = family,
                        loaded = face.family_name(),
                        "loaded measurement font"
                    );
                    Some(face)
                }
                Err(err) => {
                    tracing::warn!(%err, "no measurement font, falling back to estimates");
                    None
                }
            })
            .clone()
    }

    /// Get the font family name
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Width of a single line of text at `size_px`
    ///
    /// Characters without a glyph use the advance of `.notdef`.
    pub fn line_width(&self, text: &str, size_px: f32) -> f32 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, self.face_index) else {
            return 0.0;
        };

        let notdef = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .unwrap_or(self.units_per_em / 2);

        let units: u32 = text
            .chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .unwrap_or(notdef) as u32
            })
            .sum();

        units as f32 * size_px / self.units_per_em as f32
    }

    /// Line height in pixels at `size_px`
    pub fn line_height_px(&self, size_px: f32) -> f32 {
        self.line_height as f32 * size_px / self.units_per_em as f32
    }
}

/// A text measurer backed by a real font face
///
/// Measures in whichever face it holds, regardless of the family requested
/// by the caller. Without a face every measurement is unavailable, and
/// callers fall back to the estimate.
#[derive(Debug, Clone, Default)]
pub struct FontTextMeasurer {
    face: Option<FontFace>,
}

impl FontTextMeasurer {
    /// Create a measurer with no font loaded
    pub fn new() -> Self {
        Self { face: None }
    }

    /// Create a measurer for an already-loaded face
    pub fn with_face(face: FontFace) -> Self {
        Self { face: Some(face) }
    }

    /// Create a measurer for `font`, looking it up among system fonts
    ///
    /// Never fails: if no font can be loaded the measurer is created empty.
    /// The face is shared with every other measurer for the same family.
    pub fn for_font(font: &FontSpec) -> Self {
        #[cfg(feature = "system-fonts")]
        {
            if let Some(face) = FontFace::shared_system(&font.family) {
                return Self::with_face(face);
            }
        }

        #[cfg(not(feature = "system-fonts"))]
        {
            tracing::debug!(family = %font.family, "system fonts disabled, estimating widths");
        }

        Self::new()
    }

    /// Load a custom font from data
    pub fn load_font_data(&mut self, data: Vec<u8>) -> Result<()> {
        self.face = Some(FontFace::from_data(data)?);
        Ok(())
    }

    /// Whether a face is loaded
    pub fn has_font(&self) -> bool {
        self.face.is_some()
    }
}

impl TextMeasurer for FontTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics> {
        let face = self.face.as_ref()?;
        Some(TextMetrics {
            width: face.line_width(text, font.size_px),
            height: face.line_height_px(font.size_px),
        })
    }
}
