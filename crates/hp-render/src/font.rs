//! Fonts for text measurement and rasterization.
//!
//! Faces come from the system font database. Machines without any usable
//! sans-serif face still render: measurement falls back to an average glyph
//! width and rasterized text is simply skipped by usvg.

use std::sync::{Arc, OnceLock};

use ab_glyph::FontRef;
use usvg::fontdb::{self, Database, Family, Query};

use crate::att::FontFace;

/// Font family written into SVG `<text>` elements.
pub const SVG_FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

/// Shared system font database, loaded once per process.
///
/// The generic `sans-serif` family is pointed at a face that actually exists
/// so usvg resolves [`SVG_FONT_FAMILY`] on any machine with fonts installed.
pub fn font_database() -> Arc<Database> {
    static DB: OnceLock<Arc<Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        let query = Query { families: &[Family::SansSerif], ..Default::default() };
        if db.query(&query).is_none() {
            let family = db.faces().find_map(|face| face.families.first().map(|(name, _)| name.clone()));
            if let Some(family) = family {
                tracing::debug!(%family, "no default sans-serif face, substituting");
                db.set_sans_serif_family(family);
            }
        }
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}

/// Raw face bytes and collection index.
type FaceData = Option<(Vec<u8>, u32)>;

/// Regular, bold and italic faces used for measuring text.
pub struct FontHandle {
    pub regular: Option<FontRef<'static>>,
    pub bold: Option<FontRef<'static>>,
    pub italic: Option<FontRef<'static>>,
}

impl FontHandle {
    /// Process-wide handle backed by [`font_database`].
    pub fn shared() -> &'static FontHandle {
        static FACES: OnceLock<[FaceData; 3]> = OnceLock::new();
        static HANDLE: OnceLock<FontHandle> = OnceLock::new();
        HANDLE.get_or_init(|| {
            let faces = FACES.get_or_init(|| {
                let db = font_database();
                [
                    load_face(&db, fontdb::Weight::NORMAL, fontdb::Style::Normal),
                    load_face(&db, fontdb::Weight::BOLD, fontdb::Style::Normal),
                    load_face(&db, fontdb::Weight::NORMAL, fontdb::Style::Italic),
                ]
            });
            Self { regular: parse_face(&faces[0]), bold: parse_face(&faces[1]), italic: parse_face(&faces[2]) }
        })
    }

    /// Handle without faces; every measurement uses the width estimate.
    pub fn empty() -> Self {
        Self { regular: None, bold: None, italic: None }
    }

    /// Closest available face, falling back to regular.
    pub fn select(&self, face: FontFace) -> Option<&FontRef<'static>> {
        let styled = match face {
            FontFace::Bold => self.bold.as_ref(),
            FontFace::Italic => self.italic.as_ref(),
            FontFace::Regular => None,
        };
        styled.or(self.regular.as_ref())
    }
}

fn load_face(db: &Database, weight: fontdb::Weight, style: fontdb::Style) -> FaceData {
    let query = Query { families: &[Family::SansSerif], weight, style, ..Default::default() };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| (data.to_vec(), index))
}

fn parse_face(face: &'static FaceData) -> Option<FontRef<'static>> {
    let (bytes, index) = face.as_ref()?;
    FontRef::try_from_slice_and_index(bytes, *index).ok()
}
