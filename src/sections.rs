//! The sections module splits raw model output into the six named guide
//! sections and canonicalizes free-text labels so loosely-worded headers
//! map to fixed keys.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::guide::GuideDraft;

/// Canonical section names, in the order the prompt requests them.
pub const SECTION_NAMES: [&str; 6] = [
    "DATOS",
    "DESARROLLO",
    "ACTIVIDADES",
    "RUBRICA",
    "AUTOEVALUACION",
    "BIBLIOGRAFIA",
];

/// A line of the form `--LABEL--`, whitespace-tolerant.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*--\s*([^-\r\n]+?)\s*--\s*$").expect("Failed to compile MARKER_RE")
});

/// Any canonical marker in literal `--NAME--` form, used by the fallback scan.
static ANY_LITERAL_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)--\s*(?:DATOS|DESARROLLO|ACTIVIDADES|RUBRICA|AUTOEVALUACION|BIBLIOGRAFIA)\s*--")
        .expect("Failed to compile ANY_LITERAL_MARKER_RE")
});

/// Per-name literal markers for the fallback scan.
static LITERAL_MARKERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SECTION_NAMES
        .iter()
        .map(|name| {
            let pattern = format!(r"(?i)--\s*{name}\s*--");
            let marker = Regex::new(&pattern).expect("Failed to compile literal marker");
            (*name, marker)
        })
        .collect()
});

static BLOCK_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Failed to compile BLOCK_SPLIT_RE"));

/// Canonicalizes a free-text field label: strips diacritical marks, removes
/// internal whitespace and upper-cases. Total over arbitrary input; may
/// return an empty string.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Splits raw model output into the six canonical sections.
///
/// Marker lines are scanned first; each section body is the text strictly
/// between its marker and the next one. Labels are matched to canonical names
/// by normalized substring containment in either direction, so pluralized,
/// misspelled or padded labels still land on the right section. Unmatched
/// labels are dropped; duplicate markers for the same section overwrite
/// sequentially (last occurrence wins). When no marker line is found at all,
/// a literal per-name scan runs instead. Sections not found either way stay
/// empty. Never fails.
pub fn split_sections(raw: &str) -> GuideDraft {
    let markers: Vec<(usize, usize, Option<&'static str>)> = MARKER_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            Some((whole.start(), whole.end(), canonical_for(label.as_str())))
        })
        .collect();

    if markers.is_empty() {
        return split_sections_literal(raw);
    }

    let mut draft = GuideDraft::default();
    for (index, marker) in markers.iter().enumerate() {
        let Some(name) = marker.2 else { continue };
        let body_end = markers.get(index + 1).map_or(raw.len(), |next| next.0);
        let body = raw.get(marker.1..body_end).unwrap_or_default().trim();
        assign_section(&mut draft, name, body);
    }
    draft
}

/// Fallback for responses with no valid marker lines: looks for each
/// `--NAME--` literally (handles a model that emits a single section or
/// in-line delimiters).
fn split_sections_literal(raw: &str) -> GuideDraft {
    let mut draft = GuideDraft::default();
    for (name, marker) in LITERAL_MARKERS.iter() {
        let Some(found) = marker.find(raw) else {
            continue;
        };
        let tail = raw.get(found.end()..).unwrap_or_default();
        let body = ANY_LITERAL_MARKER_RE
            .find(tail)
            .map_or(tail, |next| tail.get(..next.start()).unwrap_or_default());
        assign_section(&mut draft, name, body.trim());
    }
    draft
}

/// Maps a found label to a canonical section name via normalized substring
/// containment in either direction.
fn canonical_for(label: &str) -> Option<&'static str> {
    let normalized = normalize_label(label);
    if normalized.is_empty() {
        return None;
    }
    SECTION_NAMES
        .iter()
        .find(|name| normalized.contains(*name) || name.contains(normalized.as_str()))
        .copied()
}

fn assign_section(draft: &mut GuideDraft, name: &str, body: &str) {
    match name {
        "DATOS" => draft.datos = body.to_string(),
        "DESARROLLO" => draft.desarrollo = body.to_string(),
        "ACTIVIDADES" => draft.actividades = body.to_string(),
        "RUBRICA" => draft.rubrica = body.to_string(),
        "AUTOEVALUACION" => draft.autoevaluacion = body.to_string(),
        "BIBLIOGRAFIA" => draft.bibliografia = body.to_string(),
        _ => {}
    }
}

/// Splits text on blank lines into trimmed, non-empty blocks. Shared by the
/// activity, rubric and quiz parsers.
pub(crate) fn split_blocks(text: &str) -> Vec<&str> {
    BLOCK_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}
