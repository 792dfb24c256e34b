//! The activities module converts the ACTIVIDADES section into activity
//! records and scans it for bibliographic source lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::guide::Activity;
use crate::sections::{normalize_label, split_blocks};

/// A labeled activity line of the form `Label: value`.
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(Título|Titulo|Tema|Descripción|Descripcion|Formato de entrega|Formato|Fecha de entrega|Fecha|Fuente bibliográfica|Fuente)\s*:\s*(.+)$",
    )
    .expect("Failed to compile FIELD_RE")
});

/// A "Fuente ..." line at the start of a line inside an activity block.
static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(?:Fuente bibliogr[aá]fica|Fuente)\s*[:\-–]?\s*(.+)$")
        .expect("Failed to compile SOURCE_RE")
});

/// Parses an ACTIVIDADES section into activity records.
///
/// Blocks are separated by blank lines; one block becomes one activity.
/// Labeled lines assign fields (later labels overwrite earlier ones within a
/// block); lines without a recognized label are appended to the description,
/// space-joined. Total over arbitrary input.
pub fn parse_activities(text: &str) -> Vec<Activity> {
    split_blocks(text)
        .into_iter()
        .map(parse_activity)
        .collect()
}

fn parse_activity(block: &str) -> Activity {
    let mut activity = Activity::default();
    for line in block.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let field = FIELD_RE
            .captures(line)
            .and_then(|caps| Some((caps.get(1)?, caps.get(2)?)));
        match field {
            Some((label, value)) => {
                assign_field(&mut activity, label.as_str(), value.as_str().trim());
            }
            None => append_description(&mut activity, line),
        }
    }
    activity
}

/// Maps a normalized label prefix to the activity field it fills.
fn assign_field(activity: &mut Activity, label: &str, value: &str) {
    let key = normalize_label(label);
    let slot = if key.starts_with("TITU") {
        &mut activity.titulo
    } else if key.starts_with("TEMA") {
        &mut activity.tema
    } else if key.starts_with("DESCRIPCION") {
        &mut activity.descripcion
    } else if key.starts_with("FORMATO") {
        &mut activity.formato
    } else if key.starts_with("FECHA") {
        &mut activity.fecha
    } else if key.starts_with("FUENTE") {
        &mut activity.fuente
    } else {
        &mut activity.extra
    };
    *slot = Some(value.to_string());
}

fn append_description(activity: &mut Activity, line: &str) {
    match activity.descripcion.as_mut() {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(line);
        }
        None => activity.descripcion = Some(line.to_string()),
    }
}

/// Extracts distinct bibliographic sources from "Fuente ..." lines, one per
/// activity block at most, preserving first-seen order. Used by the guide
/// normalizer when the model omitted the bibliography section.
pub fn extract_sources(text: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for block in split_blocks(text) {
        if let Some(caps) = SOURCE_RE.captures(block)
            && let Some(found) = caps.get(1)
        {
            let source = found.as_str().trim().to_string();
            if !source.is_empty() && !sources.contains(&source) {
                sources.push(source);
            }
        }
    }
    sources
}
