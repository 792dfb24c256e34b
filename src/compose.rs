//! The compose module renders stored guides into a plain-text/markdown
//! document and writes it to an output file.

use anyhow::Result;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::OpenOptions;
use std::io::Write;

use crate::GuideTarget;
use crate::activities::parse_activities;
use crate::guide::{Activity, Guide};
use crate::quiz::parse_quiz;
use crate::rubric::parse_rubric;
use crate::storage::Storage;

/// A "Número de guía: N" line inside the DATOS section.
static GUIDE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:n[úu]mero|nro)\s*(?:de\s*)?gu[íi]a\s*[:\-–]?\s*(.+)$")
        .expect("Failed to compile GUIDE_NUMBER_RE")
});

/// Composes the output file by reading guides from the database and writing
/// their rendered form to the specified output file.
///
/// # Arguments
///
/// * `db_path` - Path to the database containing stored guides
/// * `target` - The guides to export (all or one id)
/// * `output_path` - Path to the output file where the rendered guides will be written
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if any operation fails
///
/// # Errors
///
/// Returns an error if:
/// * Database operations fail
/// * File operations fail
pub async fn compose(db_path: &str, target: GuideTarget, output_path: &str) -> Result<()> {
    let storage = Storage::new(db_path)?;

    info!("Composing guides from database {db_path} to {output_path}...");

    let ids = match target {
        GuideTarget::All => storage.list_ids()?,
        GuideTarget::Guide { id } => vec![id],
    };

    let mut processed_count = 0;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(output_path)?;

    for id in &ids {
        let guide = match storage.get_guide(id)? {
            Some(guide) => guide,
            None => {
                warn!("Guide not found: {id}");
                continue;
            }
        };

        file.write_all(render_guide(&guide).as_bytes())?;
        processed_count += 1;
    }

    info!("Composed {processed_count} guides to {output_path}");
    Ok(())
}

/// Renders a guide as a standalone document: cover title, raw DATOS and
/// DESARROLLO text, and the parsed views of the remaining sections.
pub fn render_guide(guide: &Guide) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", cover_title(guide)));
    push_section(&mut out, "DATOS", guide.datos.trim());
    push_section(&mut out, "DESARROLLO", guide.desarrollo.trim());
    push_section(
        &mut out,
        "ACTIVIDADES",
        &render_activities(&guide.actividades),
    );
    push_section(&mut out, "RÚBRICA", &render_rubric(&guide.rubrica));
    push_section(
        &mut out,
        "AUTOEVALUACIÓN",
        &render_quiz(&guide.autoevaluacion),
    );
    push_section(&mut out, "BIBLIOGRAFÍA", &render_bibliography(guide));
    out
}

/// Builds the cover title: the guide number field wins, then a "Número de
/// guía" line found inside DATOS, then the id.
fn cover_title(guide: &Guide) -> String {
    let number = Some(guide.guide_number.trim())
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .or_else(|| guide_number_from_datos(&guide.datos))
        .unwrap_or_else(|| guide.id.clone());
    let name = Some(guide.subject.trim())
        .filter(|field| !field.is_empty())
        .unwrap_or_else(|| guide.title.trim());
    if name.is_empty() {
        let fallback = guide.title.trim();
        return if fallback.is_empty() {
            "Guía de Estudio".to_string()
        } else {
            fallback.to_string()
        };
    }
    format!("Guía de Estudio Nro. {number} de {name}")
}

/// Extracts the guide number from a "Número de guía: N" line in DATOS.
pub fn guide_number_from_datos(datos: &str) -> Option<String> {
    let caps = GUIDE_NUMBER_RE.captures(datos)?;
    let number = caps.get(1)?.as_str().trim();
    Some(number.to_string()).filter(|found| !found.is_empty())
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    out.push_str(&format!("## {heading}\n"));
    if body.is_empty() {
        out.push_str("(sin contenido)\n\n");
    } else {
        out.push_str(body.trim_end());
        out.push_str("\n\n");
    }
}

fn render_activities(text: &str) -> String {
    let activities = parse_activities(text);
    let mut out = String::new();
    for (index, activity) in activities.iter().enumerate() {
        out.push_str(&format!("### Actividad {}\n", index + 1));
        out.push_str(&format!("{}\n", activity_body(activity)));
        if let Some(formato) = &activity.formato {
            out.push_str(&format!("Formato: {formato}\n"));
        }
        if let Some(fecha) = &activity.fecha {
            out.push_str(&format!("Fecha: {fecha}\n"));
        }
        if let Some(fuente) = &activity.fuente {
            out.push_str(&format!("Fuente: {fuente}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Body line shown for an activity: description, else title, else topic.
fn activity_body(activity: &Activity) -> &str {
    activity
        .descripcion
        .as_deref()
        .or(activity.titulo.as_deref())
        .or(activity.tema.as_deref())
        .unwrap_or_default()
}

/// Renders the rubric as a markdown table. The point values are fixed by the
/// presentation layer, which is why the parser strips any the model leaks.
fn render_rubric(text: &str) -> String {
    let mut out = String::from(
        "| Criterio | Muy bien (2.5 pts) | Bien (1.75 pts) | En progreso (1 pt) |\n| --- | --- | --- | --- |\n",
    );
    for row in parse_rubric(text) {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.criterion, row.muy_bien, row.bien, row.en_progreso
        ));
    }
    out.trim_end().to_string()
}

/// Renders the self-assessment questions. Correct answers are deliberately
/// not revealed in the exported document.
fn render_quiz(text: &str) -> String {
    let questions = parse_quiz(text);
    let mut out = String::new();
    for (index, question) in questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, question.question));
        for option in &question.options {
            out.push_str(&format!("{}) {}\n", option.label, option.text));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn render_bibliography(guide: &Guide) -> String {
    let mut out = String::new();
    for (index, entry) in guide.bibliografia_items.iter().enumerate() {
        out.push_str(&format!("{}. {} | {}\n", index + 1, entry.text, entry.link));
    }
    if out.is_empty() {
        return guide.bibliografia.trim().to_string();
    }
    out.trim_end().to_string()
}
