//! The normalize module orchestrates the section parsers over a raw guide
//! draft and guarantees every section ends up with a sane value, so the
//! rendering and persistence layers never see an absent field.

use anyhow::Result;
use log::{debug, error, info};

use crate::GuideTarget;
use crate::activities::extract_sources;
use crate::bibliography::{entry_from_line, make_search_url, parse_bibliography};
use crate::constants::DEFAULT_RUBRIC_TABLE;
use crate::guide::{BibliographyEntry, BibliographySource, GuideContext, GuideDraft};
use crate::rubric::sanitize_rubric_text;
use crate::storage::Storage;

/// Normalizes a raw guide draft into a complete one.
///
/// Missing sections are filled with deterministic fallbacks: datos is
/// synthesized from the generation context, the rubric falls back to the
/// default four-criterion table, the self-assessment to ten template
/// questions, and the bibliography is resolved through a strictly sequential
/// chain (structured items, then the text section, then activity source
/// lines, then a single synthesized entry). Running the function twice
/// yields the same draft. Total over arbitrary input; never fails.
pub fn normalize_guide(draft: &GuideDraft, context: &GuideContext) -> GuideDraft {
    let actividades = draft.actividades.trim().to_string();
    let bibliografia_items = resolve_bibliography(draft, &actividades, context);
    let bibliografia = join_entries(&bibliografia_items);
    GuideDraft {
        datos: ensure_datos(&draft.datos, context),
        desarrollo: draft.desarrollo.trim().to_string(),
        actividades,
        rubrica: ensure_rubrica(&draft.rubrica),
        autoevaluacion: ensure_autoevaluacion(&draft.autoevaluacion, &context.topics),
        bibliografia,
        bibliografia_items,
    }
}

/// Re-runs normalization over the raw section text of stored guides, so
/// hand-edited sections regain their fallbacks and derived bibliography.
///
/// # Errors
///
/// Returns an error if database operations fail
pub async fn reparse_guides(db_path: &str, target: GuideTarget) -> Result<()> {
    let storage = Storage::new(db_path)?;
    let ids = match target {
        GuideTarget::All => storage.list_ids()?,
        GuideTarget::Guide { id } => vec![id],
    };

    let mut processed = 0;
    for id in &ids {
        let mut guide = match storage.get_guide(id)? {
            Some(guide) => guide,
            None => {
                error!("Guide not found: {id}");
                continue;
            }
        };
        let normalized = normalize_guide(&guide.draft(), &guide.context());
        guide.apply_sections(normalized);
        storage.upsert_guide(&guide)?;
        debug!("Reparsed guide: {id}");
        processed += 1;
    }

    info!("Reparsed {processed} guides");
    Ok(())
}

/// Synthesizes the DATOS section from the generation context when the model
/// omitted it, listing only the fields that are present.
fn ensure_datos(raw: &str, context: &GuideContext) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    let mut lines = Vec::new();
    if !context.guide_number.trim().is_empty() {
        lines.push(format!("Número de guía: {}", context.guide_number.trim()));
    }
    if !context.subject.trim().is_empty() {
        lines.push(format!("Asignatura: {}", context.subject.trim()));
    }
    if !context.unit.trim().is_empty() {
        lines.push(format!("Unidad de estudio: {}", context.unit.trim()));
    }
    let topics: Vec<&str> = context
        .topics
        .iter()
        .map(|topic| topic.trim())
        .filter(|topic| !topic.is_empty())
        .collect();
    if !topics.is_empty() {
        lines.push(format!("Temas: {}", topics.join("; ")));
    }
    lines.join("\n")
}

/// Sanitizes leaked score annotations and falls back to the default table.
fn ensure_rubrica(raw: &str) -> String {
    let sanitized = sanitize_rubric_text(raw);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        DEFAULT_RUBRIC_TABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Synthesizes ten template questions cycling through the topics, each with
/// four lettered options and option B marked correct. A deterministic
/// placeholder, not meant as real content.
fn ensure_autoevaluacion(raw: &str, topics: &[String]) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    let first_topic = topics
        .iter()
        .map(|topic| topic.trim())
        .find(|topic| !topic.is_empty());
    let questions: Vec<String> = (0..10)
        .map(|index| {
            let theme = topics
                .get(index)
                .map(|topic| topic.trim())
                .filter(|topic| !topic.is_empty())
                .or(first_topic)
                .unwrap_or("Tema");
            format!(
                "{}. Pregunta sobre {theme}\nA) Opción A\nB) Opción B (correcto)\nC) Opción C\nD) Opción D",
                index + 1
            )
        })
        .collect();
    questions.join("\n\n")
}

/// Resolution order: structured items, bibliography text, activity source
/// lines, synthesized fallback entry. First non-empty result wins.
fn resolve_bibliography(
    draft: &GuideDraft,
    actividades: &str,
    context: &GuideContext,
) -> Vec<BibliographyEntry> {
    if !draft.bibliografia_items.is_empty() {
        return parse_bibliography(&BibliographySource::Entries(
            draft.bibliografia_items.clone(),
        ));
    }
    if !draft.bibliografia.trim().is_empty() {
        return parse_bibliography(&BibliographySource::Text(draft.bibliografia.clone()));
    }
    let sources = extract_sources(actividades);
    if !sources.is_empty() {
        return sources.iter().map(|source| entry_from_line(source)).collect();
    }
    let fallback = context
        .topics
        .iter()
        .map(|topic| topic.trim())
        .find(|topic| !topic.is_empty())
        .or_else(|| Some(context.unit.trim()).filter(|unit| !unit.is_empty()))
        .or_else(|| Some(context.subject.trim()).filter(|subject| !subject.is_empty()))
        .unwrap_or("Recurso general");
    vec![BibliographyEntry {
        text: format!("Recursos sobre {fallback}"),
        link: make_search_url(fallback),
    }]
}

/// Joins structured entries back into the plain-text form, one
/// "citation | link" per line.
fn join_entries(entries: &[BibliographyEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} | {}", entry.text, entry.link))
        .collect::<Vec<_>>()
        .join("\n")
}
