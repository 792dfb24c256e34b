//! The guide module defines the study guide data model: the normalized Guide
//! record, the raw section draft it is derived from, and the typed records
//! the section parsers produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input parameters a guide is generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideContext {
    /// Subject the guide belongs to (e.g. "Matemática").
    pub subject: String,
    /// Study unit the guide covers.
    pub unit: String,
    /// Guide number shown on the cover.
    pub guide_number: String,
    /// Topics the activities are derived from, display order preserved.
    pub topics: Vec<String>,
    /// Week the first activity is due (only used when building the prompt).
    pub start_week: String,
}

/// Raw guide sections, as returned by the model or hand-edited by the user.
///
/// These text blobs are the source of truth: every parsed view is recomputed
/// from them on demand, so editing a blob and re-parsing is the only update
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideDraft {
    pub datos: String,
    pub desarrollo: String,
    pub actividades: String,
    pub rubrica: String,
    pub autoevaluacion: String,
    /// Joined plain-text form of the bibliography.
    pub bibliografia: String,
    /// Structured form of the bibliography; preferred over the text form
    /// whenever non-empty.
    #[serde(default)]
    pub bibliografia_items: Vec<BibliographyEntry>,
}

/// A fully normalized study guide. Every section is populated, at least with
/// a deterministic placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    /// Opaque unique identifier, assigned at creation time, immutable.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub subject: String,
    pub unit: String,
    pub guide_number: String,
    pub image_url: String,
    pub topics: Vec<String>,
    pub datos: String,
    pub desarrollo: String,
    pub actividades: String,
    pub rubrica: String,
    pub autoevaluacion: String,
    pub bibliografia: String,
    pub bibliografia_items: Vec<BibliographyEntry>,
}

impl Guide {
    /// Creates a guide from generation context and normalized sections,
    /// assigning a fresh id and creation timestamp.
    pub fn new(context: &GuideContext, title: &str, image_url: &str, sections: GuideDraft) -> Self {
        Guide {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            title: title.to_string(),
            subject: context.subject.clone(),
            unit: context.unit.clone(),
            guide_number: context.guide_number.clone(),
            image_url: image_url.to_string(),
            topics: context.topics.clone(),
            datos: sections.datos,
            desarrollo: sections.desarrollo,
            actividades: sections.actividades,
            rubrica: sections.rubrica,
            autoevaluacion: sections.autoevaluacion,
            bibliografia: sections.bibliografia,
            bibliografia_items: sections.bibliografia_items,
        }
    }

    /// Returns the raw section view of the guide, suitable for re-normalization.
    pub fn draft(&self) -> GuideDraft {
        GuideDraft {
            datos: self.datos.clone(),
            desarrollo: self.desarrollo.clone(),
            actividades: self.actividades.clone(),
            rubrica: self.rubrica.clone(),
            autoevaluacion: self.autoevaluacion.clone(),
            bibliografia: self.bibliografia.clone(),
            bibliografia_items: self.bibliografia_items.clone(),
        }
    }

    /// Rebuilds the generation context from the stored metadata.
    pub fn context(&self) -> GuideContext {
        GuideContext {
            subject: self.subject.clone(),
            unit: self.unit.clone(),
            guide_number: self.guide_number.clone(),
            topics: self.topics.clone(),
            start_week: String::new(),
        }
    }

    /// Replaces the guide sections with a re-normalized draft.
    pub fn apply_sections(&mut self, sections: GuideDraft) {
        self.datos = sections.datos;
        self.desarrollo = sections.desarrollo;
        self.actividades = sections.actividades;
        self.rubrica = sections.rubrica;
        self.autoevaluacion = sections.autoevaluacion;
        self.bibliografia = sections.bibliografia;
        self.bibliografia_items = sections.bibliografia_items;
    }
}

/// One citation paired with a resolvable URL. The link is never empty: when
/// no explicit URL is present a search-engine URL derived from the citation
/// text is substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub text: String,
    pub link: String,
}

/// Bibliography input at the boundary: the model sometimes delivers a raw
/// text blob and sometimes an already-structured entry sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BibliographySource {
    Entries(Vec<BibliographyEntry>),
    Text(String),
}

/// One rubric criterion with its three fixed performance bands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub criterion: String,
    pub muy_bien: String,
    pub bien: String,
    pub en_progreso: String,
}

/// One assigned task. All fields are optional; unlabeled block text is
/// collected into `descripcion`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub titulo: Option<String>,
    pub tema: Option<String>,
    pub descripcion: Option<String>,
    pub formato: Option<String>,
    pub fecha: Option<String>,
    pub fuente: Option<String>,
    pub extra: Option<String>,
}

/// One multiple-choice self-assessment question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
}

/// One lettered answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Single letter A-Z, upper-cased on extraction.
    pub label: char,
    pub text: String,
    pub correct: bool,
}
