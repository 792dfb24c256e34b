//! The generate module handles the round trip to the LLM model: building the
//! study guide prompt, requesting the response and turning the raw text into
//! a guide draft.

use anyhow::Result;
use llm::builder::LLMBuilder;
use llm::chat::{ChatMessage, ChatProvider};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DEFAULT_PROMPT_TEMPLATE, THINK_STRIPPER};
use crate::guide::{Guide, GuideContext, GuideDraft};
use crate::normalize::normalize_guide;
use crate::sections::split_sections;
use crate::storage::Storage;

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Configuration containing shared data for generation operations
pub struct GenerateContext<'a> {
    /// LLM model to use for generation
    pub model: &'a dyn ChatProvider,
    /// Prompt template to use
    pub prompt_template: Option<&'a str>,
}

/// Extra presentation metadata attached to a generated guide.
#[derive(Debug, Clone, Default)]
pub struct GuideMeta {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// Generates a study guide with the LLM model, normalizes the response and
/// stores the resulting guide in the database.
///
/// # Arguments
///
/// * `db_path` - Path to the database where the guide will be stored
/// * `llm_builder` - The LLM builder to create the model for processing
/// * `prompt_template` - Optional prompt template to use
/// * `context` - Subject, unit, guide number, topics and start week
/// * `meta` - Optional title and cover image URL
///
/// # Returns
///
/// Returns the id of the stored guide on success
///
/// # Errors
///
/// Returns an error if:
/// * The LLM model fails to build
/// * The LLM chat operation fails
/// * Database operations fail
pub async fn generate(
    db_path: &str,
    llm_builder: LLMBuilder,
    prompt_template: Option<&str>,
    context: GuideContext,
    meta: GuideMeta,
) -> Result<String> {
    let model = llm_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))?;

    let generate_context = GenerateContext {
        model: model.as_ref(),
        prompt_template,
    };

    let draft = generate_draft(&context, &generate_context).await?;
    let normalized = normalize_guide(&draft, &context);
    let guide = Guide::new(
        &context,
        meta.title.as_deref().unwrap_or_default(),
        meta.image_url.as_deref().unwrap_or_default(),
        normalized,
    );

    let storage = Storage::new(db_path)?;
    storage.upsert_guide(&guide)?;

    info!("Generated guide {} in {db_path}", guide.id);
    Ok(guide.id)
}

/// Requests a guide from the model and splits the response into sections.
///
/// # Errors
///
/// Returns an error if the LLM chat operation fails
pub async fn generate_draft(
    context: &GuideContext,
    generate_context: &GenerateContext<'_>,
) -> Result<GuideDraft> {
    let raw = request_guide_text(context, generate_context).await?;
    Ok(split_sections(&raw))
}

/// Requests the raw guide text from the LLM model.
///
/// The prompt template placeholders `{subject}`, `{unit}`, `{topics}` and
/// `{start_week}` are filled from the context; `<think>` reasoning tags are
/// stripped from the response.
///
/// # Errors
///
/// Returns an error if the LLM chat operation fails
pub async fn request_guide_text(
    context: &GuideContext,
    generate_context: &GenerateContext<'_>,
) -> Result<String> {
    let prompt = build_prompt(context, generate_context.prompt_template);
    let messages = vec![ChatMessage::user().content(prompt).build()];

    let response = generate_context
        .model
        .chat(&messages)
        .await
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?
        .to_string();

    Ok(THINK_STRIPPER_REGEX
        .replace_all(&response, "")
        .trim()
        .to_owned())
}

/// Fills the prompt template from the generation context. Topics are
/// rendered as a numbered list.
pub fn build_prompt(context: &GuideContext, prompt_template: Option<&str>) -> String {
    let template = prompt_template.unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    let topics_list = context
        .topics
        .iter()
        .enumerate()
        .map(|(index, topic)| format!("{}. {topic}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    template
        .replace("{subject}", &context.subject)
        .replace("{unit}", &context.unit)
        .replace("{topics}", &topics_list)
        .replace("{start_week}", &context.start_week)
}
