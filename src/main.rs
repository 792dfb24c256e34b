//! guiagen is a CLI tool that generates study guides with an LLM model,
//! parses the delimiter-based response into typed sections and stores the
//! normalized guides in a local database.
//!
//! The tool has five commands:
//! 1. `generate` - Generate a guide with an LLM model and save it to a local database
//! 2. `reparse` - Re-run normalization over the raw section text of stored guides
//! 3. `export` - Render stored guides and compose them into a file
//! 4. `list` - List stored guides
//! 5. `remove` - Delete a guide from the database

use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use llm::builder::{LLMBackend, LLMBuilder};
use log::{LevelFilter, info};
use std::str::FromStr;
use url::Url;

use guiagen::{
    GuideTarget, compose::compose, constants::MODEL_API_KEY_ENV_NAME, generate::GuideMeta,
    generate::generate, guide::GuideContext, normalize::reparse_guides, storage::Storage,
};

/// A CLI tool to generate study guides from LLM output
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a study guide with an LLM model and save it to a local database
    Generate {
        /// Path to database file to store guides
        db: String,
        /// URL of the LLM model to use for generation, e.g. openai://gpt-4o-mini
        model: String,
        /// Subject the guide belongs to
        #[arg(long, short)]
        subject: String,
        /// Study unit the guide covers
        #[arg(long, short)]
        unit: String,
        /// Guide number shown on the cover
        #[arg(long, short = 'n', default_value = "")]
        guide_number: String,
        /// Topic for the activities; repeat for up to 4 topics
        #[arg(long, short)]
        topic: Vec<String>,
        /// Week the first activity is due
        #[arg(long, short = 'w', default_value = "Semana 1")]
        start_week: String,
        /// Guide title (defaults to a title derived from subject and number)
        #[arg(long)]
        title: Option<String>,
        /// Cover image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
    },
    /// Re-run normalization over the raw section text of stored guides
    Reparse {
        /// Path to database file to read guides from
        db: String,
        /// Target to reparse: "all" (default) or specify a guide id
        #[arg(long, short = 't', default_value = "all")]
        target: GuideTarget,
    },
    /// Render stored guides and compose them into a file
    Export {
        /// Path to database file to read guides from
        db: String,
        /// Path to output file to compose results to
        output_file: String,
        /// Target to export: "all" (default) or specify a guide id
        #[arg(long, short = 't', default_value = "all")]
        target: GuideTarget,
    },
    /// List stored guides
    List {
        /// Path to database file to read guides from
        db: String,
    },
    /// Delete a guide from the database
    Remove {
        /// Path to database file to read guides from
        db: String,
        /// Id of the guide to delete
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Generate {
            db,
            model,
            subject,
            unit,
            guide_number,
            topic,
            start_week,
            title,
            image_url,
            prompt_file,
        } => {
            let context = GuideContext {
                subject,
                unit,
                guide_number,
                topics: topic,
                start_week,
            };
            let meta = GuideMeta { title, image_url };
            handle_generate_command(db, model, prompt_file, context, meta).await
        }
        Command::Reparse { db, target } => reparse_guides(&db, target).await,
        Command::Export {
            db,
            output_file,
            target,
        } => compose(&db, target, &output_file).await,
        Command::List { db } => handle_list_command(&db),
        Command::Remove { db, id } => handle_remove_command(&db, &id),
    }
}

async fn handle_generate_command(
    db: String,
    model: String,
    prompt_file: Option<String>,
    context: GuideContext,
    meta: GuideMeta,
) -> Result<()> {
    let llm_builder = build_llm(&model)?;

    let prompt_template = match prompt_file {
        Some(file) => {
            let content =
                fs::read_to_string(&file).context(format!("Failed to read prompt file: {file}"))?;
            Some(content)
        }
        None => None,
    };

    let id = generate(&db, llm_builder, prompt_template.as_deref(), context, meta).await?;
    info!("Stored guide {id}");
    Ok(())
}

/// Builds the LLM from a `backend://model` URL, attaching the API key from
/// the environment when present.
fn build_llm(model: &str) -> Result<LLMBuilder> {
    let model_url = Url::parse(model).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;
    let llm_builder = LLMBuilder::new()
        .backend(
            LLMBackend::from_str(model_url.scheme())
                .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
        )
        .model(
            [
                model_url
                    .host_str()
                    .context("Specify model name as host URL.")?,
                model_url.username(),
            ]
            .iter()
            .filter(|x| !x.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(":"),
        );

    Ok(match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => llm_builder.api_key(model_key),
        Err(err) => {
            info!("{err} while providing api key");
            llm_builder
        }
    })
}

fn handle_list_command(db: &str) -> Result<()> {
    let storage = Storage::new(db)?;
    let guides = storage.list_guides()?;
    if guides.is_empty() {
        info!("No guides in the database.");
        return Ok(());
    }
    for (id, title, created_at) in guides {
        let title = if title.is_empty() {
            "(sin título)".to_string()
        } else {
            title
        };
        info!("{id}  {created_at}  {title}");
    }
    Ok(())
}

fn handle_remove_command(db: &str, id: &str) -> Result<()> {
    let storage = Storage::new(db)?;
    if storage.remove_guide(id)? {
        info!("Removed guide {id}");
    } else {
        info!("Guide {id} not found in the database.");
    }
    Ok(())
}
