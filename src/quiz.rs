//! The quiz module converts the AUTOEVALUACION section into multiple-choice
//! question records, extracting per-question option lists and the marked
//! correct answer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::guide::{QuizOption, QuizQuestion};
use crate::sections::split_blocks;

/// A question number marker ("N.") at the start of a line.
static NUMBER_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s*").expect("Failed to compile NUMBER_MARKER_RE"));

/// Leading numbering already present in a question body ("1." or "1)").
static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*[.)]\s*").expect("Failed to compile LEADING_NUMBER_RE"));

/// A candidate option marker: a single letter followed by a closing paren.
static OPTION_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])\)").expect("Failed to compile OPTION_MARKER_RE"));

/// Trailing correctness annotation: "(LETTER) correcto".
static MARKED_LETTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(([A-Za-z])\)\s*correcto").expect("Failed to compile MARKED_LETTER_RE")
});

static CORRECT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcorrecto\b").expect("Failed to compile CORRECT_WORD_RE"));

/// Inline correctness marker inside option text.
static INLINE_CORRECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*correcto\s*\)").expect("Failed to compile INLINE_CORRECT_RE")
});

/// An option whose remaining text is only the word "correcto" (a parsing
/// artifact of the trailing annotation).
static ONLY_CORRECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*correcto\s*$").expect("Failed to compile ONLY_CORRECT_RE"));

/// Parses an AUTOEVALUACION section into question records.
///
/// Blocks are separated by blank lines. A block containing "N." numbering is
/// split into one question per numbered body; otherwise the whole block is a
/// single question. Questions with no extractable options are still emitted
/// with an empty option list. Total over arbitrary input.
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut questions = Vec::new();
    for block in split_blocks(text) {
        let bodies = extract_numbered_bodies(block);
        if bodies.is_empty() {
            questions.push(parse_question(block));
        } else {
            for body in &bodies {
                questions.push(parse_question(body));
            }
        }
    }
    questions
}

/// Splits a block into bodies delimited by "N." markers at line starts.
fn extract_numbered_bodies(block: &str) -> Vec<String> {
    let markers: Vec<(usize, usize)> = NUMBER_MARKER_RE
        .find_iter(block)
        .map(|found| (found.start(), found.end()))
        .collect();
    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let body_end = markers.get(index + 1).map_or(block.len(), |next| next.0);
            block
                .get(marker.1..body_end)
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect()
}

/// Parses one question body: question text, options, correctness marking and
/// artifact cleanup.
fn parse_question(body: &str) -> QuizQuestion {
    let (question_text, options_text) = split_question_body(body);
    let mut options = parse_options(&options_text);
    mark_correct(&mut options, body);
    QuizQuestion {
        question: LEADING_NUMBER_RE.replace(&question_text, "").to_string(),
        options: clean_options(options),
    }
}

/// A single-line body containing an option marker is split at the first
/// marker; otherwise the first line is the question and the remaining lines
/// are the options text.
fn split_question_body(body: &str) -> (String, String) {
    if !body.contains('\n') {
        return match option_markers(body).first() {
            Some(marker) => {
                let (question_part, options_part) = body.split_at(marker.0);
                (question_part.trim().to_string(), options_part.to_string())
            }
            None => (body.trim().to_string(), String::new()),
        };
    }
    let mut lines = body.lines().map(str::trim).filter(|line| !line.is_empty());
    let question_part = lines.next().unwrap_or_default().to_string();
    let options_part = lines.collect::<Vec<_>>().join("\n");
    (question_part, options_part)
}

/// Extracts "LETTER) text" options, each running until the next letter marker
/// or the end of the text. Letters are upper-cased.
fn parse_options(text: &str) -> Vec<QuizOption> {
    let markers = option_markers(text);
    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let text_end = markers.get(index + 1).map_or(text.len(), |next| next.0);
            QuizOption {
                label: marker.2,
                text: text
                    .get(marker.1..text_end)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                correct: false,
            }
        })
        .collect()
}

/// Finds option markers, skipping letters glued to a preceding word (e.g. the
/// final letter of "palabra)"). A marker wrapped in parentheses, as in the
/// "(A) correcto" annotation, starts at the opening parenthesis so the
/// preceding option text is sliced without it.
fn option_markers(text: &str) -> Vec<(usize, usize, char)> {
    OPTION_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?.as_str().chars().next()?;
            let preceding = text
                .get(..whole.start())
                .and_then(|prefix| prefix.chars().next_back());
            if preceding.is_some_and(char::is_alphanumeric) {
                return None;
            }
            let start = if preceding == Some('(') {
                whole.start().saturating_sub(1)
            } else {
                whole.start()
            };
            Some((start, whole.end(), letter.to_ascii_uppercase()))
        })
        .collect()
}

/// Marks the correct option: a trailing "(LETTER) correcto" annotation wins;
/// only when absent does the inline "correcto" scan over option texts run.
/// Malformed input with several markers is passed through unchanged.
fn mark_correct(options: &mut [QuizOption], body: &str) {
    let marked_letter = MARKED_LETTER_RE
        .captures(body)
        .and_then(|caps| caps.get(1)?.as_str().chars().next())
        .map(|letter| letter.to_ascii_uppercase());
    if let Some(letter) = marked_letter {
        for option in options.iter_mut() {
            if option.label == letter {
                option.correct = true;
            }
        }
        return;
    }
    for option in options.iter_mut() {
        if CORRECT_WORD_RE.is_match(&option.text) {
            option.correct = true;
        }
    }
}

/// Drops residual options whose text is only "correcto" and strips inline
/// "(correcto)" markers from the surviving texts.
fn clean_options(options: Vec<QuizOption>) -> Vec<QuizOption> {
    options
        .into_iter()
        .filter(|option| !ONLY_CORRECT_RE.is_match(&option.text))
        .map(|mut option| {
            option.text = INLINE_CORRECT_RE
                .replace_all(&option.text, "")
                .trim()
                .to_string();
            option
        })
        .collect()
}
