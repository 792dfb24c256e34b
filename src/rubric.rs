//! The rubric module converts the RUBRICA section into exactly four criteria
//! with three fixed performance bands each. Two input shapes are recognized:
//! a pipe-delimited table and label-based blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::guide::RubricCriterion;
use crate::sections::split_blocks;

/// Number of criteria every rubric normalizes to.
pub const RUBRIC_CRITERIA: usize = 4;

/// A markdown separator row made only of dashes and pipes.
static SEPARATOR_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?\s*-{3,}").expect("Failed to compile SEPARATOR_ROW_RE"));

static HEADER_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)criteri|muy bien|bien|en progreso").expect("Failed to compile HEADER_ROW_RE")
});

/// A block header of the form "Criterio(s)[:-] <title>".
static CRITERION_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Criterios?\s*[:-]?\s*(.+)$").expect("Failed to compile CRITERION_HEADER_RE")
});

static EVALUATION_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)evaluac").expect("Failed to compile EVALUATION_WORD_RE"));

/// "Nivel N: text" occurrences anywhere in a block.
static LEVEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Nivel\s*(\d+)\s*[: -]?\s*(.+)").expect("Failed to compile LEVEL_RE")
});

/// Explicitly labeled level lines, with or without internal spaces.
static LABELED_LEVEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Muy\s*bien|Bien|En\s*progreso)\s*[:\-–]?\s*(.+)$")
        .expect("Failed to compile LABELED_LEVEL_RE")
});

/// Parenthesized text leaking numeric scores, e.g. "(4 puntos)" or "(2.5 pts)".
static SCORE_PAREN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\([^)]*(?:\d|pts?|puntos?)[^)]*\)").expect("Failed to compile SCORE_PAREN_RE")
});

/// Parses a RUBRICA section into exactly four criteria.
///
/// A pipe character anywhere in a non-separator line selects the table
/// strategy; otherwise the text is read as label-based blocks. Fewer than
/// four detected criteria are padded with placeholders; extra ones are
/// dropped. Total over arbitrary input.
pub fn parse_rubric(text: &str) -> Vec<RubricCriterion> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return pad_criteria(Vec::new());
    }
    let has_table = trimmed
        .lines()
        .map(str::trim)
        .any(|line| line.contains('|') && !SEPARATOR_ROW_RE.is_match(line));
    let rows = if has_table {
        parse_table(trimmed)
    } else {
        parse_label_blocks(trimmed)
    };
    pad_criteria(rows)
}

/// Removes parenthesized score annotations from rubric text so the model
/// cannot leak point values that conflict with the fixed ones the rendering
/// layer assigns.
pub fn sanitize_rubric_text(text: &str) -> String {
    SCORE_PAREN_RE.replace_all(text, "").to_string()
}

fn pad_criteria(mut rows: Vec<RubricCriterion>) -> Vec<RubricCriterion> {
    rows.truncate(RUBRIC_CRITERIA);
    while rows.len() < RUBRIC_CRITERIA {
        rows.push(RubricCriterion {
            criterion: format!("Criterio {}", rows.len() + 1),
            muy_bien: "-".to_string(),
            bien: "-".to_string(),
            en_progreso: "-".to_string(),
        });
    }
    rows
}

/// Table shape: every line containing a pipe is a row, separator rows are
/// discarded and a leading header row is dropped.
fn parse_table(text: &str) -> Vec<RubricCriterion> {
    let table_lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('|') && !SEPARATOR_ROW_RE.is_match(line))
        .collect();

    let mut body: &[&str] = &table_lines;
    if let Some((first, rest)) = table_lines.split_first()
        && HEADER_ROW_RE.is_match(first)
    {
        body = rest;
    }

    let mut rows = Vec::new();
    for line in body {
        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .enumerate()
            .filter(|(position, cell)| !(*position == 0 && cell.is_empty()))
            .map(|(_, cell)| cell)
            .collect();
        if cells.is_empty() {
            continue;
        }
        let cell = |index: usize| cells.get(index).copied().unwrap_or_default().to_string();
        let first_cell = cell(0);
        rows.push(RubricCriterion {
            criterion: if first_cell.is_empty() {
                "Criterio".to_string()
            } else {
                first_cell
            },
            muy_bien: cell(1),
            bien: cell(2),
            en_progreso: cell(3),
        });
    }
    rows
}

/// Block shape: one criterion per blank-line-separated block, levels taken
/// from "Nivel N" occurrences and explicitly labeled lines. Both passes write
/// into the same level slots; repeats append, space-joined.
fn parse_label_blocks(text: &str) -> Vec<RubricCriterion> {
    let mut rows = Vec::new();
    for block in split_blocks(text) {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let title = lines
            .iter()
            .find_map(|line| header_title(line))
            .or_else(|| lines.first().map(|line| (*line).to_string()))
            .unwrap_or_else(|| "Criterio".to_string());

        let mut levels: [String; 3] = Default::default();
        for caps in LEVEL_RE.captures_iter(block) {
            let number = caps
                .get(1)
                .and_then(|digits| digits.as_str().parse::<usize>().ok());
            if let (Some(number), Some(value)) = (number, caps.get(2))
                && let Some(slot) = number.checked_sub(1).and_then(|idx| levels.get_mut(idx))
            {
                append_level(slot, value.as_str().trim());
            }
        }
        for line in &lines {
            apply_labeled_level(&mut levels, line);
        }

        let [en_progreso, bien, muy_bien] = levels;
        rows.push(RubricCriterion {
            criterion: title,
            muy_bien,
            bien,
            en_progreso,
        });
    }
    rows
}

/// Maps "Muy bien"/"Bien"/"En progreso" labeled lines to levels 3/2/1.
fn apply_labeled_level(levels: &mut [String; 3], line: &str) {
    let Some(caps) = LABELED_LEVEL_RE.captures(line) else {
        return;
    };
    let (Some(label), Some(value)) = (caps.get(1), caps.get(2)) else {
        return;
    };
    let key = label.as_str().to_lowercase().replace(char::is_whitespace, "");
    let slot = if key.starts_with("muy") {
        levels.get_mut(2)
    } else if key.starts_with("bien") {
        levels.get_mut(1)
    } else if key.starts_with("en") {
        levels.get_mut(0)
    } else {
        None
    };
    if let Some(slot) = slot {
        append_level(slot, value.as_str().trim());
    }
}

fn append_level(slot: &mut String, value: &str) {
    if !slot.is_empty() {
        slot.push(' ');
    }
    slot.push_str(value);
}

/// Extracts a criterion title from a header-looking line; rejects titles that
/// are just the word "evaluación" or shorter than three characters.
fn header_title(line: &str) -> Option<String> {
    let caps = CRITERION_HEADER_RE.captures(line)?;
    let title = caps.get(1)?.as_str().trim();
    if title.chars().count() < 3 || EVALUATION_WORD_RE.is_match(title) {
        return None;
    }
    Some(title.to_string())
}
