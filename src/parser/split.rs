//! Composite-cell splitting. A single cell can pack several parallel
//! values ("Физика(1-5)+Химия(7-11)"); the split lists from sibling
//! columns must then be zipped by position or broadcast.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::models::Parity;
use crate::parser::weeks::WeeksResolver;

/// Multi-value delimiters: `+`, newline, tab, or a run of two or more
/// spaces. A single space is part of a value, never a delimiter.
static DELIMITER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\n\t]| {2,}").unwrap());

/// Occurrence under construction: everything but the group, which the
/// sheet walker fills in from the header area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceDraft {
    pub subject: String,
    pub weeks: BTreeSet<u8>,
    pub class_type: String,
    pub classroom: String,
}

/// Split a cell's text on the composite delimiters. A one-element result
/// means the cell is not composite.
pub fn split_composite(text: &str) -> Vec<&str> {
    DELIMITER_RE
        .split(text)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Align one sibling field against the drafts: equal counts zip by index,
/// a single value broadcasts to every draft, anything else is a mismatch
/// rather than a silent truncation.
fn align_field<F>(
    drafts: &mut [OccurrenceDraft],
    field: &str,
    text: &str,
    mut assign: F,
) -> Result<(), ParseError>
where
    F: FnMut(&mut OccurrenceDraft, String),
{
    let parts = split_composite(text);

    if parts.len() == drafts.len() {
        for (draft, part) in drafts.iter_mut().zip(parts) {
            assign(draft, part.to_string());
        }
    } else if parts.len() == 1 {
        for draft in drafts.iter_mut() {
            assign(draft, text.trim().to_string());
        }
    } else {
        return Err(ParseError::SplitMismatch {
            field: field.to_string(),
            expected: drafts.len(),
            found: parts.len(),
        });
    }

    Ok(())
}

/// Build one draft per subject text, resolving each subject's week
/// annotation under the given parity marker, then align class type and
/// classroom against the subjects.
pub fn build_occurrences(
    subjects: &[&str],
    class_type: &str,
    classroom: &str,
    parity_marker: &str,
    resolver: &WeeksResolver,
) -> Result<Vec<OccurrenceDraft>, ParseError> {
    let parity = Parity::from_marker(parity_marker)?;

    let mut drafts = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let (name, weeks) = resolver.parse_subject_and_weeks(subject, parity)?;
        drafts.push(OccurrenceDraft {
            subject: name,
            weeks,
            class_type: String::new(),
            classroom: String::new(),
        });
    }

    align_field(&mut drafts, "class type", class_type, |draft, value| {
        draft.class_type = value;
    })?;
    align_field(&mut drafts, "classroom", classroom, |draft, value| {
        draft.classroom = value;
    })?;

    Ok(drafts)
}
