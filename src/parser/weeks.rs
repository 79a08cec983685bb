//! Week-expression resolver: turns the free-text week annotations embedded
//! in subject names ("1-15", "3,5,7 н.", "кр 2,4 н.") into concrete week
//! sets for the governing parity.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use crate::error::ParseError;
use crate::models::Parity;

/// Plain week annotation: a parenthesized number list/range or a bare one
/// followed by the "н." week marker.
static WEEKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d[\d,\s-]+(?:\s?н\.?)?\)|\d[\d,\s-]+\s?н\.?").unwrap());

/// Exclusion annotation: "кр" (short for "кроме") plus the excluded weeks.
static EXCEPT_WEEKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"кр [\d,\s]+\s?н?\.?").unwrap());

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Input of an exclusion: either raw annotation text still to be parsed or
/// an already resolved week set.
pub enum WeekSource<'a> {
    Raw(&'a str),
    Resolved(BTreeSet<u8>),
}

#[derive(Debug, Clone, Copy)]
pub struct WeeksResolver {
    max_week: u8,
}

impl Default for WeeksResolver {
    fn default() -> Self {
        Self { max_week: 16 }
    }
}

impl WeeksResolver {
    pub fn new(max_week: u8) -> Self {
        Self { max_week }
    }

    /// Every week of the semester belonging to `parity`.
    pub fn universe(&self, parity: Parity) -> BTreeSet<u8> {
        (parity.first_week()..=self.max_week).step_by(2).collect()
    }

    /// Resolve a list ("3,5,7") or range ("1-15") expression. A range must
    /// have exactly two bounds with start <= end and expands with the
    /// parity's stride. Literal weeks outside the parity universe are
    /// dropped: they belong to the other half's rows.
    pub fn resolve(&self, text: &str, parity: Parity) -> Result<BTreeSet<u8>, ParseError> {
        let malformed = || ParseError::MalformedWeekExpression(text.to_string());

        let mut weeks = Vec::new();
        for m in INT_RE.find_iter(text) {
            weeks.push(m.as_str().parse::<u8>().map_err(|_| malformed())?);
        }

        if text.contains('-') {
            if weeks.len() != 2 || weeks[0] > weeks[1] {
                return Err(malformed());
            }
            weeks = (weeks[0]..=weeks[1]).step_by(2).collect();
        }

        let universe = self.universe(parity);
        Ok(weeks.into_iter().filter(|w| universe.contains(w)).collect())
    }

    /// Resolve an exclusion: the parity universe minus the excluded weeks.
    /// An exclusion naming no weeks of the active parity is malformed.
    pub fn resolve_excluding(
        &self,
        source: WeekSource<'_>,
        parity: Parity,
    ) -> Result<BTreeSet<u8>, ParseError> {
        let excluded = match source {
            WeekSource::Raw(text) => self.resolve(text, parity)?,
            WeekSource::Resolved(weeks) => weeks,
        };

        if excluded.is_empty() {
            return Err(ParseError::EmptyExclusion);
        }

        Ok(self
            .universe(parity)
            .difference(&excluded)
            .copied()
            .collect())
    }

    /// Split a subject name with an embedded week annotation and resolve
    /// the annotation. Exclusion markers win over plain week markers; with
    /// no marker at all the subject is valid every week of the parity.
    pub fn parse_subject_and_weeks(
        &self,
        class_name: &str,
        parity: Parity,
    ) -> Result<(String, BTreeSet<u8>), ParseError> {
        if let Some(m) = EXCEPT_WEEKS_RE.find(class_name) {
            let (subject, weeks_text) = split_subject_and_weeks(class_name, &m);
            let weeks = self.resolve_excluding(WeekSource::Raw(&weeks_text), parity)?;
            Ok((subject, weeks))
        } else if let Some(m) = WEEKS_RE.find(class_name) {
            let (subject, weeks_text) = split_subject_and_weeks(class_name, &m);
            let weeks = self.resolve(&weeks_text, parity)?;
            Ok((subject, weeks))
        } else {
            Ok((class_name.trim().to_string(), self.universe(parity)))
        }
    }
}

/// An annotation at the very start of the text leaves the subject after
/// it; anywhere else the subject is everything before the match.
fn split_subject_and_weeks(full_text: &str, m: &Match<'_>) -> (String, String) {
    let subject = if m.start() == 0 {
        &full_text[m.end()..]
    } else {
        &full_text[..m.start()]
    };

    (subject.trim().to_string(), m.as_str().trim().to_string())
}
