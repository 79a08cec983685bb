//! Sheet walker and record builder: drives one pass over a loaded sheet,
//! detecting teacher cells per column and assembling the
//! (weekday, period) -> occurrences mapping.

use log::warn;

use crate::config::Config;
use crate::error::ParseError;
use crate::excel::{GROUP_ROW, PARITY_COL, PERIOD_COL, SheetGrid, WEEKDAY_COL};
use crate::models::{Occurrence, Parity, SlotKey, Timetable};
use crate::parser::split::{OccurrenceDraft, build_occurrences, split_composite};
use crate::parser::weeks::WeeksResolver;

pub mod split;
pub mod weeks;

pub const DEFAULT_TEACHER_COLUMN_LABEL: &str = "ФИО преподавателя";
const DEFAULT_FIRST_DATA_ROW: u32 = 3;
const EVEN_MARKER: &str = "II";

pub struct TimetableParser {
    teachers: Vec<String>,
    teacher_column_label: String,
    first_data_row: u32,
    weeks: WeeksResolver,
}

/// A teacher cell accepted for record building.
struct Candidate {
    /// Raw text of the teacher cell; may pack several names.
    cell_text: String,
    /// Row whose subject, class-type and classroom columns describe the class.
    effective_row: u32,
    parity_marker: String,
}

impl TimetableParser {
    pub fn new(teachers: Vec<String>) -> Self {
        Self {
            teachers,
            teacher_column_label: DEFAULT_TEACHER_COLUMN_LABEL.to_string(),
            first_data_row: DEFAULT_FIRST_DATA_ROW,
            weeks: WeeksResolver::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            teachers: config.teachers.clone(),
            teacher_column_label: config.teacher_column_label.clone(),
            first_data_row: config.first_data_row,
            weeks: WeeksResolver::new(config.max_week),
        }
    }

    /// Walk the whole sheet and build its result mapping. Any malformed
    /// input fails the parse; no partial result escapes.
    pub fn parse_sheet(&self, grid: &SheetGrid) -> Result<Timetable, ParseError> {
        let mut result = Timetable::new();

        for col in self.usable_teacher_columns(grid) {
            let mut weekday: Option<&str> = None;

            for row in self.first_data_row..grid.height() {
                // Weekday labels are written on their first row only and
                // persist until the next real value appears.
                if !grid.is_continuation(row, WEEKDAY_COL) {
                    if let Some(label) = grid.value(row, WEEKDAY_COL) {
                        weekday = Some(label);
                    }
                }

                let Some(candidate) = self.detect_candidate(grid, row, col)? else {
                    continue;
                };
                self.collect_occurrences(grid, row, col, &candidate, weekday, &mut result)?;
            }
        }

        Ok(result)
    }

    /// Teacher columns with room for the subject and class-type columns
    /// sitting two and one to their left.
    fn usable_teacher_columns(&self, grid: &SheetGrid) -> Vec<u32> {
        grid.teacher_columns(&self.teacher_column_label)
            .into_iter()
            .filter(|col| *col >= 2)
            .collect()
    }

    /// First configured teacher whose name occurs in the cell text.
    fn find_teacher(&self, text: &str) -> Option<&str> {
        self.teachers
            .iter()
            .find(|name| text.contains(name.as_str()))
            .map(String::as_str)
    }

    fn detect_candidate(
        &self,
        grid: &SheetGrid,
        row: u32,
        col: u32,
    ) -> Result<Option<Candidate>, ParseError> {
        if grid.is_continuation(row, col) {
            // A teacher cell merged across both parity halves: the rows
            // after the anchor count as a second occurrence only where
            // their own parity marker reads "II" while the anchor row is
            // still governed by "I".
            if grid.value(row, PARITY_COL) != Some(EVEN_MARKER) {
                return Ok(None);
            }

            let owner_row = grid.anchor_row(row, col)?;
            let Some(cell_text) = grid.value(owner_row, col) else {
                return Ok(None);
            };
            if self.find_teacher(cell_text).is_none() {
                return Ok(None);
            }
            if grid.effective_value(owner_row, PARITY_COL)? == Some(EVEN_MARKER) {
                return Ok(None);
            }

            Ok(Some(Candidate {
                cell_text: cell_text.to_string(),
                effective_row: owner_row,
                parity_marker: EVEN_MARKER.to_string(),
            }))
        } else {
            let Some(cell_text) = grid.value(row, col) else {
                return Ok(None);
            };
            if self.find_teacher(cell_text).is_none() {
                return Ok(None);
            }

            let marker = grid
                .effective_value(row, PARITY_COL)?
                .ok_or(ParseError::MissingValue {
                    row,
                    col: PARITY_COL,
                })?;

            Ok(Some(Candidate {
                cell_text: cell_text.to_string(),
                effective_row: row,
                parity_marker: marker.to_string(),
            }))
        }
    }

    fn collect_occurrences(
        &self,
        grid: &SheetGrid,
        row: u32,
        col: u32,
        candidate: &Candidate,
        weekday: Option<&str>,
        result: &mut Timetable,
    ) -> Result<(), ParseError> {
        let weekday = weekday.ok_or(ParseError::MissingValue {
            row,
            col: WEEKDAY_COL,
        })?;

        let group = required_value(grid, GROUP_ROW, col - 2)?;
        let subject_text = required_value(grid, candidate.effective_row, col - 2)?;
        let class_type = required_value(grid, candidate.effective_row, col - 1)?;
        let classroom = required_value(grid, candidate.effective_row, col + 1)?;

        let period_text = grid
            .effective_value(row, PERIOD_COL)?
            .ok_or(ParseError::MissingValue {
                row,
                col: PERIOD_COL,
            })?;
        let period = period_text
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidPeriod(period_text.to_string()))?;

        let key = SlotKey {
            weekday: weekday.to_string(),
            period,
        };

        let subjects = split_composite(subject_text);
        let drafts = if subjects.len() > 1 {
            build_occurrences(
                &subjects,
                class_type,
                classroom,
                &candidate.parity_marker,
                &self.weeks,
            )?
        } else {
            let parity = Parity::from_marker(&candidate.parity_marker)?;
            let (subject, weeks) = self.weeks.parse_subject_and_weeks(subject_text, parity)?;
            vec![OccurrenceDraft {
                subject,
                weeks,
                class_type: class_type.to_string(),
                classroom: classroom.to_string(),
            }]
        };

        let occurrences: Vec<Occurrence> = drafts
            .into_iter()
            .map(|draft| Occurrence {
                group: group.to_string(),
                subject: draft.subject,
                class_type: draft.class_type,
                classroom: draft.classroom,
                weeks: draft.weeks,
            })
            .collect();

        self.merge_for_teachers(result, &candidate.cell_text, &key, occurrences)
    }

    /// Pair the (possibly composite) teacher cell with the occurrences:
    /// a single class is shared by every recognized teacher, parallel
    /// splits of equal length zip by index, and a lone recognized teacher
    /// takes everything. Other combinations are a mismatch.
    fn merge_for_teachers(
        &self,
        result: &mut Timetable,
        teacher_cell: &str,
        key: &SlotKey,
        occurrences: Vec<Occurrence>,
    ) -> Result<(), ParseError> {
        let segments = split_composite(teacher_cell);
        let resolved: Vec<Option<&str>> = segments
            .iter()
            .map(|segment| {
                let teacher = self.find_teacher(segment);
                if teacher.is_none() {
                    warn!("unrecognized teacher segment {segment:?} in {teacher_cell:?}");
                }
                teacher
            })
            .collect();
        let known: Vec<&str> = resolved.iter().flatten().copied().collect();

        if occurrences.len() == 1 {
            let occurrence = &occurrences[0];
            for teacher in &known {
                result.merge_occurrence(teacher, key.clone(), occurrence.clone());
            }
            Ok(())
        } else if resolved.len() == occurrences.len() {
            for (teacher, occurrence) in resolved.into_iter().zip(occurrences) {
                if let Some(teacher) = teacher {
                    result.merge_occurrence(teacher, key.clone(), occurrence);
                }
            }
            Ok(())
        } else if known.len() == 1 {
            for occurrence in occurrences {
                result.merge_occurrence(known[0], key.clone(), occurrence);
            }
            Ok(())
        } else {
            Err(ParseError::SplitMismatch {
                field: "teacher".to_string(),
                expected: occurrences.len(),
                found: resolved.len(),
            })
        }
    }
}

fn required_value<'g>(grid: &'g SheetGrid, row: u32, col: u32) -> Result<&'g str, ParseError> {
    grid.value(row, col)
        .ok_or(ParseError::MissingValue { row, col })
}
