//! Core data structures shared by the parser and the database layer.

use std::collections::{BTreeSet, HashMap};

use crate::error::ParseError;

/// Which half of the semester a row belongs to. The grid marks it with a
/// literal "I" (odd weeks) or "II" (even weeks) in the parity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn from_marker(marker: &str) -> Result<Self, ParseError> {
        match marker.trim() {
            "I" => Ok(Parity::Odd),
            "II" => Ok(Parity::Even),
            other => Err(ParseError::UnknownParityMarker(other.to_string())),
        }
    }

    /// First week of this parity's universe.
    pub fn first_week(self) -> u8 {
        match self {
            Parity::Odd => 1,
            Parity::Even => 2,
        }
    }
}

/// Position of one class in the week: weekday label plus period number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub weekday: String,
    pub period: i32,
}

/// One concrete class entry for a teacher and slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub group: String,
    pub subject: String,
    pub class_type: String,
    pub classroom: String,
    pub weeks: BTreeSet<u8>,
}

impl Occurrence {
    /// Two occurrences describe the same class when everything but the
    /// week set matches; such duplicates are merged by week-set union.
    fn same_class(&self, other: &Occurrence) -> bool {
        self.group == other.group
            && self.subject == other.subject
            && self.class_type == other.class_type
            && self.classroom == other.classroom
    }
}

/// Result mapping of one sheet: teacher name -> slot -> occurrences.
/// Built fresh per sheet and handed whole to the database layer.
#[derive(Debug, Default, PartialEq)]
pub struct Timetable {
    slots: HashMap<String, HashMap<SlotKey, Vec<Occurrence>>>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one occurrence, unioning week sets instead of appending a
    /// duplicate entry when the same class is already present under the
    /// same teacher and slot.
    pub fn merge_occurrence(&mut self, teacher: &str, key: SlotKey, occurrence: Occurrence) {
        let entries = self
            .slots
            .entry(teacher.to_string())
            .or_default()
            .entry(key)
            .or_default();

        match entries.iter_mut().find(|e| e.same_class(&occurrence)) {
            Some(existing) => existing.weeks.extend(occurrence.weeks),
            None => entries.push(occurrence),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<SlotKey, Vec<Occurrence>>)> {
        self.slots.iter().map(|(teacher, slots)| (teacher.as_str(), slots))
    }

    pub fn get(&self, teacher: &str) -> Option<&HashMap<SlotKey, Vec<Occurrence>>> {
        self.slots.get(teacher)
    }

    pub fn teacher_count(&self) -> usize {
        self.slots.len()
    }

    pub fn occurrence_count(&self) -> usize {
        self.slots
            .values()
            .flat_map(|slots| slots.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
