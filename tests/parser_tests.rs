use std::collections::BTreeSet;

use timegrid::error::ParseError;
use timegrid::excel::{MergeSpan, SheetGrid};
use timegrid::models::SlotKey;
use timegrid::parser::TimetableParser;

// Sheet geometry used throughout: the teacher-column label sits in
// column 8, so teacher names are read from column 7, subjects from
// column 5, class types from column 6 and classrooms from column 8.

fn grid(rows: &[&[&str]], merges: Vec<MergeSpan>) -> SheetGrid {
    let cells = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some((*cell).to_string())
                    }
                })
                .collect()
        })
        .collect();

    SheetGrid::new(cells, merges)
}

fn span(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> MergeSpan {
    MergeSpan {
        first_row,
        first_col,
        last_row,
        last_col,
    }
}

fn parser() -> TimetableParser {
    TimetableParser::new(vec![
        "Иванов М.Е.".to_string(),
        "Петров А.А.".to_string(),
    ])
}

fn header_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec![""; 9],
        vec!["", "", "", "", "", "ИКБО-01-20", "", "", ""],
        vec!["", "", "", "", "", "", "", "", "ФИО преподавателя"],
    ]
}

fn weeks(values: &[u8]) -> BTreeSet<u8> {
    values.iter().copied().collect()
}

#[test]
fn single_subject_cell_yields_one_occurrence() {
    let mut rows = header_rows();
    rows.push(vec![
        "Понедельник",
        "1",
        "",
        "",
        "I",
        "Физика(1-5)",
        "лек.",
        "доц. Иванов М.Е., к.208",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    let timetable = parser().parse_sheet(&sheet).unwrap();

    let key = SlotKey {
        weekday: "Понедельник".to_string(),
        period: 1,
    };
    let entries = &timetable.get("Иванов М.Е.").unwrap()[&key];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].group, "ИКБО-01-20");
    assert_eq!(entries[0].subject, "Физика");
    assert_eq!(entries[0].class_type, "лек.");
    assert_eq!(entries[0].classroom, "305");
    assert_eq!(entries[0].weeks, weeks(&[1, 3, 5]));
}

#[test]
fn teacher_cell_spanning_both_parity_halves_unions_week_sets() {
    let mut rows = header_rows();
    rows.push(vec![
        "Понедельник",
        "1",
        "",
        "",
        "I",
        "Физика",
        "лек.",
        "Иванов М.Е.",
        "305",
    ]);
    rows.push(vec!["", "", "", "", "II", "", "", "", ""]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    // The period number and the teacher cell are merged across both rows.
    let sheet = grid(&rows, vec![span(3, 1, 4, 1), span(3, 7, 4, 7)]);

    let timetable = parser().parse_sheet(&sheet).unwrap();

    let key = SlotKey {
        weekday: "Понедельник".to_string(),
        period: 1,
    };
    let entries = &timetable.get("Иванов М.Е.").unwrap()[&key];
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].weeks,
        weeks(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16])
    );
}

#[test]
fn composite_teachers_pair_with_composite_subjects_positionally() {
    let mut rows = header_rows();
    rows.push(vec![
        "Вторник",
        "2",
        "",
        "",
        "I",
        "Физика(1-5)+Химия(7-11)",
        "лек.",
        "Иванов М.Е.+Петров А.А.",
        "305  306",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    let timetable = parser().parse_sheet(&sheet).unwrap();

    let key = SlotKey {
        weekday: "Вторник".to_string(),
        period: 2,
    };

    let ivanov = &timetable.get("Иванов М.Е.").unwrap()[&key];
    assert_eq!(ivanov.len(), 1);
    assert_eq!(ivanov[0].subject, "Физика");
    assert_eq!(ivanov[0].classroom, "305");
    assert_eq!(ivanov[0].weeks, weeks(&[1, 3, 5]));

    let petrov = &timetable.get("Петров А.А.").unwrap()[&key];
    assert_eq!(petrov.len(), 1);
    assert_eq!(petrov[0].subject, "Химия");
    assert_eq!(petrov[0].classroom, "306");
    assert_eq!(petrov[0].weeks, weeks(&[7, 9, 11]));

    // The single class type broadcasts to both.
    assert_eq!(ivanov[0].class_type, "лек.");
    assert_eq!(petrov[0].class_type, "лек.");
}

#[test]
fn lone_teacher_takes_every_composite_subject() {
    let mut rows = header_rows();
    rows.push(vec![
        "Вторник",
        "2",
        "",
        "",
        "I",
        "Физика(1-5)+Химия(7-11)",
        "лек.",
        "Иванов М.Е.",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    let timetable = parser().parse_sheet(&sheet).unwrap();

    let key = SlotKey {
        weekday: "Вторник".to_string(),
        period: 2,
    };
    let entries = &timetable.get("Иванов М.Е.").unwrap()[&key];
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].subject, "Физика");
    assert_eq!(entries[0].weeks, weeks(&[1, 3, 5]));
    assert_eq!(entries[1].subject, "Химия");
    assert_eq!(entries[1].weeks, weeks(&[7, 9, 11]));
    assert!(timetable.get("Петров А.А.").is_none());
}

#[test]
fn more_teachers_than_subjects_is_a_mismatch() {
    let trio = TimetableParser::new(vec![
        "Иванов М.Е.".to_string(),
        "Петров А.А.".to_string(),
        "Смирнова В.В.".to_string(),
    ]);

    let mut rows = header_rows();
    rows.push(vec![
        "Вторник",
        "2",
        "",
        "",
        "I",
        "Физика(1-5)+Химия(7-11)",
        "лек.",
        "Иванов М.Е.+Петров А.А.+Смирнова В.В.",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    assert_eq!(
        trio.parse_sheet(&sheet),
        Err(ParseError::SplitMismatch {
            field: "teacher".to_string(),
            expected: 2,
            found: 3,
        })
    );
}

#[test]
fn malformed_week_range_fails_the_whole_sheet() {
    let mut rows = header_rows();
    rows.push(vec![
        "Среда",
        "1",
        "",
        "",
        "I",
        "Физика(1-3-5)",
        "лек.",
        "Иванов М.Е.",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    assert!(matches!(
        parser().parse_sheet(&sheet),
        Err(ParseError::MalformedWeekExpression(_))
    ));
}

#[test]
fn unexpected_parity_marker_fails_the_whole_sheet() {
    let mut rows = header_rows();
    rows.push(vec![
        "Среда",
        "1",
        "",
        "",
        "III",
        "Физика",
        "лек.",
        "Иванов М.Е.",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    assert_eq!(
        parser().parse_sheet(&sheet),
        Err(ParseError::UnknownParityMarker("III".to_string()))
    );
}

#[test]
fn cells_without_a_known_teacher_are_ignored() {
    let mut rows = header_rows();
    rows.push(vec![
        "Четверг",
        "1",
        "",
        "",
        "I",
        "Физика",
        "лек.",
        "Сидоров Б.Б.",
        "305",
    ]);
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = grid(&rows, Vec::new());

    let timetable = parser().parse_sheet(&sheet).unwrap();
    assert!(timetable.is_empty());
}
