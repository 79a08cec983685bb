//! Persistence of one parsed sheet. Everything runs inside a single
//! transaction: any failure rolls the whole sheet back, so a workbook is
//! either fully loaded or not at all.

use std::collections::BTreeSet;

use log::debug;
use postgres::error::SqlState;
use postgres::{Client, NoTls, Transaction};
use thiserror::Error;

use crate::models::{Occurrence, SlotKey, Timetable};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to the timetable database: {0}")]
    Connect(#[source] postgres::Error),

    #[error("insufficient database privileges: {0}")]
    Privilege(#[source] postgres::Error),

    #[error("sql syntax error: {0}")]
    Syntax(#[source] postgres::Error),

    #[error("transaction is in a failed state: {0}")]
    BrokenTransaction(#[source] postgres::Error),

    #[error("insert failed: {0}")]
    Insert(#[source] postgres::Error),
}

/// Sort an in-transaction failure into its category by SQLSTATE.
fn categorize(err: postgres::Error) -> DbError {
    match err.code() {
        Some(&SqlState::INSUFFICIENT_PRIVILEGE) => DbError::Privilege(err),
        Some(&SqlState::SYNTAX_ERROR) => DbError::Syntax(err),
        Some(&SqlState::IN_FAILED_SQL_TRANSACTION) => DbError::BrokenTransaction(err),
        _ => DbError::Insert(err),
    }
}

pub struct TimetableDb {
    url: String,
    schema: String,
}

impl TimetableDb {
    pub fn new(url: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            schema: schema.into(),
        }
    }

    /// Load one sheet's result mapping: per occurrence one class row, the
    /// group and teacher ids resolved through the dictionary functions,
    /// and one `class_week` row per validity week.
    pub fn insert_timetable(&self, timetable: &Timetable) -> Result<(), DbError> {
        let mut client = Client::connect(&self.url, NoTls).map_err(DbError::Connect)?;
        let mut tx = client.transaction().map_err(categorize)?;

        for (teacher, slots) in timetable.iter() {
            let teacher_id = teacher_id(&mut tx, teacher)?;

            for (key, occurrences) in slots {
                for occurrence in occurrences {
                    let class_id = self.insert_class(&mut tx, key, occurrence)?;
                    let group_id = group_id(&mut tx, &occurrence.group)?;
                    self.insert_weeks(&mut tx, class_id, group_id, teacher_id, &occurrence.weeks)?;

                    debug!(
                        "inserted class {class_id} ({} / {} / {:?})",
                        teacher, occurrence.subject, key
                    );
                }
            }
        }

        // Dropping the transaction without committing rolls it back.
        tx.commit().map_err(categorize)
    }

    fn insert_class(
        &self,
        tx: &mut Transaction<'_>,
        key: &SlotKey,
        occurrence: &Occurrence,
    ) -> Result<i32, DbError> {
        let query = format!(
            "INSERT INTO {}.v_class (\"name\", number, class_type, week_day, classroom) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
            self.schema
        );

        let row = tx
            .query_one(
                query.as_str(),
                &[
                    &occurrence.subject,
                    &key.period,
                    &occurrence.class_type,
                    &key.weekday,
                    &occurrence.classroom,
                ],
            )
            .map_err(categorize)?;

        Ok(row.get(0))
    }

    fn insert_weeks(
        &self,
        tx: &mut Transaction<'_>,
        class_id: i32,
        group_id: i32,
        teacher_id: i32,
        weeks: &BTreeSet<u8>,
    ) -> Result<(), DbError> {
        let query = format!(
            "INSERT INTO {}.class_week (class_id, group_id, teacher_id, week_num) \
             VALUES ($1, $2, $3, $4)",
            self.schema
        );
        let statement = tx.prepare(&query).map_err(categorize)?;

        for week in weeks {
            tx.execute(&statement, &[&class_id, &group_id, &teacher_id, &i32::from(*week)])
                .map_err(categorize)?;
        }

        Ok(())
    }
}

/// Resolve-or-create a group id from its code.
fn group_id(tx: &mut Transaction<'_>, group: &str) -> Result<i32, DbError> {
    let row = tx
        .query_one("SELECT dict.get_group_id_by_code($1)", &[&group])
        .map_err(categorize)?;
    Ok(row.get(0))
}

/// Resolve-or-create a teacher id from the teacher's name.
fn teacher_id(tx: &mut Transaction<'_>, teacher: &str) -> Result<i32, DbError> {
    let row = tx
        .query_one("SELECT dict.get_teacher_id_by_name($1)", &[&teacher])
        .map_err(categorize)?;
    Ok(row.get(0))
}
