//! `timegrid` extracts weekly class timetables from merged-cell `.xlsx`
//! grids and loads the normalized records into PostgreSQL.
//!
//! Modules:
//! - `excel`: workbook loading and the `SheetGrid` merged-cell navigator
//! - `parser`: the sheet walker, week-expression resolver and composite
//!   cell splitter
//! - `models`: occurrences, slot keys and the `Timetable` result mapping
//! - `db`: transactional persistence of one parsed sheet
//! - `config`: JSON configuration plus environment lookup

pub mod config;
pub mod db;
pub mod error;
pub mod excel;
pub mod models;
pub mod parser;
