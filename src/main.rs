//! Batch driver: scan a directory of `.xlsx` timetable workbooks, parse
//! each one and load the result into the database. A workbook that fails
//! to parse or load is skipped; the batch continues with the next file.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use timegrid::config::Config;
use timegrid::db::{DbError, TimetableDb};
use timegrid::excel;
use timegrid::parser::TimetableParser;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::load()?;
    let database_url = Config::database_url()?;

    let parser = TimetableParser::from_config(&config);
    let db = TimetableDb::new(database_url, config.db_schema.clone());

    let mut workbooks = workbook_paths(&config.xlsx_dir)?;
    workbooks.sort();
    if workbooks.is_empty() {
        warn!("no workbooks found in {}", config.xlsx_dir.display());
        return Ok(());
    }

    for path in workbooks {
        match process_workbook(&parser, &db, &config, &path) {
            Ok(()) => info!("workbook {} loaded", path.display()),
            Err(err) => {
                // Without a database connection the rest of the batch
                // cannot do anything useful either.
                if matches!(err.downcast_ref::<DbError>(), Some(DbError::Connect(_))) {
                    return Err(err);
                }
                error!("skipping workbook {}: {err}", path.display());
            }
        }
    }

    Ok(())
}

/// `.xlsx` files in `dir`, ignoring Excel's `~$` lock files.
fn workbook_paths(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.ends_with(".xlsx") && !name.starts_with("~$") {
            paths.push(path);
        }
    }

    Ok(paths)
}

fn process_workbook(
    parser: &TimetableParser,
    db: &TimetableDb,
    config: &Config,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    info!("loading workbook {}", path.display());
    let grid = excel::load_sheet(path, &config.sheet_name)?;

    let timetable = parser.parse_sheet(&grid)?;
    info!(
        "parsed {} occurrences for {} teachers",
        timetable.occurrence_count(),
        timetable.teacher_count()
    );

    db.insert_timetable(&timetable)?;
    Ok(())
}
