//! Result-table export: delimited text and a single-sheet workbook, both carrying every original
//! column plus the two label columns.

use crate::aggregate::ResultTable;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_STEM: &str = "classification_result";
pub const EXPORT_SHEET_NAME: &str = "classification results";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CsvError: {0}")]
    Csv(#[from] csv::Error),
    #[error("XlsxError: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
}

/// `classification_result_<YYYYMMDD_HHMMSS>.<extension>` in `dir`.
pub fn timestamped_path<P: AsRef<Path>>(dir: P, extension: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.as_ref()
        .join(format!("{EXPORT_FILE_STEM}_{stamp}.{extension}"))
}

pub fn write_csv<P: AsRef<Path>>(result: &ResultTable, path: P) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&result.headers)?;
    for row in &result.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_xlsx<P: AsRef<Path>>(result: &ResultTable, path: P) -> Result<(), ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, header) in result.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row, fields) in result.rows.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, field)?;
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{CategorySet, Taxonomy};
    use crate::classifier::Outcome;
    use crate::table::RecordTable;

    fn result_table() -> ResultTable {
        let mut table = RecordTable::new(
            vec!["id".to_string(), "summary".to_string()],
            vec![
                vec!["1".to_string(), "motor cooling issue".to_string()],
                vec!["2".to_string(), "filter clogging".to_string()],
            ],
        );
        for record in &mut table.records {
            record.problem_label = Some(Outcome::Label("Cooling".to_string()));
            record.solution_label = Some(Outcome::Label("Mechanical Redesign".to_string()));
        }
        let problem_set = CategorySet::parse(Taxonomy::Problem, "[Cooling] m: a").unwrap();
        let solution_set =
            CategorySet::parse(Taxonomy::Solution, "[Mechanical Redesign] m: b").unwrap();
        ResultTable::build(&table, &problem_set, &solution_set)
    }

    #[test]
    fn csv_round_trips_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&result_table(), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec!["id", "summary", "problem category", "solution category"]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "Cooling");
        assert_eq!(&rows[1][3], "Mechanical Redesign");
    }

    #[test]
    fn xlsx_writes_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_xlsx(&result_table(), &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn timestamped_path_has_stem_and_extension() {
        let path = timestamped_path("/tmp", "csv");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("classification_result_"));
        assert!(name.ends_with(".csv"));
    }
}
