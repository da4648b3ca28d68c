//! Spreadsheet loading for Sales Explorer.
//!
//! Reads the sales workbook (or a CSV export of it) into a [`Table`] and
//! classifies every failure into one of the load error kinds of
//! [`SalesError`]: not found, unparsable, empty, or anything else.

use std::io::{self, Write};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use sales_core::error::{Result, SalesError};
use sales_core::models::{is_na_marker, Table, Value};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` into a [`Table`].
///
/// * `.csv` files are read with the `csv` crate; everything else goes through
///   `calamine` (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
/// * `sheet` picks a worksheet by name; `None` means the first one.  It is
///   ignored for CSV input.
///
/// The first row is the header.  A header-only file loads as a zero-row
/// table; deciding what to do with it is up to the caller.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SalesError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        return Err(io::Error::other(format!("'{}' is a directory", path.display())).into());
    }
    if metadata.len() == 0 {
        return Err(SalesError::EmptyData(path.to_path_buf()));
    }

    let table = if is_csv(path) {
        read_csv(path)?
    } else {
        read_workbook(path, sheet)?
    };

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );

    Ok(table)
}

/// Load `path`, printing a one-line diagnostic to stdout on failure.
///
/// Returns `None` when the dataset could not be loaded.
pub fn open_dataset(path: &Path, sheet: Option<&str>) -> Option<Table> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    open_dataset_to(path, sheet, &mut out)
}

/// Same as [`open_dataset`] with an explicit diagnostic sink.
pub fn open_dataset_to<W: Write>(path: &Path, sheet: Option<&str>, out: &mut W) -> Option<Table> {
    match load_table(path, sheet) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            // Nothing sensible to do if stdout itself is gone.
            let _ = writeln!(out, "{}", e.diagnostic());
            None
        }
    }
}

// ── Workbooks ─────────────────────────────────────────────────────────────────

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| classify_calamine(path, e))?;

    let names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| SalesError::parse(path, format!("worksheet '{wanted}' not found")))?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| SalesError::EmptyData(path.to_path_buf()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| classify_calamine(path, e))?;

    debug!(
        "Worksheet '{}' spans {:?} (rows, cols)",
        sheet_name,
        range.get_size()
    );

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SalesError::EmptyData(path.to_path_buf()))?;
    let columns = header_names(header.iter().map(|c| cell_value(c).as_key()));

    let mut table = Table::new(columns);
    for row in rows {
        let values: Vec<Value> = row.iter().map(cell_value).collect();
        if values.iter().all(Value::is_empty) {
            continue;
        }
        table.push_row(values);
    }
    Ok(table)
}

/// Convert a calamine cell.  Formula errors (`#DIV/0!`, `#N/A`, ...) and NA
/// marker texts read as empty cells.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Empty,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) if f.is_nan() => Value::Empty,
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => {
            let trimmed = s.trim();
            if is_na_marker(trimmed) {
                Value::Empty
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        other => Value::Text(other.to_string()),
    }
}

fn classify_calamine(path: &Path, err: calamine::Error) -> SalesError {
    match err {
        calamine::Error::Io(e) if e.kind() == io::ErrorKind::NotFound => {
            SalesError::NotFound(path.to_path_buf())
        }
        calamine::Error::Io(e) => SalesError::Io(e),
        other => SalesError::parse(path, other),
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| classify_csv(path, e))?;

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| classify_csv(path, e))?,
        None => return Err(SalesError::EmptyData(path.to_path_buf())),
    };
    let columns = header_names(header.iter().enumerate().map(|(i, raw)| {
        let raw = if i == 0 { raw.trim_start_matches('\u{feff}') } else { raw };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }));
    let width = columns.len();

    let mut table = Table::new(columns);
    for record in records {
        let record = record.map_err(|e| classify_csv(path, e))?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(SalesError::parse(
                path,
                format!(
                    "expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                ),
            ));
        }
        let values: Vec<Value> = record.iter().map(Value::from_text).collect();
        if values.iter().all(Value::is_empty) {
            continue;
        }
        table.push_row(values);
    }
    Ok(table)
}

fn classify_csv(path: &Path, err: csv::Error) -> SalesError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound => {
            SalesError::NotFound(path.to_path_buf())
        }
        csv::ErrorKind::Io(e) => SalesError::Io(e),
        _ => SalesError::parse(path, message),
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Header cells become column names; blank cells are named `Unnamed: <i>`.
fn header_names(cells: impl Iterator<Item = Option<String>>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, name)| name.unwrap_or_else(|| format!("Unnamed: {i}")))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    #[derive(Clone, Copy)]
    enum Cell {
        Str(&'static str),
        Num(f64),
        Blank,
    }

    use Cell::{Blank, Num, Str};

    const HEADER: [&str; 7] = [
        "Customer",
        "Category",
        "Country",
        "Sales",
        "Profit",
        "Discount",
        "UnitsInStock",
    ];

    fn sample_rows() -> Vec<Vec<Cell>> {
        vec![
            vec![Str("Acme"), Str("Beverages"), Str("Germany"), Num(100.0), Num(20.0), Num(0.0), Num(12.0)],
            vec![Str("Globex"), Str("Dairy"), Str("France"), Num(50.0), Num(-5.0), Num(0.1), Num(4.0)],
            vec![Str("Initech"), Str("Beverages"), Str("USA"), Num(75.5), Num(10.0), Num(0.0), Num(9.0)],
        ]
    }

    fn write_xlsx(dir: &Path, name: &str, sheet: &str, header: &[&str], rows: &[Vec<Cell>]) -> PathBuf {
        let path = dir.join(name);
        let mut workbook = Workbook::new();
        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet).unwrap();
            for (col, title) in header.iter().enumerate() {
                worksheet.write_string(0, col as u16, *title).unwrap();
            }
            for (r, row) in rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    let (r, c) = (r as u32 + 1, c as u16);
                    match cell {
                        Str(s) => {
                            worksheet.write_string(r, c, *s).unwrap();
                        }
                        Num(n) => {
                            worksheet.write_number(r, c, *n).unwrap();
                        }
                        Blank => {}
                    }
                }
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn diagnostic_for(path: &Path, sheet: Option<&str>) -> (Option<Table>, String) {
        let mut out = Vec::new();
        let table = open_dataset_to(path, sheet, &mut out);
        (table, String::from_utf8(out).unwrap())
    }

    // ── load_table: workbooks ─────────────────────────────────────────────────

    #[test]
    fn test_load_xlsx_row_count_matches_source() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "sales.xlsx", "Sheet1", &HEADER, &sample_rows());

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns(), HEADER.map(String::from).as_slice());
        assert_eq!(table.rows()[0][0], Value::Text("Acme".to_string()));
        assert_eq!(table.rows()[2][3], Value::Number(75.5));
    }

    #[test]
    fn test_load_xlsx_header_only_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "header.xlsx", "Sheet1", &HEADER, &[]);

        let table = load_table(&path, None).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 7);
    }

    #[test]
    fn test_load_xlsx_named_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "named.xlsx", "Orders", &HEADER, &sample_rows());

        let table = load_table(&path, Some("Orders")).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_load_xlsx_missing_sheet_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "named.xlsx", "Orders", &HEADER, &sample_rows());

        let err = load_table(&path, Some("Returns")).unwrap_err();
        assert!(matches!(err, SalesError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_xlsx_blank_cells_and_unnamed_header() {
        let dir = TempDir::new().unwrap();
        let header = ["Customer", "", "Sales"];
        let rows = vec![
            vec![Str("Acme"), Blank, Num(10.0)],
            vec![Blank, Blank, Blank],
            vec![Str("Globex"), Str("x"), Blank],
        ];
        let path = write_xlsx(dir.path(), "gaps.xlsx", "Sheet1", &header, &rows);

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.columns()[1], "Unnamed: 1");
        // The fully blank middle row is skipped.
        assert_eq!(table.len(), 2);
        assert!(table.rows()[1][2].is_empty());
    }

    #[test]
    fn test_load_xlsx_empty_sheet_is_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "blank.xlsx", "Sheet1", &[], &[]);

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::EmptyData(_)), "got {err:?}");
    }

    #[test]
    fn test_load_corrupt_xlsx_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "broken.xlsx", b"this is not a zip archive");

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::Parse { .. }), "got {err:?}");
    }

    // ── load_table: generic failures ──────────────────────────────────────────

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_table(&dir.path().join("nope.xlsx"), None).unwrap_err();
        assert!(matches!(err, SalesError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn test_load_zero_byte_file_is_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "zero.xlsx", b"");

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::EmptyData(_)), "got {err:?}");
    }

    #[test]
    fn test_load_directory_is_other_error() {
        let dir = TempDir::new().unwrap();
        let err = load_table(dir.path(), None).unwrap_err();
        assert!(matches!(err, SalesError::Io(_)), "got {err:?}");
    }

    // ── load_table: CSV ───────────────────────────────────────────────────────

    #[test]
    fn test_load_csv_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "sales.csv",
            b"Customer,Category,Sales,Discount\nAcme,Beverages,100,0\nGlobex,Dairy,50.5,0.1\n",
        );

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][2], Value::Number(50.5));
        assert_eq!(table.rows()[1][1], Value::Text("Dairy".to_string()));
    }

    #[test]
    fn test_load_csv_strips_bom_and_pads_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "bom.CSV",
            "\u{feff}Customer,Sales\nAcme\n".as_bytes(),
        );

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.columns()[0], "Customer");
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0][1].is_empty());
    }

    #[test]
    fn test_load_csv_ragged_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "ragged.csv", b"a,b\n1,2\n1,2,3\n");

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_csv_invalid_utf8_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "latin.csv", b"Customer\n\xff\xfe\xfd\n");

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_csv_na_markers_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "na.csv",
            b"Customer,Sales
N/A,10
Acme,NaN
nan,N/A
Globex,3
",
        );

        let table = load_table(&path, None).unwrap();
        // The all-NA third row counts as blank and is skipped.
        assert_eq!(table.len(), 3);
        assert!(table.rows()[0][0].is_empty());
        assert!(table.rows()[1][1].is_empty());
        assert_eq!(table.number(2, 1).unwrap(), Some(3.0));
    }

    #[test]
    fn test_load_xlsx_na_strings_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let rows = vec![
            vec![Str("NaN"), Str("Beverages"), Str("Germany"), Num(1.0), Num(1.0), Num(0.0), Num(1.0)],
            vec![Str("Acme"), Str("Dairy"), Str("France"), Str("N/A"), Num(2.0), Num(0.1), Str("#N/A")],
        ];
        let path = write_xlsx(dir.path(), "na.xlsx", "Sheet1", &HEADER, &rows);

        let table = load_table(&path, None).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows()[0][0].is_empty());
        assert!(table.rows()[1][3].is_empty());
        assert!(table.rows()[1][6].is_empty());
        assert_eq!(table.text(1, 0), Some("Acme".to_string()));
    }

    #[test]
    fn test_load_csv_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "header.csv", b"Customer,Sales\n");

        let table = load_table(&path, None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_csv_blank_lines_only_is_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "blank.csv", b"\n\n");

        let err = load_table(&path, None).unwrap_err();
        assert!(matches!(err, SalesError::EmptyData(_)), "got {err:?}");
    }

    // ── open_dataset diagnostics ──────────────────────────────────────────────

    #[test]
    fn test_open_dataset_missing_prints_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Product_Gallery.xlsx");

        let (table, printed) = diagnostic_for(&path, None);
        assert!(table.is_none());
        assert_eq!(
            printed,
            format!("Error: file '{}' not found\n", path.display())
        );
    }

    #[test]
    fn test_open_dataset_success_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "ok.xlsx", "Sheet1", &HEADER, &sample_rows());

        let (table, printed) = diagnostic_for(&path, None);
        assert_eq!(table.unwrap().len(), 3);
        assert!(printed.is_empty());
    }

    #[test]
    fn test_open_dataset_parse_failure_message() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "broken.xlsx", b"garbage");

        let (table, printed) = diagnostic_for(&path, None);
        assert!(table.is_none());
        assert!(printed.starts_with("Error: failed to parse file"));
    }

    #[test]
    fn test_open_dataset_empty_message() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "zero.csv", b"");

        let (table, printed) = diagnostic_for(&path, None);
        assert!(table.is_none());
        assert!(printed.contains("is empty"));
    }

    #[test]
    fn test_open_dataset_other_message() {
        let dir = TempDir::new().unwrap();

        let (table, printed) = diagnostic_for(dir.path(), None);
        assert!(table.is_none());
        assert!(printed.starts_with("Error while opening file:"));
    }

    #[test]
    fn test_open_dataset_header_only_returns_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_xlsx(dir.path(), "header.xlsx", "Sheet1", &HEADER, &[]);

        let (table, printed) = diagnostic_for(&path, None);
        assert!(table.unwrap().is_empty());
        assert!(printed.is_empty());
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Path::new("a.csv")));
        assert!(is_csv(Path::new("a.CSV")));
        assert!(!is_csv(Path::new("a.xlsx")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Int(3)), Value::Number(3.0));
        assert_eq!(cell_value(&Data::String("  ".to_string())), Value::Empty);
        assert_eq!(
            cell_value(&Data::String(" Dairy ".to_string())),
            Value::Text("Dairy".to_string())
        );
        assert_eq!(cell_value(&Data::Bool(false)), Value::Bool(false));
    }
}
