//! # Fixture Reader Unit Tests / 夹具读取器单元测试
//!
//! This module tests reading delimited text and spreadsheet fixtures into
//! ordered row records: header handling, padding, malformed rows, sheet
//! selection and the fatal resolution errors.
//!
//! 此模块测试将分隔文本和电子表格夹具读取为有序行记录：表头处理、填充、
//! 格式错误的行、工作表选择以及致命的解析错误。

mod common;

use common::{write_file, write_xlsx};
use fixture_runner::core::error::HarnessError;
use fixture_runner::core::fixture::{self, FixtureSource, RowRecord};

fn ok_rows(table: &fixture::FixtureTable) -> Vec<&RowRecord> {
    table.rows.iter().filter_map(|row| row.as_ref().ok()).collect()
}

#[cfg(test)]
mod delimited_tests {
    use super::*;

    #[test]
    fn test_header_is_discarded_and_rows_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "testdata.csv",
            "userId,title\n1,Test Title 1\n2,Test Title 2\n",
        );

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert_eq!(table.header, vec!["userId", "title"]);
        assert_eq!(table.column_count(), 2);
        let rows = ok_rows(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index(), 1);
        assert_eq!(rows[0].cells(), &["1".to_string(), "Test Title 1".to_string()]);
        assert_eq!(rows[1].index(), 2);
        assert_eq!(rows[1].get(1), Some("Test Title 2"));
    }

    #[test]
    fn test_header_only_yields_zero_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty_rows.csv", "userId,title\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "quoted.csv", "a,b,c\n\"x,y\",z\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();
        let rows = ok_rows(&table);

        // Plain comma split: the quoted comma produces a third cell.
        assert_eq!(rows[0].cells(), &["\"x", "y\"", "z"]);
    }

    #[test]
    fn test_short_rows_are_padded_with_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "short.csv", "name,job,expectedStatus\nneo\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();
        let rows = ok_rows(&table);

        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0].get(0), Some("neo"));
        assert_eq!(rows[0].get(2), Some(""));
    }

    #[test]
    fn test_blank_cells_are_preserved_as_empty_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "blank.csv", "name,job,expectedStatus\n,,201\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();
        let rows = ok_rows(&table);

        assert_eq!(rows[0].cells(), &["", "", "201"]);
    }

    #[test]
    fn test_row_past_header_is_malformed_but_others_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "wide.csv", "a,b\n1,2\n3,4,5\n6,7\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[0].is_ok());
        let malformed = table.rows[1].as_ref().unwrap_err();
        assert_eq!(malformed.index, 2);
        assert_eq!(malformed.raw, vec!["3", "4", "5"]);
        assert_eq!(
            malformed.error,
            HarnessError::MalformedRow {
                row: 2,
                column: 2,
                header_columns: 2
            }
        );
        assert!(!malformed.error.is_fatal());
        assert_eq!(table.rows[2].as_ref().unwrap().index(), 3);
    }

    #[test]
    fn test_trailing_empty_cell_is_not_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "trailing.csv", "a,b\n1,2,\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();
        let rows = ok_rows(&table);

        assert_eq!(rows[0].cells(), &["1", "2"]);
    }

    #[test]
    fn test_undecodable_row_is_reported_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"userId,expectedStatus\n1,200\n\xff\xfe,200\n3,200\n").unwrap();

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].as_ref().unwrap().cells(), &["1", "200"]);
        let broken = table.rows[1].as_ref().unwrap_err();
        assert_eq!(broken.index, 2);
        assert_eq!(
            broken.error,
            HarnessError::InvalidEncoding { row: 2, column: 0 }
        );
        assert!(!broken.error.is_fatal());
        assert_eq!(broken.raw[1], "200");
        assert_eq!(table.rows[2].as_ref().unwrap().cells(), &["3", "200"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "crlf.csv", "a,b\r\n1,2\r\n");

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(ok_rows(&table)[0].cells(), &["1", "2"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        let err = fixture::read(&FixtureSource::new(&path)).unwrap_err();

        assert_eq!(err, HarnessError::FixtureNotFound { path });
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.csv", "");

        let err = fixture::read(&FixtureSource::new(&path)).unwrap_err();

        assert!(matches!(err, HarnessError::MissingHeader { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_reading_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "twice.csv", "a,b\n1,2\n3\n4,5,6\n");
        let source = FixtureSource::new(&path);

        assert_eq!(fixture::read(&source).unwrap(), fixture::read(&source).unwrap());
    }
}

#[cfg(test)]
mod spreadsheet_tests {
    use super::*;

    fn workbook(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("reqres_testdata.xlsx");
        write_xlsx(
            &path,
            &[
                (
                    "users",
                    vec![
                        vec!["name", "job", "expectedStatus", "method", "userId"],
                        vec!["morpheus", "leader", "201", "POST", ""],
                        vec!["neo", "the one", "200", "PUT", "2"],
                    ],
                ),
                (
                    "get_users",
                    vec![vec!["userId", "expectedStatus"], vec!["2", "200"], vec!["23", "404"]],
                ),
            ],
        );
        path
    }

    #[test]
    fn test_named_sheet_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixtureSource::new(workbook(dir.path())).with_sheet("get_users");

        let table = fixture::read(&source).unwrap();
        let rows = ok_rows(&table);

        assert_eq!(table.header, vec!["userId", "expectedStatus"]);
        assert_eq!(rows.len(), 2);
        // Numeric cells render without a fractional part.
        assert_eq!(rows[0].cells(), &["2", "200"]);
        assert_eq!(rows[1].cells(), &["23", "404"]);
    }

    #[test]
    fn test_first_sheet_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixtureSource::new(workbook(dir.path()));

        let table = fixture::read(&source).unwrap();

        assert_eq!(table.header[0], "name");
        assert_eq!(table.column_count(), 5);
        // The empty userId cell is padded back in.
        assert_eq!(ok_rows(&table)[0].get(4), Some(""));
    }

    #[test]
    fn test_missing_sheet_lists_available_ones() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixtureSource::new(workbook(dir.path())).with_sheet("orders");

        let err = fixture::read(&source).unwrap_err();

        match &err {
            HarnessError::SheetNotFound {
                sheet, available, ..
            } => {
                assert_eq!(sheet, "orders");
                assert_eq!(available, "users, get_users");
            }
            other => panic!("expected SheetNotFound, got {other:?}"),
        }
        assert!(err.is_fatal());
    }

    #[test]
    fn test_leading_blank_cells_keep_their_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank_first.xlsx");
        write_xlsx(
            &path,
            &[("rows", vec![vec!["a", "b"], vec!["", "x"]])],
        );

        let table = fixture::read(&FixtureSource::new(&path)).unwrap();

        assert_eq!(ok_rows(&table)[0].cells(), &["", "x"]);
    }

    #[test]
    fn test_source_display_and_kind() {
        let source = FixtureSource::new("fixtures/data.xlsx").with_sheet("users");
        assert!(source.is_spreadsheet());
        assert_eq!(source.to_string(), "fixtures/data.xlsx#users");

        let csv = FixtureSource::new("fixtures/testdata.csv");
        assert!(!csv.is_spreadsheet());
        assert_eq!(csv.to_string(), "fixtures/testdata.csv");
    }

    #[test]
    fn test_cell_rendering() {
        use calamine::Data;
        assert_eq!(fixture::cell_to_string(&Data::Float(200.0)), "200");
        assert_eq!(fixture::cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(fixture::cell_to_string(&Data::Int(7)), "7");
        assert_eq!(fixture::cell_to_string(&Data::Empty), "");
        assert_eq!(fixture::cell_to_string(&Data::Bool(true)), "true");
    }
}
