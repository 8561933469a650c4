//! Splitting delimited lab exports (CSV, TSV, pipe tables, aligned text)
//! into label/value/unit rows.

use super::types::LabRow;
use super::LabError;

/// Split one line into trimmed, unquoted cells.
///
/// The delimiter is chosen per line: tab, then pipe, then semicolon, then
/// comma, then runs of two or more spaces (column-aligned exports). A
/// semicolon line keeps its commas, which are decimal commas there.
pub fn split_line(line: &str) -> Vec<String> {
    let trimmed = line.trim().trim_matches('|');

    let cells: Vec<&str> = if trimmed.contains('\t') {
        trimmed.split('\t').collect()
    } else if trimmed.contains('|') {
        trimmed.split('|').collect()
    } else if trimmed.contains(';') {
        trimmed.split(';').collect()
    } else if trimmed.contains(',') {
        trimmed.split(',').collect()
    } else {
        split_on_gaps(trimmed)
    };

    cells
        .into_iter()
        .map(|c| c.trim().trim_matches('"').trim().to_string())
        .collect()
}

/// Split on runs of 2+ spaces; single spaces stay inside a cell.
fn split_on_gaps(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut space_run = 0;

    for (i, ch) in line.char_indices() {
        if ch == ' ' {
            space_run += 1;
            continue;
        }
        if space_run >= 2 {
            cells.push(&line[start..i - space_run]);
            start = i;
        }
        space_run = 0;
    }
    cells.push(&line[start..line.len() - space_run]);
    cells
}

/// Split a whole export into cell rows, dropping lines with fewer than two
/// non-empty leading cells.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(split_line)
        .filter(|cells| cells.len() >= 2 && !cells[0].is_empty())
        .collect()
}

/// Parse a delimited export into lab rows.
pub fn parse_rows(text: &str) -> Result<Vec<LabRow>, LabError> {
    if text.trim().is_empty() {
        return Err(LabError::EmptySource);
    }

    let rows: Vec<LabRow> = split_rows(text)
        .iter()
        .filter_map(|cells| LabRow::from_cells(cells.as_slice()))
        .collect();

    if rows.is_empty() {
        return Err(LabError::NoRows);
    }

    tracing::debug!(rows = rows.len(), "Split lab export");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_with_quotes() {
        let cells = split_line(r#""Glucose","5.4","mmol/L""#);
        assert_eq!(cells, vec!["Glucose", "5.4", "mmol/L"]);
    }

    #[test]
    fn tab_takes_precedence_over_comma() {
        let cells = split_line("Glucose, fasting\t5.4\tmmol/L");
        assert_eq!(cells, vec!["Glucose, fasting", "5.4", "mmol/L"]);
    }

    #[test]
    fn semicolon_export_keeps_decimal_comma() {
        let cells = split_line("Glucose;5,4;mmol/L");
        assert_eq!(cells, vec!["Glucose", "5,4", "mmol/L"]);

        let rows = parse_rows("Glucose;5,4;mmol/L\n").unwrap();
        assert_eq!(rows[0].value, "5,4");
        assert_eq!(rows[0].unit_hint.as_deref(), Some("mmol/L"));
    }

    #[test]
    fn pipe_table_with_borders() {
        let cells = split_line("| HDL | 1.2 | mmol/L |");
        assert_eq!(cells, vec!["HDL", "1.2", "mmol/L"]);
    }

    #[test]
    fn aligned_columns_keep_single_spaces() {
        let cells = split_line("Total Cholesterol    5.2    mmol/L");
        assert_eq!(cells, vec!["Total Cholesterol", "5.2", "mmol/L"]);
    }

    #[test]
    fn single_cell_lines_are_dropped() {
        let rows = split_rows("LIPID PANEL\nHDL,1.2,mmol/L\n\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "HDL");
    }

    #[test]
    fn parse_rows_builds_lab_rows() {
        let rows = parse_rows("Test,Value,Unit\nGlucose,95,mg/dL\nCreatinine (umol/L),80\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].unit_hint.as_deref(), Some("mg/dL"));
        assert_eq!(rows[2].unit_hint.as_deref(), Some("Creatinine (umol/L)"));
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(matches!(parse_rows("   \n"), Err(LabError::EmptySource)));
        assert!(matches!(parse_rows("just a heading\n"), Err(LabError::NoRows)));
    }
}
