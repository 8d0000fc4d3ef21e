// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// One parsed row with the 1-based line it started on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are skipped.
pub fn parse_records(text: &str, sep: char) -> Vec<Record> {
    let mut records = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].trim().is_empty()) {
                    records.push(Record { line: row_line, fields: take(&mut row) });
                } else {
                    row.clear();
                }
                line += 1;
                row_line = line;
            }
            c => {
                if c == '\n' { line += 1; }
                field.push(c);
            }
        }
    }

    // Trailing row without a newline, even if quotes were unterminated.
    row.push(field);
    if !(row.len() == 1 && row[0].trim().is_empty()) {
        records.push(Record { line: row_line, fields: row });
    }

    records
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(records: &[Record]) -> Vec<Vec<&str>> {
        records.iter().map(|r| r.fields.iter().map(|f| f.as_str()).collect()).collect()
    }

    #[test]
    fn parses_lines_and_skips_blanks() {
        let recs = parse_records("a,b\r\n\n1,2\n3,4", ',');
        assert_eq!(fields(&recs), vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(recs.iter().map(|r| r.line).collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn quoted_separator_stays_in_field() {
        let recs = parse_records("\"x,y\",\"say \"\"hi\"\"\"\n", ',');
        assert_eq!(fields(&recs), vec![vec!["x,y", "say \"hi\""]]);
    }

    #[test]
    fn write_row_quotes_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &[s!("a"), s!("b,c")], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,\"b,c\"\n");
    }
}
