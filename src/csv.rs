//! Permissive CSV reader for the published spreadsheet export.
//!
//! The feed is small and generated by a spreadsheet, so the reader favours
//! "best effort" over strictness: it never fails, ragged rows are kept as-is,
//! and an unterminated quote simply runs to the end of its line. Quoted fields
//! cannot span lines; a quote is only tracked within the current line.

/// Split `text` into rows of raw (untrimmed) cells. Blank lines are dropped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Vec<String> {
    let mut row = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            // A doubled quote is a literal quote, inside or outside quotes.
            '"' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    row.push(current);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_rows() {
        let rows = parse_csv("Name,Artist\nOde to Joy,Beethoven\n");
        assert_eq!(
            rows,
            vec![
                vec!["Name".to_string(), "Artist".to_string()],
                vec!["Ode to Joy".to_string(), "Beethoven".to_string()],
            ]
        );
    }

    #[test]
    fn quoted_field_keeps_commas_and_doubled_quotes() {
        let rows = parse_csv(r#""Song, ""Title""",x"#);
        assert_eq!(rows, vec![vec![r#"Song, "Title""#.to_string(), "x".to_string()]]);
    }

    #[test]
    fn blank_lines_are_dropped_and_crlf_is_accepted() {
        let rows = parse_csv("a,b\r\n\r\n\nc,d\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c".to_string(), "d".to_string()]);
    }

    #[test]
    fn whitespace_is_preserved() {
        let rows = parse_csv("  padded , cell ");
        assert_eq!(rows[0], vec!["  padded ".to_string(), " cell ".to_string()]);
    }

    #[test]
    fn ragged_rows_are_kept() {
        let rows = parse_csv("a,b,c\nd\ne,f");
        let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![3, 1, 2]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let rows = parse_csv("\"open, still open\nnext,row");
        assert_eq!(rows[0], vec!["open, still open".to_string()]);
        assert_eq!(rows[1], vec!["next".to_string(), "row".to_string()]);
    }

    #[test]
    fn trailing_comma_yields_empty_cell() {
        let rows = parse_csv("a,");
        assert_eq!(rows[0], vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\r\n\n").is_empty());
    }
}
