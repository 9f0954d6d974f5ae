//! Character-level splitting of one delimited line into trimmed fields.
//!
//! The tokenizer knows nothing about headers or field meaning. A field may be
//! wrapped in double quotes, inside which the delimiter is literal and a doubled
//! quote (`""`) stands for one quote character. Any other quote toggles the
//! quoted state wherever it appears.
//!
//! A line that ends while still inside a quoted span is not an error: the
//! partial field is emitted as parsed. Re-import tooling relies on this, so a
//! quoted field can never span two physical lines.

/// Splits `line` on `delimiter`, honoring quoted spans, and trims every field.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_delimiters_and_escaped_quotes() {
        assert_eq!(
            split_line(r#"a,"b,c","d""e",f"#, ','),
            vec!["a", "b,c", "d\"e", "f"]
        );
    }

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(split_line("  a , b ,c  ", ','), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_fields_are_kept_in_position() {
        assert_eq!(split_line("a,,c,", ','), vec!["a", "", "c", ""]);
        assert_eq!(split_line("", ','), vec![""]);
    }

    #[test]
    fn unterminated_quote_emits_partial_field() {
        assert_eq!(split_line(r#"a,"b,c"#, ','), vec!["a", "b,c"]);
    }

    #[test]
    fn custom_delimiter() {
        assert_eq!(split_line("x;\"y;z\";w", ';'), vec!["x", "y;z", "w"]);
        assert_eq!(split_line("x,y;z", ';'), vec!["x,y", "z"]);
    }

    #[test]
    fn empty_quoted_field() {
        assert_eq!(split_line(r#""",b"#, ','), vec!["", "b"]);
    }
}
