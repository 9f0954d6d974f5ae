//! Removes blank lines and documentation lines before tokenizing, so template
//! files can carry human-readable instructions next to their data rows.

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Returns the lines of `text` that carry data, in file order.
///
/// A leading byte-order mark is dropped. Lines that are empty after trimming
/// are discarded, then lines whose trimmed form starts with `marker`.
pub fn data_lines(text: &str, marker: char) -> Vec<&str> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim().starts_with(marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# title\n\n   # indented note\nname,username\n\n  \nacme,bob\n";
        assert_eq!(data_lines(text, '#'), vec!["name,username", "acme,bob"]);
    }

    #[test]
    fn strips_byte_order_mark_and_carriage_returns() {
        let text = "\u{feff}# doc\r\nname\r\nacme\r\n";
        assert_eq!(data_lines(text, '#'), vec!["name", "acme"]);
    }

    #[test]
    fn marker_is_configurable() {
        let text = "; note\n#name\nvalue";
        assert_eq!(data_lines(text, ';'), vec!["#name", "value"]);
    }

    #[test]
    fn marker_only_counts_at_line_start() {
        let text = "name,tag\nacme,#1";
        assert_eq!(data_lines(text, '#'), vec!["name,tag", "acme,#1"]);
    }
}
