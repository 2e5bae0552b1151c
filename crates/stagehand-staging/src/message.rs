/// Split a prepared commit message into title (first line) and body (the
/// remaining lines joined with `\n`).
pub fn split_message(message: &str) -> (String, String) {
    match message.split_once('\n') {
        Some((title, body)) => (title.to_string(), body.to_string()),
        None => (message.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merge_message_split() {
        assert_eq!(
            split_message("Merge X\nConflict notes"),
            ("Merge X".to_string(), "Conflict notes".to_string())
        );
    }

    #[test]
    fn single_line_has_empty_body() {
        assert_eq!(split_message("Merge X"), ("Merge X".to_string(), String::new()));
        assert_eq!(split_message(""), (String::new(), String::new()));
    }

    #[test]
    fn body_keeps_inner_lines() {
        let (title, body) = split_message("T\n\nline one\nline two\n");
        assert_eq!(title, "T");
        assert_eq!(body, "\nline one\nline two\n");
    }

    proptest! {
        #[test]
        fn title_is_first_line(title in "[^\n]*", body in ".*(\n.*){0,3}") {
            let (t, b) = split_message(&format!("{title}\n{body}"));
            prop_assert_eq!(t, title);
            prop_assert_eq!(b, body);
        }
    }
}
