//! JSON recovery from free-form model output.
//!
//! Models asked for "strictly JSON" still wrap the payload in prose or
//! code fences. `extract_json` finds the first balanced `{...}` or
//! `[...]` region that deserializes into the requested type and returns
//! the supplied fallback otherwise. It never fails: model output is
//! untrusted free text, not a typed value.

use serde::de::DeserializeOwned;

/// Extract a `T` from the first parseable JSON region in `raw`, or
/// return `fallback` when no region exists or none parses.
pub fn extract_json<T: DeserializeOwned>(raw: &str, fallback: T) -> T {
    for (start, open) in raw.char_indices().filter(|(_, c)| *c == '{' || *c == '[') {
        let Some(end) = balanced_end(raw, start, open) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<T>(&raw[start..=end]) {
            return value;
        }
    }
    fallback
}

/// Byte index of the close bracket matching the opener at `start`,
/// skipping brackets inside JSON string literals.
fn balanced_end(raw: &str, start: usize, open: char) -> Option<usize> {
    let close = if open == '{' { '}' } else { ']' };
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TitlePayload {
        title: String,
        subtitle: String,
    }

    fn fallback() -> TitlePayload {
        TitlePayload {
            title: "fallback".into(),
            subtitle: "fallback".into(),
        }
    }

    #[test]
    fn extracts_object_wrapped_in_prose() {
        let raw = r#"Sure! Here is your JSON:
{"title": "Deep Work", "subtitle": "Rules for Focus"}
Hope that helps."#;
        let parsed = extract_json(raw, fallback());
        assert_eq!(parsed.title, "Deep Work");
        assert_eq!(parsed.subtitle, "Rules for Focus");
    }

    #[test]
    fn extracts_object_inside_code_fence() {
        let raw = "```json\n{\"title\": \"T\", \"subtitle\": \"S\"}\n```";
        let parsed = extract_json(raw, fallback());
        assert_eq!(parsed.title, "T");
    }

    #[test]
    fn extracts_array_of_strings() {
        let raw = "The outline:\n[\"Intro\", \"Middle\", \"End\"]\nDone.";
        let titles: Vec<String> = extract_json(raw, vec![]);
        assert_eq!(titles, vec!["Intro", "Middle", "End"]);
    }

    #[test]
    fn skips_earlier_region_of_wrong_shape() {
        // The first balanced region is an object; the array comes later.
        let raw = r#"{"note": "not it"} then ["A", "B"]"#;
        let titles: Vec<String> = extract_json(raw, vec![]);
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_balancing() {
        let raw = r#"{"title": "a } tricky ] one", "subtitle": "ok"}"#;
        let parsed = extract_json(raw, fallback());
        assert_eq!(parsed.title, "a } tricky ] one");
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let raw = r#"{"title": "she said \"hi\"", "subtitle": "s"}"#;
        let parsed = extract_json(raw, fallback());
        assert_eq!(parsed.title, "she said \"hi\"");
    }

    #[test]
    fn no_json_at_all_returns_fallback() {
        let parsed = extract_json("just plain prose, nothing structured", fallback());
        assert_eq!(parsed, fallback());
    }

    #[test]
    fn unbalanced_json_returns_fallback() {
        let parsed = extract_json(r#"{"title": "never closed"#, fallback());
        assert_eq!(parsed, fallback());
    }

    #[test]
    fn malformed_json_returns_fallback() {
        let parsed = extract_json("{title: unquoted}", fallback());
        assert_eq!(parsed, fallback());
    }

    #[test]
    fn empty_input_returns_fallback() {
        let titles: Vec<String> = extract_json("", vec!["default".into()]);
        assert_eq!(titles, vec!["default"]);
    }

    #[test]
    fn never_panics_on_arbitrary_input() {
        // A spread of hostile inputs; the contract is total.
        for raw in [
            "}{",
            "]{[",
            "{\"a\": [1, {\"b\": }]}",
            "\u{0}\u{1}{\"title\"",
            "[[[[[[[",
            "{\"title\": \"\\",
        ] {
            let _: Vec<String> = extract_json(raw, vec![]);
        }
    }
}
