//! Multi-pane envelope splitting.
//!
//! The daemon concatenates every captured pane of a session into one blob:
//!
//! ```text
//! === PANE 1.0 (shell) ===
//! $ make
//! === PANE 1.1 (nvim) ===
//! ...
//! ```
//!
//! [`split_panes`] turns that blob back into a [`PaneMap`] keyed
//! `"<id> - <title>"`. Input without a marker is a single `"main"` pane.

use crate::types::PaneMap;

/// Marker opening each pane header in a multi-pane envelope.
pub const PANE_MARKER: &str = "=== PANE ";

const HEADER_CLOSE: &str = "===";

/// Split decoded scrollback into its panes, in source order.
///
/// Segments without a newline after the header carry no body and are
/// dropped. Text before the first marker is not part of any pane.
pub fn split_panes(scrollback: &str) -> PaneMap {
    if !scrollback.contains(PANE_MARKER) {
        return PaneMap::single(scrollback);
    }

    let mut panes = PaneMap::new();
    for section in scrollback.split(PANE_MARKER).skip(1) {
        let Some((header_line, body)) = section.split_once('\n') else {
            continue;
        };
        panes.insert(pane_key(header_line), body);
    }
    panes
}

/// `"1.0 (shell) ==="` → `"1.0 - shell"`; `"3 ==="` → `"3"`.
fn pane_key(header_line: &str) -> String {
    let header = header_line
        .split_once(HEADER_CLOSE)
        .map_or(header_line, |(head, _)| head)
        .trim();

    match header.split_once('(') {
        Some((id, title)) => {
            let id = id.trim();
            let title = title.trim_end_matches(')').trim();
            if title.is_empty() {
                id.to_string()
            } else if id.is_empty() {
                title.to_string()
            } else {
                format!("{id} - {title}")
            }
        }
        None => header.trim_matches(|c: char| c == '(' || c == ')').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAIN_PANE;
    use proptest::prelude::*;

    #[test]
    fn no_marker_is_single_main_pane() {
        let text = "$ ls\nfoo bar\n";
        let panes = split_panes(text);
        assert_eq!(panes.len(), 1);
        assert_eq!(panes.get(MAIN_PANE), Some(text));
    }

    #[test]
    fn empty_input_is_single_empty_main_pane() {
        let panes = split_panes("");
        assert_eq!(panes.len(), 1);
        assert_eq!(panes.get(MAIN_PANE), Some(""));
    }

    #[test]
    fn two_panes_in_source_order() {
        let text = "=== PANE 1.0 (shell) ===\n$ make\nok\n=== PANE 1.1 (nvim) ===\n~\n~\n";
        let panes = split_panes(text);
        let keys: Vec<&str> = panes.keys().collect();
        assert_eq!(keys, ["1.0 - shell", "1.1 - nvim"]);
        assert_eq!(panes.get("1.0 - shell"), Some("$ make\nok\n"));
        assert_eq!(panes.get("1.1 - nvim"), Some("~\n~\n"));
    }

    #[test]
    fn daemon_envelope_with_leading_newline() {
        // The daemon prefixes every header with a newline.
        let text = "\n=== PANE 0.0 (zsh) ===\nline a\n\n=== PANE 0.1 (top) ===\nline b\n";
        let panes = split_panes(text);
        assert_eq!(panes.get("0.0 - zsh"), Some("line a\n\n"));
        assert_eq!(panes.get("0.1 - top"), Some("line b\n"));
    }

    #[test]
    fn preamble_before_first_marker_is_skipped() {
        let text = "stray output\n=== PANE 2 (htop) ===\nbody\n";
        let panes = split_panes(text);
        assert_eq!(panes.len(), 1);
        assert_eq!(panes.get("2 - htop"), Some("body\n"));
    }

    #[test]
    fn header_without_newline_is_dropped() {
        let text = "=== PANE 1 (a) ===\nbody\n=== PANE 2 (b) ===";
        let panes = split_panes(text);
        let keys: Vec<&str> = panes.keys().collect();
        assert_eq!(keys, ["1 - a"]);
    }

    #[test]
    fn pane_with_empty_body() {
        let text = "=== PANE 1 (a) ===\n=== PANE 2 (b) ===\nx";
        let panes = split_panes(text);
        assert_eq!(panes.get("1 - a"), Some(""));
        assert_eq!(panes.get("2 - b"), Some("x"));
    }

    #[test]
    fn header_shapes() {
        assert_eq!(pane_key("1.0 (shell) ==="), "1.0 - shell");
        assert_eq!(pane_key("3 ==="), "3");
        assert_eq!(pane_key("3 () ==="), "3");
        assert_eq!(pane_key("(solo) ==="), "solo");
        assert_eq!(pane_key("1.2 (my title)"), "1.2 - my title");
    }

    fn arb_pane() -> impl Strategy<Value = (String, String, String)> {
        (
            "[0-9]{1,2}\\.[0-9]",
            "[a-z]{1,8}",
            proptest::collection::vec("[a-z $#:.]{0,20}", 0..6),
        )
            .prop_map(|(id, title, lines)| {
                let body = lines.iter().map(|l| format!("{l}\n")).collect::<String>();
                (id, title, body)
            })
    }

    proptest! {
        /// Input without a marker always comes back unchanged under "main".
        #[test]
        fn unmarked_input_roundtrips(text in "[^=]{0,200}") {
            let panes = split_panes(&text);
            prop_assert_eq!(panes.len(), 1);
            prop_assert_eq!(panes.get(MAIN_PANE), Some(text.as_str()));
        }

        /// Every declared pane body is recovered byte for byte.
        #[test]
        fn envelope_bodies_are_preserved(
            panes in proptest::collection::vec(arb_pane(), 1..5),
        ) {
            // Unique ids so later panes do not overwrite earlier ones.
            let panes: Vec<_> = panes
                .into_iter()
                .enumerate()
                .map(|(i, (id, title, body))| (format!("{i}.{id}"), title, body))
                .collect();

            let mut envelope = String::new();
            for (id, title, body) in &panes {
                envelope.push_str(&format!("{PANE_MARKER}{id} ({title}) ===\n{body}"));
            }

            let split = split_panes(&envelope);
            prop_assert_eq!(split.len(), panes.len());
            for ((id, title, body), (key, got)) in panes.iter().zip(split.iter()) {
                prop_assert_eq!(key, format!("{id} - {title}"));
                prop_assert_eq!(got, body.as_str());
            }
        }
    }
}
