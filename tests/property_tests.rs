//! Property-based tests for parsing and rendering
//!
//! These check the format-level guarantees: flat entries read back as
//! written, later keys win, quoting is transparent, non-ASCII text survives
//! untouched, and rendered documents parse back to the same tree.

use configobj::ConfigObj;
use proptest::prelude::*;

/// Bare keys that need no quoting
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

/// Values that read back unchanged without quotes
fn bare_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]{1,20}",
        "[a-zA-Z0-9][a-zA-Z0-9 ./:=-]{0,20}[a-zA-Z0-9]",
        "[0-9]+\\.[0-9]+",
    ]
}

/// Text in non-Latin scripts
fn non_ascii_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[\\p{Han}]{1,8}",
        "[\\p{Cyrillic}]{1,8}",
        "[\\p{Greek}][\\p{Greek} ]{0,8}[\\p{Greek}]",
    ]
}

/// Strings full of characters that need quoting or escaping decisions
fn awkward_value_strategy() -> impl Strategy<Value = String> {
    "[a-z \"'=#\\[\\]\n]{0,12}"
}

fn awkward_key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z \"'=#\\[]{0,8}[a-z]"
}

fn awkward_name_strategy() -> impl Strategy<Value = String> {
    "[a-z \"'#\\[\\]]{1,10}"
}

type Entries = Vec<(String, String)>;

fn entries_strategy() -> impl Strategy<Value = Entries> {
    prop::collection::vec((awkward_key_strategy(), awkward_value_strategy()), 0..4)
}

fn document_strategy() -> impl Strategy<Value = ConfigObj> {
    let child = (awkward_name_strategy(), entries_strategy());
    let section = (
        awkward_name_strategy(),
        entries_strategy(),
        prop::collection::vec(child, 0..3),
    );
    (entries_strategy(), prop::collection::vec(section, 0..3)).prop_map(|(root, sections)| {
        let mut document = ConfigObj::new();
        for (key, value) in root {
            document.set_value(key, value);
        }
        for (name, entries, children) in sections {
            let mut root = document.root_mut();
            let mut section = root.section_or_insert(&name);
            for (key, value) in entries {
                section.set_value(key, value);
            }
            for (child_name, child_entries) in children {
                let mut child = section.section_or_insert(&child_name);
                for (key, value) in child_entries {
                    child.set_value(key, value);
                }
            }
        }
        document
    })
}

proptest! {
    #[test]
    fn flat_key_values_read_back(
        pairs in prop::collection::vec((key_strategy(), bare_value_strategy()), 1..10)
    ) {
        let input: String = pairs
            .iter()
            .map(|(k, v)| format!("{} = {}\n", k, v))
            .collect();
        let document = ConfigObj::parse_str(&input);

        for (key, _) in &pairs {
            let expected = &pairs.iter().rev().find(|(k, _)| k == key).unwrap().1;
            prop_assert_eq!(document.value(key), expected.as_str());
        }
    }

    #[test]
    fn later_duplicate_key_wins(
        key in key_strategy(),
        first in bare_value_strategy(),
        second in bare_value_strategy(),
    ) {
        let input = format!("{key} = {first}\n\"{key}\" = '{second}'\n");
        let document = ConfigObj::parse_str(&input);
        prop_assert_eq!(document.value(&key), second.as_str());
        prop_assert_eq!(document.all_values().len(), 1);
    }

    #[test]
    fn quoting_styles_are_equivalent(key in key_strategy(), value in bare_value_strategy()) {
        let bare = ConfigObj::parse_str(&format!("{key} = {value}"));
        let double = ConfigObj::parse_str(&format!("\"{key}\" = \"{value}\""));
        let single = ConfigObj::parse_str(&format!("'{key}' = '{value}'"));

        prop_assert_eq!(bare.value(&key), value.as_str());
        prop_assert_eq!(&bare, &double);
        prop_assert_eq!(&bare, &single);
    }

    #[test]
    fn non_ascii_round_trips(
        section in non_ascii_strategy(),
        key in non_ascii_strategy(),
        value in non_ascii_strategy(),
    ) {
        let input = format!("[{section}]\n{key} = {value}\n");
        let document = ConfigObj::parse_str(&input);
        let parsed = document.section(&section);
        prop_assert!(parsed.is_some());
        prop_assert_eq!(parsed.unwrap().value(&key).as_bytes(), value.as_bytes());
    }

    #[test]
    fn rendered_documents_parse_back(document in document_strategy()) {
        if let Ok(text) = document.to_config_string() {
            let reparsed = ConfigObj::parse_str(&text);
            prop_assert_eq!(&reparsed, &document, "rendered text:\n{}", text);
        }
    }

    #[test]
    fn parsing_never_panics(input in "[a-z \"'=#;\\[\\]\n]{0,80}") {
        let document = ConfigObj::parse_str(&input);
        let _ = document.all_values();
    }
}
