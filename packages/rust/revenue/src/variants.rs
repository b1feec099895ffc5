//! Company-name spelling variants.
//!
//! Lookup sites key company pages on a slug of the name, and the slug rarely
//! matches the name as typed. Variants are tried in generation order:
//! 1. the trimmed original
//! 2. `&` spelled out as `and`
//! 3. hyphens replaced by spaces
//! 4. punctuation stripped (word characters, whitespace, `-` and `&` survive)
//! 5. whitespace runs collapsed to a single space

use std::sync::LazyLock;

use regex::Regex;

/// Characters outside word characters, whitespace, `-` and `&`.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-&]").expect("punctuation regex"));

/// Generate the ordered, de-duplicated variants of `name`.
///
/// The trimmed original is always first. Returns an empty list for a blank
/// name.
pub fn name_variants(name: &str) -> Vec<String> {
    let original = name.trim();
    if original.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![original.to_string()];

    if original.contains('&') {
        variants.push(original.replace('&', "and"));
    }

    if original.contains('-') {
        variants.push(original.replace('-', " "));
    }

    let no_punctuation = PUNCTUATION_RE.replace_all(original, "");
    if no_punctuation != original {
        variants.push(no_punctuation.into_owned());
    }

    let collapsed = original.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed != original {
        variants.push(collapsed);
    }

    dedup_preserving_order(variants)
}

fn dedup_preserving_order(variants: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(variants.len());
    for v in variants {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ampersand_spelled_out_after_original() {
        let variants = name_variants("Acme & Co");
        assert_eq!(variants[0], "Acme & Co");
        assert_eq!(variants[1], "Acme and Co");
    }

    #[test]
    fn original_is_trimmed_and_first() {
        let variants = name_variants("  Louis Dreyfus  ");
        assert_eq!(variants, vec!["Louis Dreyfus"]);
    }

    #[test]
    fn hyphen_becomes_space() {
        let variants = name_variants("Coca-Cola");
        assert_eq!(variants, vec!["Coca-Cola", "Coca Cola"]);
    }

    #[test]
    fn punctuation_is_stripped() {
        let variants = name_variants("Yahoo! Inc.");
        assert_eq!(variants, vec!["Yahoo! Inc.", "Yahoo Inc"]);
    }

    #[test]
    fn inner_whitespace_collapsed() {
        let variants = name_variants("Big   Data\tCorp");
        assert_eq!(variants, vec!["Big   Data\tCorp", "Big Data Corp"]);
    }

    #[test]
    fn all_rules_in_generation_order() {
        let variants = name_variants("A&B  Holdings-Group, Ltd.");
        assert_eq!(
            variants,
            vec![
                "A&B  Holdings-Group, Ltd.",
                "AandB  Holdings-Group, Ltd.",
                "A&B  Holdings Group, Ltd.",
                "A&B  Holdings-Group Ltd",
                "A&B Holdings-Group, Ltd.",
            ]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let variants = name_variants("Acme");
        assert_eq!(variants, vec!["Acme"]);

        let variants = name_variants("Acme,  Inc");
        assert_eq!(variants, vec!["Acme,  Inc", "Acme  Inc", "Acme, Inc"]);

        let mut seen = std::collections::HashSet::new();
        assert!(variants.iter().all(|v| seen.insert(v.clone())));
    }

    #[test]
    fn unicode_letters_are_word_characters() {
        let variants = name_variants("Société Générale");
        assert_eq!(variants, vec!["Société Générale"]);
    }

    #[test]
    fn blank_name_has_no_variants() {
        assert!(name_variants("   ").is_empty());
        assert!(name_variants("").is_empty());
    }
}
