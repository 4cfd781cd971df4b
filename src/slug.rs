//! Slug derivation: display name -> URL-safe identifier.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9-]+").expect("valid slug pattern"))
}

/// Lowercase, turn whitespace runs into one hyphen, drop everything that is not
/// `[a-z0-9-]`, trim hyphens at both ends.
///
/// The result may be empty (e.g. a name made only of punctuation). No collision
/// suffixing happens here; a clash surfaces later as a duplicate entry.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let hyphenated = whitespace().replace_all(&lower, "-");
    let stripped = disallowed().replace_all(&hyphenated, "");
    stripped.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_names() {
        assert_eq!(slugify("Iron Ore"), "iron-ore");
        assert_eq!(slugify("  Steel   Ingot "), "steel-ingot");
        assert_eq!(slugify("Blast\tFurnace\nMk2"), "blast-furnace-mk2");
    }

    #[test]
    fn strips_punctuation_and_non_ascii() {
        assert_eq!(slugify("Copper (Refined)!"), "copper-refined");
        assert_eq!(slugify("Café Crème"), "caf-crme");
        assert_eq!(slugify("a - b"), "a---b");
    }

    #[test]
    fn degenerate_names_yield_empty_slug() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("-"), "");
    }

    #[test]
    fn idempotent() {
        for name in ["Iron Ore", "  Weird__Name 42 ", "Ünïcödé Thing", "x", "A-B c"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "slug of {:?} not stable", name);
        }
    }

    #[test]
    fn same_slug_for_differently_spaced_names() {
        assert_eq!(slugify("Iron Ore"), slugify("iron   ORE"));
    }
}
