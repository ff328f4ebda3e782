/// Rewrite rules applied to every genre name coming back from the lookup,
/// in order, on the evolving string. Substring matches, all occurrences.
const REWRITES: &[(&str, &str)] = &[
    ("r&b", "RnB"),
    ("r b", "RnB"),
    ("top 40", "pop"),
    ("contemporary ", ""),
];

/// Normalize a single genre name: lowercase, apply the rewrite table, then
/// uppercase the first character only. The remainder of the string is left
/// as the rewrites produced it, so `"contemporary r&b"` comes out `"RnB"`.
pub fn normalize_genre(genre: &str) -> String {
    let mut normalized = genre.to_lowercase();
    for (pattern, replacement) in REWRITES {
        normalized = normalized.replace(pattern, replacement);
    }
    capitalize_first_letter(&normalized)
}

fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contemporary_rnb_collapses() {
        assert_eq!(normalize_genre("Contemporary R&B"), "RnB");
    }

    #[test]
    fn top_40_becomes_pop() {
        assert_eq!(normalize_genre("Top 40 Hits"), "Pop hits");
    }

    #[test]
    fn r_space_b_variant() {
        assert_eq!(normalize_genre("R B soul"), "RnB soul");
    }

    #[test]
    fn replacement_hits_every_occurrence() {
        assert_eq!(normalize_genre("r&b / r&b"), "RnB / RnB");
    }

    #[test]
    fn plain_genre_is_just_capitalized() {
        assert_eq!(normalize_genre("alternative rock"), "Alternative rock");
    }

    #[test]
    fn lowercase_prefix_capitalizes_literally() {
        // "rnb" is not a rewrite pattern, so only the first char changes.
        assert_eq!(normalize_genre("rnb"), "Rnb");
    }

    #[test]
    fn empty_string() {
        assert_eq!(normalize_genre(""), "");
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            normalize_genre("Contemporary Top 40"),
            normalize_genre("Contemporary Top 40")
        );
    }
}
