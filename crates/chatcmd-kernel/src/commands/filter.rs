//! Fuzzy command name matching.

/// Narrow `names` down to the best matches for `filter`.
///
/// Matching is case-insensitive. Each character of the filter has to appear
/// in a name after the previous matched character; a character no name
/// contains is ignored. Of the survivors, the names whose last match is
/// earliest win, then the shortest of those.
///
/// Returns every name that ties, in input order, so more than one result
/// means the filter is ambiguous. Returns nothing only for empty input.
pub fn filter_names<'a, I>(names: I, filter: &str) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    struct Candidate<'n> {
        name: &'n str,
        lower: Vec<char>,
        cursor: usize,
    }

    let mut candidates: Vec<Candidate<'a>> = names
        .into_iter()
        .map(|name| Candidate {
            name,
            lower: name.to_lowercase().chars().collect(),
            cursor: 0,
        })
        .collect();

    for c in filter.to_lowercase().chars() {
        let narrowed: Vec<Candidate<'a>> = candidates
            .iter()
            .filter_map(|cand| {
                let found = cand.lower.get(cand.cursor..)?.iter().position(|&x| x == c)?;
                Some(Candidate {
                    name: cand.name,
                    lower: cand.lower.clone(),
                    cursor: cand.cursor + found + 1,
                })
            })
            .collect();
        if !narrowed.is_empty() {
            candidates = narrowed;
        }
    }

    let Some(min_cursor) = candidates.iter().map(|c| c.cursor).min() else {
        return Vec::new();
    };
    candidates.retain(|c| c.cursor == min_cursor);
    let Some(min_len) = candidates.iter().map(|c| c.lower.len()).min() else {
        return Vec::new();
    };
    candidates
        .into_iter()
        .filter(|c| c.lower.len() == min_len)
        .map(|c| c.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOT: &[&str] = &["help", "quit", "play", "ply"];

    #[rstest]
    #[case::exact_match(BOT, "help", &["help"])]
    #[case::first_occurrence(BOT, "y", &["ply"])]
    #[case::no_letter_matches_shortest_wins(BOT, "zorn", &["ply"])]
    #[case::first_letter(BOT, "q", &["quit"])]
    #[case::unknown_letters_ignored(BOT, "palyndrom", &["play"])]
    #[case::prefix_prefers_shorter(&["play", "pause", "playlist"], "pl", &["play"])]
    #[case::single_letter(&["add", "append"], "a", &["add"])]
    #[case::case_insensitive(&["Play", "stop"], "PL", &["Play"])]
    #[case::ambiguous(&["help", "quit", "play", "ply", "pla"], "p", &["ply", "pla"])]
    #[case::empty_filter_picks_shortest(&["", "list", "add"], "", &[""])]
    fn filter_cases(#[case] names: &[&str], #[case] filter: &str, #[case] expected: &[&str]) {
        assert_eq!(filter_names(names.iter().copied(), filter), expected);
    }

    #[test]
    fn empty_input() {
        assert!(filter_names(std::iter::empty(), "x").is_empty());
    }
}
