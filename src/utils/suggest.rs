//! Did-you-mean candidate ranking for unrecognized schematic names.

/// Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Find candidates similar to the given target.
/// Uses prefix matching, suffix matching, and Levenshtein distance.
/// Returns up to 3 matches prioritized by match quality.
pub fn similar_names(target: &str, candidates: &[String]) -> Vec<String> {
    let target_lower = target.to_lowercase();
    let mut matches: Vec<(String, usize)> = Vec::new();

    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();

        // Priority 0: Prefix match (target is prefix of candidate)
        if candidate_lower.starts_with(&target_lower) && candidate_lower != target_lower {
            matches.push((candidate.clone(), 0));
            continue;
        }

        // Priority 1: Suffix match (target is suffix of candidate)
        if candidate_lower.ends_with(&target_lower) {
            matches.push((candidate.clone(), 1));
            continue;
        }

        // Priority 2: Levenshtein distance <= 3
        let dist = levenshtein(&target_lower, &candidate_lower);
        if dist <= 3 && dist > 0 {
            matches.push((candidate.clone(), dist + 10)); // Offset to sort after prefix/suffix
        }
    }

    matches.sort_by_key(|(_, priority)| *priority);
    matches.into_iter().take(3).map(|(name, _)| name).collect()
}
