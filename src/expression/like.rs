//! Case-insensitive LIKE pattern matching.
//!
//! `_` matches exactly one character and `%` matches any run of characters,
//! including an empty one.

/// Match `input` against a LIKE `pattern`, ignoring case.
///
/// A missing input or pattern (SQL NULL) never matches.
pub fn like_match(input: Option<&str>, pattern: Option<&str>) -> bool {
    match (input, pattern) {
        (Some(input), Some(pattern)) => {
            let input: Vec<char> = input.chars().flat_map(char::to_lowercase).collect();
            let pattern: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();
            match_chars(&input, &pattern)
        }
        _ => false,
    }
}

fn match_chars(mut input: &[char], mut pattern: &[char]) -> bool {
    while let (Some(&p), Some(&c)) = (pattern.first(), input.first()) {
        match p {
            '_' => {}
            '%' => {
                let rest = &pattern[1..];
                if rest.is_empty() {
                    return true;
                }
                return (0..=input.len()).any(|skip| match_chars(&input[skip..], rest));
            }
            _ if p != c => return false,
            _ => {}
        }
        input = &input[1..];
        pattern = &pattern[1..];
    }

    input.is_empty() && (pattern.is_empty() || pattern == &['%'][..])
}
