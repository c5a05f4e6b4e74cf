/// Strips all whitespace and uppercases the remainder.
pub fn normalize_iban(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Re-groups a string into blocks of four characters separated by spaces.
/// Existing whitespace is dropped first; no validation happens here.
pub fn format_iban(input: &str) -> String {
    let compact: Vec<char> = input.chars().filter(|ch| !ch.is_whitespace()).collect();
    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    for (idx, chunk) in compact.chunks(4).enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.extend(chunk.iter());
    }
    out
}

pub fn normalize_country_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        Some(trimmed.to_uppercase())
    } else {
        None
    }
}

pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_dash = false;
    for ch in input.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            out.push(lower);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}
