#[derive(Debug, PartialEq)]
pub(super) struct ParseResult<'a> {
    pub(super) matched: &'a str,
    pub(super) residual: &'a str,
}

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_until(word: &str, pattern: u8) -> ParseResult<'_> {
    let new_start = word
        .bytes()
        .position(|chr| chr == pattern)
        .unwrap_or(word.len());

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word
        .bytes()
        .position(|chr| !cond(chr))
        .unwrap_or(word.len());

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Matches `pattern` at the start of `word`, all or nothing.
pub(super) fn tag<'a>(word: &'a str, pattern: &str) -> ParseResult<'a> {
    match word.strip_prefix(pattern) {
        Some(residual) => ParseResult {
            matched: &word[0..pattern.len()],
            residual,
        },
        None => ParseResult {
            matched: "",
            residual: word,
        },
    }
}
