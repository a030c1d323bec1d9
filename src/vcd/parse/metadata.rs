use std::io::Read;

use chrono::prelude::*;
use itertools::Itertools;
use tracing::debug;

use super::super::error::{Diagnostic, Location, SemanticKind};
use super::super::scanner::TokenKind;
use super::super::types::{TimeUnit, Timescale, Version};
use super::combinator_atoms::{digit, take_while, ParseResult};
use super::Parser;

const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Reads a `$date` body. Simulators agree on the five words
/// {Day, Month, Date, hh:mm:ss, Year} but not on their order, so every
/// ordering is tried until one parses.
pub(super) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let words: Vec<&str> = text.split_ascii_whitespace().collect();
    if words.len() != 5 {
        debug!("`$date` has {} words, expected 5: {text:?}", words.len());
        return None;
    }

    let parsed = words
        .iter()
        .permutations(words.len())
        .map(|permutation| permutation.into_iter().join(" "))
        .find_map(|candidate| NaiveDateTime::parse_from_str(&candidate, DATE_FORMAT).ok())
        .map(|naive| Utc.from_utc_datetime(&naive));

    if parsed.is_none() {
        debug!("failed to parse `$date` {text:?}");
    }
    parsed
}

impl<R: Read> Parser<R> {
    // `$timescale` has already been consumed; we might see `1ps $end` or
    // `1 ps $end`
    pub(super) fn parse_timescale(&mut self, location: Location) -> Result<(), Diagnostic> {
        let (word, word_location) = self.expect_word("a timescale magnitude")?;

        let ParseResult { matched, residual } = take_while(&word, digit);
        let magnitude = match matched.parse::<u32>() {
            Ok(magnitude) if magnitude > 0 => magnitude,
            _ => {
                let err = format!("syntax error, invalid timescale magnitude in `{word}`");
                return Err(Diagnostic::syntax(word_location, err));
            }
        };

        let unit = if residual.is_empty() {
            let (unit, unit_location) = self.expect_word("a timescale unit")?;
            time_unit(&unit, unit_location)?
        } else {
            time_unit(residual, word_location)?
        };

        self.expect_end("$timescale")?;

        let timescale = Timescale { magnitude, unit };
        match self.header.timescale {
            Some(first) => self.report(
                location,
                SemanticKind::DuplicateTimescale,
                format!("`{timescale}` ignored, timescale was already set to `{first}`"),
            ),
            None => {
                debug!("timescale {timescale}");
                self.header.timescale = Some(timescale);
                Ok(())
            }
        }
    }

    pub(super) fn record_metadata(&mut self, kind: TokenKind) {
        let metadata = &mut self.header.metadata;
        match kind {
            TokenKind::Date(text) => {
                metadata.date = parse_date(&text);
                metadata.date_text = Some(text);
            }
            TokenKind::Version(text) => metadata.version = Some(Version(text)),
            TokenKind::Comment(text) => metadata.comments.push(text),
            _ => {}
        }
    }
}

fn time_unit(word: &str, location: Location) -> Result<TimeUnit, Diagnostic> {
    TimeUnit::from_keyword(word).ok_or_else(|| {
        let err = format!(
            "syntax error, unknown timescale unit `{word}`, expecting one of s, ms, us, ns, ps, fs"
        );
        Diagnostic::syntax(location, err)
    })
}
