//! part of the vcd parser that handles the value change section, one
//! change at a time
use std::io::Read;

use tracing::trace;

use super::super::error::{Diagnostic, Location, SemanticKind};
use super::super::scanner::TokenKind;
use super::super::signal::{Value, ValueChange, VarType};
use super::{unexpected, Parser};

const EXPECTED_EVENT: &str = "a timestamp, a value change or a dump command";

impl<R: Read> Parser<R> {
    /// Pulls tokens until the next value change that resolves to a declared
    /// variable. `Ok(None)` means the stream is done.
    pub(crate) fn next_change(&mut self) -> Result<Option<ValueChange>, Diagnostic> {
        loop {
            let token = match self.next_token()? {
                Some(token) => token,
                None => return Ok(None),
            };
            let location = token.location;

            match token.kind {
                TokenKind::Timestamp(time) => self.advance_time(time, location)?,
                TokenKind::Change { code, value } => {
                    if let Some(change) = self.resolve_change(code, value, location)? {
                        return Ok(Some(change));
                    }
                }
                TokenKind::Command(command) if command.is_dump_control() => {
                    if let Some(opened_at) = self.open_dump {
                        let err = format!(
                            "syntax error, unexpected `{}`, dump command opened at {opened_at} \
                             is missing its `$end`",
                            command.keyword()
                        );
                        return Err(Diagnostic::syntax(location, err));
                    }
                    trace!("{} at {location}", command.keyword());
                    self.open_dump = Some(location);
                }
                TokenKind::End if self.open_dump.is_some() => self.open_dump = None,
                TokenKind::Comment(text) => trace!("comment at {location}: {text:?}"),
                other => return Err(unexpected(&other, location, EXPECTED_EVENT)),
            }
        }
    }

    fn advance_time(&mut self, time: u64, location: Location) -> Result<(), Diagnostic> {
        if let Some(prev) = self.current_time {
            if time < prev {
                self.report(
                    location,
                    SemanticKind::NonMonotonicTime,
                    format!("timestamp #{time} is earlier than the preceding #{prev}"),
                )?;
            }
        }
        self.current_time = Some(time);
        Ok(())
    }

    fn resolve_change(
        &mut self,
        code: String,
        value: Value,
        location: Location,
    ) -> Result<Option<ValueChange>, Diagnostic> {
        let timestamp = match self.current_time {
            Some(time) => time,
            None => {
                self.report(
                    location,
                    SemanticKind::MissingTimestamp,
                    "value changes before the first timestamp are taken to happen at #0",
                )?;
                self.current_time = Some(0);
                0
            }
        };

        if self.header.variables_for_code(&code).is_empty() {
            self.report(
                location,
                SemanticKind::UnknownIdentifier,
                format!("no `$var` declares identifier code `{code}`"),
            )?;
            return Ok(None);
        }

        if let Some(mismatch) = self.width_mismatch(&code, &value) {
            self.report(location, SemanticKind::WidthMismatch, mismatch)?;
        }

        Ok(Some(ValueChange {
            timestamp,
            identifier_code: code,
            value,
        }))
    }

    // Vectors may be shorter than the declared width (they are left
    // extended) but never longer. Scalars only fit one bit variables.
    fn width_mismatch(&self, code: &str, value: &Value) -> Option<String> {
        let observed = value.width()?;
        self.header
            .variables_for_code(code)
            .iter()
            .map(|idx| self.header.variable(*idx))
            .find(|variable| {
                let declared = variable.width as usize;
                match value {
                    Value::Scalar(_) => declared != 1 && variable.var_type != VarType::Event,
                    _ => observed > declared,
                }
            })
            .map(|variable| {
                format!(
                    "`{value}` carries {observed} bit(s) but `{}` (code `{code}`) is declared \
                     with {} bit(s)",
                    variable.reference_name, variable.width
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::options::ParseOptions;
    use super::super::super::scanner::Scanner;
    use super::super::super::signal::Bit;
    use super::*;

    const HEADER: &str = "$scope module top $end\n\
                          $var wire 1 ! clk $end\n\
                          $var reg 4 \" nibble $end\n\
                          $var real 64 # temp $end\n\
                          $upscope $end\n\
                          $enddefinitions $end\n";

    type Outcome = (Result<Vec<ValueChange>, Diagnostic>, Vec<Diagnostic>);

    fn changes(body: &str, options: ParseOptions) -> Outcome {
        let src = format!("{HEADER}{body}");
        let mut parser = Parser::new(Scanner::new(src.as_bytes()), options);
        let mut changes = vec![];
        let result = parser.parse_declarations().and_then(|_| loop {
            match parser.next_change() {
                Ok(Some(change)) => changes.push(change),
                Ok(None) => break Ok(changes),
                Err(err) => break Err(err),
            }
        });
        (result, parser.diagnostics().to_vec())
    }

    fn change(timestamp: u64, code: &str, value: Value) -> ValueChange {
        ValueChange {
            timestamp,
            identifier_code: code.to_string(),
            value,
        }
    }

    #[test]
    fn dump_blocks() {
        let body = "#0\n$dumpvars\n0!\nbxxxx \"\nr0 #\n$end\n#5\n1!\nb1010 \"\n#10\nr1.5 #\n";
        let (result, diagnostics) = changes(body, ParseOptions::default());
        let bits = |s: &str| Value::Vector(s.chars().filter_map(Bit::from_char).collect());
        assert_eq!(
            result.unwrap(),
            vec![
                change(0, "!", Value::Scalar(Bit::Zero)),
                change(0, "\"", bits("xxxx")),
                change(0, "#", Value::Real(0.0)),
                change(5, "!", Value::Scalar(Bit::One)),
                change(5, "\"", bits("1010")),
                change(10, "#", Value::Real(1.5)),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn empty_value_section() {
        let (result, diagnostics) = changes("", ParseOptions::default());
        assert!(result.unwrap().is_empty());
        assert!(diagnostics.is_empty());

        let (result, _) = changes("#0 #10 $comment nothing happened $end", ParseOptions::default());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn unknown_code_is_skipped() {
        let (result, diagnostics) = changes("#0 1@ 1! #1 0!", ParseOptions::default());
        assert_eq!(result.unwrap().len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].semantic_kind(), Some(SemanticKind::UnknownIdentifier));
        assert!(diagnostics[0].message().contains("unknown identifier"));
        assert!(diagnostics[0].message().contains("`@`"));

        let (result, _) = changes("#0 1@ 1!", ParseOptions::strict());
        let err = result.unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticKind::UnknownIdentifier));
    }

    #[test]
    fn decreasing_time_is_reported() {
        let (result, diagnostics) = changes("#10 1! #5 0! #5 1!", ParseOptions::default());
        let times: Vec<u64> = result.unwrap().iter().map(|c| c.timestamp).collect();
        assert_eq!(times, vec![10, 5, 5]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].semantic_kind(), Some(SemanticKind::NonMonotonicTime));
        assert_eq!(diagnostics[0].location(), Some(Location::new(7, 8)));
    }

    #[test]
    fn width_mismatches() {
        let (result, diagnostics) = changes("#0 b101 \" b11111 \" 1\" b10 !", ParseOptions::default());
        assert_eq!(result.unwrap().len(), 4);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.semantic_kind()).collect();
        // short vectors are fine, too long or scalar on a vector is not
        assert_eq!(kinds, vec![Some(SemanticKind::WidthMismatch); 3]);
        assert!(diagnostics[0].message().contains("`nibble`"));
    }

    #[test]
    fn changes_before_first_timestamp() {
        let (result, diagnostics) = changes("$dumpvars 1! $end #3 0!", ParseOptions::default());
        let times: Vec<u64> = result.unwrap().iter().map(|c| c.timestamp).collect();
        assert_eq!(times, vec![0, 3]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].semantic_kind(), Some(SemanticKind::MissingTimestamp));
    }

    #[test]
    fn grammar_violations_are_fatal() {
        let cases = [
            ("#0 $end", "unexpected `$end`"),
            ("#0 $var wire 1 $ x $end", "unexpected `$var`"),
            ("#0 $dumpvars $dumpoff $end", "is missing its `$end`"),
            ("#0 $enddefinitions $end", "unexpected `$enddefinitions`"),
        ];
        for (body, expected) in cases {
            let (result, _) = changes(body, ParseOptions::default());
            let err = result.unwrap_err();
            assert!(matches!(err, Diagnostic::Syntax { .. }), "{body}: {err:?}");
            assert!(err.message().contains(expected), "{body}: {err:?}");
        }
    }
}
