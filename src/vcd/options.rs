// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

use std::collections::BTreeSet;

use super::error::SemanticKind;

/// Decides which semantic diagnostics stop a parse.
///
/// The default escalates only [`SemanticKind::UnclosedScope`]: a document
/// whose declarations never closed is not handed back. Everything else is
/// recorded on the document and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    fatal: BTreeSet<SemanticKind>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            fatal: BTreeSet::from([SemanticKind::UnclosedScope]),
        }
    }
}

impl ParseOptions {
    /// Every semantic diagnostic is fatal.
    pub fn strict() -> Self {
        ParseOptions {
            fatal: SemanticKind::ALL.into_iter().collect(),
        }
    }

    /// No semantic diagnostic is fatal. Scopes left open at
    /// `$enddefinitions` are closed and the document is still returned.
    pub fn lenient() -> Self {
        ParseOptions {
            fatal: BTreeSet::new(),
        }
    }

    pub fn fatal(mut self, kind: SemanticKind) -> Self {
        self.fatal.insert(kind);
        self
    }

    pub fn tolerate(mut self, kind: SemanticKind) -> Self {
        self.fatal.remove(&kind);
        self
    }

    pub fn is_fatal(&self, kind: SemanticKind) -> bool {
        self.fatal.contains(&kind)
    }
}
