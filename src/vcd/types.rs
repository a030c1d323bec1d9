// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::collections::HashMap;
use std::fmt;

use chrono::prelude::*;

use super::error::Diagnostic;
use super::signal::{ValueChange, VarType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(pub String);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
    Ps,
    Fs,
}

impl TimeUnit {
    pub fn from_keyword(word: &str) -> Option<TimeUnit> {
        match word {
            "s" => Some(TimeUnit::S),
            "ms" => Some(TimeUnit::Ms),
            "us" => Some(TimeUnit::Us),
            "ns" => Some(TimeUnit::Ns),
            "ps" => Some(TimeUnit::Ps),
            "fs" => Some(TimeUnit::Fs),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Timescale {
    pub magnitude: u32,
    pub unit: TimeUnit,
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.keyword())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub date: Option<DateTime<Utc>>,
    /// The `$date` body as written, kept even when it does not parse.
    pub date_text: Option<String>,
    pub version: Option<Version>,
    pub comments: Vec<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VarIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Module,
    Task,
    Function,
    Fork,
    /// Written `begin` in a dump.
    Block,
}

impl ScopeKind {
    pub fn from_keyword(word: &str) -> Option<ScopeKind> {
        match word {
            "module" => Some(ScopeKind::Module),
            "task" => Some(ScopeKind::Task),
            "function" => Some(ScopeKind::Function),
            "fork" => Some(ScopeKind::Fork),
            "begin" => Some(ScopeKind::Block),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Task => "task",
            ScopeKind::Function => "function",
            ScopeKind::Fork => "fork",
            ScopeKind::Block => "begin",
        }
    }
}

/// A declaration inside a scope (or at top level), in the order it was
/// declared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScopeItem {
    Scope(ScopeIdx),
    Variable(VarIdx),
}

/// A `$scope` of the dump. The root of the tree is unnamed, sits at
/// [`Header::ROOT`] and holds every declaration made outside of any
/// `$scope`; it is the only scope without a parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    pub parent_idx: Option<ScopeIdx>,
    pub self_idx: ScopeIdx,
    pub items: Vec<ScopeItem>,
}

impl Scope {
    fn root() -> Scope {
        Scope {
            name: String::new(),
            kind: ScopeKind::Module,
            parent_idx: None,
            self_idx: Header::ROOT,
            items: vec![],
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_idx.is_none()
    }

    pub fn child_scopes(&self) -> impl Iterator<Item = ScopeIdx> + '_ {
        self.items.iter().filter_map(|item| match item {
            ScopeItem::Scope(idx) => Some(*idx),
            ScopeItem::Variable(_) => None,
        })
    }

    pub fn child_variables(&self) -> impl Iterator<Item = VarIdx> + '_ {
        self.items.iter().filter_map(|item| match item {
            ScopeItem::Variable(idx) => Some(*idx),
            ScopeItem::Scope(_) => None,
        })
    }
}

/// Declared bit range, e.g. `[7:0]`. A single index `[3]` reads as `3:3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BitRange {
    pub msb: i64,
    pub lsb: i64,
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.msb == self.lsb {
            write!(f, "[{}]", self.msb)
        } else {
            write!(f, "[{}:{}]", self.msb, self.lsb)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub identifier_code: String,
    pub var_type: VarType,
    pub width: u32,
    pub reference_name: String,
    pub bit_range: Option<BitRange>,
    /// [`Header::ROOT`] for variables declared outside of any `$scope`.
    pub scope: ScopeIdx,
}

/// Everything declared before `$enddefinitions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub(super) timescale: Option<Timescale>,
    pub(super) metadata: Metadata,
    pub(super) all_scopes: Vec<Scope>,
    pub(super) all_variables: Vec<Variable>,
    pub(super) variables_by_code: HashMap<String, Vec<VarIdx>>,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            timescale: None,
            metadata: Metadata::default(),
            all_scopes: vec![Scope::root()],
            all_variables: vec![],
            variables_by_code: HashMap::new(),
        }
    }
}

impl Header {
    pub const ROOT: ScopeIdx = ScopeIdx(0);

    pub fn timescale(&self) -> Option<Timescale> {
        self.timescale
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn root_scope(&self) -> &Scope {
        self.scope(Header::ROOT)
    }

    /// Scopes declared outside of any other `$scope`, in order.
    pub fn top_level_scopes(&self) -> impl Iterator<Item = &Scope> + '_ {
        self.root_scope()
            .child_scopes()
            .map(|idx| self.scope(idx))
    }

    pub fn scope(&self, idx: ScopeIdx) -> &Scope {
        let ScopeIdx(idx) = idx;
        &self.all_scopes[idx]
    }

    /// Every scope, the unnamed root first.
    pub fn scopes(&self) -> &[Scope] {
        &self.all_scopes
    }

    pub fn variable(&self, idx: VarIdx) -> &Variable {
        let VarIdx(idx) = idx;
        &self.all_variables[idx]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.all_variables
    }

    /// Every variable declared with `code`, in declaration order.
    pub fn variables_for_code(&self, code: &str) -> &[VarIdx] {
        self.variables_by_code
            .get(code)
            .map(|vars| vars.as_slice())
            .unwrap_or(&[])
    }

    pub fn identifier_codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables_by_code.keys().map(|code| code.as_str())
    }

    /// Dotted hierarchical name of a scope, e.g. `top.cpu.alu`. The root
    /// has no name, so its path is empty.
    pub fn scope_path(&self, idx: ScopeIdx) -> String {
        let mut names = vec![];
        let mut scope = self.scope(idx);
        while let Some(parent_idx) = scope.parent_idx {
            names.push(scope.name.as_str());
            scope = self.scope(parent_idx);
        }
        names.reverse();
        names.join(".")
    }

    /// Dotted hierarchical name of a variable, e.g. `top.cpu.clk`.
    pub fn variable_path(&self, idx: VarIdx) -> String {
        let variable = self.variable(idx);
        if variable.scope == Header::ROOT {
            return variable.reference_name.clone();
        }
        format!("{}.{}", self.scope_path(variable.scope), variable.reference_name)
    }
}

/// A fully parsed VCD file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(super) header: Header,
    pub(super) value_changes: Vec<ValueChange>,
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn timescale(&self) -> Option<Timescale> {
        self.header.timescale()
    }

    pub fn metadata(&self) -> &Metadata {
        self.header.metadata()
    }

    pub fn root_scope(&self) -> &Scope {
        self.header.root_scope()
    }

    pub fn top_level_scopes(&self) -> impl Iterator<Item = &Scope> + '_ {
        self.header.top_level_scopes()
    }

    pub fn scope(&self, idx: ScopeIdx) -> &Scope {
        self.header.scope(idx)
    }

    pub fn child_scopes(&self, idx: ScopeIdx) -> impl Iterator<Item = ScopeIdx> + '_ {
        self.header.scope(idx).child_scopes()
    }

    pub fn child_variables(&self, idx: ScopeIdx) -> impl Iterator<Item = VarIdx> + '_ {
        self.header.scope(idx).child_variables()
    }

    pub fn scope_path(&self, idx: ScopeIdx) -> String {
        self.header.scope_path(idx)
    }

    pub fn variable_path(&self, idx: VarIdx) -> String {
        self.header.variable_path(idx)
    }

    pub fn variable(&self, idx: VarIdx) -> &Variable {
        self.header.variable(idx)
    }

    pub fn variables(&self) -> &[Variable] {
        self.header.variables()
    }

    pub fn variables_for_code(&self, code: &str) -> &[VarIdx] {
        self.header.variables_for_code(code)
    }

    pub fn value_changes(&self) -> &[ValueChange] {
        &self.value_changes
    }

    /// Changes driving the given variable. Aliased variables share an
    /// identifier code and therefore observe the very same changes.
    pub fn changes_for_variable(&self, idx: VarIdx) -> impl Iterator<Item = &ValueChange> + '_ {
        let code = self.variable(idx).identifier_code.as_str();
        self.value_changes
            .iter()
            .filter(move |change| change.identifier_code == code)
    }

    /// Non-fatal diagnostics raised while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
