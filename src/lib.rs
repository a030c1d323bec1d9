// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

mod vcd;
pub use vcd::{parse_vcd, write_vcd, Driver, ParseOptions, ValueChanges};
pub use vcd::{BitRange, Scope, ScopeIdx, ScopeItem, ScopeKind, VarIdx, Variable};
pub use vcd::{Bit, Value, ValueChange, VarType};
pub use vcd::{Diagnostic, Diagnostics, Location, SemanticKind};
pub use vcd::{Document, Header, Metadata, TimeUnit, Timescale, Version};

pub use num::BigUint;
