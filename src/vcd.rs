mod reader;

mod scanner;

mod types;
pub use types::*;

mod signal;
pub use signal::{Bit, Value, ValueChange, VarType};

mod error;
pub use error::*;

mod options;
pub use options::ParseOptions;

mod parse;

mod driver;
pub use driver::{parse_vcd, Driver, ValueChanges};

mod write;
pub use write::write_vcd;

mod utilities;
