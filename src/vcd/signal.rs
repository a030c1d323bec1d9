// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;

use num::BigUint;

use super::utilities::bits_to_biguint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    RealTime,
    Reg,
    Str,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    SVInt,
    SVShortInt,
    SVLongInt,
    SVChar,
    SVLogic,
    SVBit,
    SVShortReal,
}

impl VarType {
    pub(super) const KEYWORDS: [&'static str; 29] = [
        "event",
        "integer",
        "parameter",
        "real",
        "realtime",
        "reg",
        "string",
        "supply0",
        "supply1",
        "time",
        "tri",
        "triand",
        "trior",
        "trireg",
        "tri0",
        "tri1",
        "wand",
        "wire",
        "wor",
        "int",
        "int_s",
        "shortint",
        "int_l",
        "longint",
        "char",
        "byte",
        "logic",
        "bit",
        "shortreal",
    ];

    pub fn from_keyword(word: &str) -> Option<VarType> {
        let var_type = match word {
            "event" => VarType::Event,
            "integer" => VarType::Integer,
            "parameter" => VarType::Parameter,
            "real" => VarType::Real,
            "realtime" => VarType::RealTime,
            "reg" => VarType::Reg,
            "string" => VarType::Str,
            "supply0" => VarType::Supply0,
            "supply1" => VarType::Supply1,
            "time" => VarType::Time,
            "tri" => VarType::Tri,
            "triand" => VarType::TriAnd,
            "trior" => VarType::TriOr,
            "trireg" => VarType::TriReg,
            "tri0" => VarType::Tri0,
            "tri1" => VarType::Tri1,
            "wand" => VarType::WAnd,
            "wire" => VarType::Wire,
            "wor" => VarType::WOr,
            "int" => VarType::SVInt,
            "int_s" | "shortint" => VarType::SVShortInt,
            "int_l" | "longint" => VarType::SVLongInt,
            "char" | "byte" => VarType::SVChar,
            "logic" => VarType::SVLogic,
            "bit" => VarType::SVBit,
            "shortreal" => VarType::SVShortReal,
            _ => return None,
        };
        Some(var_type)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            VarType::Event => "event",
            VarType::Integer => "integer",
            VarType::Parameter => "parameter",
            VarType::Real => "real",
            VarType::RealTime => "realtime",
            VarType::Reg => "reg",
            VarType::Str => "string",
            VarType::Supply0 => "supply0",
            VarType::Supply1 => "supply1",
            VarType::Time => "time",
            VarType::Tri => "tri",
            VarType::TriAnd => "triand",
            VarType::TriOr => "trior",
            VarType::TriReg => "trireg",
            VarType::Tri0 => "tri0",
            VarType::Tri1 => "tri1",
            VarType::WAnd => "wand",
            VarType::Wire => "wire",
            VarType::WOr => "wor",
            VarType::SVInt => "int",
            VarType::SVShortInt => "shortint",
            VarType::SVLongInt => "longint",
            VarType::SVChar => "byte",
            VarType::SVLogic => "logic",
            VarType::SVBit => "bit",
            VarType::SVShortReal => "shortreal",
        }
    }
}

/// One four-state logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
    X,
    Z,
}

impl Bit {
    /// Upper case `X` and `Z` are accepted and folded to lower case.
    pub fn from_char(chr: char) -> Option<Bit> {
        match chr {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            'x' | 'X' => Some(Bit::X),
            'z' | 'Z' => Some(Bit::Z),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
            Bit::X => 'x',
            Bit::Z => 'z',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Bit),
    /// Most significant bit first, exactly as many bits as the dump wrote.
    Vector(Vec<Bit>),
    Real(f64),
}

impl Value {
    /// Number of bits carried by this value, `None` for reals.
    pub fn width(&self) -> Option<usize> {
        match self {
            Value::Scalar(_) => Some(1),
            Value::Vector(bits) => Some(bits.len()),
            Value::Real(_) => None,
        }
    }

    /// The unsigned number this value spells out, provided every bit is a
    /// `0` or `1`.
    pub fn to_biguint(&self) -> Option<BigUint> {
        match self {
            Value::Scalar(bit) => bits_to_biguint(std::slice::from_ref(bit)),
            Value::Vector(bits) => bits_to_biguint(bits),
            Value::Real(_) => None,
        }
    }

    /// Widens a short vector to `width` bits the way a VCD reader must: a
    /// leading `x` or `z` is repeated, a leading `0` or `1` pads with `0`.
    /// Values already at least `width` wide are returned unchanged.
    pub fn extend_to(&self, width: usize) -> Value {
        let bits = match self {
            Value::Scalar(bit) => vec![*bit],
            Value::Vector(bits) => bits.clone(),
            Value::Real(_) => return self.clone(),
        };

        if bits.len() >= width {
            return Value::Vector(bits);
        }

        let fill = match bits.first() {
            Some(Bit::X) => Bit::X,
            Some(Bit::Z) => Bit::Z,
            _ => Bit::Zero,
        };
        let mut extended = vec![fill; width - bits.len()];
        extended.extend(bits);
        Value::Vector(extended)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(bit) => write!(f, "{}", bit.as_char()),
            Value::Vector(bits) => {
                let bits: String = bits.iter().map(|bit| bit.as_char()).collect();
                write!(f, "b{bits}")
            }
            Value::Real(value) => write!(f, "r{value}"),
        }
    }
}

/// A single `<value><identifier code>` record from the dump section.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub timestamp: u64,
    pub identifier_code: String,
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(bits: &str) -> Value {
        Value::Vector(bits.chars().map(|c| Bit::from_char(c).unwrap()).collect())
    }

    #[test]
    fn keywords_round_trip() {
        for keyword in VarType::KEYWORDS {
            let var_type = VarType::from_keyword(keyword).unwrap();
            assert_eq!(VarType::from_keyword(var_type.keyword()), Some(var_type));
        }
        assert_eq!(VarType::from_keyword("wired"), None);
    }

    #[test]
    fn numeric_values() {
        assert_eq!(vector("1010").to_biguint(), Some(BigUint::from(10u32)));
        assert_eq!(Value::Scalar(Bit::One).to_biguint(), Some(BigUint::from(1u32)));
        assert_eq!(vector("10x0").to_biguint(), None);
        assert_eq!(Value::Real(2.5).to_biguint(), None);
    }

    #[test]
    fn left_extension() {
        assert_eq!(vector("1").extend_to(4), vector("0001"));
        assert_eq!(vector("x1").extend_to(4), vector("xxx1"));
        assert_eq!(vector("z").extend_to(3), vector("zzz"));
        assert_eq!(vector("0101").extend_to(2), vector("0101"));
        assert_eq!(Value::Scalar(Bit::X).extend_to(2), vector("xx"));
    }

    #[test]
    fn display_matches_dump_syntax() {
        assert_eq!(Value::Scalar(Bit::Z).to_string(), "z");
        assert_eq!(vector("01xz").to_string(), "b01xz");
        assert_eq!(Value::Real(0.5).to_string(), "r0.5");
    }
}
