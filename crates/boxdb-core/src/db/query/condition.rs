use std::fmt;

///
/// ConditionOp
///
/// Operator of one appended predicate step. The builder forwards the tag
/// untouched; operand/kind compatibility is decided by the engine.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum ConditionOp {
    IsNull = 0x01,
    NotNull = 0x02,
    Equal = 0x03,
    NotEqual = 0x04,
    Less = 0x05,
    Greater = 0x06,
    Between = 0x07,
    In = 0x08,
    Contains = 0x09,
    StartsWith = 0x0a,
    EndsWith = 0x0b,
}

impl ConditionOp {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::IsNull => "is null",
            Self::NotNull => "is not null",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Between => "between",
            Self::In => "in",
            Self::Contains => "contains",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
        }
    }
}

///
/// Operand
///
/// Tagged operand carried alongside a `ConditionOp`. One variant per operand
/// family the engine accepts.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    None,
    Int(i64),
    IntPair(i64, i64),
    IntList(Vec<i64>),
    Float(f64),
    Text(String),
}

impl Operand {
    #[must_use]
    pub const fn family(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Int(_) => "int",
            Self::IntPair(..) => "int pair",
            Self::IntList(_) => "int list",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Operand {
    fn from(v: u64) -> Self {
        Self::Int(v.cast_signed())
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::IntPair(a, b) => write!(f, "{a}..={b}"),
            Self::IntList(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

///
/// Condition
///
/// One accumulated predicate step. Conditions are conjoined in append order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub property_id: u32,
    pub op: ConditionOp,
    pub operand: Operand,
}

impl Condition {
    #[must_use]
    pub const fn new(property_id: u32, op: ConditionOp, operand: Operand) -> Self {
        Self {
            property_id,
            op,
            operand,
        }
    }
}
