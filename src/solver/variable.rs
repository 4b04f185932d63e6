use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a variable in a constraint model.
///
/// Grid positions and the synthesized variables of a sum chain live in one
/// tagged union so that equality and hashing are defined across the whole
/// variable space. Variables are never renamed once registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    /// A grid position `(x, y)`.
    Cell { x: usize, y: usize },
    /// The `index`-th running-total variable of the sum chain named `scope`.
    Chain { scope: String, index: usize },
    /// The result variable of the sum chain named `scope`.
    Total { scope: String },
}

impl Variable {
    pub fn cell(x: usize, y: usize) -> Self {
        Variable::Cell { x, y }
    }

    /// Returns the grid position if this is a [`Variable::Cell`].
    pub fn as_cell(&self) -> Option<(usize, usize)> {
        match self {
            Variable::Cell { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Cell { x, y } => write!(f, "({x},{y})"),
            Variable::Chain { scope, index } => write!(f, "sum:{scope}[{index}]"),
            Variable::Total { scope } => write!(f, "sum:{scope}"),
        }
    }
}

/// A candidate value in a variable's domain.
///
/// `Int` covers grid cells (`0` = safe, `1` = hazardous) and sum results;
/// `Pair` is the `(before, after)` running total carried by chain variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Pair(i64, i64),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Pair(..) => None,
        }
    }
}

/// Factor weight. Zero forbids a combination; any positive weight allows it.
pub type Weight = f64;

/// An ordered domain of candidate values.
pub type Domain = im::Vector<Value>;
