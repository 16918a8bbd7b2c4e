/// Operation definitions for stackcheck
///
/// This module defines the intermediate representation the checker consumes,
/// plus the located word definitions a front end produces.

pub mod types;

use std::fmt;

use types::{Effect, Type};

/// Compile-time literal value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Int(i64),
    Bool(bool),
}

impl Constant {
    /// The concrete type a pushed constant has on the stack
    pub fn ty(&self) -> Type {
        match self {
            Constant::Int(_) => Type::Int,
            Constant::Bool(_) => Type::Bool,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "{}", n),
            Constant::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Built-in operation with a fixed stack effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Add,
    Sub,
    Mul,
    Div,
    Drop,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 5] = [
        Intrinsic::Add,
        Intrinsic::Sub,
        Intrinsic::Mul,
        Intrinsic::Div,
        Intrinsic::Drop,
    ];

    /// Canonical spelling in source text
    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Add => "+",
            Intrinsic::Sub => "-",
            Intrinsic::Mul => "*",
            Intrinsic::Div => "/",
            Intrinsic::Drop => "drop",
        }
    }

    /// Resolve either the symbol or the word alias (`add`, `sub`, ...)
    pub fn from_name(name: &str) -> Option<Intrinsic> {
        match name {
            "+" | "add" => Some(Intrinsic::Add),
            "-" | "sub" => Some(Intrinsic::Sub),
            "*" | "mul" => Some(Intrinsic::Mul),
            "/" | "div" => Some(Intrinsic::Div),
            "drop" => Some(Intrinsic::Drop),
            _ => None,
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single instruction in a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Push a literal
    PushConstant(Constant),

    /// Name a constant. Has no stack effect; uses of the name are resolved
    /// by the front end into `PushConstant`.
    DefineConstant { name: String, value: Constant },

    /// Call a declared function by name
    Call(String),

    /// Built-in operation
    Intrinsic(Intrinsic),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::PushConstant(value) => write!(f, "{}", value),
            Operation::DefineConstant { name, value } => write!(f, "const {} {}", name, value),
            Operation::Call(name) => write!(f, "{}", name),
            Operation::Intrinsic(intrinsic) => write!(f, "{}", intrinsic),
        }
    }
}

/// Position of a token in source text (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub line: usize,
    pub column: usize,
}

impl SourceLoc {
    pub fn new(line: usize, column: usize) -> Self {
        SourceLoc { line, column }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Word (function) definition as read from source
#[derive(Debug, Clone, PartialEq)]
pub struct WordDef {
    pub name: String,
    pub effect: Effect,
    pub body: Vec<(Operation, SourceLoc)>,
    pub loc: SourceLoc,
    /// Location of the closing `;`
    pub end: SourceLoc,
}

/// All word definitions of one source text, in order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub word_defs: Vec<WordDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_names_round_trip() {
        for intrinsic in Intrinsic::ALL {
            assert_eq!(Intrinsic::from_name(intrinsic.name()), Some(intrinsic));
        }
        assert_eq!(Intrinsic::from_name("mul"), Some(Intrinsic::Mul));
        assert_eq!(Intrinsic::from_name("dup"), None);
    }

    #[test]
    fn test_operation_display() {
        let op = Operation::DefineConstant {
            name: "TEN".to_string(),
            value: Constant::Int(10),
        };
        assert_eq!(op.to_string(), "const TEN 10");
        assert_eq!(Operation::Intrinsic(Intrinsic::Div).to_string(), "/");
        assert_eq!(Operation::PushConstant(Constant::Int(-3)).to_string(), "-3");
        assert_eq!(Operation::PushConstant(Constant::Bool(true)).to_string(), "true");
        assert_eq!(Constant::Bool(false).ty(), Type::Bool);
    }
}
