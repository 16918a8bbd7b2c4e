/// stackcheck - stack-effect type checking for a concatenative IR
///
/// This crate implements:
/// - The type model (concrete types, generic placeholders, stack effects)
/// - The built-in signature table
/// - The stack-effect verifier and function registry
/// - A thin front end and driver for word-definition source text

pub mod ast;
pub mod builtins;
pub mod config;
pub mod driver;
pub mod parser;
pub mod program;
pub mod typechecker;

pub use ast::types::{Effect, StackType, Type};
pub use ast::{Constant, Intrinsic, Operation};
pub use config::{CheckerConfig, Config};
pub use driver::{CompileError, check_source};
pub use program::Program;
pub use typechecker::{FunctionId, TypeError, TypeResult};
