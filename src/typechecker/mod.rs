/// Type checker for stackcheck
///
/// This module implements stack-effect verification with:
/// - A symbolic stack per function
/// - Per-application binding of generic placeholders
/// - A name-keyed registry of declared functions

pub mod environment;
pub mod checker;
pub mod unification;
pub mod errors;

pub use checker::TypeChecker;
pub use environment::{Environment, Function, FunctionId};
pub use errors::{TypeError, TypeResult};
