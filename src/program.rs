/*!
Program: the top-level container

Owns the source text, the function registry and the checker. Front ends
declare every function first, append operations in source order and finish
each body at its closing marker.
*/
use tracing::debug;

use crate::ast::Operation;
use crate::ast::types::{Effect, Type};
use crate::config::CheckerConfig;
use crate::typechecker::environment::{Environment, Function, FunctionId};
use crate::typechecker::{TypeChecker, TypeResult};

#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    env: Environment,
    checker: TypeChecker,
}

impl Program {
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_config(source, CheckerConfig::default())
    }

    pub fn with_config(source: impl Into<String>, config: CheckerConfig) -> Self {
        Program {
            source: source.into(),
            env: Environment::new(),
            checker: TypeChecker::with_config(config),
        }
    }

    /// Source text, kept for diagnostics
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &CheckerConfig {
        self.checker.config()
    }

    /// Declare a function. Fails with `DuplicateFunction` if the name is taken.
    pub fn define_function(
        &mut self,
        name: &str,
        args: Vec<Type>,
        rets: Vec<Type>,
    ) -> TypeResult<FunctionId> {
        let effect = Effect::from_vecs(args, rets);
        let entry = self.checker.entry_stack(&effect);
        debug!("defining '{}' {}", name, effect);
        self.env.add_function(name, effect, entry)
    }

    /// Declared signature of a function
    pub fn lookup_function(&self, name: &str) -> Option<&Effect> {
        self.env.lookup_function(name)
    }

    pub fn apply_operation(&mut self, id: FunctionId, op: Operation) -> TypeResult<()> {
        self.checker.apply_operation(&mut self.env, id, op)
    }

    pub fn finish_function(&mut self, id: FunctionId) -> TypeResult<()> {
        self.checker.finish_function(&mut self.env, id)
    }

    pub fn function(&self, id: FunctionId) -> TypeResult<&Function> {
        self.env.get(id)
    }

    pub fn function_id(&self, name: &str) -> Option<FunctionId> {
        self.env.function_id(name)
    }

    /// All functions in declaration order
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.env.functions()
    }

    /// No function has been rejected
    pub fn is_valid(&self) -> bool {
        self.env.functions().all(|(_, f)| !f.is_rejected())
    }

    /// Every declared function has been finished successfully
    pub fn is_complete(&self) -> bool {
        self.env.functions().all(|(_, f)| f.is_finished())
    }
}
