/*!
Function registry

Holds every declared function together with its in-progress symbolic stack.
Names are unique; lookups by name only ever hand out the declared effect.
*/
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ast::Operation;
use crate::ast::types::{Effect, StackType, Type};
use crate::typechecker::errors::{TypeError, TypeResult};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Opaque handle to a function owned by a [`crate::Program`].
///
/// A handle carries the identity of the registry that issued it, so it is
/// never resolved against another program's functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId {
    owner: u64,
    index: usize,
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionState {
    /// Accepting operations
    Open,
    /// Final stack matched the declared outputs
    Finished,
    /// An operation or the final check failed
    Rejected,
}

/// A declared function and its verification progress
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    effect: Effect,
    stack: StackType,
    ops: Vec<Operation>,
    state: FunctionState,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters (`inputs`) and returns (`outputs`)
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Current symbolic stack
    pub fn stack(&self) -> &StackType {
        &self.stack
    }

    /// Operations verified so far, in order
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn is_finished(&self) -> bool {
        self.state == FunctionState::Finished
    }

    pub fn is_rejected(&self) -> bool {
        self.state == FunctionState::Rejected
    }

    pub(crate) fn stack_mut(&mut self) -> &mut StackType {
        &mut self.stack
    }

    pub(crate) fn record(&mut self, op: Operation) {
        self.ops.push(op);
    }

    pub(crate) fn set_state(&mut self, state: FunctionState) {
        self.state = state;
    }

    /// Fails unless the function still accepts operations
    pub(crate) fn ensure_open(&self) -> TypeResult<()> {
        match self.state {
            FunctionState::Open => Ok(()),
            FunctionState::Finished => Err(TypeError::FunctionAlreadyFinished {
                function: self.name.clone(),
            }),
            FunctionState::Rejected => Err(TypeError::FunctionRejected {
                function: self.name.clone(),
            }),
        }
    }
}

/// Name → function mapping with uniqueness enforced on insertion
#[derive(Debug, Clone)]
pub struct Environment {
    owner: u64,
    functions: Vec<Function>,
    by_name: HashMap<String, FunctionId>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            functions: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Declare a function whose symbolic stack starts as `entry_stack`.
    ///
    /// Declarations are fully concrete: a placeholder in a parameter or
    /// return slot could never be bound, so it is refused here.
    pub fn add_function(
        &mut self,
        name: &str,
        effect: Effect,
        entry_stack: StackType,
    ) -> TypeResult<FunctionId> {
        if self.by_name.contains_key(name) {
            return Err(TypeError::DuplicateFunction {
                name: name.to_string(),
            });
        }

        if let Some(Type::Var(placeholder)) = effect
            .inputs
            .iter()
            .chain(effect.outputs.iter())
            .find(|ty| ty.is_generic())
        {
            return Err(TypeError::UnboundGeneric {
                name: placeholder.clone(),
                context: name.to_string(),
            });
        }

        let id = self.handle(self.functions.len());
        self.functions.push(Function {
            name: name.to_string(),
            effect,
            stack: entry_stack,
            ops: Vec::new(),
            state: FunctionState::Open,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Declared effect of a function, for call sites
    pub fn lookup_function(&self, name: &str) -> Option<&Effect> {
        self.by_name
            .get(name)
            .map(|id| &self.functions[id.index].effect)
    }

    pub fn function_id(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: FunctionId) -> TypeResult<&Function> {
        if id.owner != self.owner {
            return Err(TypeError::UnknownHandle { id });
        }
        self.functions
            .get(id.index)
            .ok_or(TypeError::UnknownHandle { id })
    }

    pub(crate) fn get_mut(&mut self, id: FunctionId) -> TypeResult<&mut Function> {
        if id.owner != self.owner {
            return Err(TypeError::UnknownHandle { id });
        }
        self.functions
            .get_mut(id.index)
            .ok_or(TypeError::UnknownHandle { id })
    }

    /// All functions in declaration order
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(index, function)| (self.handle(index), function))
    }

    fn handle(&self, index: usize) -> FunctionId {
        FunctionId {
            owner: self.owner,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_to_int() -> Effect {
        Effect::from_vecs(vec![Type::Int], vec![Type::Int])
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut env = Environment::new();
        let first = env
            .add_function("inc", int_to_int(), StackType::empty())
            .unwrap();

        let err = env
            .add_function("inc", Effect::default(), StackType::empty())
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::DuplicateFunction {
                name: "inc".to_string()
            }
        );

        assert_eq!(env.len(), 1);
        assert_eq!(env.function_id("inc"), Some(first));
        assert_eq!(env.lookup_function("inc"), Some(&int_to_int()));
    }

    #[test]
    fn test_unknown_handle() {
        let env = Environment::new();
        match env.get(env.handle(3)) {
            Err(TypeError::UnknownHandle { id }) => assert_eq!(id.to_string(), "#3"),
            other => panic!("Expected UnknownHandle, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_is_bound_to_its_environment() {
        let mut first = Environment::new();
        let mut second = Environment::new();
        let foreign = first
            .add_function("a", Effect::default(), StackType::empty())
            .unwrap();
        let local = second
            .add_function("b", Effect::default(), StackType::empty())
            .unwrap();

        // Same index, different registry
        assert_eq!(foreign.to_string(), local.to_string());
        assert_eq!(
            second.get(foreign).unwrap_err(),
            TypeError::UnknownHandle { id: foreign }
        );
        assert!(second.get_mut(foreign).is_err());
        assert_eq!(second.get(local).unwrap().name(), "b");
        assert_eq!(
            Environment::default().get(local).unwrap_err(),
            TypeError::UnknownHandle { id: local }
        );
    }

    #[test]
    fn test_placeholder_in_declaration_is_refused() {
        let mut env = Environment::new();

        let err = env
            .add_function(
                "id",
                Effect::from_vecs(vec![Type::var("T")], vec![]),
                StackType::empty(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::UnboundGeneric {
                name: "T".to_string(),
                context: "id".to_string(),
            }
        );

        assert!(matches!(
            env.add_function(
                "make",
                Effect::from_vecs(vec![], vec![Type::Int, Type::var("R")]),
                StackType::empty(),
            ),
            Err(TypeError::UnboundGeneric { .. })
        ));
        assert!(env.is_empty());
        assert_eq!(env.lookup_function("id"), None);
    }

    #[test]
    fn test_ensure_open_by_state() {
        let mut env = Environment::new();
        let id = env
            .add_function("f", Effect::default(), StackType::empty())
            .unwrap();
        let function = env.get_mut(id).unwrap();
        assert!(function.ensure_open().is_ok());

        function.set_state(FunctionState::Finished);
        assert!(matches!(
            function.ensure_open(),
            Err(TypeError::FunctionAlreadyFinished { .. })
        ));

        function.set_state(FunctionState::Rejected);
        assert!(matches!(
            function.ensure_open(),
            Err(TypeError::FunctionRejected { .. })
        ));
    }
}
