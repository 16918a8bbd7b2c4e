/*!
Core stack-effect checker

Abstract interpretation over a symbolic stack: every operation is checked
against the current stack shape as soon as it is appended, and a function is
finished by comparing its final stack with the declared outputs.
*/
use tracing::{debug, error, instrument, trace};

use crate::ast::Operation;
use crate::ast::types::{Effect, StackType, Type};
use crate::builtins::intrinsic_signature;
use crate::config::CheckerConfig;
use crate::typechecker::environment::{Environment, FunctionId, FunctionState};
use crate::typechecker::errors::{TypeError, TypeResult};
use crate::typechecker::unification::{Substitution, unify_types};

/// How placeholders in an effect are treated when it is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    /// Intrinsics: placeholders bind per application
    Generic,
    /// Calls: declared types are matched as-is
    Concrete,
}

/// The main type checker
#[derive(Debug, Clone, Default)]
pub struct TypeChecker {
    config: CheckerConfig,
}

impl TypeChecker {
    /// Create a type checker with the default configuration
    pub fn new() -> Self {
        TypeChecker {
            config: CheckerConfig::default(),
        }
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        TypeChecker { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Symbolic stack a function body starts from
    pub fn entry_stack(&self, effect: &Effect) -> StackType {
        if self.config.seed_parameters {
            effect.inputs.clone()
        } else {
            StackType::empty()
        }
    }

    /// Check one operation against the function's current stack and record it.
    ///
    /// On failure the function is marked rejected and accepts nothing
    /// further.
    #[instrument(level = "debug", skip_all, fields(function = %id, op = %op))]
    pub fn apply_operation(
        &self,
        env: &mut Environment,
        id: FunctionId,
        op: Operation,
    ) -> TypeResult<()> {
        env.get(id)?.ensure_open()?;

        let checked = self.check_operation(env, id, &op);

        let function = env.get_mut(id)?;
        match checked {
            Ok(()) => {
                trace!(stack = %function.stack(), "applied");
                function.record(op);
                Ok(())
            }
            Err(err) => {
                debug!(%err, "rejecting function '{}'", function.name());
                function.set_state(FunctionState::Rejected);
                Err(err)
            }
        }
    }

    /// Compare the final stack with the declared outputs and freeze the function
    #[instrument(level = "debug", skip_all, fields(function = %id))]
    pub fn finish_function(&self, env: &mut Environment, id: FunctionId) -> TypeResult<()> {
        let function = env.get_mut(id)?;
        function.ensure_open()?;

        if function.stack().matches(&function.effect().outputs) {
            debug!("finished '{}' {}", function.name(), function.effect());
            function.set_state(FunctionState::Finished);
            Ok(())
        } else {
            let err = TypeError::ReturnTypeMismatch {
                function: function.name().to_string(),
                expected: function.effect().outputs.clone(),
                actual: function.stack().clone(),
            };
            debug!(%err, "rejecting function '{}'", function.name());
            function.set_state(FunctionState::Rejected);
            Err(err)
        }
    }

    fn check_operation(
        &self,
        env: &mut Environment,
        id: FunctionId,
        op: &Operation,
    ) -> TypeResult<()> {
        match op {
            Operation::PushConstant(value) => {
                env.get_mut(id)?.stack_mut().push_mut(value.ty());
                Ok(())
            }

            // Names are resolved by the front end; nothing reaches the stack
            Operation::DefineConstant { .. } => Ok(()),

            Operation::Intrinsic(intrinsic) => {
                let effect = intrinsic_signature(*intrinsic);
                let stack = env.get_mut(id)?.stack_mut();
                apply_effect(stack, &effect, intrinsic.name(), Binding::Generic)
            }

            Operation::Call(name) => {
                // Only the callee's declaration matters; its body is never walked
                let effect = env
                    .lookup_function(name)
                    .cloned()
                    .ok_or_else(|| TypeError::UnknownFunction { name: name.clone() })?;
                let stack = env.get_mut(id)?.stack_mut();
                apply_effect(stack, &effect, name, Binding::Concrete)
            }
        }
    }
}

/// Pop the effect's inputs off `stack` and push its outputs.
///
/// Consumed slots are matched closest-to-top first, the order values come
/// off the stack. The depth check happens before anything is popped.
fn apply_effect(
    stack: &mut StackType,
    effect: &Effect,
    word: &str,
    binding: Binding,
) -> TypeResult<()> {
    let required = effect.inputs.depth();
    let available = stack.depth();

    let consumed = stack
        .split_top(required)
        .ok_or_else(|| TypeError::StackUnderflow {
            word: word.to_string(),
            required,
            available,
        })?;

    let mut subst = Substitution::new();
    for (slot, (expected, actual)) in effect
        .inputs
        .iter()
        .zip(consumed.iter())
        .enumerate()
        .rev()
    {
        let context = format!("argument {} of '{}'", slot + 1, word);
        match binding {
            Binding::Generic => subst.unify(expected, actual, &context)?,
            Binding::Concrete => unify_types(expected, actual, &context)?,
        }
    }

    let produced = match binding {
        Binding::Generic => effect
            .outputs
            .iter()
            .map(|ty| subst.apply(ty, word))
            .collect::<TypeResult<Vec<_>>>()
            .inspect_err(|err| error!(%err, "malformed signature for '{}': {}", word, effect))?,
        // Nothing binds a placeholder here, so one can never be produced
        Binding::Concrete => effect
            .outputs
            .iter()
            .map(|ty| match ty {
                Type::Var(name) => Err(TypeError::UnboundGeneric {
                    name: name.clone(),
                    context: word.to_string(),
                }),
                concrete => Ok(concrete.clone()),
            })
            .collect::<TypeResult<Vec<_>>>()?,
    };

    for ty in produced {
        stack.push_mut(ty);
    }

    Ok(())
}
