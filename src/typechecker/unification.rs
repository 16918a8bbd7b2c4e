/*!
Placeholder binding for generic signatures

A `Substitution` lives for exactly one application of a signature: it is
created empty, filled while the consumed slots are matched, and read back
while the produced slots are pushed.
*/
use std::collections::HashMap;

use crate::ast::types::Type;
use crate::typechecker::errors::{TypeError, TypeResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: HashMap<String, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution {
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Match one consumed slot against the type popped from the stack.
    ///
    /// A concrete slot must equal `actual`. A placeholder binds on first
    /// sight; later occurrences must equal the bound type.
    pub fn unify(&mut self, expected: &Type, actual: &Type, context: &str) -> TypeResult<()> {
        match expected {
            Type::Var(name) => match self.bindings.get(name) {
                Some(bound) if bound.equals(actual) => Ok(()),
                Some(bound) => Err(TypeError::TypeMismatch {
                    expected: bound.clone(),
                    actual: actual.clone(),
                    context: context.to_string(),
                }),
                None => {
                    self.bindings.insert(name.clone(), actual.clone());
                    Ok(())
                }
            },
            _ => unify_types(expected, actual, context),
        }
    }

    /// Resolve a produced slot to the type that gets pushed
    pub fn apply(&self, ty: &Type, context: &str) -> TypeResult<Type> {
        match ty {
            Type::Var(name) => {
                self.bindings
                    .get(name)
                    .cloned()
                    .ok_or_else(|| TypeError::UnboundGeneric {
                        name: name.clone(),
                        context: context.to_string(),
                    })
            }
            _ => Ok(ty.clone()),
        }
    }
}

/// Concrete matching: no placeholder is ever bound
pub fn unify_types(expected: &Type, actual: &Type, context: &str) -> TypeResult<()> {
    if expected.equals(actual) {
        Ok(())
    } else {
        Err(TypeError::TypeMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
            context: context.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_on_first_occurrence() {
        let mut subst = Substitution::new();
        subst.unify(&Type::var("T"), &Type::Int, "drop").unwrap();
        assert_eq!(subst.get("T"), Some(&Type::Int));
        subst.unify(&Type::var("T"), &Type::Int, "drop").unwrap();
        assert_eq!(subst.len(), 1);
    }

    #[test]
    fn test_bound_placeholder_must_agree() {
        let mut subst = Substitution::new();
        // A placeholder that reached the stack (e.g. a seeded generic
        // parameter) is never equal to anything, so it cannot satisfy a
        // previously bound slot.
        subst.unify(&Type::var("T"), &Type::Int, "swap").unwrap();
        let err = subst
            .unify(&Type::var("T"), &Type::var("U"), "swap")
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::TypeMismatch {
                expected: Type::Int,
                actual: Type::var("U"),
                context: "swap".to_string(),
            }
        );
    }

    #[test]
    fn test_apply_unbound_placeholder() {
        let subst = Substitution::new();
        assert_eq!(subst.apply(&Type::Int, "x").unwrap(), Type::Int);
        match subst.apply(&Type::var("R"), "bad") {
            Err(TypeError::UnboundGeneric { name, context }) => {
                assert_eq!(name, "R");
                assert_eq!(context, "bad");
            }
            other => panic!("Expected UnboundGeneric, got {:?}", other),
        }
    }

    #[test]
    fn test_concrete_mismatch() {
        assert!(unify_types(&Type::Int, &Type::Int, "+").is_ok());
        assert!(unify_types(&Type::Int, &Type::var("T"), "+").is_err());
    }
}
