//! Type model for stackcheck
//!
//! Concrete value types, generic placeholders, symbolic stacks and
//! stack effects.
use std::fmt;

/// A type that can appear on the symbolic stack or in a signature slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Machine integer
    Int,

    /// Boolean
    Bool,

    /// Generic placeholder, e.g. the `T` in `drop ( T -- )`.
    /// Only meaningful inside a signature; bound to a concrete type per
    /// application.
    Var(String),
}

impl Type {
    /// Convenience constructor for a placeholder
    pub fn var(name: impl Into<String>) -> Self {
        Type::Var(name.into())
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Type::Var(_))
    }

    /// Type equality as the checker sees it.
    ///
    /// Unlike `==`, a placeholder never equals anything, itself included:
    /// placeholders are resolved through a substitution, never compared.
    pub fn equals(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Var(_), _) | (_, Type::Var(_)) => false,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::Var(name) => write!(f, "{}", name),
        }
    }
}

/// Symbolic stack: the compile-time shape of the operand stack.
///
/// Stored bottom-to-top, so the last element is the top of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackType {
    items: Vec<Type>,
}

impl StackType {
    pub fn empty() -> Self {
        StackType { items: Vec::new() }
    }

    /// Build a stack from types listed bottom-to-top
    pub fn from_vec(items: Vec<Type>) -> Self {
        StackType { items }
    }

    pub fn singleton(ty: Type) -> Self {
        StackType { items: vec![ty] }
    }

    /// Push a type, builder style
    pub fn push(mut self, ty: Type) -> Self {
        self.items.push(ty);
        self
    }

    pub fn push_mut(&mut self, ty: Type) {
        self.items.push(ty);
    }

    pub fn pop(&mut self) -> Option<Type> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&Type> {
        self.items.last()
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate bottom-to-top
    pub fn iter(&self) -> std::slice::Iter<'_, Type> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Type] {
        &self.items
    }

    /// Remove the top `n` types and return them bottom-to-top.
    ///
    /// Returns `None` and leaves the stack untouched if fewer than `n`
    /// types are present.
    pub fn split_top(&mut self, n: usize) -> Option<Vec<Type>> {
        let depth = self.items.len();
        if depth < n {
            return None;
        }
        Some(self.items.split_off(depth - n))
    }

    /// Same length and pairwise [`Type::equals`]
    pub fn matches(&self, other: &StackType) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.equals(b))
    }
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for ty in &self.items {
            write!(f, " {}", ty)?;
        }
        write!(f, " )")
    }
}

/// Stack effect: the types an operation consumes and produces.
///
/// Both sides are listed bottom-to-top, as they appear in `( a b -- c )`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Effect {
    pub inputs: StackType,
    pub outputs: StackType,
}

impl Effect {
    pub fn new(inputs: StackType, outputs: StackType) -> Self {
        Effect { inputs, outputs }
    }

    pub fn from_vecs(inputs: Vec<Type>, outputs: Vec<Type>) -> Self {
        Effect {
            inputs: StackType::from_vec(inputs),
            outputs: StackType::from_vec(outputs),
        }
    }

    /// True if any slot on either side is a placeholder
    pub fn is_generic(&self) -> bool {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .any(Type::is_generic)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for ty in self.inputs.iter() {
            write!(f, " {}", ty)?;
        }
        write!(f, " --")?;
        for ty in self.outputs.iter() {
            write!(f, " {}", ty)?;
        }
        write!(f, " )")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_never_equals() {
        assert!(Type::Int.equals(&Type::Int));
        assert!(Type::Bool.equals(&Type::Bool));
        assert!(!Type::Int.equals(&Type::Bool));
        assert!(!Type::var("T").equals(&Type::var("T")));
        assert!(!Type::var("T").equals(&Type::Int));
        assert!(!Type::Int.equals(&Type::var("T")));

        // Structural equality still holds for table comparisons
        assert_eq!(Type::var("T"), Type::var("T"));
    }

    #[test]
    fn test_split_top() {
        let mut stack = StackType::empty().push(Type::Int).push(Type::var("T"));
        assert_eq!(stack.split_top(3), None);
        assert_eq!(stack.depth(), 2);

        let top = stack.split_top(1).unwrap();
        assert_eq!(top, vec![Type::var("T")]);
        assert_eq!(stack, StackType::singleton(Type::Int));
    }

    #[test]
    fn test_stack_matches() {
        let ints = StackType::from_vec(vec![Type::Int, Type::Int]);
        assert!(ints.matches(&ints.clone()));
        assert!(!ints.matches(&StackType::singleton(Type::Int)));
        assert!(!ints.matches(&StackType::from_vec(vec![Type::Int, Type::Bool])));

        let placeholder = StackType::singleton(Type::var("T"));
        assert!(!placeholder.matches(&placeholder.clone()));
        assert!(StackType::empty().matches(&StackType::empty()));
    }

    #[test]
    fn test_display() {
        let effect = Effect::from_vecs(vec![Type::Int, Type::Int], vec![Type::Int]);
        assert_eq!(effect.to_string(), "( Int Int -- Int )");
        assert_eq!(Effect::default().to_string(), "( -- )");
        assert_eq!(StackType::singleton(Type::var("T")).to_string(), "( T )");
    }
}
