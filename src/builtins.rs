//! Built-in signatures
//!
//! Defines the stack effect of every intrinsic.

use crate::ast::Intrinsic;
use crate::ast::types::{Effect, StackType, Type};

/// Stack effect of an intrinsic.
///
/// The match is exhaustive over [`Intrinsic`], so there is no
/// "unknown intrinsic" case to report.
pub fn intrinsic_signature(intrinsic: Intrinsic) -> Effect {
    match intrinsic {
        // ( Int Int -- Int )
        Intrinsic::Add | Intrinsic::Sub | Intrinsic::Mul | Intrinsic::Div => Effect::new(
            StackType::empty().push(Type::Int).push(Type::Int),
            StackType::singleton(Type::Int),
        ),

        // ( T -- )
        Intrinsic::Drop => Effect::new(StackType::singleton(Type::var("T")), StackType::empty()),
    }
}

/// Look up a built-in by its source spelling
pub fn builtin_signature(name: &str) -> Option<(Intrinsic, Effect)> {
    Intrinsic::from_name(name).map(|intrinsic| (intrinsic, intrinsic_signature(intrinsic)))
}

/// The whole table, in declaration order
pub fn builtin_signatures() -> Vec<(Intrinsic, Effect)> {
    Intrinsic::ALL
        .iter()
        .map(|&intrinsic| (intrinsic, intrinsic_signature(intrinsic)))
        .collect()
}
