/// Front end for stackcheck
///
/// Hand-written recursive descent reader for word definitions:
/// `: name ( Int Int -- Int ) body... ;`

mod lexer;
mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
