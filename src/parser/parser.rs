//! Recursive descent parser for word definitions

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::types::{Effect, Type};
use crate::ast::{Constant, Operation, SourceFile, SourceLoc, WordDef};
use crate::builtins::builtin_signature;
use crate::parser::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Parse error at {line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();
        Parser { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<SourceFile, ParseError> {
        let mut word_defs = Vec::new();

        while !self.is_at_end() {
            if self.check(&TokenKind::Colon) {
                word_defs.push(self.parse_word_def()?);
            } else {
                return Err(self.error("Expected ':'"));
            }
        }

        Ok(SourceFile { word_defs })
    }

    fn parse_word_def(&mut self) -> Result<WordDef, ParseError> {
        let loc = self.loc();
        self.consume(&TokenKind::Colon, "Expected ':'")?;

        let name = self.consume_ident("Expected word name")?;

        // Parse effect signature
        self.consume(&TokenKind::LeftParen, "Expected '(' for effect signature")?;
        let effect = self.parse_effect()?;
        self.consume(&TokenKind::RightParen, "Expected ')' after effect signature")?;

        // Constants are scoped to the word that defines them
        let mut constants: HashMap<String, Constant> = HashMap::new();

        // Parse body until ';'
        let mut body = Vec::new();
        while !self.check(&TokenKind::Semicolon) {
            if self.is_at_end() || self.check(&TokenKind::Colon) {
                return Err(self.error(&format!("Unterminated definition of '{}'", name)));
            }
            body.push(self.parse_op(&mut constants)?);
        }

        let end = self.loc();
        self.consume(&TokenKind::Semicolon, "Expected ';' at end of word definition")?;

        Ok(WordDef {
            name,
            effect,
            body,
            loc,
            end,
        })
    }

    fn parse_effect(&mut self) -> Result<Effect, ParseError> {
        // Parse input stack types
        let mut inputs = Vec::new();
        while !self.check(&TokenKind::Dash) && !self.is_at_end() {
            inputs.push(self.parse_type()?);
        }

        self.consume(&TokenKind::Dash, "Expected '--' in effect signature")?;

        // Parse output stack types
        let mut outputs = Vec::new();
        while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
            outputs.push(self.parse_type()?);
        }

        Ok(Effect::from_vecs(inputs, outputs))
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let loc = self.loc();
        let name = self.consume_ident("Expected type name")?;

        match name.as_str() {
            "Int" => Ok(Type::Int),
            "Bool" => Ok(Type::Bool),
            // A single uppercase letter is a placeholder
            _ if name.len() == 1 && name.chars().all(|c| c.is_ascii_uppercase()) => {
                Ok(Type::Var(name))
            }
            _ => Err(ParseError {
                message: format!("Unknown type: {}", name),
                line: loc.line,
                column: loc.column,
            }),
        }
    }

    fn parse_op(
        &mut self,
        constants: &mut HashMap<String, Constant>,
    ) -> Result<(Operation, SourceLoc), ParseError> {
        let loc = self.loc();
        let token = self.peek().clone();

        let op = match token.kind {
            TokenKind::IntLiteral | TokenKind::BoolLiteral => {
                self.advance();
                Operation::PushConstant(self.literal(&token)?)
            }

            TokenKind::Const => {
                self.advance(); // consume 'const'
                let name = self.consume_ident("Expected constant name")?;
                let value_token = self.peek().clone();
                if !matches!(
                    value_token.kind,
                    TokenKind::IntLiteral | TokenKind::BoolLiteral
                ) {
                    return Err(self.error("Expected literal value for constant"));
                }
                self.advance();
                let value = self.literal(&value_token)?;
                constants.insert(name.clone(), value);
                Operation::DefineConstant { name, value }
            }

            TokenKind::Ident => {
                self.advance();
                if let Some(value) = constants.get(&token.lexeme) {
                    Operation::PushConstant(*value)
                } else if let Some((intrinsic, _)) = builtin_signature(&token.lexeme) {
                    Operation::Intrinsic(intrinsic)
                } else {
                    Operation::Call(token.lexeme)
                }
            }

            _ => {
                return Err(ParseError {
                    message: format!("Unexpected token: {:?}", token.kind),
                    line: token.line,
                    column: token.column,
                });
            }
        };

        Ok((op, loc))
    }

    // Helper methods

    fn literal(&self, token: &Token) -> Result<Constant, ParseError> {
        if token.kind == TokenKind::BoolLiteral {
            return Ok(Constant::Bool(token.lexeme == "true"));
        }
        token
            .lexeme
            .parse::<i64>()
            .map(Constant::Int)
            .map_err(|_| ParseError {
                message: format!("Invalid integer: {}", token.lexeme),
                line: token.line,
                column: token.column,
            })
    }

    fn loc(&self) -> SourceLoc {
        let token = self.peek();
        SourceLoc::new(token.line, token.column)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        &self.peek().kind == kind
    }

    fn consume(&mut self, kind: &TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn consume_ident(&mut self, message: &str) -> Result<String, ParseError> {
        if self.peek().kind == TokenKind::Ident {
            let lexeme = self.peek().lexeme.clone();
            self.advance();
            Ok(lexeme)
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: message.to_string(),
            line: token.line,
            column: token.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Intrinsic;

    #[test]
    fn test_parse_simple_word() {
        let input = ": square ( Int -- Int ) 2 * ;";
        let mut parser = Parser::new(input);
        let file = parser.parse().unwrap();

        assert_eq!(file.word_defs.len(), 1);
        assert_eq!(file.word_defs[0].name, "square");
        assert_eq!(file.word_defs[0].effect.to_string(), "( Int -- Int )");
        assert_eq!(file.word_defs[0].body.len(), 2); // 2, *
    }

    #[test]
    fn test_parse_literals() {
        let input = ": test ( -- Int ) 42 ;";
        let mut parser = Parser::new(input);
        let file = parser.parse().unwrap();

        assert_eq!(file.word_defs[0].body.len(), 1);
        match &file.word_defs[0].body[0] {
            (Operation::PushConstant(Constant::Int(42)), loc) => {
                assert_eq!(*loc, SourceLoc::new(1, 19))
            }
            other => panic!("Expected PushConstant(42), got {:?}", other),
        }
    }

    #[test]
    fn test_parse_constants_and_calls() {
        let input = ": f ( -- Int ) const TEN 10 TEN helper add ;";
        let file = Parser::new(input).parse().unwrap();
        let ops: Vec<_> = file.word_defs[0]
            .body
            .iter()
            .map(|(op, _)| op.clone())
            .collect();

        assert_eq!(
            ops,
            vec![
                Operation::DefineConstant {
                    name: "TEN".to_string(),
                    value: Constant::Int(10),
                },
                Operation::PushConstant(Constant::Int(10)),
                Operation::Call("helper".to_string()),
                Operation::Intrinsic(Intrinsic::Add),
            ]
        );
    }

    #[test]
    fn test_parse_bool_literals_and_type() {
        let input = ": flag ( Bool -- Bool Bool ) const ON true ON false ;";
        let file = Parser::new(input).parse().unwrap();
        let word = &file.word_defs[0];

        assert_eq!(word.effect.to_string(), "( Bool -- Bool Bool )");
        let ops: Vec<_> = word.body.iter().map(|(op, _)| op.clone()).collect();
        assert_eq!(
            ops,
            vec![
                Operation::DefineConstant {
                    name: "ON".to_string(),
                    value: Constant::Bool(true),
                },
                Operation::PushConstant(Constant::Bool(true)),
                Operation::PushConstant(Constant::Bool(false)),
            ]
        );
    }

    #[test]
    fn test_constant_needs_literal_value() {
        let err = Parser::new(": f ( -- ) const K drop ;").parse().unwrap_err();
        assert_eq!(err.message, "Expected literal value for constant");
        assert_eq!((err.line, err.column), (1, 20));
    }

    #[test]
    fn test_constants_do_not_leak_between_words() {
        let input = ": a ( -- ) const K 1 ; : b ( -- Int ) K ;";
        let file = Parser::new(input).parse().unwrap();
        assert_eq!(
            file.word_defs[1].body[0].0,
            Operation::Call("K".to_string())
        );
    }

    #[test]
    fn test_generic_and_unknown_types() {
        let file = Parser::new(": g ( T -- ) drop ;").parse().unwrap();
        assert_eq!(file.word_defs[0].effect.inputs.top(), Some(&Type::var("T")));

        let err = Parser::new(": g ( Float -- ) ;").parse().unwrap_err();
        assert_eq!(err.message, "Unknown type: Float");
        assert_eq!((err.line, err.column), (1, 7));
    }

    #[test]
    fn test_unterminated_word() {
        let err = Parser::new(": a ( -- ) 1\n: b ( -- ) ;").parse().unwrap_err();
        assert_eq!(err.message, "Unterminated definition of 'a'");
        assert_eq!(err.line, 2);
    }
}
