/*!
Driver: source text to a verified program

Declares every word before checking any body, so words may call words
defined later in the file. Stops at the first error.
*/
use thiserror::Error;
use tracing::{debug, instrument};

use crate::ast::{SourceLoc, WordDef};
use crate::config::CheckerConfig;
use crate::parser::{ParseError, Parser};
use crate::program::Program;
use crate::typechecker::TypeError;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{line}:{column}: in '{word}': {source}")]
    Type {
        word: String,
        line: usize,
        column: usize,
        source: TypeError,
    },
}

impl CompileError {
    fn at(word: &WordDef, loc: SourceLoc, source: TypeError) -> Self {
        CompileError::Type {
            word: word.name.clone(),
            line: loc.line,
            column: loc.column,
            source,
        }
    }

    /// The type error, if this is one
    pub fn type_error(&self) -> Option<&TypeError> {
        match self {
            CompileError::Type { source, .. } => Some(source),
            CompileError::Parse(_) => None,
        }
    }
}

/// Parse `source` and verify every word in it
#[instrument(level = "debug", skip_all)]
pub fn check_source(source: &str, config: CheckerConfig) -> Result<Program, CompileError> {
    let file = Parser::new(source).parse()?;
    debug!("parsed {} word(s)", file.word_defs.len());

    let mut program = Program::with_config(source, config);

    let mut ids = Vec::with_capacity(file.word_defs.len());
    for word in &file.word_defs {
        let id = program
            .define_function(
                &word.name,
                word.effect.inputs.iter().cloned().collect(),
                word.effect.outputs.iter().cloned().collect(),
            )
            .map_err(|e| CompileError::at(word, word.loc, e))?;
        ids.push(id);
    }

    for (word, id) in file.word_defs.iter().zip(ids) {
        for (op, loc) in &word.body {
            program
                .apply_operation(id, op.clone())
                .map_err(|e| CompileError::at(word, *loc, e))?;
        }
        program
            .finish_function(id)
            .map_err(|e| CompileError::at(word, word.end, e))?;
    }

    Ok(program)
}
