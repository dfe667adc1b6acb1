use thiserror::Error;

use crate::ast::Condition;

/// Raised while turning program text into a command tree. Every variant
/// carries the 1-based line number in the source text as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("Unexpected indentation at line {line}: '{text}'")]
	Indentation { line: usize, text: String },

	#[error("Invalid repeat count at line {line}: '{text}'")]
	InvalidRepeatCount { line: usize, text: String },

	#[error("Unknown condition '{token}' at line {line}, expected WallAhead or GridEdge")]
	UnknownCondition { line: usize, token: String },

	#[error("Unknown command '{token}' at line {line}")]
	UnknownCommand { line: usize, token: String },

	#[error("Invalid argument '{argument}' for {command} at line {line}")]
	InvalidArgument { line: usize, command: String, argument: String },

	#[error("Missing argument for {command} at line {line}")]
	MissingArgument { line: usize, command: String },

	#[error("Unexpected '{rest}' after {command} at line {line}")]
	TrailingInput { line: usize, command: String, rest: String },

	#[error("Cannot read line {line}: '{text}'")]
	Syntax { line: usize, text: String },
}

impl ParseError {
	pub fn line(&self) -> usize {
		match self {
			ParseError::Indentation { line, .. }
			| ParseError::InvalidRepeatCount { line, .. }
			| ParseError::UnknownCondition { line, .. }
			| ParseError::UnknownCommand { line, .. }
			| ParseError::InvalidArgument { line, .. }
			| ParseError::MissingArgument { line, .. }
			| ParseError::TrailingInput { line, .. }
			| ParseError::Syntax { line, .. } => *line,
		}
	}

	/// Indentation problems versus everything else (syntax errors).
	pub fn is_indentation(&self) -> bool {
		matches!(self, ParseError::Indentation { .. })
	}
}

/// Raised while executing a command tree. Mutations committed before the
/// failing step stay on the character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
	#[error("Cannot move to ({x}, {y}): outside the grid. Character is at {state}")]
	OutOfBounds { x: i64, y: i64, state: String },

	#[error("Cannot move to ({x}, {y}): there is a wall. Character is at {state}")]
	WallCollision { x: i64, y: i64, state: String },

	#[error("RepeatUntil {condition} did not finish within {limit} iterations. Character is at {state}")]
	IterationLimit { condition: Condition, limit: usize, state: String },

	#[error("Program did not finish within {limit} steps. Character is at {state}")]
	StepLimit { limit: usize, state: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
	#[error("Grid layout is empty")]
	Empty,

	#[error("Grid must be square, got {rows} rows and {cols} columns")]
	NotSquare { rows: usize, cols: usize },

	#[error("Invalid character '{ch}' at line {line}, column {column}")]
	InvalidCell { ch: char, line: usize, column: usize },
}

/// Either half of a parse-then-run pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}
