pub mod ast;
pub mod builder;
pub mod character;
pub mod error;
pub mod grid;
pub mod interpreter;
pub mod metrics;
pub mod preprocessor;
pub mod wasm;

use std::sync::Arc;

use log::{debug, warn};
use pest::Parser;
use serde::Serialize;

pub use ast::{Command, Condition, Side};
pub use character::{CharacterState, Direction, Point};
pub use error::{GridError, ParseError, ProgramError, RuntimeError};
pub use grid::{CellState, Grid};
pub use interpreter::{ExecutionTrace, Interpreter, InterpreterOptions, execute};
pub use metrics::{Metrics, analyze};
use preprocessor::{SourceLine, preprocess};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"]
struct LineParser;

/// Spaces a nested block is indented by, relative to its header.
pub const INDENT_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
	/// Spaces each tab expands to before indentation is measured.
	pub tab_width: usize,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self { tab_width: INDENT_SIZE }
	}
}

/// A single line, classified before its block (if any) has been read.
enum Header {
	Simple(Command),
	Repeat(u32),
	RepeatUntil(Condition),
}

fn parse_line(line: &SourceLine) -> Result<Header, ParseError> {
	let text = line.text.trim();
	let stmt = LineParser::parse(Rule::line, text)
		.ok()
		.and_then(|mut pairs| pairs.next())
		.and_then(|line_pair| line_pair.into_inner().next())
		.ok_or_else(|| diagnose(text, line.number))?;

	let rule = stmt.as_rule();
	let mut inner = stmt.into_inner();
	let _keyword = inner.next();
	let arg = inner.next().map(|p| p.as_str()).unwrap_or_default();

	match rule {
		Rule::move_stmt => arg
			.parse()
			.map(|steps| Header::Simple(Command::move_by(steps)))
			.map_err(|_| invalid_argument("Move", arg, line.number)),
		Rule::turn_stmt => arg
			.parse()
			.map(|side| Header::Simple(Command::turn(side)))
			.map_err(|_| invalid_argument("Turn", arg, line.number)),
		Rule::repeat_stmt => arg.parse().map(Header::Repeat).map_err(|_| ParseError::InvalidRepeatCount {
			line: line.number,
			text: text.to_string(),
		}),
		Rule::repeat_until_stmt => arg.parse().map(Header::RepeatUntil).map_err(|_| ParseError::UnknownCondition {
			line: line.number,
			token: arg.to_string(),
		}),
		_ => Err(diagnose(text, line.number)),
	}
}

fn invalid_argument(command: &str, argument: &str, line: usize) -> ParseError {
	ParseError::InvalidArgument {
		line,
		command: command.to_string(),
		argument: argument.to_string(),
	}
}

/// Work out why a line did not match the grammar, naming the raw tokens.
fn diagnose(text: &str, line: usize) -> ParseError {
	let mut tokens = text.split_whitespace();
	let keyword = tokens.next().unwrap_or_default();
	let command = match keyword.to_ascii_lowercase().as_str() {
		"move" => "Move",
		"turn" => "Turn",
		"repeat" => "Repeat",
		"repeatuntil" => "RepeatUntil",
		_ => {
			return ParseError::UnknownCommand {
				line,
				token: keyword.to_string(),
			};
		},
	};
	let Some(argument) = tokens.next() else {
		return ParseError::MissingArgument {
			line,
			command: command.to_string(),
		};
	};

	let argument_ok = match command {
		"Move" => argument.parse::<i64>().is_ok(),
		"Turn" => argument.parse::<Side>().is_ok(),
		"Repeat" => argument.parse::<u32>().is_ok(),
		_ => argument.parse::<Condition>().is_ok(),
	};
	if !argument_ok {
		return match command {
			"Repeat" => ParseError::InvalidRepeatCount {
				line,
				text: text.to_string(),
			},
			"RepeatUntil" => ParseError::UnknownCondition {
				line,
				token: argument.to_string(),
			},
			_ => invalid_argument(command, argument, line),
		};
	}

	let rest: Vec<&str> = tokens.collect();
	if rest.is_empty() {
		// every token is fine on its own, so the separators are at fault
		ParseError::Syntax {
			line,
			text: text.to_string(),
		}
	} else {
		ParseError::TrailingInput {
			line,
			command: command.to_string(),
			rest: rest.join(" "),
		}
	}
}

/// Recursive descent over preprocessed lines; indentation alone delimits blocks.
struct BlockParser<'a> {
	lines: &'a [SourceLine],
	index: usize,
}

impl<'a> BlockParser<'a> {
	fn parse_block(&mut self, expected_indent: usize) -> Result<Vec<Command>, ParseError> {
		let lines = self.lines;
		let mut commands = Vec::new();

		while let Some(line) = lines.get(self.index) {
			let indent = line.indent();
			if indent < expected_indent {
				// belongs to an enclosing block
				break;
			}
			if indent > expected_indent {
				return Err(ParseError::Indentation {
					line: line.number,
					text: line.text.clone(),
				});
			}

			self.index += 1;
			let command = match parse_line(line)? {
				Header::Simple(cmd) => cmd,
				Header::Repeat(times) => {
					if times == 0 {
						warn!("Repeat 0 at line {} never runs its block", line.number);
					}
					Command::repeat(times, self.parse_body(line, expected_indent)?)
				},
				Header::RepeatUntil(condition) => Command::repeat_until(condition, self.parse_body(line, expected_indent)?),
			};
			commands.push(command);
		}

		Ok(commands)
	}

	fn parse_body(&mut self, header: &SourceLine, indent: usize) -> Result<Vec<Command>, ParseError> {
		let body = self.parse_block(indent + INDENT_SIZE)?;
		if body.is_empty() {
			warn!("empty block after '{}' at line {}", header.text.trim(), header.number);
		}
		Ok(body)
	}
}

pub fn parse(source: &str) -> Result<Vec<Command>, ParseError> {
	parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Vec<Command>, ParseError> {
	let lines = preprocess(source, options.tab_width);
	debug!("parsing {} program lines", lines.len());

	let mut parser = BlockParser { lines: &lines, index: 0 };
	let commands = parser.parse_block(0)?;

	debug!("parsed {} top-level commands", commands.len());
	Ok(commands)
}

/// Parse `source` and run it from the start position on `grid`.
pub fn run_program(source: &str, grid: Arc<Grid>) -> Result<ExecutionTrace, ProgramError> {
	let commands = parse(source)?;
	let mut character = CharacterState::new(grid);
	execute(&commands, &mut character)?;
	Ok(ExecutionTrace::capture(&character))
}

/// Outcome of a run that always keeps the trace, even when execution failed
/// half-way. Shape of the JSON handed to the CLI and browser hosts.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub trace: Option<ExecutionTrace>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl RunReport {
	pub fn parse_failed(err: &ParseError) -> Self {
		Self {
			success: false,
			trace: None,
			error: Some(err.to_string()),
		}
	}
}

pub fn run_with_report(commands: &[Command], grid: Arc<Grid>, interpreter: &Interpreter) -> RunReport {
	let mut character = CharacterState::new(grid);
	let outcome = interpreter.run(commands, &mut character);
	RunReport {
		success: outcome.is_ok(),
		trace: Some(ExecutionTrace::capture(&character)),
		error: outcome.err().map(|e| e.to_string()),
	}
}
