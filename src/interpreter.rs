//! Tree-walking executor for parsed programs.
//!
//! Commands run strictly in order against a single [`CharacterState`]. The first
//! failing `Move` aborts the whole run; anything already committed (moves,
//! turns, log entries) stays on the character, so callers can show how far a
//! program got before it walked into a wall.
//!
//! `RepeatUntil` re-checks its exit condition before every pass *and* after
//! every statement inside the body, leaving the loop mid-pass as soon as the
//! condition holds. Each loop is capped at
//! [`InterpreterOptions::max_loop_iterations`] passes, and a whole run at
//! [`InterpreterOptions::max_steps`] steps (one per command executed and one
//! per loop pass), so a huge `Repeat` count cannot run away either.

use log::debug;
use serde::Serialize;

use crate::{
	ast::{Command, Condition},
	character::{CharacterState, Direction, Point},
	error::RuntimeError,
};

pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 10_000;
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
	/// Passes a single `RepeatUntil` may make before giving up.
	pub max_loop_iterations: usize,
	/// Commands plus loop passes a whole run may take.
	pub max_steps: usize,
}

impl Default for InterpreterOptions {
	fn default() -> Self {
		Self {
			max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
			max_steps: DEFAULT_MAX_STEPS,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
	options: InterpreterOptions,
}

impl Interpreter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: InterpreterOptions) -> Self {
		Self { options }
	}

	// --------------------------------------------------
	// Run every top-level command, stopping at the first error
	// --------------------------------------------------
	pub fn run(&self, commands: &[Command], character: &mut CharacterState) -> Result<(), RuntimeError> {
		debug!("executing {} top-level commands from {}", commands.len(), character);
		let mut steps = 0;
		for cmd in commands {
			self.exec_command(cmd, character, &mut steps)?;
		}
		debug!("finished at {} after {} moves and {} steps", character, character.moves().len(), steps);
		Ok(())
	}

	fn tick(&self, steps: &mut usize, character: &CharacterState) -> Result<(), RuntimeError> {
		if *steps == self.options.max_steps {
			return Err(RuntimeError::StepLimit {
				limit: self.options.max_steps,
				state: character.to_string(),
			});
		}
		*steps += 1;
		Ok(())
	}

	fn exec_command(&self, cmd: &Command, character: &mut CharacterState, steps: &mut usize) -> Result<(), RuntimeError> {
		self.tick(steps, character)?;
		match cmd {
			Command::Move { steps: amount } => {
				character.move_by(*amount)?;
				character.record(cmd.to_string());
			},
			Command::Turn { side } => {
				character.rotate(*side);
				character.record(cmd.to_string());
			},
			Command::Repeat { times, body } => {
				for _ in 0..*times {
					self.tick(steps, character)?;
					for child in body {
						self.exec_command(child, character, steps)?;
					}
				}
			},
			Command::ConditionalRepeat { condition, body } => self.exec_until(*condition, body, character, steps)?,
		}
		Ok(())
	}

	fn exec_until(
		&self,
		condition: Condition,
		body: &[Command],
		character: &mut CharacterState,
		steps: &mut usize,
	) -> Result<(), RuntimeError> {
		let mut passes = 0;
		while !condition.evaluate(character) {
			if passes == self.options.max_loop_iterations {
				return Err(RuntimeError::IterationLimit {
					condition,
					limit: self.options.max_loop_iterations,
					state: character.to_string(),
				});
			}
			passes += 1;
			self.tick(steps, character)?;

			for child in body {
				self.exec_command(child, character, steps)?;
				if condition.evaluate(character) {
					debug!("RepeatUntil {condition} satisfied mid-pass after {passes} passes");
					return Ok(());
				}
			}
		}
		debug!("RepeatUntil {condition} satisfied after {passes} passes");
		Ok(())
	}
}

impl Condition {
	/// Looks one step ahead along the current facing. Never mutates.
	pub fn evaluate(&self, character: &CharacterState) -> bool {
		let (x, y) = character.calc_move(1);
		match self {
			Condition::WallAhead => character.grid().is_wall(x, y),
			Condition::GridEdge => character.grid().out_of_bounds(x, y),
		}
	}
}

impl Command {
	/// Run this single command with default options.
	pub fn execute(&self, character: &mut CharacterState) -> Result<(), RuntimeError> {
		Interpreter::new().exec_command(self, character, &mut 0)
	}
}

/// Execute `commands` against `character` with default options.
pub fn execute(commands: &[Command], character: &mut CharacterState) -> Result<(), RuntimeError> {
	Interpreter::new().run(commands, character)
}

/// What a finished run looks like from the outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionTrace {
	pub moves: Vec<String>,
	pub points_visited: Vec<Point>,
	pub position: Point,
	pub facing: Direction,
	pub end_state: String,
	pub reached_finish: bool,
}

impl ExecutionTrace {
	pub fn capture(character: &CharacterState) -> Self {
		Self {
			moves: character.moves().to_vec(),
			points_visited: character.points_visited().to_vec(),
			position: character.position(),
			facing: character.facing(),
			end_state: character.to_string(),
			reached_finish: character.on_finish(),
		}
	}

	/// Console report: the move log on one line, then the end state.
	pub fn summary(&self) -> String {
		let log = if self.moves.is_empty() {
			"No moves.".to_string()
		} else {
			format!("{}.", self.moves.join(", "))
		};
		format!("{log}\nEnd state {}", self.end_state)
	}
}
