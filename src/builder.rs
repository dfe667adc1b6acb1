use std::{fmt::Write, str::FromStr};

use crate::ast::{Command, Condition, Side};

/// Fluent construction of command trees without going through program text.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
	commands: Vec<Command>,
}

impl ProgramBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn move_by(mut self, steps: i64) -> Self {
		self.commands.push(Command::move_by(steps));
		self
	}

	pub fn turn(mut self, side: Side) -> Self {
		self.commands.push(Command::turn(side));
		self
	}

	pub fn repeat(mut self, times: u32, block: impl FnOnce(ProgramBuilder) -> ProgramBuilder) -> Self {
		let body = block(ProgramBuilder::new()).build();
		self.commands.push(Command::repeat(times, body));
		self
	}

	pub fn repeat_until(mut self, condition: Condition, block: impl FnOnce(ProgramBuilder) -> ProgramBuilder) -> Self {
		let body = block(ProgramBuilder::new()).build();
		self.commands.push(Command::repeat_until(condition, body));
		self
	}

	pub fn build(self) -> Vec<Command> {
		self.commands
	}
}

/// Render a command tree back to program text, four spaces per nesting level.
pub fn to_source(commands: &[Command]) -> String {
	let mut out = String::new();
	write_block(&mut out, commands, 0);
	out
}

fn write_block(out: &mut String, commands: &[Command], depth: usize) {
	for cmd in commands {
		// Writing into a String cannot fail.
		let _ = writeln!(out, "{:width$}{cmd}", "", width = depth * 4);
		write_block(out, cmd.body(), depth + 1);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleLevel {
	Basic,
	Advanced,
	Expert,
}

impl FromStr for ExampleLevel {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"1" | "basic" => Ok(ExampleLevel::Basic),
			"2" | "advanced" => Ok(ExampleLevel::Advanced),
			"3" | "expert" => Ok(ExampleLevel::Expert),
			_ => Err(format!("invalid example choice '{s}', expected basic, advanced or expert")),
		}
	}
}

/// Built-in programs, each of which walks cleanly on a 10×10 board.
pub fn example_program(level: ExampleLevel) -> (&'static str, Vec<Command>) {
	match level {
		ExampleLevel::Basic => (
			"Basic",
			ProgramBuilder::new()
				.move_by(9)
				.turn(Side::Right)
				.move_by(9)
				.turn(Side::Right)
				.move_by(9)
				.turn(Side::Right)
				.move_by(9)
				.turn(Side::Right)
				.build(),
		),
		ExampleLevel::Advanced => ("Advanced", ProgramBuilder::new().repeat(4, |b| b.move_by(9).turn(Side::Right)).build()),
		ExampleLevel::Expert => (
			"Expert",
			// Each pass steps back one cell before its run of five, which keeps
			// the spiral inside the top-left corner of the board.
			ProgramBuilder::new()
				.move_by(5)
				.turn(Side::Left)
				.turn(Side::Left)
				.move_by(3)
				.turn(Side::Right)
				.repeat(3, |r| r.move_by(-1).turn(Side::Right).repeat(5, |s| s.move_by(1)))
				.turn(Side::Left)
				.build(),
		),
	}
}
