use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
	Left,
	Right,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Left => f.write_str("left"),
			Side::Right => f.write_str("right"),
		}
	}
}

impl FromStr for Side {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("left") {
			Ok(Side::Left)
		} else if s.eq_ignore_ascii_case("right") {
			Ok(Side::Right)
		} else {
			Err(format!("unknown side '{s}'"))
		}
	}
}

/// Exit condition of a `RepeatUntil` loop, evaluated one step ahead of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
	WallAhead,
	GridEdge,
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Condition::WallAhead => f.write_str("WallAhead"),
			Condition::GridEdge => f.write_str("GridEdge"),
		}
	}
}

impl FromStr for Condition {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("wallahead") {
			Ok(Condition::WallAhead)
		} else if s.eq_ignore_ascii_case("gridedge") {
			Ok(Condition::GridEdge)
		} else {
			Err(format!("unknown condition '{s}'"))
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
	Move { steps: i64 },
	Turn { side: Side },
	Repeat { times: u32, body: Vec<Command> },
	ConditionalRepeat { condition: Condition, body: Vec<Command> },
}

impl Command {
	pub fn move_by(steps: i64) -> Self {
		Command::Move { steps }
	}

	pub fn turn(side: Side) -> Self {
		Command::Turn { side }
	}

	pub fn repeat(times: u32, body: Vec<Command>) -> Self {
		Command::Repeat { times, body }
	}

	pub fn repeat_until(condition: Condition, body: Vec<Command>) -> Self {
		Command::ConditionalRepeat { condition, body }
	}

	/// Nested commands of a loop; leaves have none.
	pub fn body(&self) -> &[Command] {
		match self {
			Command::Repeat { body, .. } | Command::ConditionalRepeat { body, .. } => body,
			Command::Move { .. } | Command::Turn { .. } => &[],
		}
	}

	pub fn is_loop(&self) -> bool {
		matches!(self, Command::Repeat { .. } | Command::ConditionalRepeat { .. })
	}
}

/// Leaves render in move-log form (`Move 5`, `Turn right`), loops as their header line.
impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Command::Move { steps } => write!(f, "Move {steps}"),
			Command::Turn { side } => write!(f, "Turn {side}"),
			Command::Repeat { times, .. } => write!(f, "Repeat {times}"),
			Command::ConditionalRepeat { condition, .. } => write!(f, "RepeatUntil {condition}"),
		}
	}
}
