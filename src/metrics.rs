use std::fmt;

use serde::Serialize;

use crate::ast::Command;

/// Static shape of a command tree. Loop bodies count once, not once per iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
	pub total_commands: usize,
	pub repeat_count: usize,
	pub max_nesting_depth: usize,
}

pub fn analyze(commands: &[Command]) -> Metrics {
	let mut metrics = Metrics::default();
	walk(commands, 0, &mut metrics);
	metrics
}

fn walk(commands: &[Command], depth: usize, metrics: &mut Metrics) {
	for cmd in commands {
		metrics.total_commands += 1;
		if cmd.is_loop() {
			metrics.repeat_count += 1;
			metrics.max_nesting_depth = metrics.max_nesting_depth.max(depth + 1);
			walk(cmd.body(), depth + 1, metrics);
		}
	}
}

impl fmt::Display for Metrics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Commands: {}", self.total_commands)?;
		writeln!(f, "Repeat Commands: {}", self.repeat_count)?;
		writeln!(f, "Max Nesting Depth: {}", self.max_nesting_depth)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::{Condition, Side};

	#[test]
	fn basic_program() {
		let commands = vec![
			Command::move_by(5),
			Command::turn(Side::Right),
			Command::repeat(3, vec![Command::move_by(1)]),
		];
		let m = analyze(&commands);
		assert_eq!(
			m,
			Metrics {
				total_commands: 4,
				repeat_count: 1,
				max_nesting_depth: 1,
			}
		);
		assert_eq!(m.to_string(), "Commands: 4\nRepeat Commands: 1\nMax Nesting Depth: 1\n");
	}

	#[test]
	fn empty_program() {
		assert_eq!(analyze(&[]), Metrics::default());
	}

	#[test]
	fn nested_loops_count_once() {
		let commands = vec![Command::repeat(
			100,
			vec![
				Command::move_by(1),
				Command::repeat_until(Condition::WallAhead, vec![Command::repeat(0, vec![Command::turn(Side::Left)])]),
			],
		)];
		let m = analyze(&commands);
		assert_eq!(m.total_commands, 5);
		assert_eq!(m.repeat_count, 3);
		assert_eq!(m.max_nesting_depth, 3);
	}

	#[test]
	fn depth_is_maximum_over_siblings() {
		let commands = vec![
			Command::repeat(2, vec![Command::repeat(2, vec![Command::move_by(1)])]),
			Command::repeat(2, vec![Command::move_by(1)]),
		];
		let m = analyze(&commands);
		assert_eq!(m.max_nesting_depth, 2);
		assert_eq!(m.repeat_count, 3);
		assert_eq!(m.total_commands, 5);
	}
}
