use std::{fmt, sync::Arc};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{ast::Side, error::RuntimeError, grid::Grid};

pub type Point = (i64, i64);

/// Ordered clockwise so a right turn is `+1` and a left turn `+3` modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
	North,
	East,
	South,
	West,
}

impl Direction {
	const CLOCKWISE: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

	pub fn rotate(self, side: Side) -> Self {
		let step = match side {
			Side::Right => 1,
			Side::Left => 3,
		};
		Self::CLOCKWISE[(self as usize + step) % 4]
	}

	/// Unit step along this direction; north is towards row 0.
	pub fn delta(self) -> Point {
		match self {
			Direction::North => (0, -1),
			Direction::East => (1, 0),
			Direction::South => (0, 1),
			Direction::West => (-1, 0),
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Direction::North => "north",
			Direction::East => "east",
			Direction::South => "south",
			Direction::West => "west",
		})
	}
}

/// The simulated walker: where it is, where it faces and what it has done so far.
#[derive(Debug, Clone)]
pub struct CharacterState {
	position: Point,
	facing: Direction,
	grid: Arc<Grid>,
	moves: Vec<String>,
	points_visited: Vec<Point>,
}

impl CharacterState {
	pub fn new(grid: Arc<Grid>) -> Self {
		let start = (0, 0);
		Self {
			position: start,
			facing: Direction::East,
			grid,
			moves: Vec::new(),
			points_visited: vec![start],
		}
	}

	pub fn position(&self) -> Point {
		self.position
	}

	pub fn facing(&self) -> Direction {
		self.facing
	}

	pub fn grid(&self) -> &Arc<Grid> {
		&self.grid
	}

	pub fn moves(&self) -> &[String] {
		&self.moves
	}

	pub fn points_visited(&self) -> &[Point] {
		&self.points_visited
	}

	/// Append a human-readable entry to the move log.
	pub fn record(&mut self, description: impl Into<String>) {
		self.moves.push(description.into());
	}

	/// Where `amount` steps along the current facing would land. Does not move.
	pub fn calc_move(&self, amount: i64) -> Point {
		let (dx, dy) = self.facing.delta();
		(
			self.position.0.saturating_add(dx.saturating_mul(amount)),
			self.position.1.saturating_add(dy.saturating_mul(amount)),
		)
	}

	pub fn move_by(&mut self, amount: i64) -> Result<(), RuntimeError> {
		let (x, y) = self.calc_move(amount);
		if self.grid.out_of_bounds(x, y) {
			return Err(RuntimeError::OutOfBounds { x, y, state: self.to_string() });
		}
		if self.grid.is_wall(x, y) {
			return Err(RuntimeError::WallCollision { x, y, state: self.to_string() });
		}
		trace!("move {amount}: {:?} -> {:?}", self.position, (x, y));
		self.position = (x, y);
		self.points_visited.push((x, y));
		Ok(())
	}

	pub fn rotate(&mut self, side: Side) {
		self.facing = self.facing.rotate(side);
	}

	pub fn on_finish(&self) -> bool {
		self.grid.is_finish(self.position.0, self.position.1)
	}
}

impl fmt::Display for CharacterState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}) facing {}.", self.position.0, self.position.1, self.facing)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::grid::CellState;

	fn on_empty(size: usize) -> CharacterState {
		CharacterState::new(Arc::new(Grid::new_empty(size)))
	}

	#[test]
	fn fresh_character_display() {
		assert_eq!(on_empty(10).to_string(), "(0, 0) facing east.");
		assert_eq!(on_empty(1).to_string(), "(0, 0) facing east.");
	}

	#[test]
	fn starts_with_seeded_visit() {
		let c = on_empty(10);
		assert_eq!(c.points_visited(), &[(0, 0)]);
		assert!(c.moves().is_empty());
	}

	#[test]
	fn move_along_facing() {
		let mut c = on_empty(10);
		c.move_by(5).unwrap();
		assert_eq!(c.to_string(), "(5, 0) facing east.");
		assert_eq!(c.points_visited(), &[(0, 0), (5, 0)]);
	}

	#[test]
	fn rotate_left_and_right() {
		let mut c = on_empty(10);
		c.rotate(Side::Left);
		assert_eq!(c.to_string(), "(0, 0) facing north.");

		let mut c = on_empty(10);
		c.rotate(Side::Right);
		assert_eq!(c.to_string(), "(0, 0) facing south.");
	}

	#[test]
	fn rotation_is_cyclic() {
		for start in Direction::CLOCKWISE {
			let mut d = start;
			for _ in 0..4 {
				d = d.rotate(Side::Right);
			}
			assert_eq!(d, start);
			assert_eq!(start.rotate(Side::Right).rotate(Side::Left), start);
			assert_eq!(start.rotate(Side::Left).rotate(Side::Right), start);
		}
	}

	#[test]
	fn calc_move_does_not_mutate() {
		let mut c = on_empty(10);
		c.rotate(Side::Right);
		assert_eq!(c.calc_move(3), (0, 3));
		assert_eq!(c.calc_move(-2), (0, -2));
		assert_eq!(c.position(), (0, 0));
		assert_eq!(c.points_visited().len(), 1);
	}

	#[test]
	fn north_decreases_y() {
		let mut c = on_empty(10);
		c.rotate(Side::Right);
		c.move_by(4).unwrap();
		c.rotate(Side::Left);
		c.rotate(Side::Left);
		c.move_by(1).unwrap();
		assert_eq!(c.position(), (0, 3));
		assert_eq!(c.facing(), Direction::North);
	}

	#[test]
	fn failed_move_leaves_state_untouched() {
		let mut c = on_empty(3);
		let err = c.move_by(3).unwrap_err();
		assert_eq!(
			err,
			RuntimeError::OutOfBounds {
				x: 3,
				y: 0,
				state: "(0, 0) facing east.".to_string(),
			}
		);
		assert_eq!(c.position(), (0, 0));
		assert_eq!(c.points_visited(), &[(0, 0)]);
	}

	#[test]
	fn wall_collision_reports_target() {
		let grid = Grid::from_layout(vec![
			vec![CellState::Empty, CellState::Empty, CellState::Wall],
			vec![CellState::Empty; 3],
			vec![CellState::Empty; 3],
		])
		.unwrap();
		let mut c = CharacterState::new(Arc::new(grid));
		c.move_by(1).unwrap();
		let err = c.move_by(1).unwrap_err();
		assert!(matches!(err, RuntimeError::WallCollision { x: 2, y: 0, .. }));
		assert_eq!(c.points_visited(), &[(0, 0), (1, 0)]);
	}

	#[test]
	fn finish_detection() {
		let grid: Grid = "ox\noo\n".parse().unwrap();
		let mut c = CharacterState::new(Arc::new(grid));
		assert!(!c.on_finish());
		c.move_by(1).unwrap();
		assert!(c.on_finish());
	}
}
