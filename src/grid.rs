use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
	#[default]
	Empty,
	Wall,
	Finish,
}

impl CellState {
	fn from_char(ch: char) -> Option<Self> {
		match ch {
			'o' => Some(CellState::Empty),
			'+' => Some(CellState::Wall),
			'x' => Some(CellState::Finish),
			_ => None,
		}
	}

	fn as_char(self) -> char {
		match self {
			CellState::Empty => 'o',
			CellState::Wall => '+',
			CellState::Finish => 'x',
		}
	}
}

/// Square, immutable board. Cells are addressed as `(x, y)`: `x` is the
/// column and `y` the row, row 0 being the top line of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
	size: usize,
	cells: Vec<CellState>,
}

impl Grid {
	pub fn new_empty(size: usize) -> Self {
		Self {
			size,
			cells: vec![CellState::Empty; size * size],
		}
	}

	pub fn from_layout(rows: Vec<Vec<CellState>>) -> Result<Self, GridError> {
		let size = rows.len();
		if size == 0 {
			return Err(GridError::Empty);
		}
		if let Some(bad) = rows.iter().find(|row| row.len() != size) {
			return Err(GridError::NotSquare { rows: size, cols: bad.len() });
		}
		Ok(Self {
			size,
			cells: rows.into_iter().flatten().collect(),
		})
	}

	/// Read a layout written one row per line: `o` empty, `+` wall, `x` finish.
	/// Blank lines and carriage returns are ignored.
	pub fn from_text(text: &str) -> Result<Self, GridError> {
		let mut rows = Vec::new();
		for (lineno, line) in text.lines().enumerate() {
			let line = line.trim_end_matches('\r');
			if line.trim().is_empty() {
				continue;
			}
			let row = line
				.chars()
				.enumerate()
				.map(|(col, ch)| {
					CellState::from_char(ch).ok_or(GridError::InvalidCell {
						ch,
						line: lineno + 1,
						column: col + 1,
					})
				})
				.collect::<Result<Vec<_>, _>>()?;
			rows.push(row);
		}
		Self::from_layout(rows)
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn out_of_bounds(&self, x: i64, y: i64) -> bool {
		self.index(x, y).is_none()
	}

	pub fn cell_at(&self, x: i64, y: i64) -> Option<CellState> {
		self.index(x, y).map(|i| self.cells[i])
	}

	/// Off-grid coordinates count as walls.
	pub fn is_wall(&self, x: i64, y: i64) -> bool {
		self.cell_at(x, y).is_none_or(|cell| cell == CellState::Wall)
	}

	pub fn is_finish(&self, x: i64, y: i64) -> bool {
		self.cell_at(x, y) == Some(CellState::Finish)
	}

	pub fn has_finish(&self) -> bool {
		self.cells.contains(&CellState::Finish)
	}

	fn index(&self, x: i64, y: i64) -> Option<usize> {
		let x = usize::try_from(x).ok()?;
		let y = usize::try_from(y).ok()?;
		(x < self.size && y < self.size).then(|| y * self.size + x)
	}
}

impl FromStr for Grid {
	type Err = GridError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_text(s)
	}
}

impl fmt::Display for Grid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for row in self.cells.chunks(self.size.max(1)) {
			let line: String = row.iter().map(|c| c.as_char()).collect();
			writeln!(f, "{line}")?;
		}
		Ok(())
	}
}
