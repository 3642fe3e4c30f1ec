//! Text layout parsing
//!
//! A layout is a rectangle of text rows. The first and last rows are the
//! outer barrier. Inside, cell glyphs sit on odd columns and the glyph between
//! two neighbouring cells tells whether the cab may pass: `:` or a space is an
//! open path, `|` is a wall. Named locations are single-character markers
//! placed on cell glyphs.
//!
//! ```text
//! +---------+
//! |R: | : :G|
//! | : : : : |
//! |Y| : |B: |
//! +---------+
//! ```

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::error::{Error, Result};

const WALL_GLYPHS: [char; 3] = ['|', '-', '+'];
const PATH_GLYPHS: [char; 2] = [':', ' '];

/// A named pickup/drop-off location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub marker: char,
    pub row: usize,
    pub col: usize,
}

/// Parsed grid layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    glyphs: Vec<Vec<char>>,
    num_rows: usize,
    num_cols: usize,
    locations: Vec<Location>,
}

impl Layout {
    /// Parse layout rows and locate each marker.
    ///
    /// Location ids follow the order of `markers`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidLayout`] for ragged, undersized or even-width layouts,
    ///   markers that collide with wall/path glyphs, markers off a cell glyph,
    ///   or fewer than two locations
    /// * [`Error::MissingLocation`] if a marker does not appear
    /// * [`Error::DuplicateLocation`] if a marker is listed or drawn twice
    pub fn parse<S: AsRef<str>>(rows: &[S], markers: &[char]) -> Result<Self> {
        let glyphs: Vec<Vec<char>> = rows
            .iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();

        if glyphs.len() < 3 {
            return Err(Error::layout(format!(
                "expected at least 3 rows (two barriers and one grid row), got {}",
                glyphs.len()
            )));
        }

        let width = glyphs[0].len();
        if let Some((idx, row)) = glyphs.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(Error::layout(format!(
                "row {idx} has {} characters, expected {width}",
                row.len()
            )));
        }
        if width < 3 || width.is_multiple_of(2) {
            return Err(Error::layout(format!(
                "row width must be odd and at least 3, got {width}"
            )));
        }

        if markers.len() < 2 {
            return Err(Error::layout(format!(
                "at least two locations are required, got {}",
                markers.len()
            )));
        }

        let num_rows = glyphs.len() - 2;
        let num_cols = (width - 1) / 2;

        let mut locations = Vec::with_capacity(markers.len());
        for (idx, &marker) in markers.iter().enumerate() {
            if WALL_GLYPHS.contains(&marker) || PATH_GLYPHS.contains(&marker) {
                return Err(Error::layout(format!(
                    "marker '{marker}' collides with a wall or path glyph"
                )));
            }
            if markers[..idx].contains(&marker) {
                return Err(Error::DuplicateLocation { marker });
            }

            let mut hits = glyphs.iter().enumerate().flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |&(_, &glyph)| glyph == marker)
                    .map(move |(c, _)| (r, c))
            });
            let (r, c) = hits.next().ok_or(Error::MissingLocation { marker })?;
            if hits.next().is_some() {
                return Err(Error::DuplicateLocation { marker });
            }
            if r == 0 || r > num_rows || c.is_multiple_of(2) {
                return Err(Error::layout(format!(
                    "marker '{marker}' at line {r}, column {c} is not on a cell"
                )));
            }

            locations.push(Location {
                marker,
                row: r - 1,
                col: (c - 1) / 2,
            });
        }

        Ok(Self {
            glyphs,
            num_rows,
            num_cols,
            locations,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Raw glyph rows, barriers included.
    pub fn glyphs(&self) -> &[Vec<char>] {
        &self.glyphs
    }

    /// Glyph coordinates (line, column) of a grid cell.
    pub fn glyph_position(&self, row: usize, col: usize) -> (usize, usize) {
        (row + 1, 2 * col + 1)
    }

    /// Grid coordinates of a location id.
    pub fn location_position(&self, location: usize) -> Option<(usize, usize)> {
        self.locations.get(location).map(|loc| (loc.row, loc.col))
    }

    /// Id of the location on a grid cell, if any.
    pub fn location_at(&self, row: usize, col: usize) -> Option<usize> {
        self.locations
            .iter()
            .position(|loc| loc.row == row && loc.col == col)
    }

    fn is_open(&self, line: usize, column: usize) -> bool {
        self.glyphs
            .get(line)
            .and_then(|row| row.get(column))
            .is_some_and(|glyph| PATH_GLYPHS.contains(glyph))
    }

    /// Whether the cab can cross from `(row, col)` to the cell on its east.
    pub fn can_move_east(&self, row: usize, col: usize) -> bool {
        self.is_open(row + 1, 2 * col + 2)
    }

    /// Whether the cab can cross from `(row, col)` to the cell on its west.
    pub fn can_move_west(&self, row: usize, col: usize) -> bool {
        self.is_open(row + 1, 2 * col)
    }

    /// Cell reached by a movement action.
    ///
    /// Targets are clamped to the grid and a wall between the two cells turns
    /// the move into a no-op. Rows carry no horizontal wall segments, so
    /// north/south moves are limited only by the outer barrier. Non-movement
    /// actions return the current cell.
    pub fn move_target(&self, row: usize, col: usize, action: Action) -> (usize, usize) {
        match action {
            Action::South => ((row + 1).min(self.num_rows - 1), col),
            Action::North => (row.saturating_sub(1), col),
            Action::East if self.can_move_east(row, col) => {
                (row, (col + 1).min(self.num_cols - 1))
            }
            Action::West if self.can_move_west(row, col) => (row, col.saturating_sub(1)),
            _ => (row, col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: [&str; 5] = [
        "+-------+",
        "|R: | :G|",
        "| : : : |",
        "|Y| : :B|",
        "+-------+",
    ];

    fn small() -> Layout {
        Layout::parse(&SMALL, &['R', 'G', 'Y', 'B']).unwrap()
    }

    #[test]
    fn test_dimensions_and_locations() {
        let layout = small();
        assert_eq!(layout.num_rows(), 3);
        assert_eq!(layout.num_cols(), 4);
        assert_eq!(layout.location_position(0), Some((0, 0)));
        assert_eq!(layout.location_position(1), Some((0, 3)));
        assert_eq!(layout.location_position(2), Some((2, 0)));
        assert_eq!(layout.location_position(3), Some((2, 3)));
        assert_eq!(layout.location_at(2, 3), Some(3));
        assert_eq!(layout.location_at(1, 1), None);
    }

    #[test]
    fn test_walls_block_horizontal_moves() {
        let layout = small();
        // "|R: | :G|": wall between col 1 and col 2 on row 0
        assert_eq!(layout.move_target(0, 1, Action::East), (0, 1));
        assert_eq!(layout.move_target(0, 2, Action::West), (0, 2));
        assert_eq!(layout.move_target(0, 0, Action::East), (0, 1));
        // "|Y| : :B|": wall east of Y
        assert_eq!(layout.move_target(2, 0, Action::East), (2, 0));
    }

    #[test]
    fn test_moves_clamped_at_barrier() {
        let layout = small();
        assert_eq!(layout.move_target(0, 2, Action::North), (0, 2));
        assert_eq!(layout.move_target(2, 2, Action::South), (2, 2));
        assert_eq!(layout.move_target(1, 0, Action::West), (1, 0));
        assert_eq!(layout.move_target(1, 3, Action::East), (1, 3));
        assert_eq!(layout.move_target(1, 2, Action::PickUp), (1, 2));
    }

    #[test]
    fn test_missing_marker() {
        let err = Layout::parse(&SMALL, &['R', 'Z']).unwrap_err();
        assert!(matches!(err, Error::MissingLocation { marker: 'Z' }));
    }

    #[test]
    fn test_duplicate_marker_in_list() {
        let err = Layout::parse(&SMALL, &['R', 'G', 'R']).unwrap_err();
        assert!(matches!(err, Error::DuplicateLocation { marker: 'R' }));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = ["+-----+", "|R: :G|", "| : :|", "+-----+"];
        let err = Layout::parse(&rows, &['R', 'G']).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_single_location_rejected() {
        let err = Layout::parse(&SMALL, &['R']).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }
}
