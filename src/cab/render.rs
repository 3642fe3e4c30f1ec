//! Textual frames of the cab grid
//!
//! A [`Frame`] is a presentation structure: the layout glyphs plus the glyph
//! coordinates that should be highlighted for a decoded state. It can be
//! printed plain or with ANSI colours; neither touches the environment.

use std::fmt;

use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};

use super::{
    action::Action,
    layout::Layout,
    state::{CabState, PassengerStatus},
};

/// Glyph drawn on an empty cell while the passenger rides in the cab.
pub const LOADED_CAB_GLYPH: char = '*';

/// What a highlighted glyph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightKind {
    EmptyCab,
    LoadedCab,
    WaitingPassenger,
    Destination,
}

/// A highlighted glyph position (line and column in the layout text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub line: usize,
    pub column: usize,
    pub kind: HighlightKind,
}

/// Snapshot of the grid for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub glyphs: Vec<Vec<char>>,
    pub highlights: Vec<Highlight>,
    pub state: CabState,
    pub last_action: Option<Action>,
}

impl Frame {
    /// Build the frame for `state` on `layout`.
    ///
    /// Highlights are ordered cab, passenger, destination so later entries
    /// win when they share a glyph.
    pub fn new(layout: &Layout, state: &CabState, last_action: Option<Action>) -> Self {
        let mut glyphs = layout.glyphs().to_vec();
        let mut highlights = Vec::with_capacity(3);
        let (line, column) = layout.glyph_position(state.row, state.col);

        match state.passenger {
            PassengerStatus::InCab => {
                if glyphs[line][column] == ' ' {
                    glyphs[line][column] = LOADED_CAB_GLYPH;
                }
                highlights.push(Highlight {
                    line,
                    column,
                    kind: HighlightKind::LoadedCab,
                });
            }
            PassengerStatus::At(location) => {
                highlights.push(Highlight {
                    line,
                    column,
                    kind: HighlightKind::EmptyCab,
                });
                if let Some((row, col)) = layout.location_position(location) {
                    let (line, column) = layout.glyph_position(row, col);
                    highlights.push(Highlight {
                        line,
                        column,
                        kind: HighlightKind::WaitingPassenger,
                    });
                }
            }
        }

        if let Some((row, col)) = layout.location_position(state.destination) {
            let (line, column) = layout.glyph_position(row, col);
            highlights.push(Highlight {
                line,
                column,
                kind: HighlightKind::Destination,
            });
        }

        Self {
            glyphs,
            highlights,
            state: *state,
            last_action,
        }
    }

    fn kinds_at(&self, line: usize, column: usize) -> impl Iterator<Item = HighlightKind> + '_ {
        self.highlights
            .iter()
            .filter(move |h| h.line == line && h.column == column)
            .map(|h| h.kind)
    }

    fn footer(&self) -> String {
        match self.last_action {
            Some(action) => format!("Action: {action}\n"),
            None => "\n".to_string(),
        }
    }

    /// Uncoloured rendering.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.glyphs {
            out.extend(row.iter());
            out.push('\n');
        }
        out.push_str(&self.footer());
        out
    }

    /// Rendering with ANSI colour codes for the highlighted glyphs.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for (line, row) in self.glyphs.iter().enumerate() {
            for (column, &glyph) in row.iter().enumerate() {
                let mut kinds = self.kinds_at(line, column).peekable();
                if kinds.peek().is_none() {
                    out.push(glyph);
                    continue;
                }
                let mut content = glyph.stylize();
                for kind in kinds {
                    content = match kind {
                        HighlightKind::EmptyCab => content.on_yellow(),
                        HighlightKind::LoadedCab => content.on_green(),
                        HighlightKind::WaitingPassenger => content.blue().bold(),
                        HighlightKind::Destination => content.magenta(),
                    };
                }
                out.push_str(&content.to_string());
            }
            out.push('\n');
        }
        out.push_str(&self.footer());
        out
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 4] = ["+-----+", "|A: |B|", "| : : |", "+-----+"];

    fn layout() -> Layout {
        Layout::parse(&ROWS, &['A', 'B']).unwrap()
    }

    #[test]
    fn test_waiting_passenger_highlights() {
        let layout = layout();
        let state = CabState::new(1, 1, PassengerStatus::At(0), 1);
        let frame = Frame::new(&layout, &state, None);

        assert_eq!(
            frame.highlights,
            vec![
                Highlight {
                    line: 2,
                    column: 3,
                    kind: HighlightKind::EmptyCab
                },
                Highlight {
                    line: 1,
                    column: 1,
                    kind: HighlightKind::WaitingPassenger
                },
                Highlight {
                    line: 1,
                    column: 5,
                    kind: HighlightKind::Destination
                },
            ]
        );
        assert_eq!(frame.to_plain(), "+-----+\n|A: |B|\n| : : |\n+-----+\n\n");
    }

    #[test]
    fn test_loaded_cab_glyph_and_action_footer() {
        let layout = layout();
        let state = CabState::new(1, 2, PassengerStatus::InCab, 0);
        let frame = Frame::new(&layout, &state, Some(Action::East));

        assert_eq!(frame.glyphs[2][5], LOADED_CAB_GLYPH);
        assert!(frame.to_plain().ends_with("Action: East\n"));
        assert_eq!(frame.highlights[0].kind, HighlightKind::LoadedCab);
    }

    #[test]
    fn test_ansi_output_contains_escape_codes() {
        let layout = layout();
        let state = CabState::new(0, 1, PassengerStatus::At(1), 0);
        let frame = Frame::new(&layout, &state, None);
        let ansi = frame.to_ansi();
        assert!(ansi.contains('\u{1b}'));
        assert_eq!(ansi.lines().count(), frame.to_plain().lines().count());
    }
}
