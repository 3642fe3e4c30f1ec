//! The six cab actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A discrete cab action.
///
/// The discriminant is the action index used by the transition table and the
/// Q-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    South = 0,
    North = 1,
    East = 2,
    West = 3,
    PickUp = 4,
    DropOff = 5,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 6;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::South,
        Action::North,
        Action::East,
        Action::West,
        Action::PickUp,
        Action::DropOff,
    ];

    /// Index of this action in the table columns.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Action::South => "South",
            Action::North => "North",
            Action::East => "East",
            Action::West => "West",
            Action::PickUp => "Pick-up",
            Action::DropOff => "Drop-off",
        }
    }

    /// Whether the action moves the cab.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::South | Action::North | Action::East | Action::West
        )
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(value)
            .copied()
            .ok_or(Error::InvalidAction {
                action: value,
                action_count: Action::COUNT,
            })
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_declaration_order() {
        for (idx, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), idx);
            assert_eq!(Action::try_from(idx).unwrap(), *action);
        }
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let err = Action::try_from(6).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAction {
                action: 6,
                action_count: 6
            }
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Action::PickUp.to_string(), "Pick-up");
        assert_eq!(Action::DropOff.label(), "Drop-off");
        assert!(Action::West.is_movement());
        assert!(!Action::DropOff.is_movement());
    }
}
