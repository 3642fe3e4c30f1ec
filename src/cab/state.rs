//! Mixed-radix state encoding
//!
//! A cab state is the tuple (row, col, passenger status, destination). It is
//! packed into a single index as
//! `(((row * num_cols + col) * (L + 1)) + passenger) * L + destination`
//! where `L` is the number of named locations and passenger status `L` means
//! the passenger is inside the cab.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where the passenger currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerStatus {
    /// Waiting at the location with this id.
    At(usize),
    /// Riding in the cab.
    InCab,
}

impl PassengerStatus {
    /// Status digit used by the encoding.
    pub fn index(self, num_locations: usize) -> usize {
        match self {
            PassengerStatus::At(location) => location,
            PassengerStatus::InCab => num_locations,
        }
    }

    fn from_index(index: usize, num_locations: usize) -> Self {
        if index >= num_locations {
            PassengerStatus::InCab
        } else {
            PassengerStatus::At(index)
        }
    }
}

/// A decoded cab state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CabState {
    pub row: usize,
    pub col: usize,
    pub passenger: PassengerStatus,
    pub destination: usize,
}

impl CabState {
    pub fn new(row: usize, col: usize, passenger: PassengerStatus, destination: usize) -> Self {
        Self {
            row,
            col,
            passenger,
            destination,
        }
    }

    /// Cab coordinates.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn passenger_in_cab(&self) -> bool {
        self.passenger == PassengerStatus::InCab
    }
}

/// Encoder/decoder between [`CabState`] tuples and state indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCodec {
    num_rows: usize,
    num_cols: usize,
    num_locations: usize,
}

impl StateCodec {
    pub fn new(num_rows: usize, num_cols: usize, num_locations: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            num_locations,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    /// Number of passenger status values (every location plus "in cab").
    pub fn num_passenger_states(&self) -> usize {
        self.num_locations + 1
    }

    /// Total number of encoded states.
    pub fn state_count(&self) -> usize {
        self.num_rows * self.num_cols * self.num_passenger_states() * self.num_locations
    }

    /// Pack a state into its index.
    ///
    /// The caller is responsible for the tuple being in range; every state
    /// produced by [`StateCodec::decode`] or [`StateCodec::states`] is.
    pub fn encode(&self, state: &CabState) -> usize {
        let mut id = state.row;
        id = id * self.num_cols + state.col;
        id = id * self.num_passenger_states() + state.passenger.index(self.num_locations);
        id * self.num_locations + state.destination
    }

    /// Unpack a state index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if `id` is not a valid state.
    pub fn decode(&self, id: usize) -> Result<CabState> {
        let state_count = self.state_count();
        if id >= state_count {
            return Err(Error::StateOutOfRange {
                state: id,
                state_count,
            });
        }

        let mut rest = id;
        let destination = rest % self.num_locations;
        rest /= self.num_locations;
        let passenger = rest % self.num_passenger_states();
        rest /= self.num_passenger_states();
        let col = rest % self.num_cols;
        let row = rest / self.num_cols;

        Ok(CabState {
            row,
            col,
            passenger: PassengerStatus::from_index(passenger, self.num_locations),
            destination,
        })
    }

    /// Every valid state in encoding order.
    pub fn states(&self) -> impl Iterator<Item = CabState> + '_ {
        (0..self.num_rows).flat_map(move |row| {
            (0..self.num_cols).flat_map(move |col| {
                (0..self.num_passenger_states()).flat_map(move |passenger| {
                    (0..self.num_locations).map(move |destination| CabState {
                        row,
                        col,
                        passenger: PassengerStatus::from_index(passenger, self.num_locations),
                        destination,
                    })
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_count() {
        let codec = StateCodec::new(8, 8, 5);
        assert_eq!(codec.state_count(), 8 * 8 * 6 * 5);
    }

    #[test]
    fn test_encode_matches_formula() {
        let codec = StateCodec::new(5, 5, 4);
        let state = CabState::new(3, 1, PassengerStatus::At(2), 0);
        assert_eq!(codec.encode(&state), ((3 * 5 + 1) * 5 + 2) * 4);

        let state = CabState::new(0, 0, PassengerStatus::InCab, 3);
        assert_eq!(codec.encode(&state), 4 * 4 + 3);
    }

    #[test]
    fn test_states_are_enumerated_in_encoding_order() {
        let codec = StateCodec::new(3, 4, 3);
        for (idx, state) in codec.states().enumerate() {
            assert_eq!(codec.encode(&state), idx);
            assert_eq!(codec.decode(idx).unwrap(), state);
        }
        assert_eq!(codec.states().count(), codec.state_count());
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        let codec = StateCodec::new(2, 2, 2);
        let err = codec.decode(codec.state_count()).unwrap_err();
        assert!(matches!(err, Error::StateOutOfRange { .. }));
    }
}
