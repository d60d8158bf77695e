//! Seats at the table.
//!
//! `PlayerId` is a seat index; seat 0 takes the first turn and play passes
//! to the left. `PlayerMap` holds one value per seat.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index, 0-based, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat at a table of `player_count`.
    ///
    /// ```
    /// use kingdom_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The other seats in turn order, starting to the left of `self`.
    /// This is the order attacks resolve in.
    ///
    /// ```
    /// use kingdom_engine::core::PlayerId;
    ///
    /// let order: Vec<_> = PlayerId::new(1).others(3).collect();
    /// assert_eq!(order, vec![PlayerId::new(2), PlayerId::new(0)]);
    /// ```
    pub fn others(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..player_count).map(move |offset| PlayerId(((self.index() + offset) % player_count) as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use kingdom_engine::core::{PlayerId, PlayerMap};
///
/// let mut coffers: PlayerMap<u32> = PlayerMap::with_default(2);
/// coffers[PlayerId::new(1)] += 2;
/// assert_eq!(*coffers.get(PlayerId::new(1)), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T: Default> PlayerMap<T> {
    /// A map with `T::default()` for every seat.
    ///
    /// Panics on an empty table.
    pub fn with_default(player_count: usize) -> Self {
        assert!(player_count > 0, "a match needs at least one player");
        Self {
            seats: PlayerId::all(player_count).map(|_| T::default()).collect(),
        }
    }
}

impl<T> PlayerMap<T> {
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_others_start_to_the_left() {
        let order: Vec<_> = PlayerId::new(2).others(4).collect();
        assert_eq!(order, vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(1)]);

        // Alone at the table: nobody to attack.
        assert_eq!(PlayerId::new(0).others(1).count(), 0);
    }

    #[test]
    fn test_seats_are_independent() {
        let mut buys: PlayerMap<u32> = PlayerMap::with_default(3);
        *buys.get_mut(PlayerId::new(2)) = 4;

        assert_eq!(buys.player_count(), 3);
        assert_eq!(buys[PlayerId::new(0)], 0);
        assert_eq!(buys[PlayerId::new(2)], 4);
    }

    #[test]
    #[should_panic(expected = "at least one player")]
    fn test_empty_table_panics() {
        let _: PlayerMap<u32> = PlayerMap::with_default(0);
    }
}
