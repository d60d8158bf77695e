//! Zone registry for card locations.
//!
//! The `ZoneRegistry` owns every named pile of card ids. It is pure
//! bookkeeping: it never checks whether a move is legal, that is the
//! action dispatcher's job.
//!
//! - Index 0 of a zone is the bottom, the last index is the top
//! - `get_source` hands out the live collection so callers can splice it
//! - `find_card_source` scans zones in registration order

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameRng, PlayerId, ZoneName, ZoneRef};
use crate::error::{EngineError, Result};

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of zone (end of the list).
    #[default]
    Top,
    /// Add to bottom of zone.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// Where a card currently sits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLocation {
    pub zone: ZoneRef,
    pub index: usize,
}

/// Named ordered collections of card ids.
///
/// ## Usage
///
/// ```
/// use kingdom_engine::core::{CardId, PlayerId, ZoneName, ZoneRef};
/// use kingdom_engine::zones::ZoneRegistry;
///
/// let mut zones = ZoneRegistry::new();
/// let p0 = PlayerId::new(0);
/// zones.register_zone(ZoneName::Deck, vec![CardId(1), CardId(2)], Some(p0));
/// zones.register_zone(ZoneName::Hand, vec![], Some(p0));
///
/// // Pop the top of the deck into the hand through the live collections.
/// let top = zones.get_source(&ZoneRef::deck(p0)).unwrap().pop().unwrap();
/// zones.get_source(&ZoneRef::hand(p0)).unwrap().push(top);
///
/// assert_eq!(zones.find_card_source(CardId(2)).unwrap().zone, ZoneRef::hand(p0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneRegistry {
    zones: FxHashMap<ZoneRef, Vec<CardId>>,

    /// Registration order, for deterministic scans.
    order: Vec<ZoneRef>,
}

impl ZoneRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone with its initial contents.
    ///
    /// Registering an existing zone again replaces its contents.
    pub fn register_zone(&mut self, name: ZoneName, initial: Vec<CardId>, player: Option<PlayerId>) {
        let zone = ZoneRef { name, player };
        if self.zones.insert(zone.clone(), initial).is_some() {
            tracing::debug!(%zone, "zone re-registered, contents replaced");
        } else {
            self.order.push(zone);
        }
    }

    /// Check if a zone exists.
    #[must_use]
    pub fn is_registered(&self, zone: &ZoneRef) -> bool {
        self.zones.contains_key(zone)
    }

    /// The live collection behind a zone.
    pub fn get_source(&mut self, zone: &ZoneRef) -> Result<&mut Vec<CardId>> {
        self.zones
            .get_mut(zone)
            .ok_or_else(|| EngineError::ZoneNotRegistered(zone.clone()))
    }

    /// Read-only view of a zone.
    pub fn source(&self, zone: &ZoneRef) -> Result<&[CardId]> {
        self.zones
            .get(zone)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::ZoneNotRegistered(zone.clone()))
    }

    /// Cards in a zone, or an empty slice if the zone does not exist.
    #[must_use]
    pub fn cards_in(&self, zone: &ZoneRef) -> &[CardId] {
        self.zones.get(zone).map_or(&[], Vec::as_slice)
    }

    /// Find the zone and index holding a card.
    ///
    /// `None` means the card is not currently anywhere tracked.
    #[must_use]
    pub fn find_card_source(&self, card: CardId) -> Option<CardLocation> {
        self.order.iter().find_map(|zone| {
            self.zones[zone]
                .iter()
                .position(|&c| c == card)
                .map(|index| CardLocation {
                    zone: zone.clone(),
                    index,
                })
        })
    }

    /// Remove a card from wherever it is. Returns its old location.
    pub fn take(&mut self, card: CardId) -> Option<CardLocation> {
        let location = self.find_card_source(card)?;
        if let Some(cards) = self.zones.get_mut(&location.zone) {
            cards.remove(location.index);
        }
        Some(location)
    }

    /// Put a card into a zone.
    pub fn insert(&mut self, zone: &ZoneRef, card: CardId, position: ZonePosition) -> Result<()> {
        let cards = self.get_source(zone)?;
        match position {
            ZonePosition::Top => cards.push(card),
            ZonePosition::Bottom => cards.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(cards.len());
                cards.insert(idx, card);
            }
        }
        Ok(())
    }

    /// Get the top card of a zone (last in the vec).
    #[must_use]
    pub fn top_card(&self, zone: &ZoneRef) -> Option<CardId> {
        self.zones.get(zone)?.last().copied()
    }

    /// Shuffle a zone in place.
    pub fn shuffle(&mut self, zone: &ZoneRef, rng: &mut GameRng) -> Result<()> {
        let cards = self.get_source(zone)?;
        rng.shuffle(cards);
        Ok(())
    }

    /// Registered zones in registration order.
    pub fn zones(&self) -> impl Iterator<Item = &ZoneRef> {
        self.order.iter()
    }

    /// Every tracked card id, zone by zone.
    pub fn all_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.order.iter().flat_map(|zone| self.zones[zone].iter().copied())
    }

    /// Total number of tracked cards.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_register_and_read() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Deck, vec![CardId(1), CardId(2)], Some(p0()));

        assert!(zones.is_registered(&ZoneRef::deck(p0())));
        assert!(!zones.is_registered(&ZoneRef::deck(PlayerId::new(1))));
        assert_eq!(zones.source(&ZoneRef::deck(p0())).unwrap(), &[CardId(1), CardId(2)]);
        assert_eq!(zones.top_card(&ZoneRef::deck(p0())), Some(CardId(2)));
    }

    #[test]
    fn test_unregistered_zone_is_an_error() {
        let mut zones = ZoneRegistry::new();

        let err = zones.get_source(&ZoneRef::trash()).unwrap_err();
        assert!(matches!(err, EngineError::ZoneNotRegistered(_)));
        assert!(zones.cards_in(&ZoneRef::trash()).is_empty());
    }

    #[test]
    fn test_get_source_is_live() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Trash, vec![], None);

        zones.get_source(&ZoneRef::trash()).unwrap().push(CardId(5));

        assert_eq!(zones.cards_in(&ZoneRef::trash()), &[CardId(5)]);
    }

    #[test]
    fn test_find_card_source() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Hand, vec![CardId(1)], Some(p0()));
        zones.register_zone(ZoneName::Discard, vec![CardId(2), CardId(3)], Some(p0()));

        let location = zones.find_card_source(CardId(3)).unwrap();
        assert_eq!(location.zone, ZoneRef::discard(p0()));
        assert_eq!(location.index, 1);

        assert!(zones.find_card_source(CardId(99)).is_none());
    }

    #[test]
    fn test_take_and_insert_positions() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Deck, vec![CardId(1), CardId(2)], Some(p0()));
        zones.register_zone(ZoneName::Hand, vec![], Some(p0()));

        let old = zones.take(CardId(1)).unwrap();
        assert_eq!(old.zone, ZoneRef::deck(p0()));

        let deck = ZoneRef::deck(p0());
        zones.insert(&deck, CardId(1), ZonePosition::Top).unwrap();
        zones.insert(&deck, CardId(7), ZonePosition::Bottom).unwrap();
        zones.insert(&deck, CardId(8), ZonePosition::Index(1)).unwrap();
        zones.insert(&deck, CardId(9), ZonePosition::Index(100)).unwrap();

        assert_eq!(
            zones.cards_in(&deck),
            &[CardId(7), CardId(8), CardId(2), CardId(1), CardId(9)]
        );
        assert!(zones.take(CardId(42)).is_none());
    }

    #[test]
    fn test_re_register_replaces_contents() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Trash, vec![CardId(1)], None);
        zones.register_zone(ZoneName::Trash, vec![CardId(2)], None);

        assert_eq!(zones.zones().count(), 1);
        assert_eq!(zones.cards_in(&ZoneRef::trash()), &[CardId(2)]);
    }

    #[test]
    fn test_shuffle() {
        let mut zones = ZoneRegistry::new();
        let ids: Vec<_> = (0..20).map(CardId).collect();
        zones.register_zone(ZoneName::Deck, ids.clone(), Some(p0()));

        let mut rng = GameRng::new(42);
        zones.shuffle(&ZoneRef::deck(p0()), &mut rng).unwrap();

        let after = zones.cards_in(&ZoneRef::deck(p0())).to_vec();
        assert_ne!(after, ids);
        assert_eq!(zones.total_cards(), 20);
    }

    #[test]
    fn test_all_cards_in_registration_order() {
        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Supply, vec![CardId(3), CardId(4)], None);
        zones.register_zone(ZoneName::Hand, vec![CardId(1)], Some(p0()));

        let all: Vec<_> = zones.all_cards().collect();
        assert_eq!(all, vec![CardId(3), CardId(4), CardId(1)]);
    }
}
