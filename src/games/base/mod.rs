//! A small base card set.
//!
//! Enough cards to play a real turn and to exercise every engine hook:
//!
//! - Treasures (copper, silver, gold) and victory cards (estate, duchy,
//!   province)
//! - Plain actions: village, smithy, market
//! - Baker: gains a coffer
//! - Moat: installs an immunity reaction while it sits in hand
//! - Militia: an attack that makes every target discard down to 3
//! - Bonus: a once-only listener on the next treasure played this turn
//! - Delve: an event, bought without being gained
//!
//! ## Usage
//!
//! ```
//! use kingdom_engine::engine::MatchBuilder;
//! use kingdom_engine::games::base;
//!
//! let builder = MatchBuilder::new(2)
//!     .with_cards(base::definitions())
//!     .with_effects(base::effects())
//!     .with_supply_pile("silver", 40)
//!     .with_kingdom_pile("militia", 10)
//!     .with_event("delve");
//! assert!(builder.build().is_ok());
//! ```

mod cards;

pub use cards::{definitions, effects};
