//! Card system: definitions, instances, and the card library.
//!
//! ## Key Types
//!
//! - `CardDefinition`: static data shared by all copies of a card key
//! - `Card`: one physical copy (id, key, types, owner)
//! - `CardLibrary`: definition and instance lookup
//! - `Cost`: treasure and potion price
//!
//! ## Neutral Cards
//!
//! Supply cards and trashed cards have `owner: None`.

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardType, CardTypes, Cost};
pub use instance::Card;
pub use registry::CardLibrary;
