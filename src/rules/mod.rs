//! Rule collaborators the engine consults but does not own.
//!
//! - `PriceRules`: what a card costs a player, and whether it may be bought
//! - `StandardPrices`: printed cost plus the match's price overrides

pub mod price;

pub use price::{PriceResult, PriceRules, StandardPrices};
