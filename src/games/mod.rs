//! Card sets built on the engine.
//!
//! These are worked examples of wiring card behaviour through the public
//! API. The engine itself knows nothing about any of them.

pub mod base;
