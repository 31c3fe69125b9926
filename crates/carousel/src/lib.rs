//! Infinite carousel selection over a deck of store cards.
//!
//! The [`selector::CarouselSelector`] owns a [`wrapped::WrappedList`] and
//! drives the "spin and settle" pick. Items come from the [`loader`] via a
//! [`bundle::Bundle`] of read-only resource files.

pub mod bundle;
pub mod cards;
pub mod item;
pub mod loader;
pub mod macros;
pub mod selector;
pub mod source;
pub mod wrapped;

pub use bundle::Bundle;
pub use cards::{CardDeck, CardFace, CardState, LabelVisibility};
pub use item::{Coordinates, Description, FileName, Item, ItemId, StoreName};
pub use loader::LoadError;
pub use selector::{CarouselSelector, SpinConfig, SpinPlan, SpinStep};
pub use source::{DataFormat, DataSource, MapOverlay};
pub use wrapped::WrappedList;
