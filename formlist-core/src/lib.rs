//! formlist-core - Entry Model and Ordered-List Editor
//!
//! Pure data structures and list algorithms with no I/O. The other crates
//! depend on this: `formlist-store` for the configuration-store boundary,
//! `formlist-builder` for the fluent editing session.

pub mod entry;
pub mod error;
pub mod list;
pub mod position;

pub use entry::{Entry, DIV_MARKER, PALETTE_MARKER};
pub use error::{FormListError, FormListResult, StoreError};
pub use list::ShowItemList;
pub use position::{insert_positioned, Direction, Placement, Position};
