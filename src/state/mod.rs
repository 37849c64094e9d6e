// Keygate — State Module
//
// Persistence for the keyring state snapshot. The router never touches
// this directly; it is consumed once by the backend accessor on first
// use and by the backend after each mutation.

mod error;
mod store;

pub use error::StateError;
pub use store::{FileStateStore, StateStore};
