//! Game rules: validated move lists and the circular relation table.

mod moves;
mod relation;

pub use moves::MoveSet;
pub use relation::{Outcome, RelationTable};
