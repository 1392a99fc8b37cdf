pub mod catalog;
pub mod check;
pub mod definitions;
pub mod execute;
pub mod lookup;

pub use definitions::{Commands, StatusArg};
