pub mod selection;
pub mod text_input;

pub use selection::Selection;
pub use text_input::{InputOutcome, TextInputState};
