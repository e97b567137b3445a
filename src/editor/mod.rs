//! Text editing buffer.
//!
//! The [`EditorBuffer`] owns the document text (a rope), the cursor, and
//! the optional selection — the editing surface the line commands and the
//! centering action operate on.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer, Selection};
