//! Text helpers shared by the parser and the output sinks.
//!
//! Feed content is untrusted: titles may carry terminal escape sequences or
//! embedded line breaks that would corrupt console output or split a report
//! line in two.

mod text;

pub use text::{single_line, strip_control_chars};
