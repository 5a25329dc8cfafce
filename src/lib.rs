//! Skein: a parsing front end for a knot-and-stitch narrative scripting
//! language.
//!
//! Source text goes in; a [`Story`] tree and a list of diagnostics come out.
//! The parser is backtracking recursive descent over explicit rule
//! transactions, and it keeps going after errors so one pass reports as many
//! problems as it can.
//!
//! ```
//! let outcome = skein::parse("== start ==\nHello, world.\n-> END\n");
//! let story = outcome.story.expect("valid story");
//! assert!(story.knot("start").is_some());
//! ```

pub mod ast;
pub mod cli;
pub mod errors;
pub mod syntax;

pub use ast::{Node, Story};
pub use errors::{Result, SkeinError};
pub use syntax::{parse, parse_with_options, ParseOutcome, ParserOptions};
