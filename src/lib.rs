//! Bidirectional mapping between an arbitrary ("left") scripture
//! versification and a fixed pivot versification.
//!
//! The mapper is compiled once, from a declarative shorthand table (see
//! `EntryExpander` and `MappingTable::build`), into a pair of indices that
//! answer `map`/`unmap` queries without re-walking the source table. This
//! crate does not ship a versification catalog, an OSIS parser, or a
//! mapping-file loader: those are external collaborators a caller supplies
//! through the [`Versification`] trait and a stream of `(key, value)`
//! shorthand pairs.
//!
//! ```
//! # use versemap::{MappingTable, Verse, Versification};
//! # fn run(left: &dyn Versification, pivot: &dyn Versification) {
//! let table = MappingTable::build(left, pivot, vec![("Gen.1.1", "Gen.1.2")]);
//! let pivot_passage = table.map(&Verse::new("Gen", 1, 1));
//! assert!(!table.has_errors());
//! # let _ = pivot_passage;
//! # }
//! ```

mod absent;
mod diagnostics;
mod entry_expander;
mod error;
mod key;
mod offset;
mod reference_parser;
mod table;
mod verse;
mod versification;

#[cfg(test)]
mod fixture;

pub use crate::absent::AbsentSet;
pub use crate::diagnostics::{DiagnosticRecord, Diagnostics};
pub use crate::entry_expander::{EntryExpander, ExpandOutcome, Flag, ForwardWrite, ReverseWrite};
pub use crate::error::MappingError;
pub use crate::key::{QualifiedKey, PART_MARKER};
pub use crate::offset::OffsetResolver;
pub use crate::reference_parser::ReferenceParser;
pub use crate::table::MappingTable;
pub use crate::verse::{BookId, Passage, Verse, VerseRange};
pub use crate::versification::Versification;
