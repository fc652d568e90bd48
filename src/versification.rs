use crate::error::MappingError;
use crate::verse::{Verse, VerseRange};
use std::fmt;

/// The catalog of a single scripture numbering system: which books exist,
/// how many chapters each has, and how many verses each chapter has
/// (including verse-0 conventions). This is an external collaborator: the
/// core never constructs or owns a `Versification`, only borrows one for
/// the lifetime of a `MappingTable` build or query.
///
/// Implementations are expected to be cheap to call repeatedly and
/// side-effect free; `MappingTable` treats a `&dyn Versification` as safe to
/// share across threads for reads once its own build has completed.
pub trait Versification: fmt::Debug {
    /// A human-readable name for this system, e.g. `"KJV"` or `"LXX"`.
    fn name(&self) -> &str;

    /// Step `n` verses forward from `verse`, honoring this system's own
    /// book/chapter boundaries (and verse-0 conventions). Errs if the step
    /// would run off the end of the catalog.
    fn add(&self, verse: &Verse, n: u32) -> Result<Verse, MappingError>;

    /// Step `n` verses backward from `verse`. Errs if the step would run off
    /// the start of the catalog.
    fn subtract(&self, verse: &Verse, n: u32) -> Result<Verse, MappingError>;

    /// Iterate `cardinality`-many verses starting at `start`, in this
    /// system's canonical order. Implementations should yield fewer than
    /// `cardinality` verses (rather than panic) if the range runs past the
    /// end of the catalog.
    fn iter_range<'a>(
        &'a self,
        start: &Verse,
        cardinality: u32,
    ) -> Box<dyn Iterator<Item = Verse> + 'a>;

    /// Parse an OSIS-style reference (`Book.Chap.Verse`, or a range
    /// `Book.Chap.Verse-Book.Chap.Verse`) under this system.
    fn parse_osis(&self, text: &str) -> Result<VerseRange, MappingError>;

    /// Emit an OSIS-style reference string for `range` under this system.
    fn render_osis(&self, range: &VerseRange) -> String;
}
