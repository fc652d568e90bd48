use crate::versification::Versification;
use serde::Serialize;
use std::sync::Arc;

/// Identifier for a book under some `Versification`. An `Arc<str>` rather than
/// a static index, since the book catalog is owned by an external, opaque
/// `Versification` and not a compiled-in static table, so verses carry their
/// book around by name. Cloning a `Verse` into several index buckets is then
/// a refcount bump, not an allocation.
pub type BookId = Arc<str>;

/// A single (book, chapter, verse-number) triple. Verse-number `0` is legal:
/// it denotes material that precedes verse 1 in some numbering traditions
/// (titles, Septuagint prologues).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Verse {
    pub book: BookId,
    pub chapter: u32,
    pub verse: u32,
}

impl Verse {
    #[must_use]
    pub fn new(book: impl Into<BookId>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

/// A contiguous pair (start `Verse`, cardinality >= 1) within one
/// `Versification`. Iteration yields `cardinality`-many verses in order.
///
/// A single verse is represented as a `VerseRange` of cardinality 1; there
/// is no separate "just a Verse" variant anywhere a `QualifiedKey` is
/// involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VerseRange {
    pub start: Verse,
    pub cardinality: u32,
}

impl VerseRange {
    /// # Panics
    /// Panics in debug builds if `cardinality == 0`; a range of cardinality 0
    /// is never a meaningful reference.
    #[must_use]
    pub fn new(start: Verse, cardinality: u32) -> Self {
        debug_assert!(cardinality >= 1, "VerseRange cardinality must be >= 1");
        Self { start, cardinality }
    }

    #[must_use]
    pub fn single(verse: Verse) -> Self {
        Self {
            start: verse,
            cardinality: 1,
        }
    }

    /// Iterate the `cardinality`-many verses of this range, in the canonical
    /// order of `versification`.
    pub fn iter<'a>(
        &self,
        versification: &'a (dyn Versification + 'a),
    ) -> impl Iterator<Item = Verse> + 'a {
        versification.iter_range(&self.start, self.cardinality)
    }
}

/// An ordered-by-canon set of verses, built by union. Order reflects the
/// order pieces were unioned in (each piece's internal order already
/// canonical, since it comes from a `VerseRange` iteration), so a
/// forward-bucket list built from this stays in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Passage {
    verses: Vec<Verse>,
}

impl Passage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, verse: Verse) {
        if !self.verses.contains(&verse) {
            self.verses.push(verse);
        }
    }

    pub fn union(&mut self, other: &Passage) {
        for v in &other.verses {
            self.insert(v.clone());
        }
    }

    #[must_use]
    pub fn contains(&self, verse: &Verse) -> bool {
        self.verses.contains(verse)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verse> {
        self.verses.iter()
    }

    /// Render this passage as an OSIS-style string under `versification`,
    /// collapsing maximal runs of consecutive verses into a single range.
    /// Runs are joined with `;`.
    #[must_use]
    pub fn to_osis(&self, versification: &dyn Versification) -> String {
        let mut runs: Vec<VerseRange> = Vec::new();

        for verse in &self.verses {
            let extends_last = runs.last().is_some_and(|run: &VerseRange| {
                let run_end_ordinal_successor = versification.add(
                    &versification
                        .iter_range(&run.start, run.cardinality)
                        .last()
                        .expect("non-empty range"),
                    1,
                );
                matches!(run_end_ordinal_successor, Ok(next) if &next == verse)
            });

            if extends_last {
                let last = runs.last_mut().expect("checked above");
                last.cardinality += 1;
            } else {
                runs.push(VerseRange::single(verse.clone()));
            }
        }

        runs.iter()
            .map(|r| versification.render_osis(r))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl FromIterator<Verse> for Passage {
    fn from_iter<T: IntoIterator<Item = Verse>>(iter: T) -> Self {
        let mut passage = Passage::new();
        for v in iter {
            passage.insert(v);
        }
        passage
    }
}
