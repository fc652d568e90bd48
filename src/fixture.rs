//! Test-only `Versification` implementations. The versification catalog is
//! an external collaborator this crate does not ship; these fixtures are a
//! small, concrete stand-in good enough to exercise every rule in
//! `EntryExpander`/`MappingTable` against.
#![cfg(test)]

use crate::error::MappingError;
use crate::verse::{Verse, VerseRange};
use crate::versification::Versification;
use std::collections::BTreeMap;

/// Chapters are stored as `(min_verse, max_verse)` inclusive, so a chapter
/// with a verse-0 convention just has `min_verse == 0`.
#[derive(Debug)]
pub struct FixtureVersification {
    name: &'static str,
    book_order: Vec<&'static str>,
    books: BTreeMap<&'static str, BTreeMap<u32, (u32, u32)>>,
}

impl FixtureVersification {
    fn chapter_bounds(&self, book: &str, chapter: u32) -> Option<(u32, u32)> {
        self.books.get(book).and_then(|c| c.get(&chapter)).copied()
    }

    fn book_index(&self, book: &str) -> Option<usize> {
        self.book_order.iter().position(|b| *b == book)
    }

    /// Global ordinal of `verse`, counting every verse of every prior book
    /// and chapter.
    fn ordinal(&self, verse: &Verse) -> Option<i64> {
        let book_idx = self.book_index(&verse.book)?;
        let mut ordinal: i64 = 0;

        for &book in &self.book_order[..book_idx] {
            let chapters = self.books.get(book)?;
            for (_, (min, max)) in chapters {
                ordinal += i64::from(max - min + 1);
            }
        }

        let chapters = self.books.get(self.book_order[book_idx])?;
        for (&chap, (min, max)) in chapters {
            if chap < verse.chapter {
                ordinal += i64::from(max - min + 1);
            }
        }

        let (min, max) = self.chapter_bounds(&verse.book, verse.chapter)?;
        if verse.verse < min || verse.verse > max {
            return None;
        }
        ordinal += i64::from(verse.verse - min);

        Some(ordinal)
    }

    fn from_ordinal(&self, mut ordinal: i64) -> Option<Verse> {
        if ordinal < 0 {
            return None;
        }

        for &book in &self.book_order {
            let chapters = self.books.get(book)?;
            for (&chap, (min, max)) in chapters {
                let count = i64::from(max - min + 1);
                if ordinal < count {
                    let verse = min + ordinal as u32;
                    return Some(Verse::new(book, chap, verse));
                }
                ordinal -= count;
            }
        }

        None
    }
}

impl Versification for FixtureVersification {
    fn name(&self) -> &str {
        self.name
    }

    fn add(&self, verse: &Verse, n: u32) -> Result<Verse, MappingError> {
        let ordinal = self
            .ordinal(verse)
            .ok_or_else(|| MappingError::UnknownReference(format!("{:?}", verse)))?;
        self.from_ordinal(ordinal + i64::from(n))
            .ok_or_else(|| MappingError::UnknownReference(format!("{:?} + {}", verse, n)))
    }

    fn subtract(&self, verse: &Verse, n: u32) -> Result<Verse, MappingError> {
        let ordinal = self
            .ordinal(verse)
            .ok_or_else(|| MappingError::UnknownReference(format!("{:?}", verse)))?;
        self.from_ordinal(ordinal - i64::from(n))
            .ok_or_else(|| MappingError::UnknownReference(format!("{:?} - {}", verse, n)))
    }

    fn iter_range<'a>(
        &'a self,
        start: &Verse,
        cardinality: u32,
    ) -> Box<dyn Iterator<Item = Verse> + 'a> {
        let start_ordinal = match self.ordinal(start) {
            Some(o) => o,
            None => return Box::new(std::iter::empty()),
        };

        Box::new(
            (0..i64::from(cardinality)).filter_map(move |i| self.from_ordinal(start_ordinal + i)),
        )
    }

    fn parse_osis(&self, text: &str) -> Result<VerseRange, MappingError> {
        let mut sides = text.splitn(2, '-');
        let first = sides
            .next()
            .ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;
        let start = parse_single(first).ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;
        self.chapter_bounds(&start.book, start.chapter)
            .filter(|(min, max)| start.verse >= *min && start.verse <= *max)
            .ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;

        match sides.next() {
            None => Ok(VerseRange::single(start)),
            Some(second) => {
                let end = parse_single(second)
                    .ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;
                let start_ord = self
                    .ordinal(&start)
                    .ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;
                let end_ord = self
                    .ordinal(&end)
                    .ok_or_else(|| MappingError::UnknownReference(text.to_string()))?;
                if end_ord < start_ord {
                    return Err(MappingError::UnknownReference(text.to_string()));
                }
                let cardinality = (end_ord - start_ord + 1) as u32;
                Ok(VerseRange::new(start, cardinality))
            }
        }
    }

    fn render_osis(&self, range: &VerseRange) -> String {
        if range.cardinality == 1 {
            return render_single(&range.start);
        }
        let end = self
            .add(&range.start, range.cardinality - 1)
            .expect("render_osis called with a range valid under this versification");
        format!("{}-{}", render_single(&range.start), render_single(&end))
    }
}

fn parse_single(text: &str) -> Option<Verse> {
    let mut parts = text.splitn(3, '.');
    let book = parts.next()?;
    let chapter: u32 = parts.next()?.parse().ok()?;
    let verse: u32 = parts.next()?.parse().ok()?;
    Some(Verse::new(book, chapter, verse))
}

fn render_single(v: &Verse) -> String {
    format!("{}.{}.{}", v.book, v.chapter, v.verse)
}

/// The "left" (source) versification used across tests: has verse-0 in a
/// couple of chapters (Ps.3, Ps.19) that the pivot doesn't, exercising the
/// verse-0 elision rule.
pub fn left_fixture() -> FixtureVersification {
    let mut gen = BTreeMap::new();
    gen.insert(1, (1, 5));

    let mut ps = BTreeMap::new();
    ps.insert(3, (0, 2));
    ps.insert(18, (1, 50));
    ps.insert(19, (0, 2));

    let mut books = BTreeMap::new();
    books.insert("Gen", gen);
    books.insert("Ps", ps);

    FixtureVersification {
        name: "left",
        book_order: vec!["Gen", "Ps"],
        books,
    }
}

/// The "pivot" (KJV-like) versification: no verse-0 in Ps.3 (exercising
/// cardinality mismatch by exactly one), but does carry verse-0 in Ps.19
/// (exercising the offset scenario where the pivot side of the shift does
/// have a verse 0).
pub fn pivot_fixture() -> FixtureVersification {
    let mut gen = BTreeMap::new();
    gen.insert(1, (1, 6));

    let mut ps = BTreeMap::new();
    ps.insert(3, (1, 2));
    ps.insert(18, (1, 50));
    ps.insert(19, (0, 2));

    let mut books = BTreeMap::new();
    books.insert("Gen", gen);
    books.insert("Ps", ps);

    FixtureVersification {
        name: "pivot",
        book_order: vec!["Gen", "Ps"],
        books,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_crosses_chapter_boundary() {
        let p = pivot_fixture();
        let v = Verse::new("Ps", 19, 0);
        assert_eq!(p.subtract(&v, 1).unwrap(), Verse::new("Ps", 18, 50));
    }

    #[test]
    fn parse_and_render_round_trip() {
        let l = left_fixture();
        let range = l.parse_osis("Gen.1.1-Gen.1.3").unwrap();
        assert_eq!(range.cardinality, 3);
        assert_eq!(l.render_osis(&range), "Gen.1.1-Gen.1.3");
    }

    #[test]
    fn iter_range_yields_cardinality_many() {
        let l = left_fixture();
        let verses: Vec<_> = l.iter_range(&Verse::new("Ps", 3, 0), 3).collect();
        assert_eq!(
            verses,
            vec![
                Verse::new("Ps", 3, 0),
                Verse::new("Ps", 3, 1),
                Verse::new("Ps", 3, 2),
            ]
        );
    }

    #[test]
    fn parse_osis_rejects_out_of_range_verse() {
        let p = pivot_fixture();
        assert!(p.parse_osis("Ps.3.0").is_err());
    }
}
