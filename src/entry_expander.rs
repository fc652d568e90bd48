use crate::error::MappingError;
use crate::key::QualifiedKey;
use crate::offset::OffsetResolver;
use crate::reference_parser::ReferenceParser;
use crate::verse::{Passage, Verse, VerseRange};
use crate::versification::Versification;

/// The one global shorthand flag the grammar recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    ZerosUnmapped,
}

impl Flag {
    fn from_name(name: &str) -> Result<Self, MappingError> {
        match name {
            "zerosUnmapped" => Ok(Self::ZerosUnmapped),
            other => Err(MappingError::UnknownFlag(other.to_string())),
        }
    }
}

/// A single `(left_verse, pivot_qualified_key)` pair to be appended to the
/// forward index's bucket for `left_verse`.
#[derive(Debug, Clone)]
pub struct ForwardWrite {
    pub left: Verse,
    pub pivot: QualifiedKey,
}

/// A single `left_verse` to be unioned into the reverse index's bucket for
/// `pivot`. `MappingTable` is responsible for also writing the generic
/// (no-part) bucket when `pivot` carries a part: that's a property of all
/// reverse writes, not something `EntryExpander` needs to decide per-case.
#[derive(Debug, Clone)]
pub struct ReverseWrite {
    pub pivot: QualifiedKey,
    pub left: Verse,
}

/// What expanding one shorthand entry produced.
#[derive(Debug)]
pub enum ExpandOutcome {
    /// `!flagName`: a global flag, not a mapping.
    Flag(Flag),
    /// `?=refList`: every verse in `pivot_passage` is absent from the left
    /// system.
    AbsentLeft { pivot_passage: Passage },
    /// One or more `(left, pivot)` relations to write into the indices.
    Relations {
        forward: Vec<ForwardWrite>,
        reverse: Vec<ReverseWrite>,
    },
}

/// Expands one shorthand entry (`left = right`) into the atomic relations
/// that entry denotes. This is the hard part of the mapper: cardinality
/// reconciliation between the two sides and the verse-0 elision heuristic.
pub struct EntryExpander<'v> {
    left_versification: &'v dyn Versification,
    pivot_versification: &'v dyn Versification,
}

impl<'v> EntryExpander<'v> {
    #[must_use]
    pub fn new(
        left_versification: &'v dyn Versification,
        pivot_versification: &'v dyn Versification,
    ) -> Self {
        Self {
            left_versification,
            pivot_versification,
        }
    }

    pub fn expand(&self, left_text: &str, pivot_text: &str) -> Result<ExpandOutcome, MappingError> {
        let left_text = left_text.trim();
        let pivot_text = pivot_text.trim();

        // Step 1: classify. A leading '!' on the left side is a global flag,
        // not a mapping at all.
        if let Some(name) = left_text.strip_prefix('!') {
            return Ok(ExpandOutcome::Flag(Flag::from_name(name)?));
        }

        // `?=refList`: every one of those pivot refs is absent in the left
        // system.
        if left_text == "?" {
            let parser = ReferenceParser::new(self.pivot_versification);
            let pivot_passage = parser.parse_ref_list(pivot_text)?;
            return Ok(ExpandOutcome::AbsentLeft { pivot_passage });
        }

        // '?' is only meaningful as the sole left-hand side of an
        // absent-in-left entry; anywhere else it's malformed input.
        if left_text.starts_with('?') {
            return Err(MappingError::UnsupportedAbsentLeftPosition);
        }

        // Step 2: parse left as a real reference.
        let left_parser = ReferenceParser::new(self.left_versification);
        let left_key = left_parser.parse_present(left_text)?;

        // Step 3: parse pivot, with the left key available as an offset
        // basis.
        let pivot_key = self.parse_pivot(pivot_text, &left_key)?;

        // Step 4: route by shape.
        let left_range = match &left_key {
            QualifiedKey::Present { key, .. } => key,
            _ => unreachable!("left_key is always Present after step 2"),
        };

        if left_range.cardinality == 1 {
            Ok(self.expand_one_to_many(left_range.start.clone(), pivot_key))
        } else {
            self.expand_many_to_many(left_range, pivot_key)
        }
    }

    fn parse_pivot(&self, text: &str, basis: &QualifiedKey) -> Result<QualifiedKey, MappingError> {
        if let Some(name) = text.strip_prefix('?') {
            return Ok(QualifiedKey::AbsentInPivot {
                section_name: name.to_string(),
            });
        }

        if let Some(digits) = text.strip_prefix('+') {
            let n: i64 = digits
                .trim()
                .parse()
                .map_err(|_| MappingError::UnknownReference(text.to_string()))?;
            return OffsetResolver::resolve(basis, n, self.pivot_versification);
        }

        if let Some(digits) = text.strip_prefix('-') {
            let n: i64 = digits
                .trim()
                .parse()
                .map_err(|_| MappingError::UnknownReference(text.to_string()))?;
            return OffsetResolver::resolve(basis, -n, self.pivot_versification);
        }

        let parser = ReferenceParser::new(self.pivot_versification);
        parser.parse_present(text)
    }

    /// A left side of cardinality 1 mapped against a pivot side that may
    /// itself span multiple verses.
    fn expand_one_to_many(&self, left_verse: Verse, pivot: QualifiedKey) -> ExpandOutcome {
        let mut forward = vec![ForwardWrite {
            left: left_verse.clone(),
            pivot: pivot.clone(),
        }];
        let mut reverse = Vec::new();

        match &pivot {
            QualifiedKey::AbsentInPivot { .. } => {
                reverse.push(ReverseWrite {
                    pivot: pivot.clone(),
                    left: left_verse,
                });
            }
            QualifiedKey::Present { key, .. } if key.cardinality == 1 => {
                reverse.push(ReverseWrite {
                    pivot: pivot.clone(),
                    left: left_verse,
                });
            }
            QualifiedKey::Present { key, part } => {
                for pivot_verse in key.iter(self.pivot_versification) {
                    reverse.push(ReverseWrite {
                        pivot: QualifiedKey::present(VerseRange::single(pivot_verse), part.clone()),
                        left: left_verse.clone(),
                    });
                }
            }
            QualifiedKey::AbsentInLeft => unreachable!("pivot side is never AbsentInLeft"),
        }

        ExpandOutcome::Relations { forward, reverse }
    }

    /// Both sides span more than one verse; reconcile their cardinalities
    /// by exact zip, many-to-one collapse, or verse-0 elision.
    fn expand_many_to_many(
        &self,
        left_range: &VerseRange,
        pivot: QualifiedKey,
    ) -> Result<ExpandOutcome, MappingError> {
        let l = left_range.cardinality;
        let (p, pivot_range) = match &pivot {
            QualifiedKey::AbsentInPivot { .. } => (1u32, None),
            QualifiedKey::Present { key, .. } => (key.cardinality, Some(key.clone())),
            QualifiedKey::AbsentInLeft => unreachable!("pivot side is never AbsentInLeft"),
        };

        let mut forward = Vec::new();
        let mut reverse = Vec::new();

        if p == 1 {
            // many -> 1: every left verse maps to the same pivot key.
            for left_verse in left_range.iter(self.left_versification) {
                forward.push(ForwardWrite {
                    left: left_verse.clone(),
                    pivot: pivot.clone(),
                });
                reverse.push(ReverseWrite {
                    pivot: pivot.clone(),
                    left: left_verse,
                });
            }
            return Ok(ExpandOutcome::Relations { forward, reverse });
        }

        let diff = (i64::from(l) - i64::from(p)).unsigned_abs();
        if diff > 1 {
            return Err(MappingError::CardinalityMismatch {
                left: l as usize,
                pivot: p as usize,
            });
        }

        let lefts: Vec<Verse> = left_range.iter(self.left_versification).collect();
        let pivots: Vec<Verse> = pivot_range
            .expect("p != 1 implies a Present pivot range")
            .iter(self.pivot_versification)
            .collect();

        if diff == 0 {
            // Strict pairwise zip.
            for (left_verse, pivot_verse) in lefts.into_iter().zip(pivots.into_iter()) {
                let pivot_key = QualifiedKey::present(VerseRange::single(pivot_verse), None);
                forward.push(ForwardWrite {
                    left: left_verse.clone(),
                    pivot: pivot_key.clone(),
                });
                reverse.push(ReverseWrite {
                    pivot: pivot_key,
                    left: left_verse,
                });
            }
        } else {
            // Verse-0 elision: walk both sides, skipping any verse numbered
            // 0 on either side (left checked first at each step) so the
            // remaining sequences align pairwise.
            let mut li = 0usize;
            let mut pi = 0usize;

            while li < lefts.len() && pi < pivots.len() {
                if lefts[li].verse == 0 {
                    li += 1;
                    continue;
                }
                if pivots[pi].verse == 0 {
                    pi += 1;
                    continue;
                }

                let left_verse = lefts[li].clone();
                let pivot_verse = pivots[pi].clone();
                let pivot_key = QualifiedKey::present(VerseRange::single(pivot_verse), None);
                forward.push(ForwardWrite {
                    left: left_verse.clone(),
                    pivot: pivot_key.clone(),
                });
                reverse.push(ReverseWrite {
                    pivot: pivot_key,
                    left: left_verse,
                });

                li += 1;
                pi += 1;
            }
        }

        Ok(ExpandOutcome::Relations { forward, reverse })
    }
}
