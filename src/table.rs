use crate::absent::AbsentSet;
use crate::diagnostics::Diagnostics;
use crate::entry_expander::{EntryExpander, ExpandOutcome, Flag};
use crate::error::MappingError;
use crate::key::QualifiedKey;
use crate::reference_parser::ReferenceParser;
use crate::verse::{Passage, Verse, VerseRange};
use crate::versification::Versification;
use std::collections::HashMap;
use std::sync::Mutex;

/// Holds the compiled forward and reverse indices and answers `map`/`unmap`
/// queries. Built once from an opaque `Versification` pair and an ordered
/// stream of shorthand `(key, value)` pairs; logically immutable afterward
/// except for the query-time diagnostics log.
pub struct MappingTable<'v> {
    left_versification: &'v dyn Versification,
    pivot_versification: &'v dyn Versification,
    forward: HashMap<Verse, Vec<QualifiedKey>>,
    reverse: HashMap<QualifiedKey, Passage>,
    absent: AbsentSet,
    zeros_unmapped: bool,
    build_diagnostics: Diagnostics,
    query_diagnostics: Mutex<Vec<String>>,
}

impl<'v> MappingTable<'v> {
    /// Build a `MappingTable` from an ordered stream of already-tokenized
    /// shorthand `(key, value)` pairs. Individual entry failures are
    /// captured in diagnostics and do not abort the build; the only caller
    /// error this does not tolerate is handing in versification handles
    /// that are internally inconsistent, which is not something this
    /// constructor can detect. It trusts the caller.
    pub fn build<I, K, V>(
        left_versification: &'v dyn Versification,
        pivot_versification: &'v dyn Versification,
        entries: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let expander = EntryExpander::new(left_versification, pivot_versification);
        let mut forward: HashMap<Verse, Vec<QualifiedKey>> = HashMap::new();
        let mut reverse: HashMap<QualifiedKey, Passage> = HashMap::new();
        let mut absent = AbsentSet::new();
        let mut zeros_unmapped = false;
        let mut diagnostics = Diagnostics::new();

        for (index, (key, value)) in entries.into_iter().enumerate() {
            let key = key.as_ref();
            let value = value.as_ref();

            match expander.expand(key, value) {
                Ok(ExpandOutcome::Flag(Flag::ZerosUnmapped)) => zeros_unmapped = true,
                Ok(ExpandOutcome::AbsentLeft { pivot_passage }) => {
                    absent.add_passage(&pivot_passage);
                }
                Ok(ExpandOutcome::Relations { forward: fw, reverse: rv }) => {
                    for write in fw {
                        forward.entry(write.left).or_default().push(write.pivot);
                    }
                    for write in rv {
                        let has_part = write.pivot.part().is_some();
                        reverse
                            .entry(write.pivot.clone())
                            .or_default()
                            .insert(write.left.clone());
                        if has_part {
                            reverse
                                .entry(write.pivot.without_part())
                                .or_default()
                                .insert(write.left);
                        }
                    }
                }
                Err(e) => {
                    diagnostics.record_build_failure(index, format!("{}={}", key, value), e);
                }
            }
        }

        Self {
            left_versification,
            pivot_versification,
            forward,
            reverse,
            absent,
            zeros_unmapped,
            build_diagnostics: diagnostics,
            query_diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// `true` iff any entry failed to compile.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.build_diagnostics.has_errors()
    }

    #[must_use]
    pub fn build_diagnostics(&self) -> &Diagnostics {
        &self.build_diagnostics
    }

    /// Fallback failures logged during `map`/`unmap`'s best-effort OSIS
    /// translation path. Never affects `has_errors`.
    #[must_use]
    pub fn query_diagnostics(&self) -> Vec<String> {
        self.query_diagnostics
            .lock()
            .expect("query diagnostics mutex poisoned")
            .clone()
    }

    fn record_query_failure(&self, context: impl Into<String>, error: impl std::fmt::Display) {
        if let Ok(mut log) = self.query_diagnostics.lock() {
            log.push(format!("{}: {}", context.into(), error));
        }
    }

    /// Forward lookup: translate a single left verse into the set of
    /// equivalent pivot verses.
    #[must_use]
    pub fn map(&self, left_key: &Verse) -> Passage {
        if let Some(keys) = self.forward.get(left_key) {
            let mut passage = Passage::new();
            for qk in keys {
                if let QualifiedKey::Present { key, .. } = qk {
                    for v in key.iter(self.pivot_versification) {
                        passage.insert(v);
                    }
                }
                // AbsentInPivot contributes nothing to a Passage result.
            }
            return passage;
        }

        if self.zeros_unmapped && left_key.verse == 0 {
            return Passage::new();
        }

        self.translate_via_osis(left_key, self.left_versification, self.pivot_versification)
    }

    /// Same as `map` but preserves part tags and absent-section names, for
    /// rendering.
    #[must_use]
    pub fn map_to_qualified(&self, left_key: &Verse) -> Vec<QualifiedKey> {
        if let Some(keys) = self.forward.get(left_key) {
            return keys.clone();
        }

        if self.zeros_unmapped && left_key.verse == 0 {
            return Vec::new();
        }

        self.translate_via_osis(left_key, self.left_versification, self.pivot_versification)
            .iter()
            .map(|v| QualifiedKey::present(VerseRange::single(v.clone()), None))
            .collect()
    }

    /// Reverse lookup: translate a single pivot verse into the set of
    /// equivalent left references.
    #[must_use]
    pub fn unmap(&self, pivot_key: &Verse) -> Passage {
        self.unmap_qualified(&QualifiedKey::present(
            VerseRange::single(pivot_key.clone()),
            None,
        ))
    }

    /// The general form of `unmap`, operating on a `QualifiedKey` so a part
    /// tag from a parsed OSIS string (e.g. via `unmap_to_string`) can
    /// participate in the part-then-generic retry below.
    #[must_use]
    pub fn unmap_qualified(&self, pivot_key: &QualifiedKey) -> Passage {
        if let Some(passage) = self.reverse.get(pivot_key) {
            return passage.clone();
        }

        if pivot_key.part().is_some() {
            let generic = pivot_key.without_part();
            if let Some(passage) = self.reverse.get(&generic) {
                return passage.clone();
            }
        }

        if let QualifiedKey::Present { key, .. } = pivot_key {
            if key.cardinality == 1 {
                let verse = &key.start;
                if self.zeros_unmapped && verse.verse == 0 {
                    return Passage::new();
                }
                if self.absent.contains(verse) {
                    return Passage::new();
                }
                return self.translate_via_osis(
                    verse,
                    self.pivot_versification,
                    self.left_versification,
                );
            }
        }

        Passage::new()
    }

    /// Best-effort OSIS translation: re-render `verse`'s OSIS text under
    /// `source` and re-parse it under `target`. Failure is non-fatal; it
    /// produces an empty passage and is logged to query diagnostics.
    fn translate_via_osis(
        &self,
        verse: &Verse,
        source: &dyn Versification,
        target: &dyn Versification,
    ) -> Passage {
        let osis_text = source.render_osis(&VerseRange::single(verse.clone()));
        match target.parse_osis(&osis_text) {
            Ok(range) => range.iter(target).collect(),
            Err(e) => {
                self.record_query_failure(format!("translateViaOsis({})", osis_text), e);
                Passage::new()
            }
        }
    }

    /// String form of `map`: parse `osis` under the left versification,
    /// require it to denote a single verse, map it, and render the result
    /// under the pivot versification.
    pub fn map_to_string(&self, osis: &str) -> Result<String, MappingError> {
        let range = self.left_versification.parse_osis(osis)?;
        if range.cardinality != 1 {
            return Err(MappingError::UnsupportedMultiVerseLookup(
                range.cardinality as usize,
            ));
        }
        let passage = self.map(&range.start);
        Ok(passage.to_osis(self.pivot_versification))
    }

    /// String form of `mapToQualified`: entries join with a single space.
    pub fn map_to_qualified_string(&self, osis: &str) -> Result<String, MappingError> {
        let range = self.left_versification.parse_osis(osis)?;
        if range.cardinality != 1 {
            return Err(MappingError::UnsupportedMultiVerseLookup(
                range.cardinality as usize,
            ));
        }
        let keys = self.map_to_qualified(&range.start);
        Ok(keys
            .iter()
            .map(|k| k.render(self.pivot_versification))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// String form of `unmap`. Honors a part marker in `osis` (e.g.
    /// `Gen.1.1!a`), feeding it through `unmap_qualified`'s part-then-generic
    /// retry.
    pub fn unmap_to_string(&self, osis: &str) -> Result<String, MappingError> {
        let parser = ReferenceParser::new(self.pivot_versification);
        let qualified = parser.parse_present(osis)?;
        let cardinality = match &qualified {
            QualifiedKey::Present { key, .. } => key.cardinality,
            _ => 1,
        };
        if cardinality != 1 {
            return Err(MappingError::UnsupportedMultiVerseLookup(
                cardinality as usize,
            ));
        }
        let passage = self.unmap_qualified(&qualified);
        Ok(passage.to_osis(self.left_versification))
    }
}
