use crate::error::MappingError;
use crate::key::QualifiedKey;
use crate::verse::Passage;
use crate::versification::Versification;

/// Thin adapter over an external OSIS parser. On top of whatever
/// `Versification::parse_osis` does, this strips a trailing `!part` token
/// and coerces a bare verse into a cardinality-1 range.
pub struct ReferenceParser<'v> {
    versification: &'v dyn Versification,
}

impl<'v> ReferenceParser<'v> {
    #[must_use]
    pub fn new(versification: &'v dyn Versification) -> Self {
        Self { versification }
    }

    /// Parse a single `ref_or_range` (`osisRef ('-' osisRef)? ('!' partTag)?`)
    /// into a `QualifiedKey::Present`.
    ///
    /// Known ambiguity: a part marker on the *start* of a range, e.g.
    /// `Gen.1.1!b-Gen.1.3`, is recognized by splitting at the *last* `!` in
    /// the text regardless of where any `-` falls. For `Gen.1.1!b-Gen.1.3`
    /// that yields body `"Gen.1.1"` (a single verse; the `-Gen.1.3` end is
    /// silently lost) and part `"b-Gen.1.3"`. This is a deliberate,
    /// verbatim preservation of that behavior rather than a fix.
    pub fn parse_present(&self, text: &str) -> Result<QualifiedKey, MappingError> {
        if text.is_empty() {
            return Err(MappingError::EmptyReference);
        }

        let (body, part) = split_part(text);
        if body.is_empty() {
            return Err(MappingError::EmptyReference);
        }

        let range = self
            .versification
            .parse_osis(body)
            .map_err(|_| MappingError::UnknownReference(text.to_string()))?;

        Ok(QualifiedKey::present(range, part))
    }

    /// `refList := ref_or_range (';' ref_or_range)*`, used by `?=…`
    /// absent-in-left entries.
    pub fn parse_ref_list(&self, text: &str) -> Result<Passage, MappingError> {
        let mut passage = Passage::new();
        let mut saw_any = false;

        for piece in text.split(';') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            saw_any = true;

            let qk = self.parse_present(piece)?;
            if let QualifiedKey::Present { key, .. } = qk {
                for v in key.iter(self.versification) {
                    passage.insert(v);
                }
            }
        }

        if !saw_any {
            return Err(MappingError::EmptyReference);
        }

        Ok(passage)
    }
}

/// Split `text` at its last `!`, if any. See `parse_present`'s doc comment
/// for the deliberate bug-compatible behavior this implements.
fn split_part(text: &str) -> (&str, Option<String>) {
    match text.rfind('!') {
        Some(idx) => {
            let (body, rest) = text.split_at(idx);
            (body, Some(rest[1..].to_string()))
        }
        None => (text, None),
    }
}
