use crate::error::MappingError;
use crate::key::QualifiedKey;
use crate::verse::VerseRange;
use crate::versification::Versification;

/// Interprets `+N`/`-N` pivot-side shorthand against a previously-parsed
/// left-side basis key.
pub struct OffsetResolver;

impl OffsetResolver {
    /// `basis` is the left side's already-parsed `QualifiedKey`; `offset` is
    /// the signed integer parsed from `+N`/`-N`. `target` is the pivot
    /// `Versification` the resolved range lives in.
    ///
    /// A multi-range basis (a `Passage` rather than a single `VerseRange`)
    /// can't arise here at all: `QualifiedKey::Present`'s inner key is
    /// always a single `VerseRange` (even a bare verse is coerced into a
    /// cardinality-1 range), and the left-hand side of an offset entry is
    /// always one contiguous reference, never a semicolon-joined list. So
    /// the only basis shapes that reach this function are `Present` (a
    /// real range) or one of the two absent variants, which fail with
    /// `OffsetWithoutBasis` below.
    pub fn resolve(
        basis: &QualifiedKey,
        offset: i64,
        target: &dyn Versification,
    ) -> Result<QualifiedKey, MappingError> {
        let basis_range = match basis {
            QualifiedKey::Present { key, .. } => key,
            QualifiedKey::AbsentInLeft | QualifiedKey::AbsentInPivot { .. } => {
                return Err(MappingError::OffsetWithoutBasis);
            }
        };

        if basis_range.cardinality == 0 {
            return Err(MappingError::OffsetWithoutBasis);
        }

        let start = if offset >= 0 {
            target.add(&basis_range.start, offset as u32)?
        } else {
            target.subtract(&basis_range.start, (-offset) as u32)?
        };

        let resolved = VerseRange::new(start, basis_range.cardinality);
        Ok(QualifiedKey::present(resolved, None))
    }
}
