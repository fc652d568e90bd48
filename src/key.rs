use crate::verse::VerseRange;
use crate::versification::Versification;
use serde::Serialize;

/// Marker character delimiting a sub-verse part tag, e.g. `!a`. Chosen (by
/// the shorthand format this mirrors) because `#` collides with comment
/// syntax in properties-style mapping files.
pub const PART_MARKER: char = '!';

/// A reference plus a qualifier: a real mapping, or one of two "absent"
/// cases, modeled as a proper Rust enum rather than a discriminator field
/// with nullable members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum QualifiedKey {
    /// A real reference, possibly annotated with a sub-verse part tag. The
    /// part is stored without its `!` marker (`Some("a")`, not
    /// `Some("!a")`); the marker is added back in when rendering.
    Present {
        key: VerseRange,
        part: Option<String>,
    },

    /// This key denotes pivot material with no counterpart in the left
    /// system. The associated pivot passage flows into the `AbsentSet`
    /// rather than a reverse-index bucket a query could ever reach.
    AbsentInLeft,

    /// This key denotes material in the left system with no pivot
    /// counterpart. The literal section name from the mapping entry is
    /// preserved so it can be rendered back out.
    AbsentInPivot { section_name: String },
}

impl QualifiedKey {
    #[must_use]
    pub fn present(key: VerseRange, part: Option<String>) -> Self {
        Self::Present { key, part }
    }

    /// The same key with its part tag stripped, used to build the generic
    /// (no-part) reverse-index bucket alongside a part-qualified one.
    #[must_use]
    pub fn without_part(&self) -> Self {
        match self {
            Self::Present { key, .. } => Self::Present {
                key: key.clone(),
                part: None,
            },
            other => other.clone(),
        }
    }

    #[must_use]
    pub fn part(&self) -> Option<&str> {
        match self {
            Self::Present { part, .. } => part.as_deref(),
            _ => None,
        }
    }

    /// Render this key: `AbsentInPivot` renders as the literal section
    /// name; `Present` with a part renders as `OSIS!part`; a bare `Present`
    /// key renders as just the OSIS text. `AbsentInLeft` renders as an
    /// empty string. It is never a forward-index value in a well-formed
    /// mapper, so callers should not normally encounter it here.
    #[must_use]
    pub fn render(&self, versification: &dyn Versification) -> String {
        match self {
            Self::Present { key, part: None } => versification.render_osis(key),
            Self::Present {
                key,
                part: Some(part),
            } => format!(
                "{}{}{}",
                versification.render_osis(key),
                PART_MARKER,
                part
            ),
            Self::AbsentInPivot { section_name } => section_name.clone(),
            Self::AbsentInLeft => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::pivot_fixture;
    use crate::verse::Verse;

    #[test]
    fn render_present_without_part() {
        let v = pivot_fixture();
        let qk = QualifiedKey::present(VerseRange::single(Verse::new("Gen", 1, 2)), None);
        assert_eq!(qk.render(&v), "Gen.1.2");
    }

    #[test]
    fn render_present_with_part() {
        let v = pivot_fixture();
        let qk = QualifiedKey::present(
            VerseRange::single(Verse::new("Gen", 1, 1)),
            Some("a".to_string()),
        );
        assert_eq!(qk.render(&v), "Gen.1.1!a");
    }

    #[test]
    fn render_absent_in_pivot() {
        let v = pivot_fixture();
        let qk = QualifiedKey::AbsentInPivot {
            section_name: "Colophon".to_string(),
        };
        assert_eq!(qk.render(&v), "Colophon");
    }

    #[test]
    fn without_part_strips_tag() {
        let qk = QualifiedKey::present(
            VerseRange::single(Verse::new("Gen", 1, 1)),
            Some("a".to_string()),
        );
        assert_eq!(qk.without_part().part(), None);
    }
}
