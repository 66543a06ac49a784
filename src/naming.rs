//! Centralized filename parsing for the Dockerfile naming convention.
//!
//! A module may ship its build files under either side of a symmetric
//! convention: `Dockerfile.test` and `test.Dockerfile` carry the same
//! meaning. This module provides the single classification function the
//! scanner and the target deriver both rely on, so the two never disagree
//! about what counts as a build file.
//!
//! ## Accepted shapes
//!
//! - `Dockerfile` — the bare default build file
//! - `Dockerfile.<seg>(.<seg>)*` — purpose after the keyword
//! - `<seg>(.<seg>)*.Dockerfile` — purpose before the keyword
//!
//! Each `<seg>` must be nonempty and restricted to alphanumerics,
//! underscore, and hyphen. Multiple segments join with `-` to form the
//! purpose: `Dockerfile.a.b` → purpose `a-b`.

/// How a build-file name encodes its purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFileKind {
    /// Plain `Dockerfile`, no purpose.
    Bare,
    /// `Dockerfile.<purpose>` — purpose segments after the keyword.
    Suffixed(String),
    /// `<purpose>.Dockerfile` — purpose segments before the keyword.
    Prefixed(String),
}

impl BuildFileKind {
    /// Purpose string with segments joined by `-`. Empty for [`BuildFileKind::Bare`].
    pub fn purpose(&self) -> &str {
        match self {
            BuildFileKind::Bare => "",
            BuildFileKind::Suffixed(p) | BuildFileKind::Prefixed(p) => p,
        }
    }
}

fn valid_segment(seg: &str) -> bool {
    !seg.is_empty()
        && seg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Classify a filename against the build-file naming convention.
///
/// Returns `None` for names that do not follow it:
///
/// - `"Dockerfile"` → `Some(Bare)`
/// - `"Dockerfile.test"` → `Some(Suffixed("test"))`
/// - `"prod.Dockerfile"` → `Some(Prefixed("prod"))`
/// - `"Dockerfile.a.b"` → `Some(Suffixed("a-b"))`
/// - `"dockerfile"`, `"Dockerfile."`, `"a.Dockerfile.b"`, `"my-Dockerfile"` → `None`
///
/// Matching is case-sensitive; the keyword is exactly `Dockerfile`. When a
/// name satisfies both shapes (`Dockerfile.Dockerfile`) the suffixed reading
/// wins.
pub fn classify(name: &str) -> Option<BuildFileKind> {
    let segments: Vec<&str> = name.split('.').collect();
    match segments.as_slice() {
        ["Dockerfile"] => Some(BuildFileKind::Bare),
        ["Dockerfile", rest @ ..] if rest.iter().all(|s| valid_segment(s)) => {
            Some(BuildFileKind::Suffixed(rest.join("-")))
        }
        [rest @ .., "Dockerfile"] if rest.iter().all(|s| valid_segment(s)) => {
            Some(BuildFileKind::Prefixed(rest.join("-")))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dockerfile() {
        assert_eq!(classify("Dockerfile"), Some(BuildFileKind::Bare));
    }

    #[test]
    fn suffixed_single_segment() {
        assert_eq!(
            classify("Dockerfile.test"),
            Some(BuildFileKind::Suffixed("test".to_string()))
        );
    }

    #[test]
    fn prefixed_single_segment() {
        assert_eq!(
            classify("prod.Dockerfile"),
            Some(BuildFileKind::Prefixed("prod".to_string()))
        );
    }

    #[test]
    fn suffixed_segments_join_with_dash() {
        assert_eq!(
            classify("Dockerfile.a.b"),
            Some(BuildFileKind::Suffixed("a-b".to_string()))
        );
    }

    #[test]
    fn prefixed_segments_join_with_dash() {
        assert_eq!(
            classify("ci.arm64.Dockerfile"),
            Some(BuildFileKind::Prefixed("ci-arm64".to_string()))
        );
    }

    #[test]
    fn segment_charset_allows_underscore_and_hyphen() {
        assert_eq!(
            classify("Dockerfile.my_test-2"),
            Some(BuildFileKind::Suffixed("my_test-2".to_string()))
        );
    }

    #[test]
    fn keyword_is_case_sensitive() {
        assert_eq!(classify("dockerfile"), None);
        assert_eq!(classify("dockerfile.test"), None);
    }

    #[test]
    fn empty_segment_rejected() {
        assert_eq!(classify("Dockerfile."), None);
        assert_eq!(classify(".Dockerfile"), None);
        assert_eq!(classify("Dockerfile..test"), None);
    }

    #[test]
    fn keyword_in_the_middle_rejected() {
        assert_eq!(classify("a.Dockerfile.b"), None);
    }

    #[test]
    fn keyword_embedded_in_segment_rejected() {
        assert_eq!(classify("my-Dockerfile"), None);
        assert_eq!(classify("Dockerfile-old"), None);
    }

    #[test]
    fn invalid_segment_characters_rejected() {
        assert_eq!(classify("Dockerfile.foo!"), None);
        assert_eq!(classify("f o.Dockerfile"), None);
    }

    #[test]
    fn double_keyword_reads_as_suffixed() {
        assert_eq!(
            classify("Dockerfile.Dockerfile"),
            Some(BuildFileKind::Suffixed("Dockerfile".to_string()))
        );
    }

    #[test]
    fn purpose_accessor() {
        assert_eq!(BuildFileKind::Bare.purpose(), "");
        assert_eq!(BuildFileKind::Suffixed("test".into()).purpose(), "test");
        assert_eq!(BuildFileKind::Prefixed("prod".into()).purpose(), "prod");
    }
}
