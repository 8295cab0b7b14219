use crate::domain::{BumpKind, Category, ClassifiedCommit};
use tracing::debug;

/// Outcome of resolving the bump for a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpDecision {
    /// Bump that will be applied
    pub kind: BumpKind,
    /// Whether a caller override replaced the policy
    pub forced: bool,
}

/// Decide the bump implied by a set of classified commits.
///
/// Any breaking commit gives `Major`, otherwise any `feat` gives `Minor`,
/// otherwise `Patch` (including the empty set).
pub fn decide(commits: &[ClassifiedCommit]) -> BumpKind {
    if commits.iter().any(|c| c.is_breaking) {
        return BumpKind::Major;
    }

    if commits.iter().any(|c| c.kind() == Category::Feat) {
        return BumpKind::Minor;
    }

    BumpKind::Patch
}

/// Apply a caller override if present, otherwise consult [`decide`]
pub fn resolve(commits: &[ClassifiedCommit], force: Option<BumpKind>) -> BumpDecision {
    match force {
        Some(kind) => {
            debug!(%kind, "bump forced by caller");
            BumpDecision { kind, forced: true }
        }
        None => {
            let kind = decide(commits);
            debug!(%kind, commits = commits.len(), "bump decided from commits");
            BumpDecision {
                kind,
                forced: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawCommit;

    fn commits(messages: &[&str]) -> Vec<ClassifiedCommit> {
        messages
            .iter()
            .enumerate()
            .filter_map(|(i, message)| {
                ClassifiedCommit::parse(&RawCommit::from_message(i.to_string(), message))
            })
            .collect()
    }

    #[test]
    fn test_analyze_major() {
        let c = commits(&["feat: new feature", "fix(api)!: breaking change"]);
        assert_eq!(decide(&c), BumpKind::Major);
    }

    #[test]
    fn test_analyze_minor() {
        let c = commits(&["feat: new feature", "fix: bug fix"]);
        assert_eq!(decide(&c), BumpKind::Minor);
    }

    #[test]
    fn test_analyze_patch() {
        let c = commits(&["fix: bug fix", "refactor: code cleanup"]);
        assert_eq!(decide(&c), BumpKind::Patch);
    }

    #[test]
    fn test_analyze_malformed_markers_stay_patch() {
        let c = commits(&["Feat (ui): dark mode", "feat(x) !: y"]);
        assert_eq!(decide(&c), BumpKind::Patch);
    }

    #[test]
    fn test_analyze_empty() {
        assert_eq!(decide(&[]), BumpKind::Patch);
    }

    #[test]
    fn test_analyze_breaking_change_via_footer() {
        let c = commits(&["fix: rename API field\n\nBREAKING CHANGE: field changed from X to Y"]);
        assert_eq!(decide(&c), BumpKind::Major);
    }

    #[test]
    fn test_analyze_breaking_footer_on_non_conventional_commit() {
        let c = commits(&["Rework storage\n\nbreaking change: new format"]);
        assert_eq!(decide(&c), BumpKind::Major);
    }

    #[test]
    fn test_analyze_priority_breaking_over_features() {
        let c = commits(&[
            "feat: new feature 1",
            "feat: new feature 2",
            "fix(core)!: breaking change",
        ]);
        assert_eq!(decide(&c), BumpKind::Major);
    }

    #[test]
    fn test_analyze_ignore_docs_and_chore() {
        let c = commits(&[
            "docs: update readme",
            "chore: update deps",
            "style: format code",
            "test: add tests",
        ]);
        assert_eq!(decide(&c), BumpKind::Patch);
    }

    #[test]
    fn test_feature_keyword_outside_type_does_not_count() {
        let c = commits(&["fix: feature flag crash", "Add feature toggle"]);
        assert_eq!(decide(&c), BumpKind::Patch);
    }

    #[test]
    fn test_uppercase_feat_counts() {
        let c = commits(&["Feat(ui): dark mode"]);
        assert_eq!(decide(&c), BumpKind::Minor);
    }

    #[test]
    fn test_analyze_non_conventional_commits() {
        let c = commits(&["Updated stuff", "Fixed things", "Added more stuff"]);
        assert_eq!(decide(&c), BumpKind::Patch);
    }

    #[test]
    fn test_override_wins() {
        let c = commits(&["feat!: drop legacy API"]);
        let decision = resolve(&c, Some(BumpKind::Patch));
        assert_eq!(decision.kind, BumpKind::Patch);
        assert!(decision.forced);
    }

    #[test]
    fn test_no_override_uses_policy() {
        let c = commits(&["feat: add export"]);
        let decision = resolve(&c, None);
        assert_eq!(decision.kind, BumpKind::Minor);
        assert!(!decision.forced);
    }
}
