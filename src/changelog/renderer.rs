use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::domain::{Category, ClassifiedCommit, Tag};

/// Heading of the section listing breaking commits
pub const BREAKING_HEADING: &str = "BREAKING CHANGES";

/// Where the trailing reference link points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLinks {
    /// Repository web URL without trailing slash; links are relative when absent
    pub base_url: Option<String>,
}

impl ReferenceLinks {
    pub fn new(base_url: Option<String>) -> Self {
        ReferenceLinks {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{}", base, path),
            None => path.to_string(),
        }
    }

    /// Link comparing the previous marker with the new tag
    pub fn compare(&self, previous: &str, tag: &Tag) -> String {
        self.url(&format!("compare/{}...{}", previous, tag))
    }

    /// Link to the release page of a tag
    pub fn release(&self, tag: &Tag) -> String {
        self.url(&format!("releases/tag/{}", tag))
    }
}

/// One rendered release section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    pub version: String,
    pub text: String,
}

impl ChangelogDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Whether a section with the given heading was rendered
    pub fn has_section(&self, heading: &str) -> bool {
        let wanted = format!("### {}", heading);
        self.lines().any(|line| line == wanted)
    }
}

impl fmt::Display for ChangelogDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render a release section dated today
pub fn render(
    version: &str,
    commits: &[ClassifiedCommit],
    previous_marker: Option<&str>,
    links: &ReferenceLinks,
) -> ChangelogDocument {
    render_on(
        version,
        commits,
        previous_marker,
        links,
        Local::now().date_naive(),
    )
}

/// Render a release section for a fixed date
pub fn render_on(
    version: &str,
    commits: &[ClassifiedCommit],
    previous_marker: Option<&str>,
    links: &ReferenceLinks,
    date: NaiveDate,
) -> ChangelogDocument {
    let mut lines = vec![format!("## [{}] - {}", version, date.format("%Y-%m-%d"))];

    let breaking: Vec<&ClassifiedCommit> = commits.iter().filter(|c| c.is_breaking).collect();
    if !breaking.is_empty() {
        push_heading(&mut lines, BREAKING_HEADING);
        lines.extend(breaking.iter().map(|c| format!("- {}", bullet_text(c))));
    }

    let mut sections = 0;
    for (category, members) in group_by_category(commits) {
        sections += 1;
        push_heading(&mut lines, category.label());
        lines.extend(members.into_iter().map(|c| match c.short_id() {
            Some(short) => format!("- {} ({})", bullet_text(c), short),
            None => format!("- {}", bullet_text(c)),
        }));
    }

    let tag = Tag::for_version(version);
    let link = match previous_marker {
        Some(previous) => links.compare(previous, &tag),
        None => links.release(&tag),
    };
    lines.push(String::new());
    lines.push(format!("[{}]: {}", version, link));

    let mut out = lines.join("\n");
    out.push('\n');

    debug!(
        version,
        breaking = breaking.len(),
        sections,
        "rendered changelog section"
    );

    ChangelogDocument {
        version: version.to_string(),
        text: out,
    }
}

/// Non-breaking commits grouped into registry order, input order kept within groups
pub fn group_by_category(commits: &[ClassifiedCommit]) -> Vec<(Category, Vec<&ClassifiedCommit>)> {
    let mut categories = Category::ALL.to_vec();
    categories.sort_by_key(|c| c.sort_key());

    categories
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&ClassifiedCommit> = commits
                .iter()
                .filter(|c| !c.is_breaking && c.kind() == category)
                .collect();
            (!members.is_empty()).then_some((category, members))
        })
        .collect()
}

/// Blank line, `### heading`, blank line
fn push_heading(lines: &mut Vec<String>, heading: &str) {
    lines.push(String::new());
    lines.push(format!("### {}", heading));
    lines.push(String::new());
}

fn bullet_text(commit: &ClassifiedCommit) -> String {
    match &commit.scope {
        Some(scope) => format!("**{}**: {}", scope, commit.summary),
        None => commit.summary.clone(),
    }
}
