/// Prefix every release tag carries
pub const TAG_PREFIX: &str = "v";

/// Default number of changelog characters copied into a tag annotation
pub const DEFAULT_EXCERPT_LEN: usize = 500;

/// Represents a release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Tag for a release version (e.g., "1.2.3" -> "v1.2.3")
    pub fn for_version(version: &str) -> Self {
        Tag::new(format!("{}{}", TAG_PREFIX, version))
    }

    /// Annotation message: a release header plus the start of the changelog
    pub fn annotation(&self, changelog: &str, excerpt_len: usize) -> String {
        let excerpt: String = changelog.chars().take(excerpt_len).collect();
        let excerpt = excerpt.trim_end();
        if excerpt.is_empty() {
            format!("Release {}", self.name)
        } else {
            format!("Release {}\n\n{}", self.name, excerpt)
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
