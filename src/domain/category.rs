/// Closed registry of changelog categories.
///
/// Variant order is the definition order used to break display-order ties.
/// Any token outside the registry classifies as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Feat,
    Fix,
    Perf,
    Refactor,
    Revert,
    Docs,
    Style,
    Test,
    Build,
    Ci,
    Chore,
    Other,
}

impl Category {
    /// Every category in definition order
    pub const ALL: [Category; 12] = [
        Category::Feat,
        Category::Fix,
        Category::Perf,
        Category::Refactor,
        Category::Revert,
        Category::Docs,
        Category::Style,
        Category::Test,
        Category::Build,
        Category::Ci,
        Category::Chore,
        Category::Other,
    ];

    /// Map a lowercase commit type token to its category
    pub fn from_token(token: &str) -> Self {
        match token {
            "feat" => Category::Feat,
            "fix" => Category::Fix,
            "perf" => Category::Perf,
            "refactor" => Category::Refactor,
            "revert" => Category::Revert,
            "docs" => Category::Docs,
            "style" => Category::Style,
            "test" => Category::Test,
            "build" => Category::Build,
            "ci" => Category::Ci,
            "chore" => Category::Chore,
            _ => Category::Other,
        }
    }

    /// Token as it appears in commit subjects
    pub fn token(&self) -> &'static str {
        match self {
            Category::Feat => "feat",
            Category::Fix => "fix",
            Category::Perf => "perf",
            Category::Refactor => "refactor",
            Category::Revert => "revert",
            Category::Docs => "docs",
            Category::Style => "style",
            Category::Test => "test",
            Category::Build => "build",
            Category::Ci => "ci",
            Category::Chore => "chore",
            Category::Other => "other",
        }
    }

    /// Section heading used in the changelog
    pub fn label(&self) -> &'static str {
        match self {
            Category::Feat => "Features",
            Category::Fix => "Bug Fixes",
            Category::Perf => "Performance Improvements",
            Category::Refactor => "Code Refactoring",
            Category::Revert => "Reverts",
            Category::Docs => "Documentation",
            Category::Style => "Styles",
            Category::Test => "Tests",
            Category::Build => "Build System",
            Category::Ci => "Continuous Integration",
            Category::Chore => "Chores",
            Category::Other => "Other Changes",
        }
    }

    /// Display priority, lower renders first
    pub fn order(&self) -> u8 {
        match self {
            Category::Feat => 1,
            Category::Fix => 2,
            Category::Perf => 3,
            Category::Refactor => 4,
            Category::Revert => 5,
            Category::Docs => 6,
            Category::Style => 7,
            Category::Test => 8,
            Category::Build => 9,
            Category::Ci => 10,
            Category::Chore => 11,
            Category::Other => u8::MAX,
        }
    }

    /// Position in [`Category::ALL`]
    pub fn definition_index(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Category::ALL.len())
    }

    /// Sort key for rendering: display order, then definition order
    pub fn sort_key(&self) -> (u8, usize) {
        (self.order(), self.definition_index())
    }
}
