/// Represents a git branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_main: bool,
}

impl BranchContext {
    /// Create a branch context, marking it main when its name is one of `main_branches`
    pub fn new(name: impl Into<String>, main_branches: &[String]) -> Self {
        let name = name.into();
        let is_main = main_branches.iter().any(|b| *b == name);

        BranchContext { name, is_main }
    }

    /// Check if releases may be cut from this branch
    pub fn is_release_branch(&self) -> bool {
        self.is_main
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["main".to_string(), "master".to_string()]
    }

    #[test]
    fn test_main_branch() {
        let branch = BranchContext::new("main", &defaults());
        assert!(branch.is_main);
        assert!(branch.is_release_branch());
    }

    #[test]
    fn test_master_branch() {
        let branch = BranchContext::new("master", &defaults());
        assert!(branch.is_main);
    }

    #[test]
    fn test_develop_branch() {
        let branch = BranchContext::new("develop", &defaults());
        assert!(!branch.is_release_branch());
    }

    #[test]
    fn test_custom_main_branches() {
        let branch = BranchContext::new("trunk", &["trunk".to_string()]);
        assert!(branch.is_release_branch());
        assert!(!BranchContext::new("main", &["trunk".to_string()]).is_main);
    }
}
