use std::collections::HashSet;

/// Decides which issuers are trusted without holding an authorizing credential.
pub trait RootPolicy: Send + Sync {
    fn is_root(&self, did: &str) -> bool;
}

/// A fixed set of root DIDs.
#[derive(Debug, Clone, Default)]
pub struct StaticRoots {
    roots: HashSet<String>,
}

impl StaticRoots {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl RootPolicy for StaticRoots {
    fn is_root(&self, did: &str) -> bool {
        self.roots.contains(did)
    }
}
