//! Per-collaborator document slot: nothing, a file waiting for upload, or
//! a file the server already stores.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact<F> {
    Empty,
    /// Local file handle picked by the user, sent with the next submission.
    Staged(F),
    /// URL of a file that was uploaded earlier.
    Remote(String),
}

impl<F> Artifact<F> {
    pub fn from_remote(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Artifact::Remote(url),
            _ => Artifact::Empty,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Artifact::Empty)
    }

    pub fn staged(&self) -> Option<&F> {
        match self {
            Artifact::Staged(file) => Some(file),
            _ => None,
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            Artifact::Remote(url) => Some(url),
            _ => None,
        }
    }
}

impl<F> Default for Artifact<F> {
    fn default() -> Self {
        Artifact::Empty
    }
}
