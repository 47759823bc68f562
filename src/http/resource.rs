//! Static resources under the document root.
//!
//! Targets are concatenated onto the root verbatim by default. This does not
//! strip `..` segments, so a request can name files outside the root.
//! [`PathPolicy::Confined`] is the opt-in containment check.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// How request targets are checked before they reach the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Plain concatenation of root and target
    #[default]
    Verbatim,
    /// Reject targets that are not absolute or that contain `..` segments
    Confined,
}

impl PathPolicy {
    pub fn permits(&self, target: &str) -> bool {
        match self {
            PathPolicy::Verbatim => true,
            PathPolicy::Confined => {
                target.starts_with('/')
                    && !Path::new(target)
                        .components()
                        .any(|c| matches!(c, Component::ParentDir))
            }
        }
    }
}

/// Maps request targets to filesystem paths.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    policy: PathPolicy,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>, policy: PathPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// `/` maps to `<root>/index.html`; anything else to `<root><target>`.
    ///
    /// Returns `None` when the policy refuses the target.
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        if !self.policy.permits(target) {
            return None;
        }

        if target == "/" {
            return Some(self.root.join("index.html"));
        }

        let mut joined = OsString::from(self.root.as_os_str());
        joined.push(target);
        Some(PathBuf::from(joined))
    }
}

/// An opened file together with the metadata sent in response headers.
#[derive(Debug)]
pub struct StaticResource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    file: File,
}

impl StaticResource {
    /// Opens `path` read-only and stats it. Directories are rejected.
    pub async fn open(path: PathBuf) -> io::Result<Self> {
        let file = File::open(&path).await?;
        let meta = file.metadata().await?;

        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(Self {
            path,
            size: meta.len(),
            modified: meta.modified()?,
            file,
        })
    }

    /// Reads exactly `size` bytes, the length reported when the file was opened.
    ///
    /// Growth since then is ignored. A file that shrank yields `UnexpectedEof`,
    /// since a shorter body would no longer match `Content-length`.
    pub async fn read_contents(&mut self) -> io::Result<Vec<u8>> {
        let mut contents = Vec::with_capacity(self.size as usize);
        (&mut self.file).take(self.size).read_to_end(&mut contents).await?;

        if (contents.len() as u64) < self.size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} shrank from {} to {} bytes",
                    self.path.display(),
                    self.size,
                    contents.len()
                ),
            ));
        }

        Ok(contents)
    }

    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
