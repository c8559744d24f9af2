//! Resources shipped next to the app: the bundled module feed and the style
//! header used when rendering lesson text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use learn_core::model::{DecodeError, Module, decode_modules};
use thiserror::Error;

/// File name of the bundled module feed.
pub const DATA_RESOURCE: &str = "data.json";
/// File name of the bundled style header.
pub const STYLE_RESOURCE: &str = "style.html";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BundleError {
    #[error("bundled resource not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },
}

/// A directory of bundled resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    root: PathBuf,
}

impl Bundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_RESOURCE)
    }

    #[must_use]
    pub fn style_path(&self) -> PathBuf {
        self.root.join(STYLE_RESOURCE)
    }

    /// Read and decode the bundled module feed. Blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns `BundleError` if the file is missing, unreadable, or not a
    /// valid module feed.
    pub fn load_modules(&self) -> Result<Vec<Module>, BundleError> {
        let path = self.data_path();
        let bytes = read_resource(&path)?;
        decode_modules(&bytes).map_err(|source| BundleError::Decode { path, source })
    }

    /// Read the bundled style header.
    ///
    /// # Errors
    ///
    /// Returns `BundleError` if the file is missing, unreadable, or not UTF-8.
    pub fn load_style(&self) -> Result<String, BundleError> {
        let path = self.style_path();
        let bytes = read_resource(&path)?;
        String::from_utf8(bytes).map_err(|_| BundleError::Encoding { path })
    }
}

fn read_resource(path: &Path) -> Result<Vec<u8>, BundleError> {
    fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            BundleError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            BundleError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
