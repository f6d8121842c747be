use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Locates classifier model files, downloading them on first use.
///
/// Resolution order:
/// 1. Cache directory
/// 2. Bundled directory (development checkouts, packaged installs)
/// 3. Download from URL into the cache directory
pub struct ModelResolver {
    cache_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
}

impl ModelResolver {
    /// Resolver rooted at the platform cache directory.
    pub fn new() -> Result<Self, ModelResolveError> {
        Ok(Self::with_cache_dir(model_cache_dir()?))
    }

    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            bundled_dir: None,
        }
    }

    pub fn with_bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundled_dir = Some(dir.into());
        self
    }

    pub fn resolve(&self, name: &str, url: &str) -> Result<PathBuf, ModelResolveError> {
        let cached_path = self.cache_dir.join(name);
        if cached_path.exists() {
            return Ok(cached_path);
        }

        if let Some(bundled_path) = self
            .bundled_dir
            .as_ref()
            .map(|dir| dir.join(name))
            .filter(|p| p.exists())
        {
            return Ok(bundled_path);
        }

        fs::create_dir_all(&self.cache_dir).map_err(ModelResolveError::CacheDir)?;
        log::info!("Downloading {name} from {url}");
        download(url, &cached_path)?;
        Ok(cached_path)
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/FaceTips/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceTips/models/` or `~/.cache/FaceTips/models/`
/// - Windows: `%LOCALAPPDATA%/FaceTips/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join("FaceTips").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

/// Streams `url` into `dest` through a `.part` file renamed on success.
fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");
    let result = download_to(url, dest, &temp_path);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn download_to(url: &str, dest: &Path, temp_path: &Path) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;

    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;
    response.copy_to(&mut file).map_err(download_err)?;
    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}
