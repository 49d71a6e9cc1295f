use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::constants::{EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
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
    #[error("model file not found: {0}")]
    Missing(PathBuf),
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// A downloadable model artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: &'static str,
    pub url: &'static str,
}

pub const FACE_DETECTION_MODEL: ModelSpec = ModelSpec {
    name: YOLO_MODEL_NAME,
    url: YOLO_MODEL_URL,
};

pub const FACE_EMBEDDING_MODEL: ModelSpec = ModelSpec {
    name: EMBEDDING_MODEL_NAME,
    url: EMBEDDING_MODEL_URL,
};

/// Locates model files, downloading into a cache directory on first use.
pub struct ModelResolver {
    cache_dir: PathBuf,
}

impl ModelResolver {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Resolver rooted at the platform cache directory.
    pub fn with_default_cache() -> Result<Self, ModelResolveError> {
        Ok(Self::new(model_cache_dir()?))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Resolution order: explicit override, cached copy, download.
    ///
    /// An explicit override that does not exist is an error rather than a
    /// silent fallback to the default model.
    pub fn resolve(
        &self,
        spec: ModelSpec,
        override_path: Option<&Path>,
        progress: Option<ProgressFn>,
    ) -> Result<PathBuf, ModelResolveError> {
        if let Some(path) = override_path {
            return if path.exists() {
                Ok(path.to_path_buf())
            } else {
                Err(ModelResolveError::Missing(path.to_path_buf()))
            };
        }

        let cached_path = self.cache_dir.join(spec.name);
        if cached_path.exists() {
            log::debug!("Using cached model {}", cached_path.display());
            return Ok(cached_path);
        }

        fs::create_dir_all(&self.cache_dir).map_err(|e| ModelResolveError::CacheDir {
            path: self.cache_dir.clone(),
            source: e,
        })?;
        log::info!("Downloading {} from {}", spec.name, spec.url);
        download(spec.url, &cached_path, progress)?;
        Ok(cached_path)
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/FaceStream/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceStream/models/` or `~/.cache/FaceStream/models/`
/// - Windows: `%LOCALAPPDATA%/FaceStream/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("FaceStream").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("FaceStream").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let to_download_error = |e: reqwest::Error| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(to_download_error)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(to_download_error)?;

    // Write to a temp file first, then rename so a failed download never
    // leaves a truncated model behind.
    let temp_path = dest.with_extension("part");
    let to_write_error = |e: std::io::Error| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(to_write_error)?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(to_write_error)?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(to_write_error)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNREACHABLE: ModelSpec = ModelSpec {
        name: "test_model.onnx",
        url: "http://invalid.nonexistent.example.com/model.onnx",
    };

    #[test]
    fn test_resolve_prefers_override() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("custom.onnx");
        fs::write(&custom, b"custom").unwrap();

        let resolver = ModelResolver::new(tmp.path().join("cache"));
        let path = resolver.resolve(UNREACHABLE, Some(&custom), None).unwrap();
        assert_eq!(path, custom);
    }

    #[test]
    fn test_resolve_missing_override_is_error() {
        let tmp = TempDir::new().unwrap();
        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        let missing = tmp.path().join("nope.onnx");
        let err = resolver.resolve(UNREACHABLE, Some(&missing), None).unwrap_err();
        assert!(matches!(err, ModelResolveError::Missing(p) if p == missing));
    }

    #[test]
    fn test_resolve_finds_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cached = tmp.path().join(UNREACHABLE.name);
        fs::write(&cached, b"fake model data").unwrap();

        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        assert_eq!(resolver.resolve(UNREACHABLE, None, None).unwrap(), cached);
    }

    #[test]
    fn test_resolve_download_failure_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let resolver = ModelResolver::new(tmp.path().join("cache"));

        let result = resolver.resolve(UNREACHABLE, None, None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));

        let dest = resolver.cache_dir().join(UNREACHABLE.name);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("FaceStream"));
        assert!(path.to_string_lossy().contains("models"));
    }
}
