//! Package manifests
//!
//! Only the name and version are read. `package.json` is preferred over
//! `Cargo.toml` when a directory has both.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use shipwright_core::error::ManifestError;

/// Name and version from a package manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
}

/// Reads package manifests
#[async_trait]
pub trait ManifestReader: Send + Sync {
    /// Read the manifest of the package at `path`
    async fn read(&self, path: &Path) -> Result<Manifest, ManifestError>;
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: Option<String>,
    version: Option<toml::Value>,
}

/// [`ManifestReader`] for `package.json` and `Cargo.toml` files on disk
#[derive(Debug, Clone)]
pub struct FsManifestReader {
    root: PathBuf,
}

impl FsManifestReader {
    /// Resolve package paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ManifestReader for FsManifestReader {
    #[instrument(skip(self))]
    async fn read(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let dir = self.root.join(path);

        let package_json = dir.join("package.json");
        if tokio::fs::try_exists(&package_json).await? {
            let content = tokio::fs::read_to_string(&package_json).await?;
            return parse_package_json(&package_json, &content);
        }

        let cargo_toml = dir.join("Cargo.toml");
        if tokio::fs::try_exists(&cargo_toml).await? {
            let content = tokio::fs::read_to_string(&cargo_toml).await?;
            return parse_cargo_toml(&cargo_toml, &content);
        }

        Err(ManifestError::NotFound(dir))
    }
}

fn parse_package_json(path: &Path, content: &str) -> Result<Manifest, ManifestError> {
    let parsed: PackageJson =
        serde_json::from_str(content).map_err(|e| ManifestError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let manifest = Manifest {
        name: parsed.name.ok_or_else(|| missing(path, "name"))?,
        version: parsed.version.ok_or_else(|| missing(path, "version"))?,
    };
    debug!(name = %manifest.name, version = %manifest.version, "read package.json");
    Ok(manifest)
}

fn parse_cargo_toml(path: &Path, content: &str) -> Result<Manifest, ManifestError> {
    let parsed: CargoToml = toml::from_str(content).map_err(|e| ManifestError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let package = parsed.package.ok_or_else(|| missing(path, "package"))?;

    let version = match package.version {
        Some(toml::Value::String(v)) => v,
        Some(_) => {
            return Err(ManifestError::ParseError {
                path: path.to_path_buf(),
                reason: "version inherited from the workspace is not supported".to_string(),
            })
        }
        None => return Err(missing(path, "package.version")),
    };

    let manifest = Manifest {
        name: package.name.ok_or_else(|| missing(path, "package.name"))?,
        version,
    };
    debug!(name = %manifest.name, version = %manifest.version, "read Cargo.toml");
    Ok(manifest)
}

fn missing(path: &Path, field: &str) -> ManifestError {
    ManifestError::MissingField {
        path: path.to_path_buf(),
        field: field.to_string(),
    }
}
