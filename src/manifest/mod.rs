pub mod requirements;

use crate::error::{Error, Result};
use crate::models::Manifest;
use log::info;
use std::path::Path;

/// Scans a path for requirements manifests and parses them
///
/// A directory is searched for `requirements.txt` and `requirements-<g>.txt`
/// files; a file path is parsed directly with its group derived from the
/// file name. Included files (`-r` / `-c`) come back as manifests of their
/// own so findings keep precise locations.
pub fn scan(path: &Path) -> Result<Vec<Manifest>> {
    if path.is_file() {
        let group = requirements::group_for_file(path);
        return requirements::parse_requirements(path, group);
    }

    if !path.is_dir() {
        return Err(Error::ManifestDetection(format!(
            "path does not exist: {}",
            path.display()
        )));
    }

    let files = requirements::find_requirements_files(path);
    if files.is_empty() {
        return Err(Error::ManifestDetection(format!(
            "No requirements files found in {}.",
            path.display()
        )));
    }

    let mut manifests = Vec::new();
    for (file_path, group) in files {
        info!("Processing requirements file: {}", file_path.display());
        manifests.extend(requirements::parse_requirements(&file_path, group)?);
    }
    Ok(manifests)
}

/// Total requirement count across a set of manifests
pub fn requirement_count(manifests: &[Manifest]) -> usize {
    manifests.iter().map(|m| m.requirements.len()).sum()
}
