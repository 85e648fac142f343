use crate::error::{Error, Result};
use crate::models::{Manifest, Requirement, RequirementGroup, RequirementSource};
use crate::utils::toml::{update_section, write_toml};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toml_edit::{Array, DocumentMut, Item, Table, value};

/// Writes the parsed manifests as a pyproject.toml in the project directory
///
/// Main requirements land in `[project.dependencies]`, dev and named groups
/// in `[dependency-groups]`, and index URLs under `[tool.uv]`. Refuses to
/// overwrite an existing pyproject.toml.
pub fn export_pyproject(
    project_dir: &Path,
    manifests: &[Manifest],
    extra_index_urls: &[String],
) -> Result<PathBuf> {
    let pyproject_path = project_dir.join("pyproject.toml");
    if pyproject_path.exists() {
        return Err(Error::FileOperation {
            path: pyproject_path,
            message: "pyproject.toml already exists; remove or rename it before exporting"
                .to_string(),
        });
    }

    let project_name = project_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());

    let mut main_dependencies: Vec<String> = Vec::new();
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut index_urls: Vec<String> = Vec::new();
    let mut extra_urls: Vec<String> = extra_index_urls.to_vec();

    for manifest in manifests {
        index_urls.extend(manifest.index_urls.iter().cloned());
        extra_urls.extend(manifest.extra_index_urls.iter().cloned());

        for requirement in &manifest.requirements {
            let Some(entry) = dependency_entry(requirement) else {
                info!(
                    "Skipping editable requirement '{}' (not representable in pyproject.toml)",
                    requirement.name
                );
                continue;
            };
            match &requirement.group {
                RequirementGroup::Main => main_dependencies.push(entry),
                RequirementGroup::Dev => grouped.entry("dev".to_string()).or_default().push(entry),
                RequirementGroup::Group(name) if name == "constraints" => {
                    debug!("Skipping constraint entry '{}'", requirement.name);
                }
                RequirementGroup::Group(name) => {
                    grouped.entry(name.clone()).or_default().push(entry)
                }
            }
        }
    }

    let mut doc = DocumentMut::new();

    let mut project = Table::new();
    project.insert("name", value(project_name.as_str()));
    project.insert("version", value("0.1.0"));
    project.insert("dependencies", Item::Value(string_array(&main_dependencies).into()));
    doc.insert("project", Item::Table(project));

    if !grouped.is_empty() {
        let mut groups = Table::new();
        for (group_name, entries) in &grouped {
            groups.insert(
                group_name,
                Item::Value(string_array(entries).into()),
            );
        }
        doc.insert("dependency-groups", Item::Table(groups));
    }

    if let Some(first_index) = index_urls.first() {
        update_section(&mut doc, &["tool", "uv", "index-url"], value(first_index.as_str()));
    }
    if !extra_urls.is_empty() {
        extra_urls.dedup();
        update_section(
            &mut doc,
            &["tool", "uv", "extra-index-url"],
            Item::Value(string_array(&extra_urls).into()),
        );
    }

    write_toml(&pyproject_path, &mut doc)?;
    info!("Exported manifest to {}", pyproject_path.display());
    Ok(pyproject_path)
}

fn string_array(entries: &[String]) -> Array {
    let mut array = Array::new();
    for entry in entries {
        array.push(entry.as_str());
    }
    array
}

/// PEP 621 text for one requirement, or None when it has no representation
fn dependency_entry(requirement: &Requirement) -> Option<String> {
    match &requirement.source {
        RequirementSource::Registry => Some(requirement.to_pep508()),
        RequirementSource::Url(url) => Some(format!("{} @ {}", requirement.name, url)),
        RequirementSource::Editable(_) => None,
    }
}
