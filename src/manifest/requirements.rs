use crate::error::{Error, Result};
use crate::models::{Finding, Manifest, Requirement, RequirementGroup, RequirementSource};
use crate::version::SpecifierSet;
use log::{debug, info};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9._-]*[a-z0-9])?$").unwrap())
}

/// Finds requirements files in a project directory
///
/// `requirements.txt` holds main requirements; `requirements-<group>.txt`
/// holds the named group, with `dev` mapping to the dev group.
pub fn find_requirements_files(dir: &Path) -> Vec<(PathBuf, RequirementGroup)> {
    let mut requirements_files = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.filter_map(std::result::Result::ok) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                if file_name == "requirements.txt" {
                    info!("Found main requirements file: {}", path.display());
                    requirements_files.push((path.clone(), RequirementGroup::Main));
                } else if let Some(group_name) = file_name
                    .strip_prefix("requirements-")
                    .and_then(|rest| rest.strip_suffix(".txt"))
                {
                    let group = match group_name {
                        "dev" => RequirementGroup::Dev,
                        _ => RequirementGroup::Group(group_name.to_string()),
                    };
                    info!("Found {} requirements file: {}", group_name, path.display());
                    requirements_files.push((path.clone(), group));
                }
            }
        }
    }

    // Stable order keeps reports reproducible across platforms
    requirements_files.sort_by(|a, b| a.0.cmp(&b.0));
    requirements_files
}

/// Group for a directly-named requirements file
pub fn group_for_file(path: &Path) -> RequirementGroup {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(file_name) => match file_name
            .strip_prefix("requirements-")
            .and_then(|rest| rest.strip_suffix(".txt"))
        {
            Some("dev") => RequirementGroup::Dev,
            Some(group_name) => RequirementGroup::Group(group_name.to_string()),
            None => RequirementGroup::Main,
        },
        None => RequirementGroup::Main,
    }
}

/// Parses a requirements file and everything it includes
///
/// The named file becomes the first manifest; files pulled in through
/// `-r`/`--requirement` follow with the same group, and constraint files
/// (`-c`/`--constraint`) land in their own group so their pins are not
/// misread as duplicate requirements.
pub fn parse_requirements(path: &Path, group: RequirementGroup) -> Result<Vec<Manifest>> {
    let mut visited = HashSet::new();
    let mut manifests = Vec::new();
    parse_into(path, group, &mut visited, &mut manifests)?;
    Ok(manifests)
}

fn parse_into(
    path: &Path,
    group: RequirementGroup,
    visited: &mut HashSet<PathBuf>,
    manifests: &mut Vec<Manifest>,
) -> Result<()> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        debug!("Skipping already-included file: {}", path.display());
        return Ok(());
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::FileOperation {
        path: path.to_path_buf(),
        message: format!("failed to read requirements file: {}", e),
    })?;

    let mut manifest = Manifest::new(path.to_path_buf(), group.clone());
    let mut includes: Vec<(PathBuf, RequirementGroup, usize)> = Vec::new();
    let mut section: Option<String> = None;
    // The file start counts as a section boundary
    let mut at_section_boundary = true;

    for (index, raw_line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            at_section_boundary = true;
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            // A comment right after a blank line names the section; comments
            // that follow another comment are annotations and keep it.
            if at_section_boundary {
                let text = comment.trim();
                if !text.is_empty() {
                    section = Some(text.to_string());
                }
            }
            at_section_boundary = false;
            continue;
        }
        at_section_boundary = false;

        // pip treats ' #' as the start of an inline comment
        let line = match line.find(" #") {
            Some(cut) => line[..cut].trim_end(),
            None => line,
        };
        if line.is_empty() {
            continue;
        }

        if let Some(target) = option_value(line, "-r", "--requirement") {
            includes.push((sibling_path(path, &target), group.clone(), line_number));
            continue;
        }
        if let Some(target) = option_value(line, "-c", "--constraint") {
            includes.push((
                sibling_path(path, &target),
                RequirementGroup::Group("constraints".to_string()),
                line_number,
            ));
            continue;
        }
        if let Some(url) = option_value(line, "-i", "--index-url") {
            manifest.index_urls.push(url);
            continue;
        }
        if let Some(url) = option_value(line, "", "--extra-index-url") {
            manifest.extra_index_urls.push(url);
            continue;
        }
        if line.starts_with("--") {
            debug!(
                "Skipping unsupported option on line {}: {}",
                line_number, line
            );
            continue;
        }

        match parse_requirement(line) {
            Ok(mut requirement) => {
                debug!("Parsed requirement on line {}: {:?}", line_number, requirement);
                requirement.group = group.clone();
                requirement.section = section.clone();
                requirement.line = line_number;
                manifest.requirements.push(requirement);
            }
            Err(e) => {
                debug!("Failed to parse line {}: {}", line_number, e);
                manifest.findings.push(Finding::error(
                    path.to_path_buf(),
                    Some(line_number),
                    "syntax",
                    format!("{}: '{}'", e, line),
                ));
            }
        }
    }

    debug!(
        "Extracted {} requirements from {}",
        manifest.requirements.len(),
        path.display()
    );
    manifests.push(manifest);

    for (include_path, include_group, line_number) in includes {
        if !include_path.exists() {
            let finding = Finding::error(
                path.to_path_buf(),
                Some(line_number),
                "include",
                format!("included file not found: {}", include_path.display()),
            );
            if let Some(owner) = manifests.iter_mut().find(|m| m.path == path) {
                owner.findings.push(finding);
            }
            continue;
        }
        info!("Following include: {}", include_path.display());
        parse_into(&include_path, include_group, visited, manifests)?;
    }

    Ok(())
}

fn sibling_path(manifest_path: &Path, target: &str) -> PathBuf {
    let target_path = Path::new(target);
    if target_path.is_absolute() {
        target_path.to_path_buf()
    } else {
        manifest_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(target_path)
    }
}

/// Extracts the value of a short/long option line, accepting both
/// `--flag value` and `--flag=value` forms
fn option_value(line: &str, short: &str, long: &str) -> Option<String> {
    for flag in [long, short] {
        if flag.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(flag) {
            if let Some(value) = rest.strip_prefix('=') {
                return Some(value.trim().to_string());
            }
            if rest.starts_with(char::is_whitespace) {
                return Some(rest.trim().to_string());
            }
            if rest.is_empty() {
                return None;
            }
        }
    }
    None
}

/// Parses a single requirement line into a record
///
/// Handles editable installs, direct URL requirements, and PEP 508-style
/// specifiers with extras and environment markers. Group, section, and line
/// number are filled in by the caller.
pub fn parse_requirement(line: &str) -> Result<Requirement> {
    if let Some(target) = option_value(line, "-e", "--editable") {
        let name = name_from_url(&target)
            .ok_or_else(|| Error::RequirementParsing("invalid editable install".to_string()))?;
        let mut requirement = Requirement::new(name, RequirementGroup::Main, 0);
        requirement.source = RequirementSource::Editable(target);
        return Ok(requirement);
    }

    // Split off environment markers first
    let (package_spec, markers) = match line.split_once(';') {
        Some((spec, markers)) => (spec.trim(), Some(markers.trim().to_string())),
        None => (line.trim(), None),
    };

    if package_spec.is_empty() {
        return Err(Error::RequirementParsing("empty requirement".to_string()));
    }

    if package_spec.starts_with("git+") || package_spec.starts_with("http") {
        let name = name_from_url(package_spec)
            .ok_or_else(|| Error::RequirementParsing("invalid URL requirement".to_string()))?;
        let mut requirement = Requirement::new(name, RequirementGroup::Main, 0);
        requirement.source = RequirementSource::Url(package_spec.to_string());
        if let Some(markers) = markers {
            requirement = requirement.with_markers(markers);
        }
        return Ok(requirement);
    }

    // Regular package specification: name, optional extras, optional specifiers
    let (name_part, spec_part) =
        match package_spec.find(|c| ['>', '<', '=', '~', '!'].contains(&c)) {
            Some(spec_start) => (
                package_spec[..spec_start].trim(),
                package_spec[spec_start..].trim(),
            ),
            None => (package_spec, ""),
        };

    let (name, extras) = match name_part.split_once('[') {
        Some((name, extras_part)) => {
            let extras_part = extras_part
                .strip_suffix(']')
                .ok_or_else(|| Error::RequirementParsing("unclosed extras bracket".to_string()))?;
            let extras: Vec<String> = extras_part
                .split(',')
                .map(|extra| extra.trim().to_string())
                .filter(|extra| !extra.is_empty())
                .collect();
            (name.trim(), Some(extras))
        }
        None => (name_part, None),
    };

    if !name_re().is_match(name) {
        return Err(Error::RequirementParsing(format!(
            "invalid package name: '{}'",
            name
        )));
    }

    let specifiers: SpecifierSet = spec_part.parse()?;

    let mut requirement =
        Requirement::new(name.to_string(), RequirementGroup::Main, 0).with_specifiers(specifiers);
    if let Some(extras) = extras {
        requirement = requirement.with_extras(extras);
    }
    if let Some(markers) = markers {
        requirement = requirement.with_markers(markers);
    }
    Ok(requirement)
}

/// Derives a package name from a URL or path requirement
///
/// Prefers an `#egg=` fragment; falls back to the final path segment with
/// archive extensions and wheel metadata stripped.
fn name_from_url(target: &str) -> Option<String> {
    if let Some((_, fragment)) = target.split_once('#') {
        for piece in fragment.split('&') {
            if let Some(egg) = piece.strip_prefix("egg=") {
                if !egg.is_empty() {
                    return Some(egg.to_string());
                }
            }
        }
    }

    let without_fragment = target.split('#').next()?;
    let last_segment = without_fragment
        .trim_end_matches('/')
        .rsplit('/')
        .next()?
        .trim();
    if last_segment.is_empty() {
        return None;
    }

    let stem = ["-py3-none-any.whl", ".whl", ".tar.gz", ".tar.bz2", ".zip", ".git"]
        .iter()
        .fold(last_segment, |name, suffix| {
            name.strip_suffix(suffix).unwrap_or(name)
        });

    // Wheel and sdist names put the package name before the first dash
    let name = stem.split('-').next().unwrap_or(stem);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
