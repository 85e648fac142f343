use reqlint::manifest;
use reqlint::models::{RequirementGroup, RequirementSource};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper function to create a temporary test project with requirements files.
///
/// # Arguments
///
/// * `files` - A vector of tuples containing filename and content for each requirements file
///
/// # Returns
///
/// A tuple containing the temporary directory and its path
fn create_test_project(files: Vec<(&str, &str)>) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().to_path_buf();

    for (filename, content) in files {
        let file_path = project_dir.join(filename);
        fs::write(&file_path, content).unwrap();
    }

    (temp_dir, project_dir)
}

/// Test basic parsing of a requirements.txt file with simple dependencies.
///
/// This test verifies that:
/// 1. Exact pins, ranges, and bare names are correctly parsed
/// 2. Version constraints keep their operators
/// 3. Requirements are placed in the main group
#[test]
fn test_basic_requirements() {
    let content = r#"
OctoBot-Commons==1.8.16
idna<2.9,>=2.5
websockets
    "#;

    let (_temp_dir, project_dir) = create_test_project(vec![("requirements.txt", content)]);

    let manifests = manifest::scan(&project_dir).unwrap();
    assert_eq!(manifests.len(), 1);

    let manifest = &manifests[0];
    assert_eq!(manifest.group, RequirementGroup::Main);
    assert_eq!(manifest.requirements.len(), 3);
    assert!(manifest.findings.is_empty());

    let commons = manifest
        .requirements
        .iter()
        .find(|r| r.name == "OctoBot-Commons")
        .unwrap();
    assert_eq!(commons.specifiers.to_string(), "==1.8.16");

    let idna = manifest
        .requirements
        .iter()
        .find(|r| r.name == "idna")
        .unwrap();
    assert_eq!(idna.specifiers.len(), 2);

    let websockets = manifest
        .requirements
        .iter()
        .find(|r| r.name == "websockets")
        .unwrap();
    assert!(websockets.specifiers.is_empty());
}

/// Test that comment headers become section names and inline comments are
/// stripped.
///
/// This test verifies that:
/// 1. A standalone comment after a blank line names the section
/// 2. Consecutive comment lines do not reset the section
/// 3. Inline comments are not part of the parsed requirement
#[test]
fn test_sections_from_comments() {
    let content = r#"# Setup requirements
setuptools==65.0.0  # capped on purpose

# Drakkar-Software requirements
# pinned as a set
OctoBot-Commons==1.8.16
OctoBot-Trading==1.11.35

# Others
colorlog>=4.0
"#;

    let (_temp_dir, project_dir) = create_test_project(vec![("requirements.txt", content)]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let requirements = &manifests[0].requirements;
    assert_eq!(requirements.len(), 4);

    let section_of = |name: &str| {
        requirements
            .iter()
            .find(|r| r.name == name)
            .unwrap()
            .section
            .clone()
    };

    assert_eq!(section_of("setuptools").as_deref(), Some("Setup requirements"));
    assert_eq!(
        section_of("OctoBot-Commons").as_deref(),
        Some("Drakkar-Software requirements")
    );
    assert_eq!(
        section_of("OctoBot-Trading").as_deref(),
        Some("Drakkar-Software requirements")
    );
    assert_eq!(section_of("colorlog").as_deref(), Some("Others"));
}

/// Test handling of multiple requirements files (main, dev, and docs).
///
/// This test verifies that:
/// 1. Requirements from all files are processed
/// 2. Dependencies are correctly categorized into main, dev, and named groups
#[test]
fn test_multiple_requirements_files() {
    let (_temp_dir, project_dir) = create_test_project(vec![
        ("requirements.txt", "flask==2.0.0\nrequests==2.31.0"),
        ("requirements-dev.txt", "pytest==7.0.0\nblack==22.3.0"),
        ("requirements-docs.txt", "mkdocs==1.5.0"),
    ]);

    let manifests = manifest::scan(&project_dir).unwrap();
    assert_eq!(manifests.len(), 3);
    assert_eq!(manifest::requirement_count(&manifests), 5);

    let group_of = |file_name: &str| {
        manifests
            .iter()
            .find(|m| m.path.file_name().unwrap().to_str().unwrap() == file_name)
            .unwrap()
            .group
            .clone()
    };

    assert_eq!(group_of("requirements.txt"), RequirementGroup::Main);
    assert_eq!(group_of("requirements-dev.txt"), RequirementGroup::Dev);
    assert_eq!(
        group_of("requirements-docs.txt"),
        RequirementGroup::Group("docs".to_string())
    );
}

/// Test that -r includes are followed and keep their own file attribution.
#[test]
fn test_requirement_includes() {
    let (_temp_dir, project_dir) = create_test_project(vec![
        ("requirements.txt", "-r base.txt\nflask==2.0.0"),
        ("base.txt", "requests==2.31.0"),
    ]);

    let manifests = manifest::scan(&project_dir).unwrap();
    assert_eq!(manifests.len(), 2);

    let base = manifests
        .iter()
        .find(|m| m.path.file_name().unwrap() == "base.txt")
        .unwrap();
    assert_eq!(base.group, RequirementGroup::Main);
    assert_eq!(base.requirements.len(), 1);
    assert_eq!(base.requirements[0].name, "requests");
}

/// Test that circular includes terminate instead of recursing forever.
#[test]
fn test_circular_includes_terminate() {
    let (_temp_dir, project_dir) = create_test_project(vec![
        ("requirements.txt", "-r other.txt\nflask==2.0.0"),
        ("other.txt", "-r requirements.txt\nrequests==2.31.0"),
    ]);

    let manifests = manifest::scan(&project_dir).unwrap();
    assert_eq!(manifests.len(), 2);
    assert_eq!(manifest::requirement_count(&manifests), 2);
}

/// Test that a missing include becomes a finding instead of aborting the scan.
#[test]
fn test_missing_include_is_reported() {
    let (_temp_dir, project_dir) =
        create_test_project(vec![("requirements.txt", "-r missing.txt\nflask==2.0.0")]);

    let manifests = manifest::scan(&project_dir).unwrap();
    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].requirements.len(), 1);
    assert_eq!(manifests[0].findings.len(), 1);
    assert_eq!(manifests[0].findings[0].code, "include");
}

/// Test parsing of index options, editable installs, and URL requirements.
#[test]
fn test_options_and_url_requirements() {
    let content = r#"
--index-url https://private.pypi.org/simple/
--extra-index-url https://mirror.example.org/simple/
-e ./vendored/local-pkg
git+https://github.com/Drakkar-Software/Async-Channel.git#egg=async-channel
https://files.example.org/packages/websockets-8.1.tar.gz
    "#;

    let (_temp_dir, project_dir) = create_test_project(vec![("requirements.txt", content)]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let manifest = &manifests[0];

    assert_eq!(
        manifest.index_urls,
        vec!["https://private.pypi.org/simple/".to_string()]
    );
    assert_eq!(
        manifest.extra_index_urls,
        vec!["https://mirror.example.org/simple/".to_string()]
    );

    assert_eq!(manifest.requirements.len(), 3);
    let editable = manifest
        .requirements
        .iter()
        .find(|r| matches!(r.source, RequirementSource::Editable(_)))
        .unwrap();
    assert_eq!(editable.name, "local");

    let vcs = manifest
        .requirements
        .iter()
        .find(|r| r.name == "async-channel")
        .unwrap();
    assert!(matches!(vcs.source, RequirementSource::Url(_)));

    let archive = manifest
        .requirements
        .iter()
        .find(|r| r.name == "websockets")
        .unwrap();
    assert!(matches!(archive.source, RequirementSource::Url(_)));
}

/// Test that malformed lines produce syntax findings with line numbers while
/// the rest of the file still parses.
#[test]
fn test_malformed_lines_become_findings() {
    let content = "flask==2.0.0\n==1.0\nrequests==2.31.0\n";

    let (_temp_dir, project_dir) = create_test_project(vec![("requirements.txt", content)]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let manifest = &manifests[0];

    assert_eq!(manifest.requirements.len(), 2);
    assert_eq!(manifest.findings.len(), 1);
    assert_eq!(manifest.findings[0].code, "syntax");
    assert_eq!(manifest.findings[0].line, Some(2));
}

/// Test that scanning an empty directory is an error.
#[test]
fn test_no_requirements_files_found() {
    let temp_dir = TempDir::new().unwrap();
    assert!(manifest::scan(temp_dir.path()).is_err());
}

/// Test auditing a single file directly rather than a directory.
#[test]
fn test_single_file_scan() {
    let (_temp_dir, project_dir) =
        create_test_project(vec![("requirements-dev.txt", "pytest==7.0.0")]);

    let manifests = manifest::scan(&project_dir.join("requirements-dev.txt")).unwrap();
    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].group, RequirementGroup::Dev);
}
