use reqlint::{export, manifest};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_test_project(files: Vec<(&str, &str)>) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().to_path_buf();

    for (filename, content) in files {
        let file_path = project_dir.join(filename);
        fs::write(&file_path, content).unwrap();
    }

    (temp_dir, project_dir)
}

/// Test that main and grouped requirements land in the expected pyproject
/// sections.
#[test]
fn test_export_sections() {
    let (_temp_dir, project_dir) = create_test_project(vec![
        (
            "requirements.txt",
            "OctoBot-Commons==1.8.16\nidna<2.9,>=2.5\n",
        ),
        ("requirements-dev.txt", "pytest==7.0.0\n"),
        ("requirements-docs.txt", "mkdocs==1.5.0\n"),
    ]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let pyproject_path = export::export_pyproject(&project_dir, &manifests, &[]).unwrap();

    let content = fs::read_to_string(&pyproject_path).unwrap();
    assert!(content.contains("[project]"));
    assert!(content.contains("\"OctoBot-Commons==1.8.16\""));
    assert!(content.contains("\"idna<2.9,>=2.5\""));
    assert!(content.contains("[dependency-groups]"));
    assert!(content.contains("dev = [\"pytest==7.0.0\"]"));
    assert!(content.contains("docs = [\"mkdocs==1.5.0\"]"));
}

/// Test that extras and markers survive the round trip to PEP 508 text.
#[test]
fn test_export_preserves_extras_and_markers() {
    let (_temp_dir, project_dir) = create_test_project(vec![(
        "requirements.txt",
        "uvloop[dev]>=0.14.0 ; sys_platform != 'win32'\n",
    )]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let pyproject_path = export::export_pyproject(&project_dir, &manifests, &[]).unwrap();

    let content = fs::read_to_string(&pyproject_path).unwrap();
    assert!(content.contains("uvloop[dev]>=0.14.0 ; sys_platform != 'win32'"));
}

/// Test that index URLs from the manifest and the caller end up under
/// [tool.uv].
#[test]
fn test_export_index_urls() {
    let (_temp_dir, project_dir) = create_test_project(vec![(
        "requirements.txt",
        "--index-url https://private.pypi.org/simple/\nrequests==2.31.0\n",
    )]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let extra = vec!["https://mirror.example.org/simple/".to_string()];
    let pyproject_path = export::export_pyproject(&project_dir, &manifests, &extra).unwrap();

    let content = fs::read_to_string(&pyproject_path).unwrap();
    assert!(content.contains("[tool.uv]"));
    assert!(content.contains("index-url = \"https://private.pypi.org/simple/\""));
    assert!(content.contains("\"https://mirror.example.org/simple/\""));
}

/// Test that an existing pyproject.toml is never overwritten.
#[test]
fn test_export_refuses_overwrite() {
    let (_temp_dir, project_dir) = create_test_project(vec![
        ("requirements.txt", "requests==2.31.0\n"),
        ("pyproject.toml", "[project]\nname = \"existing\"\n"),
    ]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let result = export::export_pyproject(&project_dir, &manifests, &[]);
    assert!(result.is_err());

    let content = fs::read_to_string(project_dir.join("pyproject.toml")).unwrap();
    assert!(content.contains("existing"));
}

/// Test that URL requirements are exported with `name @ url` syntax and
/// editable installs are left out.
#[test]
fn test_export_url_and_editable_requirements() {
    let (_temp_dir, project_dir) = create_test_project(vec![(
        "requirements.txt",
        "git+https://github.com/Drakkar-Software/Async-Channel.git#egg=async-channel\n-e ./vendored/local-pkg\n",
    )]);

    let manifests = manifest::scan(&project_dir).unwrap();
    let pyproject_path = export::export_pyproject(&project_dir, &manifests, &[]).unwrap();

    let content = fs::read_to_string(&pyproject_path).unwrap();
    assert!(content
        .contains("async-channel @ git+https://github.com/Drakkar-Software/Async-Channel.git#egg=async-channel"));
    assert!(!content.contains("local-pkg"));
}
