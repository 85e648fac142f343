use crate::error::{Error, Result};
use crate::models::{Finding, Manifest, Severity};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format of the audit report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => Err(Error::General(format!(
                "unknown report format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileEntry {
    path: PathBuf,
    group: String,
    requirements: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: usize,
    requirements: usize,
    errors: usize,
    warnings: usize,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    files: Vec<FileEntry>,
    findings: &'a [Finding],
    summary: Summary,
}

fn summarize(manifests: &[Manifest], findings: &[Finding]) -> Summary {
    Summary {
        files: manifests.len(),
        requirements: manifests.iter().map(|m| m.requirements.len()).sum(),
        errors: findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count(),
        warnings: findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count(),
    }
}

/// Renders the audit result in the requested format
pub fn render(manifests: &[Manifest], findings: &[Finding], format: Format) -> Result<String> {
    match format {
        Format::Text => render_text(manifests, findings),
        Format::Json => render_json(manifests, findings),
    }
}

fn render_text(manifests: &[Manifest], findings: &[Finding]) -> Result<String> {
    let summary = summarize(manifests, findings);
    let mut out = String::new();

    for finding in findings {
        writeln!(out, "{}", finding).map_err(|e| Error::General(e.to_string()))?;
    }
    if !findings.is_empty() {
        writeln!(out).map_err(|e| Error::General(e.to_string()))?;
    }

    writeln!(
        out,
        "audited {} requirements across {} files: {} errors, {} warnings",
        summary.requirements, summary.files, summary.errors, summary.warnings
    )
    .map_err(|e| Error::General(e.to_string()))?;

    Ok(out)
}

fn render_json(manifests: &[Manifest], findings: &[Finding]) -> Result<String> {
    let report = Report {
        files: manifests
            .iter()
            .map(|manifest| FileEntry {
                path: manifest.path.clone(),
                group: manifest.group.to_string(),
                requirements: manifest.requirements.len(),
            })
            .collect(),
        findings,
        summary: summarize(manifests, findings),
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| Error::General(format!("failed to serialize report: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Manifest, Requirement, RequirementGroup};
    use std::path::PathBuf;

    fn sample_manifest() -> Manifest {
        let mut manifest = Manifest::new(PathBuf::from("requirements.txt"), RequirementGroup::Main);
        manifest.requirements.push(
            Requirement::new("requests".to_string(), RequirementGroup::Main, 1)
                .with_specifiers("==2.31.0".parse().unwrap()),
        );
        manifest
    }

    #[test]
    fn test_text_summary_line() {
        let manifests = vec![sample_manifest()];
        let rendered = render(&manifests, &[], Format::Text).unwrap();
        assert!(rendered.contains("audited 1 requirements across 1 files: 0 errors, 0 warnings"));
    }

    #[test]
    fn test_json_shape() {
        let manifests = vec![sample_manifest()];
        let finding = Finding::warning(
            PathBuf::from("requirements.txt"),
            Some(3),
            "unpinned",
            "no version constraint for 'websockets'".to_string(),
        );
        let rendered = render(&manifests, &[finding], Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["summary"]["warnings"], 1);
        assert_eq!(value["summary"]["requirements"], 1);
        assert_eq!(value["findings"][0]["code"], "unpinned");
        assert_eq!(value["findings"][0]["severity"], "warning");
        assert_eq!(value["files"][0]["group"], "main");
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!("yaml".parse::<Format>().is_err());
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
    }
}
