mod duplicates;
mod pins;
mod ranges;
mod unpinned;

pub use duplicates::DuplicateCheck;
pub use pins::PinCheck;
pub use ranges::RangeCheck;
pub use unpinned::UnpinnedCheck;

use crate::models::{Finding, Manifest, Severity};
use log::debug;

/// A structural check over parsed manifests
pub trait Check {
    /// Identifier used in log output
    fn name(&self) -> &'static str;

    /// Runs the check and returns its findings
    fn run(&self, manifests: &[Manifest]) -> Vec<Finding>;
}

/// The built-in checks in execution order
pub fn builtin_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(DuplicateCheck),
        Box::new(PinCheck),
        Box::new(RangeCheck),
        Box::new(UnpinnedCheck),
    ]
}

/// Runs every built-in check over the manifests
///
/// Parse-time findings (malformed lines, missing includes) are carried into
/// the result ahead of the check findings, then everything is sorted by
/// location for reporting.
pub fn run_audit(manifests: &[Manifest]) -> Vec<Finding> {
    let mut findings: Vec<Finding> = manifests
        .iter()
        .flat_map(|manifest| manifest.findings.iter().cloned())
        .collect();

    for check in builtin_checks() {
        let mut produced = check.run(manifests);
        debug!("Check '{}' produced {} findings", check.name(), produced.len());
        findings.append(&mut produced);
    }

    findings.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    findings
}

/// Whether any finding is an error
pub fn has_errors(findings: &[Finding]) -> bool {
    findings
        .iter()
        .any(|finding| finding.severity == Severity::Error)
}
