use super::Check;
use crate::models::{Finding, Manifest};

/// Warns about registry requirements with no version constraint
///
/// A bare name is legal manifest syntax; it just installs whatever the index
/// serves that day.
pub struct UnpinnedCheck;

impl Check for UnpinnedCheck {
    fn name(&self) -> &'static str {
        "unpinned"
    }

    fn run(&self, manifests: &[Manifest]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for manifest in manifests {
            for requirement in &manifest.requirements {
                if requirement.is_unconstrained() {
                    findings.push(Finding::warning(
                        manifest.path.clone(),
                        Some(requirement.line),
                        "unpinned",
                        format!("no version constraint for '{}'", requirement.name),
                    ));
                }
            }
        }

        findings
    }
}
