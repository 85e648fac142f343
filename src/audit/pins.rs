use super::Check;
use crate::models::{Finding, Manifest};
use crate::version::Operator;

/// Validates that every version written in a specifier parses as PEP 440
///
/// `===` is exempt: arbitrary equality accepts any text by definition.
pub struct PinCheck;

impl Check for PinCheck {
    fn name(&self) -> &'static str {
        "pins"
    }

    fn run(&self, manifests: &[Manifest]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for manifest in manifests {
            for requirement in &manifest.requirements {
                for specifier in requirement.specifiers.iter() {
                    if specifier.op() == Operator::ArbitraryEqual {
                        continue;
                    }
                    if specifier.version().is_err() {
                        findings.push(Finding::error(
                            manifest.path.clone(),
                            Some(requirement.line),
                            "invalid-version",
                            format!(
                                "invalid version '{}' in constraint for '{}'",
                                specifier.version_text(),
                                requirement.name
                            ),
                        ));
                    }
                }
            }
        }

        findings
    }
}
