use super::Check;
use crate::models::{Finding, Manifest};
use crate::version::Operator;

/// Verifies that each requirement's constraints admit at least one version
///
/// Requirements with an invalid version in any ordered specifier are skipped
/// here; `PinCheck` already reports those and an interval over unparseable
/// versions is meaningless.
pub struct RangeCheck;

impl Check for RangeCheck {
    fn name(&self) -> &'static str {
        "ranges"
    }

    fn run(&self, manifests: &[Manifest]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for manifest in manifests {
            for requirement in &manifest.requirements {
                let parseable = requirement.specifiers.iter().all(|specifier| {
                    specifier.op() == Operator::ArbitraryEqual || specifier.version().is_ok()
                });
                if !parseable {
                    continue;
                }

                match requirement.specifiers.is_satisfiable() {
                    Ok(true) => {}
                    Ok(false) => {
                        findings.push(Finding::error(
                            manifest.path.clone(),
                            Some(requirement.line),
                            "unsatisfiable",
                            format!(
                                "constraints '{}' for '{}' have no satisfying version",
                                requirement.specifiers, requirement.name
                            ),
                        ));
                    }
                    // A constraint that cannot form an interval, e.g. `~=`
                    // with a single release segment
                    Err(e) => {
                        findings.push(Finding::error(
                            manifest.path.clone(),
                            Some(requirement.line),
                            "specifier",
                            format!("{}", e),
                        ));
                    }
                }
            }
        }

        findings
    }
}
