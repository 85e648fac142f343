use super::Check;
use crate::models::{Finding, Manifest, RequirementGroup};
use std::collections::HashMap;
use std::path::PathBuf;

/// Flags package names listed more than once within a requirement group
///
/// Names compare in normalized form, so `OctoBot-Commons` and
/// `octobot_commons` collide. A dev group may repeat a main requirement;
/// that is how split requirements files legitimately work.
pub struct DuplicateCheck;

impl Check for DuplicateCheck {
    fn name(&self) -> &'static str {
        "duplicates"
    }

    fn run(&self, manifests: &[Manifest]) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut seen: HashMap<(RequirementGroup, String), (PathBuf, usize)> = HashMap::new();

        for manifest in manifests {
            for requirement in &manifest.requirements {
                let key = (requirement.group.clone(), requirement.normalized_name());
                match seen.get(&key) {
                    Some((first_file, first_line)) => {
                        findings.push(Finding::error(
                            manifest.path.clone(),
                            Some(requirement.line),
                            "duplicate",
                            format!(
                                "'{}' already listed at {}:{}",
                                requirement.name,
                                first_file.display(),
                                first_line
                            ),
                        ));
                    }
                    None => {
                        seen.insert(key, (manifest.path.clone(), requirement.line));
                    }
                }
            }
        }

        findings
    }
}
