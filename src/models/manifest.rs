use super::finding::Finding;
use super::requirement::{Requirement, RequirementGroup};
use std::path::PathBuf;

/// A parsed requirements file
#[derive(Debug)]
pub struct Manifest {
    /// Path of the requirements file
    pub path: PathBuf,

    /// Group derived from the file name (requirements.txt vs requirements-<g>.txt)
    pub group: RequirementGroup,

    /// Requirements in file order
    pub requirements: Vec<Requirement>,

    /// Findings produced while parsing (malformed lines)
    pub findings: Vec<Finding>,

    /// URLs from -i / --index-url lines
    pub index_urls: Vec<String>,

    /// URLs from --extra-index-url lines
    pub extra_index_urls: Vec<String>,
}

impl Manifest {
    pub fn new(path: PathBuf, group: RequirementGroup) -> Self {
        Self {
            path,
            group,
            requirements: Vec::new(),
            findings: Vec::new(),
            index_urls: Vec::new(),
            extra_index_urls: Vec::new(),
        }
    }
}
