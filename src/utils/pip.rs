use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Reads extra package index URLs from the user's global pip configuration
///
/// Both `index-url` and `extra-index-url` keys count; a missing pip.conf is
/// not an error.
pub fn parse_pip_conf() -> Result<Vec<String>> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| Error::General("Unable to determine home directory".to_string()))?;
    let pip_conf_path = home_dir.join(".pip").join("pip.conf");

    if !pip_conf_path.exists() {
        return Ok(vec![]);
    }

    let file = File::open(&pip_conf_path).map_err(|e| Error::FileOperation {
        path: pip_conf_path.clone(),
        message: format!("failed to open pip.conf: {}", e),
    })?;
    let reader = BufReader::new(file);

    let mut urls = vec![];
    for line in reader.lines() {
        let line = line.map_err(|e| Error::FileOperation {
            path: pip_conf_path.clone(),
            message: format!("failed to read line from pip.conf: {}", e),
        })?;
        let trimmed = line.trim();
        if trimmed.starts_with("extra-index-url") || trimmed.starts_with("index-url") {
            if let Some((_, value)) = trimmed.split_once('=') {
                let value = value.trim();
                if !value.is_empty() {
                    urls.push(value.to_string());
                }
            }
        }
    }

    Ok(urls)
}
