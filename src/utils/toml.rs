use std::{fs, path::Path};

use crate::error::{Error, Result};
use toml_edit::{DocumentMut, Item, Table};

/// Updates or creates a section in a TOML document.
pub fn update_section(doc: &mut DocumentMut, section_path: &[&str], content: Item) {
    let mut current = doc.as_table_mut();

    for &section in &section_path[..section_path.len() - 1] {
        if !current.contains_key(section) {
            let mut new_table = Table::new();
            new_table.set_implicit(true);
            current.insert(section, Item::Table(new_table));
        }
        current = match current[section].as_table_mut() {
            Some(table) => table,
            None => return,
        };
    }

    if let Some(last_section) = section_path.last() {
        current.insert(last_section, content);
    }
}

/// Writes a TOML document to a file, removing any empty sections first.
pub fn write_toml(path: &Path, doc: &mut DocumentMut) -> Result<()> {
    cleanup_empty_sections(doc);
    fs::write(path, doc.to_string()).map_err(|e| Error::FileOperation {
        path: path.to_path_buf(),
        message: format!("failed to write TOML file: {}", e),
    })
}

/// Removes empty sections from a TOML document recursively.
fn cleanup_empty_sections(doc: &mut DocumentMut) {
    cleanup_table(doc.as_table_mut());
}

fn cleanup_table(table: &mut Table) {
    let nested_keys: Vec<String> = table
        .iter()
        .filter(|(_, value)| value.is_table())
        .map(|(key, _)| key.to_string())
        .collect();

    for key in &nested_keys {
        if let Some(nested) = table.get_mut(key).and_then(Item::as_table_mut) {
            cleanup_table(nested);
        }
    }

    let empty_keys: Vec<String> = table
        .iter()
        .filter(|(_, value)| matches!(value, Item::Table(t) if t.is_empty()))
        .map(|(key, _)| key.to_string())
        .collect();

    for key in empty_keys {
        table.remove(&key);
    }
}
