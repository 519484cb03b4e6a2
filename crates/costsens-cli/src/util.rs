use anyhow::Result;
use std::path::Path;

/// Delimiter implied by a data file's extension.
pub fn delimiter_for(path: &Path) -> Option<char> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") => Some(','),
        Some("tsv") | Some("tab") => Some('\t'),
        _ => None,
    }
}

pub fn validate_data_file(path: &Path) -> Result<()> {
    if delimiter_for(path).is_none() {
        anyhow::bail!(
            "Data file must have a .csv or .tsv extension: {}",
            path.display()
        );
    }
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    Ok(())
}
