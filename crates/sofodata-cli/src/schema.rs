//! Implementation of the `sofodata schema` command.

use anyhow::{Context, Result};
use sofodata_core::{infer_column_headers, Table};
use std::path::Path;

/// Print the inferred column headers of a CSV file as JSON.
pub fn print_schema(path: &Path) -> Result<()> {
    println!("{}", column_headers_json(path)?);
    Ok(())
}

fn column_headers_json(path: &Path) -> Result<String> {
    let table = Table::read_csv(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let headers = infer_column_headers(table.schema());
    Ok(serde_json::to_string_pretty(&headers)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_column_headers_from_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "player,active,score,games\nann,true,1.5,3\nbo,false,2.25,7\n")
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&column_headers_json(&path).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "player", "type": "STRING", "indexed": true},
                {"name": "active", "type": "BOOLEAN", "indexed": false},
                {"name": "score", "type": "DECIMAL", "indexed": false},
                {"name": "games", "type": "NUMBER", "indexed": false}
            ])
        );
    }
}
