//! Demo inventory file loading

use std::path::Path;

use dashops_domain::{DashOpsError, InventoryFile, Result};

use crate::errors::InfraError;

/// Read and validate the demo inventory (`sites` table), TOML or JSON by
/// extension.
///
/// # Errors
/// `NotFound`/`Io` when the file cannot be read, `InvalidInput` when it does
/// not parse or fails validation.
pub fn load_inventory(path: &Path) -> Result<InventoryFile> {
    let contents = std::fs::read_to_string(path).map_err(|err| DashOpsError::from(InfraError::from(err)))?;
    let inventory = parse_inventory(&contents, path)?;
    inventory.validate()?;
    tracing::info!(path = %path.display(), sites = inventory.sites.len(), "inventory loaded");
    Ok(inventory)
}

fn parse_inventory(contents: &str, path: &Path) -> Result<InventoryFile> {
    let invalid = |e: &dyn std::fmt::Display| {
        DashOpsError::InvalidInput(format!("inventory {}: {e}", path.display()))
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(contents).map_err(|e| invalid(&e)),
        _ => toml::from_str(contents).map_err(|e| invalid(&e)),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const SITES: &str = r#"
[[sites]]
site = 1
location = "San Francisco, CA"
time_zone = "America/Los_Angeles"
mx_serial = "Q2MX-0001"
ms_serial = "Q2MS-0001"
mgmt_vlan = 1
ms_ip = "10.1.1.2"

[[sites]]
site = 2
location = "Austin, TX"
time_zone = "America/Chicago"
address = "500 W 2nd St"
mgmt_vlan = 20
"#;

    #[test]
    fn loads_toml_sites_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(&path, SITES).unwrap();

        let inventory = load_inventory(&path).unwrap();
        assert_eq!(inventory.sites.len(), 2);
        assert_eq!(inventory.network_names(), vec!["Demo San Francisco - CA", "Demo Austin - TX"]);
        assert_eq!(inventory.sites[1].address.as_deref(), Some("500 W 2nd St"));
    }

    #[test]
    fn loads_json_sites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(
            &path,
            r#"{"sites": [{"site": 3, "location": "Denver", "time_zone": "America/Denver", "mgmt_vlan": 1}]}"#,
        )
        .unwrap();

        assert_eq!(load_inventory(&path).unwrap().sites[0].site, 3);
    }

    #[test]
    fn duplicate_site_numbers_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(&path, SITES.replace("site = 2", "site = 1")).unwrap();

        assert!(matches!(load_inventory(&path), Err(DashOpsError::InvalidInput(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_inventory(Path::new("/nonexistent/inventory.toml")).unwrap_err();
        assert!(matches!(err, DashOpsError::NotFound(_)));
    }
}
