use std::collections::BTreeMap;

/// Built-in metadata type to source folder mappings.
const DEFAULT_FOLDERS: &[(&str, &str)] = &[
    ("ApexClass", "classes"),
    ("ApexComponent", "components"),
    ("ApexPage", "pages"),
    ("ApexTrigger", "triggers"),
    ("ApprovalProcess", "approvalProcesses"),
    ("AuraDefinitionBundle", "aura"),
    ("ContentAsset", "contentassets"),
    ("CustomApplication", "applications"),
    ("CustomLabels", "labels"),
    ("CustomMetadata", "customMetadata"),
    ("CustomObject", "objects"),
    ("CustomObjectTranslation", "objectTranslations"),
    ("CustomPermission", "customPermissions"),
    ("CustomTab", "tabs"),
    ("Dashboard", "dashboards"),
    ("Document", "documents"),
    ("EmailTemplate", "email"),
    ("FlexiPage", "flexipages"),
    ("Flow", "flows"),
    ("GlobalValueSet", "globalValueSets"),
    ("Layout", "layouts"),
    ("LightningComponentBundle", "lwc"),
    ("PermissionSet", "permissionsets"),
    ("Profile", "profiles"),
    ("QuickAction", "quickActions"),
    ("RemoteSiteSetting", "remoteSiteSettings"),
    ("Report", "reports"),
    ("ReportType", "reportTypes"),
    ("StaticResource", "staticresources"),
    ("Translations", "translations"),
    ("Workflow", "workflows"),
];

/// Lookup table translating manifest metadata types into source folder names.
#[derive(Debug, Clone)]
pub struct FolderCatalog {
    folders: BTreeMap<String, String>,
}

impl FolderCatalog {
    /// Built-in table with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut catalog = Self::default();
        for (metadata_type, folder) in overrides {
            catalog
                .folders
                .insert(metadata_type.clone(), folder.trim_matches('/').to_string());
        }
        catalog
    }

    /// Folder holding components of `metadata_type`, if known.
    pub fn folder_for(&self, metadata_type: &str) -> Option<&str> {
        self.folders.get(metadata_type).map(String::as_str)
    }
}

impl Default for FolderCatalog {
    fn default() -> Self {
        Self {
            folders: DEFAULT_FOLDERS
                .iter()
                .map(|(metadata_type, folder)| (metadata_type.to_string(), folder.to_string()))
                .collect(),
        }
    }
}
