//! Wire contract for the table document.
//!
//! One document shape is shared by the bundled asset, the persisted cache
//! file, and the remote endpoint:
//!
//! ```json
//! { "deviceTypes": { "<prefix>": "<familyName>" },
//!   "devices": { "<familyName>": [ { "<modelSuffix>": { "name": "...", "type": "..." } } ] } }
//! ```
//!
//! These are transport types; adapters hand them to the core, which converts
//! them into the domain [`LookupTable`] at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{LookupTable, ModelEntry};

/// The `name`/`type` fields of a single model record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFields {
    /// Marketing name.
    pub name: String,
    /// Optional variant label.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
}

/// One element of a family's model list: a map from identifier suffix to its
/// fields. By convention each record holds a single key; multi-key records
/// are tolerated and flattened in key order.
pub type ModelRecord = BTreeMap<String, ModelFields>;

/// The versioned lookup document as it appears on the wire and on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Family prefix → family display name.
    #[serde(rename = "deviceTypes")]
    pub device_types: BTreeMap<String, String>,
    /// Family display name → ordered model records.
    pub devices: BTreeMap<String, Vec<ModelRecord>>,
}

impl From<&TableDocument> for LookupTable {
    fn from(document: &TableDocument) -> Self {
        let models = document
            .devices
            .iter()
            .map(|(family_name, records)| {
                let entries = records
                    .iter()
                    .flat_map(|record| {
                        record.iter().map(|(suffix, fields)| ModelEntry {
                            suffix: suffix.clone(),
                            name: fields.name.clone(),
                            type_label: fields.type_label.clone(),
                        })
                    })
                    .collect();
                (family_name.clone(), entries)
            })
            .collect();
        Self::new(document.device_types.clone(), models)
    }
}

impl From<TableDocument> for LookupTable {
    fn from(document: TableDocument) -> Self {
        Self::from(&document)
    }
}
