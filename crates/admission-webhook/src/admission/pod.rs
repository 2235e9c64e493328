use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;

use crate::errors::{AdmissionError, Result};

/// The part of a Pod the policies look at. Never mutated: changes are
/// expressed as JSON Patch documents.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl Pod {
    pub fn from_raw(object: Option<&RawExtension>) -> Result<Pod> {
        let raw = object.ok_or_else(|| {
            AdmissionError::TargetParse("request does not carry an object".to_owned())
        })?;
        serde_json::from_value(raw.0.clone())
            .map_err(|e| AdmissionError::TargetParse(e.to_string()))
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.labels.as_ref()
    }
}
