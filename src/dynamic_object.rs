use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{gvk::GroupVersionKind, nested};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicObject {
    pub object: Map<String, Value>,
}

impl DynamicObject {
    pub fn kind(&self) -> String {
        self.string_or_empty(&["kind"])
    }

    pub fn set_kind(
        &mut self,
        kind: &str,
    ) {
        self.set_string(kind, &["kind"]);
    }

    pub fn api_version(&self) -> String {
        self.string_or_empty(&["apiVersion"])
    }

    pub fn set_api_version(
        &mut self,
        api_version: &str,
    ) {
        self.set_string(api_version, &["apiVersion"]);
    }

    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version_and_kind(&self.api_version(), &self.kind())
    }

    pub fn set_group_version_kind(
        &mut self,
        gvk: &GroupVersionKind,
    ) {
        self.set_api_version(&gvk.api_version());
        self.set_kind(&gvk.kind);
    }

    pub fn name(&self) -> String {
        self.string_or_empty(&["metadata", "name"])
    }

    pub fn set_name(
        &mut self,
        name: &str,
    ) {
        self.set_string(name, &["metadata", "name"]);
    }

    pub fn namespace(&self) -> String {
        self.string_or_empty(&["metadata", "namespace"])
    }

    pub fn set_namespace(
        &mut self,
        namespace: &str,
    ) {
        self.set_string(namespace, &["metadata", "namespace"]);
    }

    pub fn uid(&self) -> String {
        self.string_or_empty(&["metadata", "uid"])
    }

    pub fn set_uid(
        &mut self,
        uid: &str,
    ) {
        self.set_string(uid, &["metadata", "uid"]);
    }

    pub fn labels(&self) -> Option<BTreeMap<String, String>> {
        nested::nested_string_map(&self.object, &["metadata", "labels"])
    }

    pub fn set_labels(
        &mut self,
        labels: BTreeMap<String, String>,
    ) {
        nested::set_nested_string_map(&mut self.object, labels, &["metadata", "labels"]);
    }

    pub fn annotations(&self) -> Option<BTreeMap<String, String>> {
        nested::nested_string_map(&self.object, &["metadata", "annotations"])
    }

    pub fn set_annotations(
        &mut self,
        annotations: BTreeMap<String, String>,
    ) {
        nested::set_nested_string_map(&mut self.object, annotations, &["metadata", "annotations"]);
    }

    pub fn owner_references(&self) -> Vec<OwnerReference> {
        let Some(entries) = nested::nested_field(&self.object, &["metadata", "ownerReferences"])
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(Value::as_object)
            .map(extract_owner_reference)
            .collect()
    }

    pub fn set_owner_references(
        &mut self,
        references: &[OwnerReference],
    ) {
        let entries = references
            .iter()
            .filter_map(|reference| serde_json::to_value(reference).ok())
            .collect();
        nested::set_nested_slice(&mut self.object, entries, &["metadata", "ownerReferences"]);
    }

    fn string_or_empty(
        &self,
        path: &[&str],
    ) -> String {
        nested::nested_string(&self.object, path).unwrap_or_default()
    }

    fn set_string(
        &mut self,
        value: &str,
        path: &[&str],
    ) {
        nested::set_nested_field(&mut self.object, Value::String(value.to_string()), path);
    }
}

/// The `controller` and `blockOwnerDeletion` flags stay optional: an absent
/// flag is not the same owner reference as an explicit `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

fn extract_owner_reference(entry: &Map<String, Value>) -> OwnerReference {
    OwnerReference {
        api_version: nested::nested_string(entry, &["apiVersion"]).unwrap_or_default(),
        kind: nested::nested_string(entry, &["kind"]).unwrap_or_default(),
        name: nested::nested_string(entry, &["name"]).unwrap_or_default(),
        uid: nested::nested_string(entry, &["uid"]).unwrap_or_default(),
        controller: nested::nested_bool(entry, &["controller"]),
        block_owner_deletion: nested::nested_bool(entry, &["blockOwnerDeletion"]),
    }
}

/// A decoded resource list. `object` holds the list's own fields and never
/// contains an `items` key after decode; the members live in `items`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicList {
    pub object: Map<String, Value>,
    pub items: Vec<DynamicObject>,
}

impl DynamicList {
    pub fn kind(&self) -> String {
        nested::nested_string(&self.object, &["kind"]).unwrap_or_default()
    }

    pub fn set_kind(
        &mut self,
        kind: &str,
    ) {
        nested::set_nested_field(&mut self.object, Value::String(kind.to_string()), &["kind"]);
    }

    pub fn api_version(&self) -> String {
        nested::nested_string(&self.object, &["apiVersion"]).unwrap_or_default()
    }

    pub fn set_api_version(
        &mut self,
        api_version: &str,
    ) {
        nested::set_nested_field(
            &mut self.object,
            Value::String(api_version.to_string()),
            &["apiVersion"],
        );
    }

    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version_and_kind(&self.api_version(), &self.kind())
    }

    pub fn set_group_version_kind(
        &mut self,
        gvk: &GroupVersionKind,
    ) {
        self.set_api_version(&gvk.api_version());
        self.set_kind(&gvk.kind);
    }
}
