use serde_json::Value;

use crate::{
    dynamic_object::{DynamicList, DynamicObject},
    gvk::GroupVersionKind,
    nested,
};

/// An opaque byte-carrying payload. Encoding writes the stored bytes through
/// unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unknown {
    pub raw: Vec<u8>,
}

/// Multi-candidate decode container: a probe-based decode into it records
/// the single resulting object as the sole entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VersionedObjects {
    pub objects: Vec<RuntimeObject>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeObject {
    Object(DynamicObject),
    List(DynamicList),
    Unknown(Unknown),
    Other(Value),
}

impl RuntimeObject {
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Object(_) => "dynamic object",
            Self::List(_) => "dynamic list",
            Self::Unknown(_) => "raw bytes",
            Self::Other(_) => "generic value",
        }
    }

    pub fn group_version_kind(&self) -> GroupVersionKind {
        match self {
            Self::Object(object) => object.group_version_kind(),
            Self::List(list) => list.group_version_kind(),
            Self::Unknown(_) => GroupVersionKind::default(),
            Self::Other(value) => gvk_of_value(value),
        }
    }

    pub fn set_group_version_kind(
        &mut self,
        gvk: &GroupVersionKind,
    ) {
        match self {
            Self::Object(object) => object.set_group_version_kind(gvk),
            Self::List(list) => list.set_group_version_kind(gvk),
            Self::Unknown(_) => {}
            Self::Other(value) => {
                if let Value::Object(map) = value {
                    nested::set_nested_field(
                        map,
                        Value::String(gvk.api_version()),
                        &["apiVersion"],
                    );
                    nested::set_nested_field(map, Value::String(gvk.kind.clone()), &["kind"]);
                }
            }
        }
    }
}

pub(crate) fn gvk_of_value(value: &Value) -> GroupVersionKind {
    match value.as_object() {
        Some(map) => GroupVersionKind::from_api_version_and_kind(
            &nested::nested_string(map, &["apiVersion"]).unwrap_or_default(),
            &nested::nested_string(map, &["kind"]).unwrap_or_default(),
        ),
        None => GroupVersionKind::default(),
    }
}
