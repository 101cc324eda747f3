use std::io::Write;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::IgnoredAny,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    dynamic_object::{DynamicList, DynamicObject},
    error::{DecodeError, EncodeError},
    gvk::GroupVersionKind,
    nested,
    runtime_object::{RuntimeObject, VersionedObjects, gvk_of_value},
};

/// Probe envelope: classification only cares whether a TOP-LEVEL `items`
/// key is present. An explicit `"items": null` still counts as present, so
/// presence is recorded through a custom deserializer instead of an
/// `Option` (which would fold null into absent).
#[derive(Default, Deserialize)]
#[serde(default)]
struct ListProbe {
    #[serde(deserialize_with = "key_present")]
    items: bool,
}

fn key_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ListItems {
    items: Option<Vec<Map<String, Value>>>,
}

/// Classifies `data` by probing for a top-level `items` field and decodes
/// it as a single object or a list accordingly. A decode that produces an
/// object with no kind fails with [`DecodeError::MissingKind`], which still
/// carries the partially decoded object for inspection.
pub fn decode(data: &[u8]) -> Result<(RuntimeObject, GroupVersionKind), DecodeError> {
    let object = decode_any(data)?;

    let gvk = object.group_version_kind();
    if gvk.kind.is_empty() {
        return Err(DecodeError::MissingKind {
            object: Some(Box::new(object)),
            gvk,
        });
    }

    Ok((object, gvk))
}

pub enum DecodeTarget<'a> {
    Object(&'a mut DynamicObject),
    List(&'a mut DynamicList),
    Versioned(&'a mut VersionedObjects),
    Value(&'a mut Value),
}

/// Decodes into a caller-supplied destination. A fixed [`DecodeTarget::Object`]
/// or [`DecodeTarget::List`] skips the probe and overwrites the target's
/// storage; [`DecodeTarget::Versioned`] runs the probe-based decode and
/// records the result as the sole entry; [`DecodeTarget::Value`] is plain
/// structural unmarshalling with no shape inference. On
/// [`DecodeError::MissingKind`] the partial state stays in the target.
pub fn decode_into(
    data: &[u8],
    target: DecodeTarget<'_>,
) -> Result<GroupVersionKind, DecodeError> {
    let gvk = match target {
        DecodeTarget::Object(object) => {
            *object = decode_object(data)?;
            object.group_version_kind()
        }
        DecodeTarget::List(list) => {
            *list = decode_list(data)?;
            list.group_version_kind()
        }
        DecodeTarget::Versioned(versioned) => {
            let decoded = decode_any(data)?;
            let gvk = decoded.group_version_kind();
            versioned.objects = vec![decoded];
            gvk
        }
        DecodeTarget::Value(value) => {
            *value = serde_json::from_slice(data)?;
            gvk_of_value(value)
        }
    };

    if gvk.kind.is_empty() {
        return Err(DecodeError::MissingKind { object: None, gvk });
    }

    Ok(gvk)
}

fn decode_any(data: &[u8]) -> Result<RuntimeObject, DecodeError> {
    let probe: ListProbe = serde_json::from_slice(data)?;

    if probe.items {
        debug!("payload carries a top-level items field, decoding as a list");
        return Ok(RuntimeObject::List(decode_list(data)?));
    }

    Ok(RuntimeObject::Object(decode_object(data)?))
}

fn decode_object(data: &[u8]) -> Result<DynamicObject, DecodeError> {
    let object: Map<String, Value> = serde_json::from_slice(data)?;
    Ok(DynamicObject { object })
}

fn decode_list(data: &[u8]) -> Result<DynamicList, DecodeError> {
    let envelope: ListItems = serde_json::from_slice(data)?;
    let mut object: Map<String, Value> = serde_json::from_slice(data)?;

    let list_api_version = nested::nested_string(&object, &["apiVersion"]).unwrap_or_default();
    let list_kind = nested::nested_string(&object, &["kind"]).unwrap_or_default();
    let item_kind = list_kind.strip_suffix("List").unwrap_or(&list_kind).to_string();

    object.remove("items");

    let raw_items = envelope.items.unwrap_or_default();
    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let mut item = DynamicObject { object: raw };
        // Typed list payloads often omit each item's kind and apiVersion;
        // infer them from the list, and only when BOTH are missing.
        if item.kind().is_empty() && item.api_version().is_empty() {
            item.set_kind(&item_kind);
            item.set_api_version(&list_api_version);
        }
        items.push(item);
    }

    Ok(DynamicList { object, items })
}

/// Serializes by shape: an object writes its backing mapping, a list writes
/// a synthetic envelope projecting its items back under an `items` key, raw
/// bytes pass through unchanged, and anything else goes through the general
/// structural serializer.
pub fn encode<W: Write>(
    object: &RuntimeObject,
    mut writer: W,
) -> Result<(), EncodeError> {
    match object {
        RuntimeObject::Object(object) => Ok(serde_json::to_writer(writer, &object.object)?),
        RuntimeObject::List(list) => Ok(serde_json::to_writer(writer, &ListEnvelope(list))?),
        RuntimeObject::Unknown(unknown) => Ok(writer.write_all(&unknown.raw)?),
        RuntimeObject::Other(value) => Ok(serde_json::to_writer(writer, value)?),
    }
}

struct ListEnvelope<'a>(&'a DynamicList);

impl Serialize for ListEnvelope<'_> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.object.len() + 1))?;
        for (key, value) in &self.0.object {
            // A stale items key in the backing mapping must not shadow the
            // projected item sequence.
            if key == "items" {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("items", &ItemObjects(&self.0.items))?;
        map.end()
    }
}

struct ItemObjects<'a>(&'a [DynamicObject]);

impl Serialize for ItemObjects<'_> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&item.object)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        dynamic_object::{DynamicList, DynamicObject},
        error::DecodeError,
        runtime_object::{RuntimeObject, Unknown, VersionedObjects},
    };

    use super::{DecodeTarget, decode, decode_into, encode};

    #[test]
    fn decodes_single_object() {
        let data = br#"{"kind":"Pod","apiVersion":"v1","metadata":{"name":"a"}}"#;

        let (object, gvk) = decode(data).expect("must decode single object");

        assert_eq!(gvk.kind, "Pod");
        assert_eq!(gvk.version, "v1");
        let RuntimeObject::Object(object) = object else {
            panic!("expected a single object");
        };
        assert_eq!(object.name(), "a");
    }

    #[test]
    fn probe_detects_top_level_items_only() {
        let data = br#"{"kind":"Pod","apiVersion":"v1","spec":{"items":[1,2]}}"#;

        let (object, _) = decode(data).expect("must decode");
        assert!(matches!(object, RuntimeObject::Object(_)));
    }

    #[test]
    fn list_items_inherit_descriptor_only_when_both_fields_are_empty() {
        let data = br#"{"kind":"PodList","apiVersion":"v1","items":[{"metadata":{"name":"a"}},{"kind":"Node","metadata":{"name":"b"}}]}"#;

        let (object, gvk) = decode(data).expect("must decode list");

        assert_eq!(gvk.kind, "PodList");
        let RuntimeObject::List(list) = object else {
            panic!("expected a list");
        };

        assert_eq!(list.items[0].kind(), "Pod");
        assert_eq!(list.items[0].api_version(), "v1");
        assert_eq!(list.items[1].kind(), "Node");
        assert_eq!(list.items[1].api_version(), "");
    }

    #[test]
    fn list_mapping_no_longer_contains_the_items_key() {
        let data = br#"{"kind":"PodList","apiVersion":"v1","items":[{"metadata":{"name":"a"}}]}"#;

        let (object, _) = decode(data).expect("must decode list");
        let RuntimeObject::List(list) = object else {
            panic!("expected a list");
        };

        assert!(!list.object.contains_key("items"));
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn null_items_decode_as_empty_list() {
        let data = br#"{"kind":"PodList","apiVersion":"v1","items":null}"#;

        let (object, _) = decode(data).expect("must decode list");
        let RuntimeObject::List(list) = object else {
            panic!("expected a list");
        };
        assert!(list.items.is_empty());
    }

    #[test]
    fn missing_kind_still_exposes_the_partial_object() {
        let data = br#"{"metadata":{"name":"a"}}"#;

        let err = decode(data).expect_err("decode must fail without a kind");
        let DecodeError::MissingKind { object, gvk } = err else {
            panic!("expected a missing-kind failure");
        };

        assert!(gvk.kind.is_empty());
        let Some(partial) = object else {
            panic!("partial object must ride along");
        };
        let RuntimeObject::Object(partial) = *partial else {
            panic!("partial must be a single object");
        };
        assert_eq!(partial.name(), "a");
    }

    #[test]
    fn malformed_payload_propagates_the_parse_error() {
        let err = decode(b"{\"kind\":").expect_err("must reject malformed payload");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn non_mapping_root_is_malformed() {
        let err = decode(b"[1,2,3]").expect_err("must reject a non-mapping root");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn decode_into_fixed_object_target_skips_the_probe() {
        // A payload with a top-level items key still decodes as a single
        // object when the caller fixed the target shape.
        let data = br#"{"kind":"Config","apiVersion":"v1","items":[1]}"#;
        let mut target = DynamicObject::default();

        let gvk = decode_into(data, DecodeTarget::Object(&mut target))
            .expect("must decode into fixed object target");

        assert_eq!(gvk.kind, "Config");
        assert_eq!(target.object["items"], json!([1]));
    }

    #[test]
    fn decode_into_list_target_overwrites_previous_storage() {
        let mut target = DynamicList::default();
        decode_into(
            br#"{"kind":"NodeList","apiVersion":"v1","items":[{"metadata":{"name":"old"}}]}"#,
            DecodeTarget::List(&mut target),
        )
        .expect("must decode first list");

        decode_into(
            br#"{"kind":"PodList","apiVersion":"v1","items":[{"metadata":{"name":"a"}}]}"#,
            DecodeTarget::List(&mut target),
        )
        .expect("must decode second list");

        assert_eq!(target.kind(), "PodList");
        assert_eq!(target.items.len(), 1);
        assert_eq!(target.items[0].name(), "a");
    }

    #[test]
    fn decode_into_versioned_target_records_a_sole_entry() {
        let mut target = VersionedObjects::default();

        let gvk = decode_into(
            br#"{"kind":"Pod","apiVersion":"v1","metadata":{"name":"a"}}"#,
            DecodeTarget::Versioned(&mut target),
        )
        .expect("must decode into versioned container");

        assert_eq!(gvk.kind, "Pod");
        assert_eq!(target.objects.len(), 1);
        assert!(matches!(target.objects[0], RuntimeObject::Object(_)));
    }

    #[test]
    fn decode_into_value_target_is_plain_unmarshalling() {
        let mut target = Value::Null;

        let gvk = decode_into(
            br#"{"kind":"PodList","apiVersion":"v1","items":[]}"#,
            DecodeTarget::Value(&mut target),
        )
        .expect("must unmarshal into value target");

        // No shape inference: the items key stays where the payload put it.
        assert_eq!(gvk.kind, "PodList");
        assert_eq!(target["items"], json!([]));
    }

    #[test]
    fn decode_into_reports_missing_kind_but_keeps_the_target_populated() {
        let mut target = DynamicObject::default();

        let err = decode_into(
            br#"{"metadata":{"name":"a"}}"#,
            DecodeTarget::Object(&mut target),
        )
        .expect_err("must fail without a kind");

        assert!(matches!(err, DecodeError::MissingKind { object: None, .. }));
        assert_eq!(target.name(), "a");
    }

    #[test]
    fn encode_writes_a_single_object_mapping() {
        let data = br#"{"kind":"Pod","apiVersion":"v1","metadata":{"name":"a"}}"#;
        let (object, _) = decode(data).expect("must decode");

        let mut out = Vec::new();
        encode(&object, &mut out).expect("must encode");

        let reparsed: Value = serde_json::from_slice(&out).expect("encoded bytes must be json");
        assert_eq!(reparsed["kind"], "Pod");
        assert_eq!(reparsed["metadata"]["name"], "a");
    }

    #[test]
    fn encode_projects_list_items_under_a_synthetic_items_key() {
        let list = DynamicList {
            object: json!({"kind": "PodList", "apiVersion": "v1"})
                .as_object()
                .expect("fixture must be a mapping")
                .clone(),
            items: vec![DynamicObject {
                object: json!({"kind": "Pod", "metadata": {"name": "a"}})
                    .as_object()
                    .expect("fixture must be a mapping")
                    .clone(),
            }],
        };

        let mut out = Vec::new();
        encode(&RuntimeObject::List(list), &mut out).expect("must encode list");

        let reparsed: Value = serde_json::from_slice(&out).expect("encoded bytes must be json");
        assert_eq!(reparsed["kind"], "PodList");
        assert_eq!(reparsed["items"][0]["metadata"]["name"], "a");
    }

    #[test]
    fn encode_passes_unknown_bytes_through_unchanged() {
        let raw = b"not even json".to_vec();
        let mut out = Vec::new();

        encode(&RuntimeObject::Unknown(Unknown { raw: raw.clone() }), &mut out)
            .expect("passthrough must not fail");

        assert_eq!(out, raw);
    }

    #[test]
    fn encode_serializes_other_shapes_structurally() {
        let mut out = Vec::new();
        encode(&RuntimeObject::Other(json!([1, 2, 3])), &mut out).expect("must encode");
        assert_eq!(out, b"[1,2,3]");
    }
}
