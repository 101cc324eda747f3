use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Walks `path` through nested mappings without copying. The returned borrow
/// is tied to `obj`; an explicit null comes back as `Some(&Value::Null)`,
/// a missing key or a non-mapping intermediate as `None`.
pub fn nested_field<'a>(
    obj: &'a Map<String, Value>,
    path: &[&str],
) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = obj.get(*first)?;

    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }

    Some(current)
}

/// Same walk as [`nested_field`], but the result is a full structural copy
/// the caller may mutate or retain.
pub fn nested_field_copy(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<Value> {
    nested_field(obj, path).cloned()
}

pub fn nested_string(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<String> {
    nested_field(obj, path)?.as_str().map(str::to_string)
}

pub fn nested_bool(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<bool> {
    nested_field(obj, path)?.as_bool()
}

/// Succeeds only when the stored number is a float. Whole numbers stored in
/// the integer slot are not widened; callers asking for the wrong numeric
/// width get `None`.
pub fn nested_f64(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<f64> {
    match nested_field(obj, path)? {
        Value::Number(number) if number.is_f64() => number.as_f64(),
        _ => None,
    }
}

pub fn nested_i64(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<i64> {
    match nested_field(obj, path)? {
        Value::Number(number) => number.as_i64(),
        _ => None,
    }
}

/// All-or-nothing: one non-string element fails the whole read, never a
/// partial sequence.
pub fn nested_string_slice(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<Vec<String>> {
    let array = nested_field(obj, path)?.as_array()?;
    let mut strings = Vec::with_capacity(array.len());

    for element in array {
        strings.push(element.as_str()?.to_string());
    }

    Some(strings)
}

pub fn nested_slice(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<Vec<Value>> {
    nested_field(obj, path)?.as_array().cloned()
}

/// All-or-nothing: one non-string value fails the whole read.
pub fn nested_string_map(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<BTreeMap<String, String>> {
    let map = nested_map_no_copy(obj, path)?;
    let mut strings = BTreeMap::new();

    for (key, value) in map {
        strings.insert(key.clone(), value.as_str()?.to_string());
    }

    Some(strings)
}

pub fn nested_map(
    obj: &Map<String, Value>,
    path: &[&str],
) -> Option<Map<String, Value>> {
    nested_map_no_copy(obj, path).cloned()
}

fn nested_map_no_copy<'a>(
    obj: &'a Map<String, Value>,
    path: &[&str],
) -> Option<&'a Map<String, Value>> {
    nested_field(obj, path)?.as_object()
}

/// Assigns `value` at `path`, creating empty mappings at absent intermediate
/// segments. Taking `value` by ownership is the deep-copy guarantee: the
/// tree can never alias storage the caller still holds. Returns false when
/// an existing intermediate is not a mapping (already-created intermediates
/// may remain) or when `path` is empty.
pub fn set_nested_field(
    obj: &mut Map<String, Value>,
    value: Value,
    path: &[&str],
) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };

    let mut current = obj;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(map) => current = map,
            _ => return false,
        }
    }

    current.insert((*last).to_string(), value);
    true
}

pub fn set_nested_string_slice(
    obj: &mut Map<String, Value>,
    value: Vec<String>,
    path: &[&str],
) -> bool {
    let elements = value.into_iter().map(Value::String).collect();
    set_nested_field(obj, Value::Array(elements), path)
}

pub fn set_nested_slice(
    obj: &mut Map<String, Value>,
    value: Vec<Value>,
    path: &[&str],
) -> bool {
    set_nested_field(obj, Value::Array(value), path)
}

pub fn set_nested_string_map(
    obj: &mut Map<String, Value>,
    value: BTreeMap<String, String>,
    path: &[&str],
) -> bool {
    let mut map = Map::new();
    for (key, entry) in value {
        map.insert(key, Value::String(entry));
    }
    set_nested_field(obj, Value::Object(map), path)
}

pub fn set_nested_map(
    obj: &mut Map<String, Value>,
    value: Map<String, Value>,
    path: &[&str],
) -> bool {
    set_nested_field(obj, Value::Object(value), path)
}

/// Deletes the key at `path`. Any miss along the way, an absent final key,
/// or an empty `path` is a silent no-op.
pub fn remove_nested_field(
    obj: &mut Map<String, Value>,
    path: &[&str],
) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = obj;
    for segment in parents {
        match current.get_mut(*segment) {
            Some(Value::Object(map)) => current = map,
            _ => return,
        }
    }

    current.remove(*last);
}
