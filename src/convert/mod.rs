use std::mem;

use crate::{error::ConvertError, gvk::GroupVersioner, runtime_object::RuntimeObject};

/// Identity conversion between two dynamic objects. The output takes over
/// the input's backing storage; the converter contract does not guarantee
/// the input stays independently usable, and callers must not rely on it.
pub fn convert(
    input: &mut RuntimeObject,
    output: &mut RuntimeObject,
) -> Result<(), ConvertError> {
    match (input, output) {
        (RuntimeObject::Object(input), RuntimeObject::Object(output)) => {
            output.object = mem::take(&mut input.object);
            Ok(())
        }
        (input, output) => Err(ConvertError::UnsupportedShape {
            input: input.shape(),
            output: output.shape(),
        }),
    }
}

/// Relabels the input's type descriptor for the target version. An input
/// with an empty descriptor is version-agnostic and comes back unchanged;
/// otherwise the descriptor is rewritten in place to whatever the resolver
/// prefers, with no copy of the object.
pub fn convert_to_version(
    mut input: RuntimeObject,
    target: &dyn GroupVersioner,
) -> Result<RuntimeObject, ConvertError> {
    let gvk = input.group_version_kind();
    if gvk.is_empty() {
        return Ok(input);
    }

    let Some(resolved) = target.kind_for(std::slice::from_ref(&gvk)) else {
        return Err(ConvertError::VersionUnresolvable {
            gvk,
            target: target.identifier(),
        });
    };

    input.set_group_version_kind(&resolved);
    Ok(input)
}

/// Field-label conversion needs schema knowledge this adapter deliberately
/// lacks.
pub fn convert_field_label(
    _version: &str,
    _kind: &str,
    _label: &str,
    _value: &str,
) -> Result<(String, String), ConvertError> {
    Err(ConvertError::FieldLabelsUnsupported)
}
