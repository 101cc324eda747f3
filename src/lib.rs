pub mod codec;
pub mod convert;
pub mod dynamic_object;
pub mod error;
pub mod gvk;
pub mod nested;
pub mod runtime_object;

pub use codec::{DecodeTarget, decode, decode_into, encode};
pub use dynamic_object::{DynamicList, DynamicObject, OwnerReference};
pub use error::{ConvertError, DecodeError, EncodeError};
pub use gvk::{GroupVersionKind, GroupVersioner};
pub use runtime_object::{RuntimeObject, Unknown, VersionedObjects};
