use serde::Serialize;

use crate::error::CryptoError;

/// Serialize a value into its canonical byte form.
///
/// Object keys are sorted recursively and no insignificant whitespace is
/// emitted, so two logically equal JSON values always produce the same bytes
/// no matter the order their keys were inserted in.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CryptoError> {
    Ok(serde_jcs::to_vec(value)?)
}
