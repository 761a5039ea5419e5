use serde_json::{Map, Value};

use crate::error::LevelError;

/// A decoded JSON object read as the fields of one entity.
///
/// Every accessor reports failures against `entity` so errors name both the
/// record type and the offending field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wraps `value`, which must be a JSON object.
    pub(crate) fn new(entity: &'static str, value: &'a Value) -> Result<Self, LevelError> {
        let fields = value.as_object().ok_or_else(|| LevelError::TypeMismatch {
            entity,
            field: "<record>".to_string(),
            expected: "an object",
        })?;
        Ok(Record { entity, fields })
    }

    fn field(&self, name: &str) -> Result<&'a Value, LevelError> {
        self.fields
            .get(name)
            .ok_or_else(|| LevelError::MissingField {
                entity: self.entity,
                field: name.to_string(),
            })
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> LevelError {
        LevelError::TypeMismatch {
            entity: self.entity,
            field: name.to_string(),
            expected,
        }
    }

    /// Reads a numeric field. Integers are widened to `f64`.
    pub(crate) fn number(&self, name: &str) -> Result<f64, LevelError> {
        self.field(name)?
            .as_f64()
            .ok_or_else(|| self.mismatch(name, "a number"))
    }

    pub(crate) fn string(&self, name: &str) -> Result<&'a str, LevelError> {
        self.field(name)?
            .as_str()
            .ok_or_else(|| self.mismatch(name, "a string"))
    }

    /// Returns a nested object field, still as a raw value.
    pub(crate) fn object(&self, name: &str) -> Result<&'a Value, LevelError> {
        let value = self.field(name)?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(self.mismatch(name, "an object"))
        }
    }

    pub(crate) fn array(&self, name: &str) -> Result<&'a [Value], LevelError> {
        self.field(name)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch(name, "an array"))
    }

    /// Fails on the first key not listed in `allowed`.
    pub(crate) fn only(&self, allowed: &[&str]) -> Result<(), LevelError> {
        match self.fields.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(LevelError::UnexpectedField {
                entity: self.entity,
                field: key.clone(),
            }),
            None => Ok(()),
        }
    }
}
