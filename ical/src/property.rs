// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Properties: a name, parameters, and a list of values of one type.

use std::fmt::{self, Display};

use crate::design::{
    self, ValueType, detect_value_type, param_type, property_design, split_value,
    validate_parameter, validate_value, value_design,
};
use crate::error::{Error, Result};
use crate::keyword::KW_VALUE;
use crate::syntax::{ContentLine, ParamValue, Parameter};
use crate::value::{Value, text};

/// A property of a component.
///
/// All values share the property's value type. The `VALUE` parameter is kept
/// in sync with that type whenever values are replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value_type: ValueType,
    parameters: Vec<Parameter>,
    values: Vec<Value>,
}

impl Property {
    /// An empty property typed by its design default.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().to_ascii_uppercase();
        Self {
            value_type: property_design(&name).default_type,
            name,
            parameters: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a property from a lexed content line, detecting and decoding
    /// its values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertyValue`] when a parameter or a value
    /// fails validation.
    pub fn from_content_line(line: &ContentLine) -> Result<Self> {
        for param in &line.parameters {
            validate_parameter(&line.name, param)?;
        }

        let value_type = detect_value_type(&line.name, &line.parameters)?;
        let values = split_value(&line.name, &line.value)
            .into_iter()
            .map(|raw| validate_value(&line.name, value_type, raw, Some(&line.parameters)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: line.name.clone(),
            value_type,
            parameters: line.parameters.clone(),
            values,
        })
    }

    /// Property name, uppercased
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type shared by all values
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Parameters in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up a parameter by name, case-insensitively.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| &p.value)
    }

    /// Set or replace a parameter. Setting `VALUE` retags the property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertyValue`] when the value is not allowed
    /// for the parameter, or `VALUE` names an unknown type.
    pub fn set_parameter(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        let param = Parameter {
            name: name.to_ascii_uppercase(),
            value: value.into(),
        };
        validate_parameter(&self.name, &param)?;
        if param.name == KW_VALUE {
            self.value_type = detect_value_type(&self.name, std::slice::from_ref(&param))?;
        }

        match self.parameters.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => existing.value = param.value,
            None => self.parameters.push(param),
        }
        Ok(())
    }

    /// Remove a parameter. Removing `VALUE` restores the default type.
    pub fn remove_parameter(&mut self, name: &str) -> Option<ParamValue> {
        let index = self
            .parameters
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))?;
        let removed = self.parameters.remove(index);
        if removed.name == KW_VALUE {
            self.value_type = property_design(&self.name).default_type;
        }
        Some(removed.value)
    }

    /// Number of parameters
    #[must_use]
    pub fn count_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Type of the value of parameter `name`.
    #[must_use]
    pub fn parameter_type(&self, name: &str) -> ValueType {
        param_type(&name.to_ascii_uppercase())
    }

    /// All values
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The first value, if any.
    #[must_use]
    pub fn first_value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Mutable access to the first value.
    pub fn first_value_mut(&mut self) -> Option<&mut Value> {
        self.values.first_mut()
    }

    /// Mutable access to all values. Callers must keep the value type.
    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Replace all values with a single one.
    ///
    /// # Errors
    ///
    /// See [`Property::set_values`].
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        self.set_values(vec![value.into()])
    }

    /// Replace all values, inferring the value type from them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structure`] when the values are of different types.
    pub fn set_values(&mut self, values: Vec<Value>) -> Result<()> {
        let mut inferred = None;
        for value in &values {
            let ty = self.infer_type(value);
            match inferred {
                Some(prev) if prev != ty => {
                    return Err(Error::structure("All values must be of the same type!"));
                }
                _ => inferred = Some(ty),
            }
        }

        if let Some(ty) = inferred {
            self.retag(ty);
        }
        self.values = values;
        Ok(())
    }

    /// Serialized form of the values, escaped and joined.
    #[must_use]
    pub fn string_value(&self) -> String {
        let escaped = value_design(self.value_type).escaped;
        let separator = property_design(&self.name).separator().unwrap_or(',');

        let mut out = String::new();
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            let raw = value.to_string();
            if escaped {
                out.push_str(&text::escape(&raw));
            } else {
                out.push_str(&raw);
            }
        }
        out
    }

    /// Replace the values by decoding `raw` as the current value type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPropertyValue`] when `raw` does not decode.
    pub fn set_string_value(&mut self, raw: &str) -> Result<()> {
        self.values = split_value(&self.name, raw)
            .into_iter()
            .map(|raw| validate_value(&self.name, self.value_type, raw, Some(&self.parameters)))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    fn infer_type(&self, value: &Value) -> ValueType {
        match value {
            Value::Text(_) => match self.value_type {
                ValueType::Text | ValueType::Uri | ValueType::CalAddress => self.value_type,
                _ => match property_design(&self.name).default_type {
                    ty @ (ValueType::Uri | ValueType::CalAddress) => ty,
                    _ => ValueType::Text,
                },
            },
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Binary(_) => ValueType::Binary,
            Value::UtcOffset(_) => ValueType::UtcOffset,
            Value::Duration(_) => ValueType::Duration,
            Value::Period(_) => ValueType::Period,
            Value::Time(t) if t.is_date() => ValueType::Date,
            Value::Time(_) => ValueType::DateTime,
            Value::TimeOfDay(_) => ValueType::Time,
            Value::Recur(_) => ValueType::Recur,
        }
    }

    /// Switch the value type, keeping `VALUE` in sync with the default.
    fn retag(&mut self, ty: ValueType) {
        self.value_type = ty;
        let is_default = property_design(&self.name).default_type == ty;
        let existing = self.parameters.iter().position(|p| p.name == KW_VALUE);
        match (existing, is_default) {
            (Some(index), true) => {
                self.parameters.remove(index);
            }
            (Some(index), false) => {
                if let Some(param) = self.parameters.get_mut(index) {
                    param.value = ParamValue::from(ty.to_string());
                }
            }
            (None, false) => self.parameters.push(Parameter {
                name: KW_VALUE.to_owned(),
                value: ParamValue::from(ty.to_string()),
            }),
            (None, true) => {}
        }
    }

    /// Whether the property holds a comma-separated list.
    #[must_use]
    pub fn is_multi_value(&self) -> bool {
        property_design(&self.name).multi_value
    }

    /// Design of this property
    #[must_use]
    pub fn design(&self) -> design::PropertyDesign {
        property_design(&self.name)
    }
}

/// The unfolded content line, without a line break.
impl Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for param in &self.parameters {
            write!(f, ";{}={}", param.name, param.value)?;
        }
        write!(f, ":{}", self.string_value())
    }
}
