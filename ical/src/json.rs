// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! JSON view of a component tree, shaped like jCal (RFC 7265).
//!
//! A component becomes `[name, [properties...], [components...]]` and a
//! property becomes `[name, {parameters}, type, values...]`. Names are
//! lowercased. Integers, floats and booleans stay JSON scalars; every other
//! value is written in its iCalendar text form.

use serde_json::{Map, Value as Json, json};

use crate::component::Component;
use crate::property::Property;
use crate::syntax::ParamValue;
use crate::value::Value;

impl Component {
    /// JSON representation of this component and everything below it.
    #[must_use]
    pub fn to_json(&self) -> Json {
        let properties: Vec<Json> = self.properties().iter().map(Property::to_json).collect();
        let components: Vec<Json> = self.subcomponents().iter().map(Self::to_json).collect();
        json!([self.name().to_ascii_lowercase(), properties, components])
    }
}

impl Property {
    /// JSON representation of this property.
    #[must_use]
    pub fn to_json(&self) -> Json {
        let mut params = Map::new();
        for param in self.parameters() {
            params.insert(param.name.to_ascii_lowercase(), param_to_json(&param.value));
        }

        let mut out = vec![
            Json::String(self.name().to_ascii_lowercase()),
            Json::Object(params),
            Json::String(self.value_type().as_ref().to_ascii_lowercase()),
        ];
        out.extend(self.values().iter().map(value_to_json));
        Json::Array(out)
    }
}

fn param_to_json(value: &ParamValue) -> Json {
    match value {
        ParamValue::Single(v) => Json::String(v.clone()),
        ParamValue::List(vs) => vs.iter().cloned().map(Json::String).collect(),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Integer(v) => Json::from(*v),
        Value::Float(v) => Json::from(*v),
        Value::Boolean(v) => Json::Bool(*v),
        other => Json::String(other.to_string()),
    }
}
