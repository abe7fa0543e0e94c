// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Components: named blocks owning their properties and subcomponents.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::formatter::FormatOptions;
use crate::property::Property;
use crate::value::Value;

/// A `BEGIN:<name>` ... `END:<name>` block.
///
/// Properties and subcomponents keep their insertion order. Names are stored
/// uppercased and looked up case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    properties: Vec<Property>,
    subcomponents: Vec<Component>,
}

fn name_matches(name: Option<&str>, candidate: &str) -> bool {
    name.is_none_or(|name| candidate.eq_ignore_ascii_case(name))
}

impl Component {
    /// An empty component.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_ascii_uppercase(),
            properties: Vec::new(),
            subcomponents: Vec::new(),
        }
    }

    /// Component name, uppercased
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All properties in insertion order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Mutable access to all properties.
    pub fn properties_mut(&mut self) -> &mut [Property] {
        &mut self.properties
    }

    /// All subcomponents in insertion order.
    #[must_use]
    pub fn subcomponents(&self) -> &[Component] {
        &self.subcomponents
    }

    /// Mutable access to all subcomponents.
    pub fn subcomponents_mut(&mut self) -> &mut [Component] {
        &mut self.subcomponents
    }

    /// First subcomponent named `name`, or the first of any name for `None`.
    #[must_use]
    pub fn first_subcomponent(&self, name: Option<&str>) -> Option<&Component> {
        self.subcomponents
            .iter()
            .find(|c| name_matches(name, &c.name))
    }

    /// Mutable variant of [`Component::first_subcomponent`].
    pub fn first_subcomponent_mut(&mut self, name: Option<&str>) -> Option<&mut Component> {
        self.subcomponents
            .iter_mut()
            .find(|c| name_matches(name, &c.name))
    }

    /// Subcomponents named `name`, or all of them for `None`.
    #[must_use]
    pub fn all_subcomponents(&self, name: Option<&str>) -> Vec<&Component> {
        self.subcomponents
            .iter()
            .filter(|c| name_matches(name, &c.name))
            .collect()
    }

    /// Append a subcomponent, taking ownership of it.
    #[expect(clippy::indexing_slicing, reason = "the index was just pushed")]
    pub fn add_subcomponent(&mut self, component: Component) -> &mut Component {
        let index = self.subcomponents.len();
        self.subcomponents.push(component);
        &mut self.subcomponents[index]
    }

    /// Remove every subcomponent named `name`, returning how many went.
    pub fn remove_subcomponent(&mut self, name: &str) -> usize {
        let before = self.subcomponents.len();
        self.subcomponents
            .retain(|c| !c.name.eq_ignore_ascii_case(name));
        before - self.subcomponents.len()
    }

    /// Whether a property named `name` exists.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.first_property(Some(name)).is_some()
    }

    /// First property named `name`, or the first of any name for `None`.
    #[must_use]
    pub fn first_property(&self, name: Option<&str>) -> Option<&Property> {
        self.properties.iter().find(|p| name_matches(name, p.name()))
    }

    /// Mutable variant of [`Component::first_property`].
    pub fn first_property_mut(&mut self, name: Option<&str>) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|p| name_matches(name, p.name()))
    }

    /// First value of the first property named `name`.
    #[must_use]
    pub fn first_property_value(&self, name: &str) -> Option<&Value> {
        self.first_property(Some(name))?.first_value()
    }

    /// Properties named `name`, or all of them for `None`.
    #[must_use]
    pub fn all_properties(&self, name: Option<&str>) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| name_matches(name, p.name()))
            .collect()
    }

    /// Append a property, taking ownership of it.
    #[expect(clippy::indexing_slicing, reason = "the index was just pushed")]
    pub fn add_property(&mut self, property: Property) -> &mut Property {
        let index = self.properties.len();
        self.properties.push(property);
        &mut self.properties[index]
    }

    /// Append a property holding `value`, typed from the value.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Property::set_value`].
    pub fn add_property_with_value(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Property> {
        let mut property = Property::new(name);
        property.set_value(value)?;
        Ok(self.add_property(property))
    }

    /// Remove every property named `name`, returning how many went.
    pub fn remove_property(&mut self, name: &str) -> usize {
        let before = self.properties.len();
        self.properties
            .retain(|p| !p.name().eq_ignore_ascii_case(name));
        before - self.properties.len()
    }

    /// Remove all properties.
    pub fn clear_all_properties(&mut self) {
        self.properties.clear();
    }
}

/// Serialized text with CRLF line endings, folded at 75 octets.
impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = FormatOptions::default()
            .write_to_string(self)
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Time;

    fn calendar() -> Component {
        let mut calendar = Component::new("vcalendar");
        calendar.add_property_with_value("VERSION", "2.0").unwrap();
        let event = calendar.add_subcomponent(Component::new("VEVENT"));
        event.add_property_with_value("UID", "1").unwrap();
        event.add_property_with_value("ATTENDEE", "mailto:a@example.com").unwrap();
        event.add_property_with_value("ATTENDEE", "mailto:b@example.com").unwrap();
        calendar.add_subcomponent(Component::new("VTODO"));
        calendar.add_subcomponent(Component::new("VEVENT"));
        calendar
    }

    #[test]
    fn looks_up_children_by_name() {
        let calendar = calendar();
        assert_eq!(calendar.name(), "VCALENDAR");
        assert_eq!(calendar.all_subcomponents(None).len(), 3);
        assert_eq!(calendar.all_subcomponents(Some("vevent")).len(), 2);
        assert_eq!(calendar.first_subcomponent(None).map(Component::name), Some("VEVENT"));
        assert!(calendar.first_subcomponent(Some("VJOURNAL")).is_none());

        let event = calendar.first_subcomponent(Some("VEVENT")).unwrap();
        assert!(event.has_property("uid"));
        assert_eq!(event.all_properties(Some("ATTENDEE")).len(), 2);
        assert_eq!(event.all_properties(None).len(), 3);
        assert_eq!(
            event.first_property_value("ATTENDEE").and_then(Value::as_text),
            Some("mailto:a@example.com")
        );
    }

    #[test]
    fn removes_every_match() {
        let mut calendar = calendar();
        assert_eq!(calendar.remove_subcomponent("VEVENT"), 2);
        assert_eq!(calendar.all_subcomponents(None).len(), 1);
        assert_eq!(calendar.remove_subcomponent("VEVENT"), 0);

        let mut event = Component::new("VEVENT");
        event.add_property_with_value("COMMENT", "a").unwrap();
        event.add_property_with_value("COMMENT", "b").unwrap();
        event.add_property_with_value("SUMMARY", "c").unwrap();
        assert_eq!(event.remove_property("comment"), 2);
        assert!(event.has_property("SUMMARY"));
        event.clear_all_properties();
        assert!(event.properties().is_empty());
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut event = Component::new("VEVENT");
        event
            .add_property_with_value("DTSTART", Time::from_date(2013, 1, 1))
            .unwrap();
        event
            .add_property_with_value("SUMMARY", "Meeting; bring notes")
            .unwrap();
        let mut alarm = Component::new("VALARM");
        alarm.add_property_with_value("ACTION", "DISPLAY").unwrap();
        event.add_subcomponent(alarm);

        assert_eq!(
            event.to_string(),
            "BEGIN:VEVENT\r\n\
             DTSTART;VALUE=DATE:20130101\r\n\
             SUMMARY:Meeting\\; bring notes\r\n\
             BEGIN:VALARM\r\n\
             ACTION:DISPLAY\r\n\
             END:VALARM\r\n\
             END:VEVENT\r\n"
        );
    }

    #[test]
    fn mixed_values_fail_at_mutation_time() {
        let mut event = Component::new("VEVENT");
        let prop = event.add_property_with_value("X-LIST", 1).unwrap();
        let err = prop
            .set_values(vec![Value::Integer(1), Value::Boolean(true)])
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
        assert_eq!(event.to_string(), "BEGIN:VEVENT\r\nX-LIST:1\r\nEND:VEVENT\r\n");
    }
}
