// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Registry of parameter, value type and property designs.
//!
//! The tables are exhaustive matches over the RFC 5545 names. Unknown and
//! `X-` names fall back to TEXT.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::keyword::{
    KW_ACTION, KW_ATTACH, KW_ATTENDEE, KW_BINARY, KW_BOOLEAN, KW_CAL_ADDRESS, KW_CALSCALE,
    KW_CATEGORIES, KW_CLASS, KW_COMMENT, KW_COMPLETED, KW_CONTACT, KW_CREATED, KW_CUTYPE, KW_DATE,
    KW_DATETIME, KW_DELEGATED_FROM, KW_DELEGATED_TO, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP,
    KW_DTSTART, KW_DUE, KW_DURATION, KW_DURATION_TYPE, KW_ENCODING, KW_ENCODING_8BIT,
    KW_ENCODING_BASE64, KW_EXDATE, KW_EXRULE, KW_FBTYPE, KW_FLOAT, KW_FREEBUSY, KW_GEO, KW_INTEGER,
    KW_LAST_MODIFIED, KW_LOCATION, KW_MEMBER, KW_METHOD, KW_ORGANIZER, KW_PARTSTAT,
    KW_PERCENT_COMPLETE, KW_PERIOD, KW_PRIORITY, KW_PRODID, KW_RANGE, KW_RDATE, KW_RECUR,
    KW_RECURRENCE_ID, KW_RELATED, KW_RELATED_TO, KW_RELTYPE, KW_REPEAT, KW_REQUEST_STATUS,
    KW_RESOURCES, KW_ROLE, KW_RRULE, KW_RSVP, KW_SENT_BY, KW_SEQUENCE, KW_STATUS, KW_SUMMARY,
    KW_TEXT, KW_TIME, KW_TRANSP, KW_TRIGGER, KW_TZID, KW_TZNAME, KW_TZOFFSETFROM, KW_TZOFFSETTO,
    KW_TZURL, KW_UID, KW_URI, KW_URL, KW_UTC_OFFSET, KW_VALUE, KW_VERSION,
};
use crate::syntax::Parameter;
use crate::value::Value;
use crate::value::text::split_escaped;

/// Value data types, RFC 5545 Section 3.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum ValueType {
    Binary,
    Boolean,
    CalAddress,
    Date,
    DateTime,
    Duration,
    Float,
    Integer,
    Period,
    Recur,
    Text,
    Time,
    Uri,
    UtcOffset,
}

impl ValueType {
    /// Every value type, in RFC order.
    pub const ALL: [Self; 14] = [
        Self::Binary,
        Self::Boolean,
        Self::CalAddress,
        Self::Date,
        Self::DateTime,
        Self::Duration,
        Self::Float,
        Self::Integer,
        Self::Period,
        Self::Recur,
        Self::Text,
        Self::Time,
        Self::Uri,
        Self::UtcOffset,
    ];
}

impl FromStr for ValueType {
    type Err = ();

    #[rustfmt::skip]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            KW_BINARY        => Ok(ValueType::Binary),
            KW_BOOLEAN       => Ok(ValueType::Boolean),
            KW_CAL_ADDRESS   => Ok(ValueType::CalAddress),
            KW_DATE          => Ok(ValueType::Date),
            KW_DATETIME      => Ok(ValueType::DateTime),
            KW_DURATION_TYPE => Ok(ValueType::Duration),
            KW_FLOAT         => Ok(ValueType::Float),
            KW_INTEGER       => Ok(ValueType::Integer),
            KW_PERIOD        => Ok(ValueType::Period),
            KW_RECUR         => Ok(ValueType::Recur),
            KW_TEXT          => Ok(ValueType::Text),
            KW_TIME          => Ok(ValueType::Time),
            KW_URI           => Ok(ValueType::Uri),
            KW_UTC_OFFSET    => Ok(ValueType::UtcOffset),
            _ => Err(()),
        }
    }
}

impl AsRef<str> for ValueType {
    #[rustfmt::skip]
    fn as_ref(&self) -> &str {
        match self {
            ValueType::Binary     => KW_BINARY,
            ValueType::Boolean    => KW_BOOLEAN,
            ValueType::CalAddress => KW_CAL_ADDRESS,
            ValueType::Date       => KW_DATE,
            ValueType::DateTime   => KW_DATETIME,
            ValueType::Duration   => KW_DURATION_TYPE,
            ValueType::Float      => KW_FLOAT,
            ValueType::Integer    => KW_INTEGER,
            ValueType::Period     => KW_PERIOD,
            ValueType::Recur      => KW_RECUR,
            ValueType::Text       => KW_TEXT,
            ValueType::Time       => KW_TIME,
            ValueType::Uri        => KW_URI,
            ValueType::UtcOffset  => KW_UTC_OFFSET,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// How raw values of a type are checked before decoding.
#[derive(Debug, Clone, Copy)]
pub enum Validation {
    /// The whole raw value must match
    Matches(fn(&str) -> bool),
    /// A grammar decodes and validates the value
    Validate,
    /// A fixed list of accepted values
    Values(&'static [&'static str]),
}

/// Design of a value type.
#[derive(Debug, Clone, Copy)]
pub struct ValueDesign {
    /// Check applied to each raw value
    pub validation: Validation,
    /// Parameter that must be present with the given value
    pub require_param: Option<(&'static str, &'static str)>,
    /// Whether the TEXT escapes apply
    pub escaped: bool,
}

const fn validated() -> ValueDesign {
    ValueDesign {
        validation: Validation::Validate,
        require_param: None,
        escaped: false,
    }
}

/// Look up the design of a value type.
#[must_use]
pub const fn value_design(ty: ValueType) -> ValueDesign {
    match ty {
        ValueType::Binary => ValueDesign {
            validation: Validation::Matches(is_base64),
            require_param: Some((KW_ENCODING, KW_ENCODING_BASE64)),
            escaped: false,
        },
        ValueType::Boolean => ValueDesign {
            validation: Validation::Values(&["TRUE", "FALSE"]),
            require_param: None,
            escaped: false,
        },
        ValueType::Float => ValueDesign {
            validation: Validation::Matches(is_float),
            require_param: None,
            escaped: false,
        },
        ValueType::Integer => ValueDesign {
            validation: Validation::Matches(is_integer),
            require_param: None,
            escaped: false,
        },
        ValueType::Text => ValueDesign {
            validation: Validation::Matches(|_| true),
            require_param: None,
            escaped: true,
        },
        ValueType::CalAddress | ValueType::Uri => ValueDesign {
            validation: Validation::Matches(|_| true),
            require_param: None,
            escaped: false,
        },
        ValueType::Date
        | ValueType::DateTime
        | ValueType::Duration
        | ValueType::Period
        | ValueType::Recur
        | ValueType::Time
        | ValueType::UtcOffset => validated(),
    }
}

/// `[+-]?\d+`
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[+-]?\d+\.\d+`
fn is_float(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned.split_once('.').is_some_and(|(int, frac)| {
        !int.is_empty()
            && !frac.is_empty()
            && int.bytes().all(|b| b.is_ascii_digit())
            && frac.bytes().all(|b| b.is_ascii_digit())
    })
}

/// `([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?`
fn is_base64(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() % 4 != 0 {
        return false;
    }
    let is_b64 = |b: &u8| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/';
    let body = bytes.len().saturating_sub(4);
    let (head, tail) = bytes.split_at(body);
    head.iter().all(is_b64)
        && match tail {
            [] => true,
            [a, b, b'=', b'='] => is_b64(a) && is_b64(b),
            [a, b, c, b'='] => is_b64(a) && is_b64(b) && is_b64(c),
            rest => rest.iter().all(is_b64),
        }
}

/// Design of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDesign {
    /// Type used when no VALUE parameter is given
    pub default_type: ValueType,
    /// Types a VALUE parameter may select
    pub allowed_types: &'static [ValueType],
    /// Values are a COMMA-separated list
    pub multi_value: bool,
    /// Values are SEMICOLON-separated components
    pub structured_value: bool,
}

impl PropertyDesign {
    const fn of(default_type: ValueType) -> Self {
        Self {
            default_type,
            allowed_types: &[],
            multi_value: false,
            structured_value: false,
        }
    }

    const fn allowing(mut self, allowed_types: &'static [ValueType]) -> Self {
        self.allowed_types = allowed_types;
        self
    }

    const fn multi(mut self) -> Self {
        self.multi_value = true;
        self
    }

    const fn structured(mut self) -> Self {
        self.structured_value = true;
        self
    }

    /// Separator between values, if the property holds several.
    #[must_use]
    pub const fn separator(&self) -> Option<char> {
        if self.multi_value {
            Some(',')
        } else if self.structured_value {
            Some(';')
        } else {
            None
        }
    }

    /// Whether `ty` may be selected by a VALUE parameter.
    #[must_use]
    pub fn allows(&self, ty: ValueType) -> bool {
        ty == self.default_type || self.allowed_types.contains(&ty)
    }
}

const DATE_OR_DATE_TIME: &[ValueType] = &[ValueType::DateTime, ValueType::Date];

/// Look up the design of a property by its uppercased name.
#[must_use]
pub fn property_design(name: &str) -> PropertyDesign {
    use ValueType::{CalAddress, DateTime, Float, Integer, Period, Recur, Text, Uri, UtcOffset};

    match name {
        KW_ATTACH => PropertyDesign::of(Uri).allowing(&[Uri, ValueType::Binary]),
        KW_ATTENDEE | KW_ORGANIZER => PropertyDesign::of(CalAddress),
        KW_CATEGORIES | KW_RESOURCES => PropertyDesign::of(Text).multi(),
        KW_COMPLETED | KW_CREATED | KW_DTSTAMP | KW_LAST_MODIFIED => PropertyDesign::of(DateTime),
        KW_DTEND | KW_DTSTART | KW_DUE | KW_RECURRENCE_ID => {
            PropertyDesign::of(DateTime).allowing(DATE_OR_DATE_TIME)
        }
        KW_EXDATE => PropertyDesign::of(DateTime)
            .allowing(DATE_OR_DATE_TIME)
            .multi(),
        KW_RDATE => PropertyDesign::of(DateTime)
            .allowing(&[DateTime, ValueType::Date, Period])
            .multi(),
        KW_DURATION => PropertyDesign::of(ValueType::Duration),
        KW_EXRULE | KW_RRULE => PropertyDesign::of(Recur),
        KW_FREEBUSY => PropertyDesign::of(Period).multi(),
        KW_GEO => PropertyDesign::of(Float).structured(),
        KW_PERCENT_COMPLETE | KW_PRIORITY | KW_REPEAT | KW_SEQUENCE => PropertyDesign::of(Integer),
        KW_REQUEST_STATUS => PropertyDesign::of(Text).structured(),
        KW_TRIGGER => {
            PropertyDesign::of(ValueType::Duration).allowing(&[ValueType::Duration, DateTime])
        }
        KW_TZOFFSETFROM | KW_TZOFFSETTO => PropertyDesign::of(UtcOffset),
        KW_TZURL | KW_URL => PropertyDesign::of(Uri),
        KW_ACTION | KW_CALSCALE | KW_CLASS | KW_COMMENT | KW_CONTACT | KW_DESCRIPTION
        | KW_LOCATION | KW_METHOD | KW_PRODID | KW_RELATED_TO | KW_STATUS | KW_SUMMARY
        | KW_TRANSP | KW_TZID | KW_TZNAME | KW_UID | KW_VERSION => PropertyDesign::of(Text),
        _ => PropertyDesign::of(Text),
    }
}

/// Design of a property parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDesign {
    /// Accepted values; empty accepts anything
    pub values: &'static [&'static str],
    /// `X-` names are accepted besides `values`
    pub allow_x_name: bool,
    /// IANA tokens are accepted besides `values`
    pub allow_iana_token: bool,
    /// Type of the parameter value
    pub value_type: ValueType,
    /// The parameter holds a COMMA-separated list
    pub multi_value: bool,
}

impl ParamDesign {
    const fn of(value_type: ValueType) -> Self {
        Self {
            values: &[],
            allow_x_name: false,
            allow_iana_token: false,
            value_type,
            multi_value: false,
        }
    }

    const fn one_of(values: &'static [&'static str]) -> Self {
        Self {
            values,
            ..Self::of(ValueType::Text)
        }
    }

    const fn extensible(mut self) -> Self {
        self.allow_x_name = true;
        self.allow_iana_token = true;
        self
    }

    const fn multi(mut self) -> Self {
        self.multi_value = true;
        self
    }
}

const VALUE_TYPE_NAMES: &[&str] = &[
    KW_BINARY,
    KW_BOOLEAN,
    KW_CAL_ADDRESS,
    KW_DATE,
    KW_DATETIME,
    KW_DURATION_TYPE,
    KW_FLOAT,
    KW_INTEGER,
    KW_PERIOD,
    KW_RECUR,
    KW_TEXT,
    KW_TIME,
    KW_URI,
    KW_UTC_OFFSET,
];

/// Look up the design of a parameter by its uppercased name.
#[must_use]
pub fn param_design(name: &str) -> Option<ParamDesign> {
    let design = match name {
        KW_CUTYPE => {
            ParamDesign::one_of(&["INDIVIDUAL", "GROUP", "RESOURCE", "ROOM", "UNKNOWN"]).extensible()
        }
        KW_DELEGATED_FROM | KW_DELEGATED_TO | KW_MEMBER => {
            ParamDesign::of(ValueType::CalAddress).multi()
        }
        KW_ENCODING => ParamDesign::one_of(&[KW_ENCODING_8BIT, KW_ENCODING_BASE64]),
        KW_FBTYPE => {
            ParamDesign::one_of(&["FREE", "BUSY", "BUSY-UNAVAILABLE", "BUSY-TENTATIVE"]).extensible()
        }
        KW_PARTSTAT => ParamDesign::one_of(&[
            "NEEDS-ACTION",
            "ACCEPTED",
            "DECLINED",
            "TENTATIVE",
            "DELEGATED",
            "COMPLETED",
            "IN-PROCESS",
        ])
        .extensible(),
        KW_RANGE => ParamDesign::one_of(&["THISANDFUTURE"]),
        KW_RELATED => ParamDesign::one_of(&["START", "END"]),
        KW_RELTYPE => ParamDesign::one_of(&["PARENT", "CHILD", "SIBLING"]).extensible(),
        KW_ROLE => ParamDesign::one_of(&[
            "REQ-PARTICIPANT",
            "CHAIR",
            "OPT-PARTICIPANT",
            "NON-PARTICIPANT",
        ])
        .extensible(),
        KW_RSVP => ParamDesign::of(ValueType::Boolean),
        KW_SENT_BY => ParamDesign::of(ValueType::CalAddress),
        KW_VALUE => ParamDesign::one_of(VALUE_TYPE_NAMES).extensible(),
        _ => return None,
    };
    Some(design)
}

/// Type of a parameter's value; TEXT for parameters without a design.
#[must_use]
pub fn param_type(name: &str) -> ValueType {
    param_design(name).map_or(ValueType::Text, |d| d.value_type)
}

fn is_x_name(s: &str) -> bool {
    let upper = s.to_ascii_uppercase();
    upper.starts_with("X-") && upper.len() > 2 && is_iana_token(s)
}

fn is_iana_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Check a parameter against its design. Parameters without a design pass.
///
/// # Errors
///
/// Returns [`Error::InvalidPropertyValue`] when a value is not on the
/// allow-list or is not a BOOLEAN where one is required.
pub fn validate_parameter(property: &str, param: &Parameter) -> Result<()> {
    let Some(design) = param_design(&param.name) else {
        return Ok(());
    };

    for value in param.value.iter() {
        let accepted = if design.value_type == ValueType::Boolean {
            value.eq_ignore_ascii_case("TRUE") || value.eq_ignore_ascii_case("FALSE")
        } else if design.values.is_empty() {
            true
        } else {
            design.values.iter().any(|v| v.eq_ignore_ascii_case(value))
                || (design.allow_x_name && is_x_name(value))
                || (design.allow_iana_token && is_iana_token(value))
        };
        if !accepted {
            return Err(Error::invalid_value(
                Some(property),
                format!("Value for {} is not a {}", param.name, design.value_type),
            ));
        }
    }
    Ok(())
}

/// Pick the value type of a property: TEXT, then the property default, then
/// an explicit VALUE parameter.
///
/// # Errors
///
/// Returns [`Error::InvalidPropertyValue`] for an unknown VALUE type.
pub fn detect_value_type(name: &str, parameters: &[Parameter]) -> Result<ValueType> {
    let default = property_design(name).default_type;
    let Some(value) = parameters.iter().find(|p| p.name == KW_VALUE) else {
        return Ok(default);
    };
    let explicit = value.value.first().to_ascii_uppercase();
    explicit
        .parse()
        .map_err(|()| Error::invalid_value(Some(name), format!("Invalid VALUE Type '{explicit}'")))
}

/// Split a raw property value into its value list, honouring escapes.
#[must_use]
pub fn split_value<'a>(name: &str, raw: &'a str) -> Vec<&'a str> {
    match property_design(name).separator() {
        Some(separator) => split_escaped(raw, separator),
        None => vec![raw],
    }
}

/// Validate one raw value against its type design and decode it.
///
/// The required-parameter constraint is checked only when `parameters` is
/// given.
///
/// # Errors
///
/// Returns [`Error::InvalidPropertyValue`] when the value fails the type's
/// pattern, grammar, allow-list or required parameter.
pub fn validate_value(
    name: &str,
    ty: ValueType,
    raw: &str,
    parameters: Option<&[Parameter]>,
) -> Result<Value> {
    let design = value_design(ty);
    match design.validation {
        Validation::Matches(matches) => {
            if !matches(raw) {
                return Err(Error::invalid_value(
                    Some(name),
                    format!("Value '{raw}' for {name} is not {ty}"),
                ));
            }
        }
        Validation::Values(values) => {
            if !values.iter().any(|v| v.eq_ignore_ascii_case(raw)) {
                return Err(Error::invalid_value(
                    Some(name),
                    format!("Value for {name} is not a {ty}"),
                ));
            }
        }
        Validation::Validate => {}
    }

    if let (Some(parameters), Some((param, expected))) = (parameters, design.require_param) {
        let present = parameters
            .iter()
            .find(|p| p.name == param)
            .is_some_and(|p| p.value.first().eq_ignore_ascii_case(expected));
        if !present {
            return Err(Error::invalid_value(
                Some(name),
                format!("Value requires {param}={expected}"),
            ));
        }
    }

    Value::parse(&ty, raw).map_err(|e| {
        Error::invalid_value(Some(name), format!("Value '{raw}' for {name} is not {ty}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParamValue;

    fn param(name: &str, value: &str) -> Parameter {
        Parameter {
            name: name.to_owned(),
            value: ParamValue::from(value),
        }
    }

    #[test]
    fn value_type_names_round_trip() {
        for ty in ValueType::ALL {
            assert_eq!(ty.to_string().parse::<ValueType>(), Ok(ty));
        }
        assert_eq!("date-time".parse::<ValueType>(), Ok(ValueType::DateTime));
        assert!("X-CUSTOM".parse::<ValueType>().is_err());
    }

    #[test]
    fn detects_value_types() {
        #[rustfmt::skip]
        let cases = [
            ("SUMMARY", vec![], ValueType::Text),
            ("X-UNKNOWN", vec![], ValueType::Text),
            ("DTSTART", vec![], ValueType::DateTime),
            ("DTSTART", vec![param("VALUE", "DATE")], ValueType::Date),
            ("DTSTART", vec![param("VALUE", "date")], ValueType::Date),
            ("RRULE", vec![], ValueType::Recur),
            ("EXRULE", vec![], ValueType::Recur),
            ("TRIGGER", vec![param("VALUE", "DATE-TIME")], ValueType::DateTime),
            ("GEO", vec![], ValueType::Float),
            ("TZOFFSETTO", vec![], ValueType::UtcOffset),
        ];
        for (name, params, expected) in cases {
            assert_eq!(detect_value_type(name, &params).unwrap(), expected, "{name}");
        }

        let err = detect_value_type("DTSTART", &[param("VALUE", "BOGUS")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid VALUE Type 'BOGUS'");
    }

    #[test]
    fn splits_multi_and_structured_values() {
        assert_eq!(split_value("CATEGORIES", r"a,b\,c"), ["a", r"b\,c"]);
        assert_eq!(split_value("GEO", "37.38;-122.08"), ["37.38", "-122.08"]);
        assert_eq!(split_value("REQUEST-STATUS", r"2.0;Success\;ok"), ["2.0", r"Success\;ok"]);
        assert_eq!(split_value("SUMMARY", "a,b;c"), ["a,b;c"]);
        assert_eq!(split_value("RDATE", "19970101,19970120"), ["19970101", "19970120"]);
        assert!(property_design("RDATE").allows(ValueType::Period));
        assert!(!property_design("DTSTART").allows(ValueType::Period));
    }

    #[test]
    fn validates_by_pattern_and_allow_list() {
        assert_eq!(
            validate_value("PRIORITY", ValueType::Integer, "5", None).unwrap(),
            Value::Integer(5)
        );
        let err = validate_value("PRIORITY", ValueType::Integer, "high", None).unwrap_err();
        assert_eq!(err.to_string(), "Value 'high' for PRIORITY is not INTEGER");

        let err = validate_value("GEO", ValueType::Float, "1", None).unwrap_err();
        assert_eq!(err.to_string(), "Value '1' for GEO is not FLOAT");

        let err = validate_value("X-FLAG", ValueType::Boolean, "maybe", None).unwrap_err();
        assert_eq!(err.to_string(), "Value for X-FLAG is not a BOOLEAN");

        let err = validate_value("TZOFFSETFROM", ValueType::UtcOffset, "-0000", None).unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyValue { .. }), "{err:?}");
    }

    #[test]
    fn binary_requires_base64_encoding() {
        let params = [param("VALUE", "BINARY")];
        let err = validate_value("ATTACH", ValueType::Binary, "SGVsbG8=", Some(&params)).unwrap_err();
        assert_eq!(err.to_string(), "Value requires ENCODING=BASE64");

        let params = [param("VALUE", "BINARY"), param("ENCODING", "BASE64")];
        let value = validate_value("ATTACH", ValueType::Binary, "SGVsbG8=", Some(&params)).unwrap();
        assert_eq!(value.as_binary().unwrap().as_bytes(), b"Hello");

        assert!(validate_value("ATTACH", ValueType::Binary, "SGVsbG8", Some(&params)).is_err());
    }

    #[test]
    fn validates_parameters() {
        assert!(validate_parameter("ATTENDEE", &param("PARTSTAT", "ACCEPTED")).is_ok());
        assert!(validate_parameter("ATTENDEE", &param("PARTSTAT", "X-MAYBE")).is_ok());
        assert!(validate_parameter("ATTENDEE", &param("RSVP", "true")).is_ok());
        assert!(validate_parameter("ATTENDEE", &param("CN", "Anyone, really")).is_ok());
        assert!(validate_parameter("ATTACH", &param("ENCODING", "QUOTED")).is_err());
        assert!(validate_parameter("TRIGGER", &param("RELATED", "MIDDLE")).is_err());
        assert!(validate_parameter("ATTENDEE", &param("RSVP", "maybe")).is_err());
        assert_eq!(param_type("DELEGATED-TO"), ValueType::CalAddress);
        assert_eq!(param_type("CN"), ValueType::Text);
    }

    #[test]
    fn base64_pattern() {
        for ok in ["", "SGVs", "SGVsbG8=", "SGk=", "SGVsbG8gV29ybGQ="] {
            assert!(is_base64(ok), "{ok}");
        }
        for bad in ["SGV", "SGk", "S===", "SG!s", "=SGk"] {
            assert!(!is_base64(bad), "{bad}");
        }
    }
}
