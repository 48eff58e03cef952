//! iCalendar property and parameter types (RFC 5545 §3.1, §3.2).

/// A property parameter, e.g. `TZID=Europe/Oslo` or `VALUE=DATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values in order of appearance.
    pub values: Vec<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Shorthand for a `VALUE=` type parameter.
    #[must_use]
    pub fn value_type(ty: &str) -> Self {
        Self::new("VALUE", ty)
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// A parsed iCalendar property.
///
/// The raw value is kept in wire form (escaped); use [`Property::text`] for
/// the unescaped text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Wire-form value string (after unfolding, before unescaping).
    pub raw_value: String,
}

impl Property {
    /// Creates a text property, escaping the value for the wire.
    #[must_use]
    pub fn text(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: crate::ical::build::escape_text(value),
        }
    }

    /// Creates a property from an already wire-formed value.
    #[must_use]
    pub fn raw(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: raw_value.into(),
        }
    }

    /// Adds a parameter, consuming and returning self for chaining.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    /// Returns the `VALUE` parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.get_param_value("VALUE")
    }

    /// Returns the `TZID` parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }

    /// Returns the unescaped text rendering of the value.
    #[must_use]
    pub fn text_value(&self) -> String {
        crate::ical::parse::unescape_text(&self.raw_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_property_escapes_on_the_wire() {
        let prop = Property::text("SUMMARY", "Dive, deep;\nsecond line");
        assert_eq!(prop.raw_value, "Dive\\, deep\\;\\nsecond line");
        assert_eq!(prop.text_value(), "Dive, deep;\nsecond line");
    }

    #[test]
    fn param_lookup_is_case_insensitive() {
        let prop = Property::raw("DTSTART", "20250826")
            .with_param(Parameter::value_type("DATE"));
        assert_eq!(prop.value_type(), Some("DATE"));
        assert_eq!(prop.get_param_value("value"), Some("DATE"));
    }
}
