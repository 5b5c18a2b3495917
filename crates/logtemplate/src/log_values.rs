//! A template bound to the arguments of one log call.

use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::error::{IndexError, Result};
use crate::template::Template;
use crate::value::Value;

/// A compiled [`Template`] paired with one call site's arguments.
///
/// This is what a logging facade hands to its sinks: the rendered message on
/// demand, and the structured fields for machine-readable output.
///
/// # Example
///
/// ```
/// use logtemplate::{Template, values};
///
/// let template = Template::compile("Fetched {Count} rows in {Elapsed:F1}ms");
/// let args = values![12, 3.456];
/// let event = template.bind(&args);
///
/// assert_eq!(event.message().unwrap(), "Fetched 12 rows in 3.5ms");
///
/// let json = serde_json::to_string(&event).unwrap();
/// assert_eq!(
///     json,
///     r#"{"Count":12,"Elapsed":3.456,"{OriginalFormat}":"Fetched {Count} rows in {Elapsed:F1}ms"}"#
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogValues<'a> {
    template: &'a Template,
    values: &'a [Value],
}

impl<'a> LogValues<'a> {
    pub(crate) fn new(template: &'a Template, values: &'a [Value]) -> Self {
        Self { template, values }
    }

    /// The bound template.
    pub fn template(&self) -> &'a Template {
        self.template
    }

    /// The bound arguments.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Renders the message text. See [`Template::render`].
    pub fn message(&self) -> Result<String> {
        self.template.render(self.values)
    }

    /// Structured name/value pairs. See [`Template::structured_values`].
    pub fn fields(&self) -> Result<Vec<(&'a str, Value)>, IndexError> {
        self.template.structured_values(self.values)
    }
}

impl Serialize for LogValues<'_> {
    /// Serializes the structured pairs as a map, in placeholder order.
    ///
    /// Repeated placeholder names produce repeated keys.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = self.fields().map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, value) in &fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "kv")]
impl log::kv::Source for LogValues<'_> {
    fn visit<'kvs>(
        &'kvs self,
        visitor: &mut dyn log::kv::VisitSource<'kvs>,
    ) -> std::result::Result<(), log::kv::Error> {
        use log::kv::{Key, ToValue};

        let names = self.template.placeholder_names();
        if self.values.len() < names.len() {
            return Err(log::kv::Error::msg("fewer values than template placeholders"));
        }
        for (name, value) in names.iter().zip(self.values) {
            visitor.visit_pair(Key::from_str(name), value.to_value())?;
        }
        visitor.visit_pair(
            Key::from_str(crate::ORIGINAL_FORMAT_KEY),
            log::kv::Value::from(self.template.original_format()),
        )
    }

    fn count(&self) -> usize {
        self.template.placeholder_names().len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use serde_json::json;

    #[test]
    fn message_and_fields() {
        let template = Template::compile("{User} did {Action}");
        let args = values!["ana", "login"];
        let event = template.bind(&args);

        assert_eq!(event.message().unwrap(), "ana did login");
        assert_eq!(event.fields().unwrap().len(), 3);
        assert_eq!(event.template(), &template);
        assert_eq!(event.values().len(), 2);
    }

    #[test]
    fn serializes_as_map_with_original_format_last() {
        let template = Template::compile("{Items} at {When:s}");
        let args = values![vec![1, 2], crate::Timestamp::from_secs(0)];
        let value = serde_json::to_value(template.bind(&args)).unwrap();
        assert_eq!(
            value,
            json!({
                "Items": [1, 2],
                "When": "1970-01-01T00:00:00Z",
                "{OriginalFormat}": "{Items} at {When:s}",
            })
        );
    }

    #[test]
    fn serialization_fails_on_under_supply() {
        let template = Template::compile("{A} {B}");
        let args = values![1];
        assert!(serde_json::to_string(&template.bind(&args)).is_err());
    }

    #[cfg(feature = "kv")]
    mod kv {
        use super::*;
        use log::kv::{Error, Key, Source, VisitSource};

        #[derive(Default)]
        struct Collect(Vec<(String, String)>);

        impl<'kvs> VisitSource<'kvs> for Collect {
            fn visit_pair(
                &mut self,
                key: Key<'kvs>,
                value: log::kv::Value<'kvs>,
            ) -> std::result::Result<(), Error> {
                self.0.push((key.as_str().to_string(), value.to_string()));
                Ok(())
            }
        }

        #[test]
        fn visits_fields_then_original_format() {
            let template = Template::compile("{Id} {Tags}");
            let args = values![7, vec!["a", "b"]];
            let event = template.bind(&args);

            let mut collect = Collect::default();
            event.visit(&mut collect).unwrap();
            assert_eq!(
                collect.0,
                vec![
                    ("Id".to_string(), "7".to_string()),
                    ("Tags".to_string(), "a, b".to_string()),
                    ("{OriginalFormat}".to_string(), "{Id} {Tags}".to_string()),
                ]
            );
            assert_eq!(event.count(), 3);
        }

        #[test]
        fn under_supply_is_an_error() {
            let template = Template::compile("{Id}");
            let args: [Value; 0] = [];
            let mut collect = Collect::default();
            assert!(template.bind(&args).visit(&mut collect).is_err());
        }
    }
}
