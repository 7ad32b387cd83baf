//! Representation of the entity producing telemetry.
//!
//! A [`Resource`] is an immutable set of attributes describing the service a
//! pipeline belongs to. It is attached to the [`TracerProvider`] at
//! construction time and handed to every exporter via `set_resource`, so
//! backends can associate exported spans with the producing process.
//!
//! [`TracerProvider`]: crate::trace::TracerProvider

use tracekit::{Key, KeyValue, Value};

/// Attribute key marking the logical name of the service.
pub const SERVICE_NAME: &str = "service.name";
/// Attribute key marking the version of the service.
pub const SERVICE_VERSION: &str = "service.version";

/// An immutable representation of the entity producing telemetry as
/// attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    attrs: Vec<KeyValue>,
}

impl Default for Resource {
    fn default() -> Self {
        Resource::builder().build()
    }
}

impl Resource {
    /// A resource with no attributes.
    pub fn empty() -> Self {
        Resource { attrs: Vec::new() }
    }

    /// Create a new [`ResourceBuilder`], pre-populated with the identity of
    /// this library.
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder {
            attrs: vec![
                KeyValue::new("telemetry.sdk.name", "tracekit"),
                KeyValue::new("telemetry.sdk.version", env!("CARGO_PKG_VERSION")),
                KeyValue::new("telemetry.sdk.language", "rust"),
            ],
        }
    }

    /// Retrieve the value for the given key, if it is set.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.attrs
            .iter()
            .find(|kv| kv.key == *key)
            .map(|kv| &kv.value)
    }

    /// An ordered iterator over the resource attributes.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.attrs.iter()
    }

    /// Whether the resource carries no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// Builder for [`Resource`].
#[derive(Clone, Debug)]
pub struct ResourceBuilder {
    attrs: Vec<KeyValue>,
}

impl ResourceBuilder {
    /// Set the `service.name` attribute.
    pub fn with_service_name(self, name: impl Into<Value>) -> Self {
        self.with_attribute(KeyValue::new(SERVICE_NAME, name))
    }

    /// Set the `service.version` attribute.
    pub fn with_service_version(self, version: impl Into<Value>) -> Self {
        self.with_attribute(KeyValue::new(SERVICE_VERSION, version))
    }

    /// Add or replace a single attribute.
    pub fn with_attribute(mut self, kv: KeyValue) -> Self {
        if let Some(existing) = self.attrs.iter_mut().find(|existing| existing.key == kv.key) {
            existing.value = kv.value;
        } else {
            self.attrs.push(kv);
        }
        self
    }

    /// Add or replace multiple attributes.
    pub fn with_attributes<T: IntoIterator<Item = KeyValue>>(mut self, attrs: T) -> Self {
        for kv in attrs {
            self = self.with_attribute(kv);
        }
        self
    }

    /// Create the [`Resource`] from this builder.
    pub fn build(self) -> Resource {
        Resource { attrs: self.attrs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resource_identifies_the_sdk() {
        let resource = Resource::default();
        assert_eq!(
            resource.get(&Key::new("telemetry.sdk.name")),
            Some(&Value::from("tracekit"))
        );
        assert!(Resource::empty().is_empty());
    }

    #[test]
    fn builder_sets_service_identity() {
        let resource = Resource::builder()
            .with_service_name("pipeline-worker")
            .with_service_version("1.2.3")
            .build();

        assert_eq!(
            resource.get(&Key::new(SERVICE_NAME)),
            Some(&Value::from("pipeline-worker"))
        );
        assert_eq!(
            resource.get(&Key::new(SERVICE_VERSION)),
            Some(&Value::from("1.2.3"))
        );
    }

    #[test]
    fn later_attributes_replace_earlier_ones() {
        let resource = Resource::builder()
            .with_service_name("first")
            .with_service_name("second")
            .build();

        assert_eq!(
            resource.get(&Key::new(SERVICE_NAME)),
            Some(&Value::from("second"))
        );
    }
}
