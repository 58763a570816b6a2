// # Endpoint
//
// One DNS record as the reconciliation engine sees it.
//
// ## Wire Shape
//
// ```json
// {
//   "dnsName": "www.example.com",
//   "targets": ["192.0.2.1"],
//   "recordType": "A",
//   "setIdentifier": "eu-west",
//   "recordTTL": 300,
//   "labels": { "owner": "default" },
//   "providerSpecific": [{ "name": "weight", "value": "10" }]
// }
// ```
//
// Unset fields are omitted, never written as `null`. Unknown fields are
// ignored on decode, and a missing or `null` field decodes to its empty value.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered record targets (addresses, hostnames, text values)
pub type Targets = Vec<String>;

/// Engine bookkeeping labels
///
/// Ordered by key so the encoded payload is deterministic.
pub type Labels = BTreeMap<String, String>;

/// Ordered provider-specific properties
///
/// A sequence rather than a map: names may repeat and order may matter to a
/// given plugin.
pub type ProviderSpecific = Vec<ProviderSpecificProperty>;

/// Record time-to-live in seconds
///
/// Zero means "unspecified"; the field is then omitted from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(pub i64);

impl Ttl {
    /// Whether a TTL was explicitly set
    pub fn is_configured(&self) -> bool {
        !self.is_unset()
    }

    fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Ttl {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decode `null` as the type's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single provider-specific name/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSpecificProperty {
    /// Property name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Property value
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

impl ProviderSpecificProperty {
    /// Create a new property
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One DNS record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified record name
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub dns_name: String,

    /// Record targets, order preserved
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub targets: Targets,

    /// Record type ("A", "CNAME", "TXT", ...)
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub record_type: String,

    /// Disambiguates records sharing name and type (weighted routing, ...)
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub set_identifier: String,

    /// Time-to-live in seconds, zero when unspecified
    #[serde(
        rename = "recordTTL",
        skip_serializing_if = "Ttl::is_unset",
        deserialize_with = "null_as_default"
    )]
    pub record_ttl: Ttl,

    /// Engine bookkeeping labels, round-tripped untouched
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub labels: Labels,

    /// Provider-specific properties, order preserved
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub provider_specific: ProviderSpecific,
}

impl Endpoint {
    /// Create an endpoint with a name, type and targets
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create an endpoint carrying only a name
    pub fn named(dns_name: impl Into<String>) -> Self {
        Self {
            dns_name: dns_name.into(),
            ..Self::default()
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: impl Into<Ttl>) -> Self {
        self.record_ttl = ttl.into();
        self
    }

    /// Set the set identifier
    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = set_identifier.into();
        self
    }

    /// Add or overwrite a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Append a provider-specific property
    pub fn with_provider_specific(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.provider_specific
            .push(ProviderSpecificProperty::new(name, value));
        self
    }

    /// Value of the first provider-specific property called `name`
    pub fn get_provider_specific_property(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Set a provider-specific property
    ///
    /// Replaces the first property with the same name in place, otherwise
    /// appends. Ordering of the other properties is untouched.
    pub fn set_provider_specific_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.provider_specific.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self
                .provider_specific
                .push(ProviderSpecificProperty { name, value }),
        }
    }

    /// Remove every provider-specific property called `name`
    pub fn delete_provider_specific_property(&mut self, name: &str) {
        self.provider_specific.retain(|p| p.name != name);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specific: Vec<String> = self
            .provider_specific
            .iter()
            .map(|p| format!("{}={}", p.name, p.value))
            .collect();

        write!(
            f,
            "{} {} IN {} {} {} [{}]",
            self.dns_name,
            self.record_ttl,
            self.record_type,
            self.set_identifier,
            self.targets.join(";"),
            specific.join(";")
        )
    }
}
