//! Product records and the field sets used to create and edit them.

use crate::{error::Result, Error, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A located product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned once
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Aisle label, usually numeric
    pub aisle: String,
    /// Bay within the aisle, empty when unknown
    #[serde(default)]
    pub bay: String,
    /// Free-form notes, empty when unset
    #[serde(default)]
    pub notes: String,
    /// When the product was first recorded
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product from user-entered fields.
    ///
    /// Fields are trimmed; a blank name or aisle is rejected.
    pub fn new(
        id: impl Into<ProductId>,
        fields: ProductFields,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let fields = fields.normalized()?;
        Ok(Self {
            id: id.into(),
            name: fields.name,
            aisle: fields.aisle,
            bay: fields.bay,
            notes: fields.notes,
            created_at,
        })
    }

    /// Merge a patch over this product. `id` and `created_at` never change.
    ///
    /// The product is left untouched when the patch would blank a required field.
    pub fn apply(&mut self, patch: &ProductPatch) -> Result<()> {
        let name = match &patch.name {
            Some(name) => required(name, "name")?,
            None => self.name.clone(),
        };
        let aisle = match &patch.aisle {
            Some(aisle) => required(aisle, "aisle")?,
            None => self.aisle.clone(),
        };

        self.name = name;
        self.aisle = aisle;
        if let Some(bay) = &patch.bay {
            self.bay = bay.trim().to_string();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.trim().to_string();
        }
        Ok(())
    }

    /// Validate a raw JSON record coming from an import or a remote document.
    ///
    /// `id` and `name` must be non-empty strings. Missing optional fields
    /// become empty strings and a missing or unreadable `createdAt` is
    /// replaced by `now`. Numeric `aisle`/`bay` values are kept as text.
    pub fn from_record(value: &Value, now: DateTime<Utc>) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidPayload("record is not an object".into()))?;

        let id = text(object.get("id"))
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingField("id"))?;
        let name = text(object.get("name"))
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingField("name"))?;

        let created_at = object
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        Ok(Self {
            id,
            name,
            aisle: text(object.get("aisle")).unwrap_or_default(),
            bay: text(object.get("bay")).unwrap_or_default(),
            notes: text(object.get("notes")).unwrap_or_default(),
            created_at,
        })
    }

    /// Whether the product matches an already lower-cased search needle.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.aisle.to_lowercase().contains(needle)
            || self.notes.to_lowercase().contains(needle)
    }
}

/// Validate a batch of raw records, silently dropping invalid ones.
pub fn validate_records(values: &[Value], now: DateTime<Utc>) -> Vec<Product> {
    values
        .iter()
        .filter_map(|value| Product::from_record(value, now).ok())
        .collect()
}

/// Fields supplied when creating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub aisle: String,
    #[serde(default)]
    pub bay: String,
    #[serde(default)]
    pub notes: String,
}

impl ProductFields {
    /// Create a field set with the two required fields.
    pub fn new(name: impl Into<String>, aisle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aisle: aisle.into(),
            ..Default::default()
        }
    }

    pub fn with_bay(mut self, bay: impl Into<String>) -> Self {
        self.bay = bay.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Trim every field and check the required ones.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            name: required(&self.name, "name")?,
            aisle: required(&self.aisle, "aisle")?,
            bay: self.bay.trim().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

/// A partial edit. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub aisle: Option<String>,
    pub bay: Option<String>,
    pub notes: Option<String>,
}

impl ProductPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn aisle(mut self, aisle: impl Into<String>) -> Self {
        self.aisle = Some(aisle.into());
        self
    }

    pub fn bay(mut self, bay: impl Into<String>) -> Self {
        self.bay = Some(bay.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.aisle.is_none() && self.bay.is_none() && self.notes.is_none()
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
