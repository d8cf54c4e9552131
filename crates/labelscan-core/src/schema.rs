//! The fixed product-record template.
//!
//! The template doubles as the schema hint embedded in the prompt and as the
//! value returned whenever the model's reply cannot be used.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{json, Value};

/// Sentinel for a field the model could not fill.
pub const NOT_AVAILABLE: &str = "N/A";

/// Target shape of an extracted product record, every field defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTemplate {
    pub name: String,
    pub category: String,
    pub characteristics: Characteristics,
    pub additional_info: AdditionalInfo,
}

/// Nutrition and packaging characteristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristics {
    pub energy_value: String,
    pub sodium: String,
    pub total_sugar: String,
    pub free_sugar: String,
    pub total_protein: String,
    pub total_fat: String,
    pub fruit_content: String,
    pub age_marking: String,
    /// Packaging flag, carried as the string `"false"` / `"true"`
    pub high_sugar_front_packaging: String,
    /// Packaging flag, carried as the string `"false"` / `"true"`
    pub labeling: String,
}

/// Descriptive metadata printed on the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInfo {
    pub containings: String,
    pub description: String,
    pub manufacturer_address: String,
    pub storing_conditions: String,
}

impl Default for SchemaTemplate {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            category: NOT_AVAILABLE.to_string(),
            characteristics: Characteristics::default(),
            additional_info: AdditionalInfo::default(),
        }
    }
}

impl Default for Characteristics {
    fn default() -> Self {
        Self {
            energy_value: NOT_AVAILABLE.to_string(),
            sodium: NOT_AVAILABLE.to_string(),
            total_sugar: NOT_AVAILABLE.to_string(),
            free_sugar: NOT_AVAILABLE.to_string(),
            total_protein: NOT_AVAILABLE.to_string(),
            total_fat: NOT_AVAILABLE.to_string(),
            fruit_content: NOT_AVAILABLE.to_string(),
            age_marking: NOT_AVAILABLE.to_string(),
            high_sugar_front_packaging: "false".to_string(),
            labeling: "true".to_string(),
        }
    }
}

impl Default for AdditionalInfo {
    fn default() -> Self {
        Self {
            containings: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            manufacturer_address: NOT_AVAILABLE.to_string(),
            storing_conditions: NOT_AVAILABLE.to_string(),
        }
    }
}

impl SchemaTemplate {
    /// JSON form of the template, keys in declaration order.
    ///
    /// `manufactuer_address` keeps the spelling the model has been prompted with.
    pub fn to_value(&self) -> Value {
        let c = &self.characteristics;
        let info = &self.additional_info;
        json!({
            "name": self.name,
            "category": self.category,
            "characteristics": {
                "energy_value": c.energy_value,
                "sodium": c.sodium,
                "total_sugar": c.total_sugar,
                "free_sugar": c.free_sugar,
                "total_protein": c.total_protein,
                "total_fat": c.total_fat,
                "fruit_content": c.fruit_content,
                "age_marking": c.age_marking,
                "high_sugar_front_packaging": c.high_sugar_front_packaging,
                "labeling": c.labeling,
            },
            "additional_info": {
                "containings": info.containings,
                "description": info.description,
                "manufactuer_address": info.manufacturer_address,
                "storing_conditions": info.storing_conditions,
            }
        })
    }

    /// Single-line JSON text for embedding in the prompt, with `", "` and
    /// `": "` separators.
    pub fn to_json_string(&self) -> String {
        let value = self.to_value();
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
        match value.serialize(&mut ser) {
            Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
            Err(_) => value.to_string(),
        }
    }
}

/// One-line formatter that puts a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
