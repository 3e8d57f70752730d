use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The fixed taxonomy of financial-statement fields recognized in
/// processor entities. Wire names match the entity type tags exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Capital")]
    Capital,
    #[serde(rename = "Investments")]
    Investments,
    #[serde(rename = "Net-Profit")]
    NetProfit,
    #[serde(rename = "Total-Assets")]
    TotalAssets,
    #[serde(rename = "Total-Expenditure")]
    TotalExpenditure,
    #[serde(rename = "Total-Income")]
    TotalIncome,
    #[serde(rename = "Total-Liabilities")]
    TotalLiabilities,
    #[serde(rename = "Year")]
    Year,
}

impl CanonicalField {
    /// All canonical fields, in output order.
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Capital,
        CanonicalField::Investments,
        CanonicalField::NetProfit,
        CanonicalField::TotalAssets,
        CanonicalField::TotalExpenditure,
        CanonicalField::TotalIncome,
        CanonicalField::TotalLiabilities,
        CanonicalField::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Capital => "Capital",
            CanonicalField::Investments => "Investments",
            CanonicalField::NetProfit => "Net-Profit",
            CanonicalField::TotalAssets => "Total-Assets",
            CanonicalField::TotalExpenditure => "Total-Expenditure",
            CanonicalField::TotalIncome => "Total-Income",
            CanonicalField::TotalLiabilities => "Total-Liabilities",
            CanonicalField::Year => "Year",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The collapsed value of one field bucket.
///
/// Serializes as `null`, a string, or an array of strings. Arrays are
/// collapsed on the way in, so `[]` reads as absent and `["x"]` as single.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No entity of this type was found.
    #[default]
    Absent,
    /// Exactly one entity was found.
    Single(String),
    /// Two or more entities, in document order.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Collapse the mentions collected for one field.
    pub fn from_mentions(mut mentions: Vec<String>) -> Self {
        match mentions.len() {
            0 => FieldValue::Absent,
            1 => FieldValue::Single(mentions.remove(0)),
            _ => FieldValue::Multiple(mentions),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => FieldValue::Absent,
            Some(Raw::One(text)) => FieldValue::Single(text),
            Some(Raw::Many(texts)) => FieldValue::from_mentions(texts),
        })
    }
}

/// One value per canonical field. Every field always has an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: [FieldValue; 8],
}

impl ExtractedFields {
    pub fn get(&self, field: CanonicalField) -> &FieldValue {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: CanonicalField, value: FieldValue) {
        self.values[field.index()] = value;
    }

    /// Fields paired with their values, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &FieldValue)> {
        CanonicalField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
    }
}
