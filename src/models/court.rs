use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::booking::MAX_SLOTS;
use super::{require, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    /// Hourly rate.
    #[serde(rename = "price", alias = "rate")]
    pub rate: f64,
    #[serde(default)]
    pub capacity: u32,
    pub availability: Availability,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub image: String,
}

/// The backend stores availability either as a slot count or as free text
/// such as "6 slots daily".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Availability {
    Slots(u32),
    Description(String),
}

impl Availability {
    /// Most slots a single booking may take on this court.
    pub fn slot_cap(&self) -> u32 {
        let count = match self {
            Availability::Slots(n) => *n,
            Availability::Description(text) => first_integer(text).unwrap_or(MAX_SLOTS),
        };
        count.min(MAX_SLOTS)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Slots(n) => write!(f, "{n} slots"),
            Availability::Description(text) => f.write_str(text),
        }
    }
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl Court {
    pub fn total_price(&self, slots: u32) -> f64 {
        self.rate * f64::from(slots)
    }

    /// Case-insensitive substring match over name, location and type.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.name, &self.location, &self.kind]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Validate for Court {
    const ENTITY: &'static str = "court";

    fn validate(&self) -> Result<(), String> {
        require(&self.id, "id")?;
        require(&self.name, "name")?;
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(format!("rate {} is not a valid price", self.rate));
        }
        Ok(())
    }
}

/// Body for `POST /courts` and `PATCH /courts/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCourt {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(rename = "price")]
    pub rate: f64,
    pub capacity: u32,
    pub availability: Availability,
    pub description: String,
    pub amenities: BTreeSet<String>,
    pub image: String,
}
