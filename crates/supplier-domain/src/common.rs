//! Shared traits and enums for supplier records.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{supplier::SupplierId, DomainError};

/// Exposes the stable identifier of a stored supplier.
pub trait Identifiable {
    fn id(&self) -> &SupplierId;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Countries a supplier can be registered in.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Country {
    #[default]
    #[serde(rename = "JP")]
    Jp,
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "CN")]
    Cn,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::Jp, Country::Us, Country::Cn];

    /// ISO-style code used on the wire and in commands.
    pub fn code(self) -> &'static str {
        match self {
            Country::Jp => "JP",
            Country::Us => "US",
            Country::Cn => "CN",
        }
    }

    /// Fixed display label.
    pub fn label(self) -> &'static str {
        match self {
            Country::Jp => "日本",
            Country::Us => "アメリカ",
            Country::Cn => "中国",
        }
    }
}

impl FromStr for Country {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JP" => Ok(Country::Jp),
            "US" => Ok(Country::Us),
            "CN" => Ok(Country::Cn),
            _ => Err(DomainError::UnknownCountry(value.trim().to_string())),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Review status shown on the list screen. Not editable through forms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Pending,
    Inactive,
}

impl SupplierStatus {
    pub fn code(self) -> &'static str {
        match self {
            SupplierStatus::Active => "active",
            SupplierStatus::Pending => "pending",
            SupplierStatus::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SupplierStatus::Active => "有効",
            SupplierStatus::Pending => "審査中",
            SupplierStatus::Inactive => "無効",
        }
    }
}

impl FromStr for SupplierStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(SupplierStatus::Active),
            "pending" => Ok(SupplierStatus::Pending),
            "inactive" => Ok(SupplierStatus::Inactive),
            _ => Err(DomainError::UnknownStatus(value.trim().to_string())),
        }
    }
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Recommendation score between 1 and 5 inclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Default rating of a fresh application.
    pub const APPLY_DEFAULT: Rating = Rating(3);
    /// Default rating of the update form before a record is loaded.
    pub const UPDATE_DEFAULT: Rating = Rating(4);

    /// Returns `None` when `value` is outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Saturates `value` into 1..=5.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Five-character star gauge, e.g. `★★★☆☆`.
    pub fn stars(self) -> String {
        (Self::MIN..=Self::MAX)
            .map(|star| if star <= self.0 { '★' } else { '☆' })
            .collect()
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::APPLY_DEFAULT
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or(DomainError::RatingOutOfRange(value as i64))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
