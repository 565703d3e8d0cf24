//! Supplier record, editable draft, and identifier rules.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    common::{Country, Displayable, Identifiable, NamedEntity, Rating, SupplierStatus},
    DomainError,
};

/// Required length of a corporate number (法人番号).
pub const CORPORATE_ID_LENGTH: usize = 13;

static SUPPLIER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SUP-[0-9]{4}$").expect("supplier id pattern compiles"));

static CORPORATE_ID_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{13}$").expect("corporate id pattern compiles"));

/// Returns `true` when `value` has exactly [`CORPORATE_ID_LENGTH`] characters.
pub fn corporate_id_has_valid_length(value: &str) -> bool {
    value.chars().count() == CORPORATE_ID_LENGTH
}

/// Returns `true` when `value` is exactly thirteen ASCII digits.
pub fn corporate_id_is_numeric(value: &str) -> bool {
    CORPORATE_ID_DIGITS.is_match(value)
}

/// System-assigned identifier in `SUP-XXXX` form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct SupplierId(String);

impl SupplierId {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let candidate = value.trim().to_ascii_uppercase();
        if SUPPLIER_ID_PATTERN.is_match(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(DomainError::InvalidSupplierId(value.trim().to_string()))
        }
    }

    /// Formats `SUP-{sequence:04}`. Sequences above 9999 are not representable.
    pub fn from_sequence(sequence: u16) -> Result<Self, DomainError> {
        Self::parse(&format!("SUP-{sequence:04}"))
    }

    /// Numeric part of the identifier.
    pub fn sequence(&self) -> u16 {
        self.0[4..].parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SupplierId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SupplierId::parse(&value)
    }
}

impl From<SupplierId> for String {
    fn from(id: SupplierId) -> Self {
        id.0
    }
}

impl FromStr for SupplierId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SupplierId::parse(value)
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A supplier master record as shown on the list screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRecord {
    pub id: SupplierId,
    pub name: String,
    pub corporate_id: String,
    pub country: Country,
    #[serde(default)]
    pub email: String,
    pub rating: Rating,
    pub status: SupplierStatus,
    pub last_updated: NaiveDate,
}

impl SupplierRecord {
    pub fn new(
        id: SupplierId,
        draft: SupplierDraft,
        status: SupplierStatus,
        last_updated: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            corporate_id: draft.corporate_id,
            country: draft.country,
            email: draft.email,
            rating: draft.rating,
            status,
            last_updated,
        }
    }

    /// Copies the editable fields into a fresh draft.
    pub fn to_draft(&self) -> SupplierDraft {
        SupplierDraft {
            name: self.name.clone(),
            corporate_id: self.corporate_id.clone(),
            country: self.country,
            email: self.email.clone(),
            rating: self.rating,
        }
    }

    /// Overwrites the editable fields and stamps `last_updated`.
    pub fn apply_draft(&mut self, draft: SupplierDraft, today: NaiveDate) {
        self.name = draft.name;
        self.corporate_id = draft.corporate_id;
        self.country = draft.country;
        self.email = draft.email;
        self.rating = draft.rating;
        self.last_updated = today;
    }

    pub fn is_submittable(&self) -> bool {
        self.to_draft().is_submittable()
    }
}

impl Identifiable for SupplierRecord {
    fn id(&self) -> &SupplierId {
        &self.id
    }
}

impl NamedEntity for SupplierRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for SupplierRecord {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.id, self.name, self.country.label())
    }
}

/// The editable subset of a supplier held by a form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub name: String,
    pub corporate_id: String,
    pub country: Country,
    #[serde(default)]
    pub email: String,
    pub rating: Rating,
}

impl SupplierDraft {
    /// Blank draft for a new application.
    pub fn for_apply() -> Self {
        Self {
            name: String::new(),
            corporate_id: String::new(),
            country: Country::default(),
            email: String::new(),
            rating: Rating::APPLY_DEFAULT,
        }
    }

    /// Blank draft shown by the update form before its record arrives.
    pub fn for_update() -> Self {
        Self {
            rating: Rating::UPDATE_DEFAULT,
            ..Self::for_apply()
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Length-only submittability check.
    pub fn is_submittable(&self) -> bool {
        self.has_name() && corporate_id_has_valid_length(&self.corporate_id)
    }

    /// Email with the empty string mapped to `None`.
    pub fn email(&self) -> Option<&str> {
        (!self.email.is_empty()).then_some(self.email.as_str())
    }
}

impl Default for SupplierDraft {
    fn default() -> Self {
        Self::for_apply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_id_requires_four_digits() {
        assert_eq!(SupplierId::parse("sup-0042").unwrap().as_str(), "SUP-0042");
        assert!(SupplierId::parse("SUP-42").is_err());
        assert!(SupplierId::parse("SUP-00042").is_err());
        assert!(SupplierId::parse("ABC-0001").is_err());
        assert_eq!(SupplierId::from_sequence(7).unwrap().to_string(), "SUP-0007");
        assert_eq!(SupplierId::parse("SUP-0120").unwrap().sequence(), 120);
    }

    #[test]
    fn corporate_id_checks_length_and_digits_separately() {
        assert!(corporate_id_has_valid_length("1234567890123"));
        assert!(corporate_id_has_valid_length("12345678901ab"));
        assert!(!corporate_id_has_valid_length("123456789012"));
        assert!(corporate_id_is_numeric("1234567890123"));
        assert!(!corporate_id_is_numeric("12345678901ab"));
    }

    #[test]
    fn draft_defaults_follow_flow() {
        assert_eq!(SupplierDraft::for_apply().rating.value(), 3);
        assert_eq!(SupplierDraft::for_update().rating.value(), 4);
        assert_eq!(SupplierDraft::for_apply().country, Country::Jp);
        assert!(SupplierDraft::for_apply().email().is_none());
    }

    #[test]
    fn record_round_trips_through_camel_case_json() {
        let draft = SupplierDraft {
            name: "ACME".into(),
            corporate_id: "1234567890123".into(),
            country: Country::Us,
            email: String::new(),
            rating: Rating::APPLY_DEFAULT,
        };
        let record = SupplierRecord::new(
            SupplierId::from_sequence(9).unwrap(),
            draft,
            SupplierStatus::Pending,
            NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"corporateId\":\"1234567890123\""));
        assert!(json.contains("\"lastUpdated\":\"2025-08-20\""));
        let decoded: SupplierRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn apply_draft_stamps_last_updated() {
        let mut record = SupplierRecord::new(
            SupplierId::from_sequence(1).unwrap(),
            SupplierDraft::for_apply(),
            SupplierStatus::Active,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        let mut draft = record.to_draft();
        draft.name = "Renamed".into();
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        record.apply_draft(draft, today);
        assert_eq!(record.name, "Renamed");
        assert_eq!(record.last_updated, today);
        assert_eq!(record.status, SupplierStatus::Active);
    }
}
