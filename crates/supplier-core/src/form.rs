//! Draft holders for the apply, update and search screens.
//!
//! A form owns exactly one draft. Field edits replace a single value and
//! validity is derived on demand, so there is no cached flag to go stale.

use std::fmt;
use std::str::FromStr;

use supplier_domain::{
    corporate_id_has_valid_length, corporate_id_is_numeric, Country, Rating, SupplierDraft,
    CORPORATE_ID_LENGTH,
};
use tracing::debug;

use crate::{error::ValidationError, query::SearchQuery};

/// Editable fields of a supplier draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    CorporateId,
    Country,
    Email,
    Rating,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::CorporateId,
        FormField::Country,
        FormField::Email,
        FormField::Rating,
    ];

    /// Command-line key, e.g. `corporate-id`.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::CorporateId => "corporate-id",
            FormField::Country => "country",
            FormField::Email => "email",
            FormField::Rating => "rating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "調達先名",
            FormField::CorporateId => "法人番号",
            FormField::Country => "国",
            FormField::Email => "メール",
            FormField::Rating => "推奨度",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            FormField::Name => "正式名称を入力してください",
            FormField::CorporateId => "13桁の法人番号を入力",
            FormField::Country => "JP / US / CN",
            FormField::Email => "連絡用メールアドレス",
            FormField::Rating => "1〜5",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, FormField::Name | FormField::CorporateId)
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "name" => Ok(FormField::Name),
            "corporate-id" | "corporateid" => Ok(FormField::CorporateId),
            "country" => Ok(FormField::Country),
            "email" => Ok(FormField::Email),
            "rating" => Ok(FormField::Rating),
            _ => Err(format!(
                "unknown field `{}` (expected one of: {})",
                value.trim(),
                FormField::ALL.map(FormField::key).join(", ")
            )),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Tabs of the supplier forms. Only the basic tab accepts input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormTab {
    #[default]
    Basic,
    Credit,
    Contact,
}

impl FormTab {
    pub fn label(self) -> &'static str {
        match self {
            FormTab::Basic => "基本情報",
            FormTab::Credit => "与信",
            FormTab::Contact => "担当",
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, FormTab::Basic)
    }

    /// Notice shown on tabs that are not available yet.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            FormTab::Basic => None,
            FormTab::Credit => Some("与信情報の機能は今後のアップデートで追加予定です。"),
            FormTab::Contact => Some("担当者情報の機能は今後のアップデートで追加予定です。"),
        }
    }
}

impl FromStr for FormTab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FormTab::Basic),
            "credit" => Ok(FormTab::Credit),
            "contact" => Ok(FormTab::Contact),
            other => Err(format!("unknown tab `{other}` (basic, credit, contact)")),
        }
    }
}

/// How strictly the corporate number is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Require ASCII digits in addition to the 13-character length.
    pub digits_only: bool,
}

impl ValidationPolicy {
    pub fn strict() -> Self {
        Self { digits_only: true }
    }
}

/// Single mutable supplier draft with derived validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierForm {
    draft: SupplierDraft,
    initial: SupplierDraft,
    policy: ValidationPolicy,
}

impl SupplierForm {
    pub fn new(draft: SupplierDraft, policy: ValidationPolicy) -> Self {
        Self {
            initial: draft.clone(),
            draft,
            policy,
        }
    }

    pub fn for_apply(policy: ValidationPolicy) -> Self {
        Self::new(SupplierDraft::for_apply(), policy)
    }

    pub fn draft(&self) -> &SupplierDraft {
        &self.draft
    }

    pub fn into_draft(self) -> SupplierDraft {
        self.draft
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Replaces the draft and makes it the new reset point.
    pub fn load(&mut self, draft: SupplierDraft) {
        self.initial = draft.clone();
        self.draft = draft;
    }

    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.initial
    }

    /// Replaces one field. Rejected values leave the draft untouched.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        match field {
            FormField::Name => self.draft.name = value.to_string(),
            FormField::CorporateId => self.draft.corporate_id = value.trim().to_string(),
            FormField::Email => self.draft.email = value.trim().to_string(),
            FormField::Country => {
                self.draft.country = Country::from_str(value)
                    .map_err(|err| ValidationError::new(field, err.to_string()))?;
            }
            FormField::Rating => {
                let parsed = value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(Rating::new)
                    .ok_or_else(|| ValidationError::new(field, rating_message()))?;
                self.draft.rating = parsed;
            }
        }
        debug!(field = field.key(), "form field updated");
        Ok(())
    }

    /// Typed rating edit with the same range rule as [`Self::set_field`].
    pub fn set_rating(&mut self, value: u8) -> Result<(), ValidationError> {
        let rating =
            Rating::new(value).ok_or_else(|| ValidationError::new(FormField::Rating, rating_message()))?;
        self.draft.rating = rating;
        Ok(())
    }

    pub fn set_country(&mut self, country: Country) {
        self.draft.country = country;
    }

    /// `true` iff the name is non-empty and the corporate number passes the policy.
    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }

    /// Inline warnings for every field that blocks submission.
    pub fn issues(&self) -> Vec<ValidationError> {
        let mut issues = Vec::new();
        if !self.draft.has_name() {
            issues.push(ValidationError::new(FormField::Name, "必須項目です"));
        }
        let corporate_id = &self.draft.corporate_id;
        if !corporate_id_has_valid_length(corporate_id) {
            issues.push(ValidationError::new(
                FormField::CorporateId,
                format!("{CORPORATE_ID_LENGTH}桁で入力してください"),
            ));
        } else if self.policy.digits_only && !corporate_id_is_numeric(corporate_id) {
            issues.push(ValidationError::new(
                FormField::CorporateId,
                "数字のみで入力してください",
            ));
        }
        issues
    }
}

fn rating_message() -> String {
    format!("{}〜{}の整数で入力してください", Rating::MIN, Rating::MAX)
}

/// Search conditions entered on the search screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    keyword: String,
    country: Option<Country>,
}

impl SearchForm {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn country(&self) -> Option<Country> {
        self.country
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    pub fn set_country(&mut self, country: Country) {
        self.country = Some(country);
    }

    pub fn clear_country(&mut self) {
        self.country = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(self.keyword.trim(), self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(name: &str, corporate_id: &str) -> SupplierForm {
        let mut form = SupplierForm::for_apply(ValidationPolicy::default());
        form.set_field(FormField::Name, name).unwrap();
        form.set_field(FormField::CorporateId, corporate_id).unwrap();
        form
    }

    #[test]
    fn empty_name_is_invalid() {
        let form = form_with("", "1234567890123");
        assert!(!form.is_valid());
        assert_eq!(form.issues()[0].field, FormField::Name);
    }

    #[test]
    fn twelve_digit_corporate_id_is_invalid() {
        let form = form_with("ACME", "123456789012");
        assert!(!form.is_valid());
        assert_eq!(form.issues()[0].field, FormField::CorporateId);
    }

    #[test]
    fn name_and_thirteen_characters_are_valid() {
        assert!(form_with("ACME", "1234567890123").is_valid());
        assert!(form_with("ACME", "12345678901ab").is_valid());
    }

    #[test]
    fn strict_policy_requires_digits() {
        let mut form = SupplierForm::for_apply(ValidationPolicy::strict());
        form.set_field(FormField::Name, "ACME").unwrap();
        form.set_field(FormField::CorporateId, "12345678901ab").unwrap();
        assert!(!form.is_valid());
        form.set_field(FormField::CorporateId, "1234567890123").unwrap();
        assert!(form.is_valid());
    }

    #[test]
    fn out_of_range_rating_is_rejected_without_mutation() {
        let mut form = SupplierForm::for_apply(ValidationPolicy::default());
        for bad in ["0", "6", "-1", "three", ""] {
            let err = form.set_field(FormField::Rating, bad).unwrap_err();
            assert_eq!(err.field, FormField::Rating);
        }
        assert!(form.set_rating(9).is_err());
        assert_eq!(form.draft().rating.value(), 3);

        form.set_field(FormField::Rating, "3").unwrap();
        assert_eq!(form.draft().rating.value(), 3);
    }

    #[test]
    fn setting_rating_twice_matches_setting_once() {
        let mut once = SupplierForm::for_apply(ValidationPolicy::default());
        once.set_field(FormField::Rating, "4").unwrap();
        let mut twice = once.clone();
        twice.set_field(FormField::Rating, "4").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_country_keeps_previous_value() {
        let mut form = SupplierForm::for_apply(ValidationPolicy::default());
        form.set_field(FormField::Country, "us").unwrap();
        assert!(form.set_field(FormField::Country, "FR").is_err());
        assert_eq!(form.draft().country, Country::Us);
    }

    #[test]
    fn reset_restores_loaded_draft() {
        let mut form = SupplierForm::for_apply(ValidationPolicy::default());
        form.set_field(FormField::Name, "Draft").unwrap();
        assert!(form.is_dirty());
        form.reset();
        assert!(!form.is_dirty());
        assert!(form.draft().name.is_empty());
    }

    #[test]
    fn field_keys_parse_with_either_separator() {
        assert_eq!("corporate_id".parse::<FormField>(), Ok(FormField::CorporateId));
        assert_eq!("Corporate-Id".parse::<FormField>(), Ok(FormField::CorporateId));
        assert!("phone".parse::<FormField>().is_err());
    }

    #[test]
    fn search_form_builds_trimmed_query() {
        let mut form = SearchForm::default();
        form.set_keyword("  ACME ");
        form.set_country(Country::Us);
        let query = form.to_query();
        assert_eq!(query.keyword, "ACME");
        assert_eq!(query.country, Some(Country::Us));
        form.clear();
        assert!(form.to_query().is_unfiltered());
    }
}
