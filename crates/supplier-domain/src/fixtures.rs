//! Static supplier fixture backing the in-memory gateway.

use chrono::NaiveDate;

use crate::{Country, Rating, SupplierDraft, SupplierId, SupplierRecord, SupplierStatus};

/// The five suppliers listed on a fresh start.
pub fn mock_suppliers() -> Vec<SupplierRecord> {
    vec![
        record(
            1,
            "株式会社サンプル商事",
            "1234567890123",
            Country::Jp,
            "contact@sample-corp.co.jp",
            4,
            SupplierStatus::Active,
            (2025, 8, 20),
        ),
        record(
            2,
            "グローバル物流株式会社",
            "2345678901234",
            Country::Jp,
            "info@global-logistics.co.jp",
            5,
            SupplierStatus::Active,
            (2025, 8, 18),
        ),
        record(
            3,
            "ABC Manufacturing Inc.",
            "3456789012345",
            Country::Us,
            "procurement@abc-mfg.com",
            3,
            SupplierStatus::Pending,
            (2025, 8, 15),
        ),
        record(
            4,
            "中華製造有限公司",
            "4567890123456",
            Country::Cn,
            "business@china-mfg.cn",
            4,
            SupplierStatus::Active,
            (2025, 8, 12),
        ),
        record(
            5,
            "テクノロジー株式会社",
            "5678901234567",
            Country::Jp,
            "contact@technology.co.jp",
            5,
            SupplierStatus::Active,
            (2025, 8, 10),
        ),
    ]
}

/// Record preloaded by the update screen when no id is given.
pub fn update_seed() -> SupplierRecord {
    mock_suppliers().swap_remove(0)
}

#[allow(clippy::too_many_arguments)]
fn record(
    sequence: u16,
    name: &str,
    corporate_id: &str,
    country: Country,
    email: &str,
    rating: u8,
    status: SupplierStatus,
    (year, month, day): (i32, u32, u32),
) -> SupplierRecord {
    SupplierRecord::new(
        SupplierId::from_sequence(sequence).expect("fixture ids are in range"),
        SupplierDraft {
            name: name.into(),
            corporate_id: corporate_id.into(),
            country,
            email: email.into(),
            rating: Rating::clamped(rating as i64),
        },
        status,
        NaiveDate::from_ymd_opt(year, month, day).expect("fixture dates are valid"),
    )
}
