//! Отбор записей по датам и по поисковому запросу.

use crate::types::ProceedsRecord;
use chrono::NaiveDate;

/// Правило актуальности записи относительно текущей даты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityPolicy {
    /// Дата отсечки строго позже сегодняшнего дня.
    ReferenceDate,
    /// Дата выплаты сегодня или позже.
    SettlementDate,
}

impl EligibilityPolicy {
    /// Проходит ли запись правило; запись без нужной даты не проходит.
    pub fn admits(self, record: &ProceedsRecord, today: NaiveDate) -> bool {
        match self {
            Self::ReferenceDate => record.reference_date().is_some_and(|date| date > today),
            Self::SettlementDate => record.settlement_date().is_some_and(|date| date >= today),
        }
    }
}

/// Поиск по тикеру или типу выплаты без учёта регистра.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    needle: Option<String>,
}

impl SearchFilter {
    /// Создаёт фильтр; пустой запрос пропускает все записи.
    pub fn new(query: &str) -> Self {
        let trimmed = query.trim();
        Self {
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    /// Совпадает ли запись с запросом.
    pub fn matches(&self, record: &ProceedsRecord) -> bool {
        self.needle.as_deref().is_none_or(|needle| {
            record.ticker.to_lowercase().contains(needle)
                || record.category.to_lowercase().contains(needle)
        })
    }
}

/// Оставляет записи, прошедшие правило, не трогая исходный список.
pub fn filter_eligible(
    records: &[ProceedsRecord],
    policy: EligibilityPolicy,
    today: NaiveDate,
) -> Vec<ProceedsRecord> {
    records
        .iter()
        .filter(|record| policy.admits(record, today))
        .cloned()
        .collect()
}
