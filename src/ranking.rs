//! Сортировка записей и выбор лучших N.

use std::cmp::Ordering;

use crate::types::ProceedsRecord;

/// Сколько первых строк выделяется в отчёте.
pub const TOP_N: usize = 5;

/// Ключ сортировки, зависящий от вида отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ranking {
    /// По убыванию суммы.
    AmountDesc,
    /// По возрастанию даты выплаты, затем по убыванию суммы.
    SettlementAsc,
    /// По возрастанию интервала отсечка–выплата, затем по убыванию суммы.
    IntervalAsc,
}

impl Ranking {
    /// Сравнивает две записи по ключу.
    pub fn compare(self, a: &ProceedsRecord, b: &ProceedsRecord) -> Ordering {
        let by_amount = || b.amount.value.cmp(&a.amount.value);
        match self {
            Self::AmountDesc => by_amount(),
            // Записи без даты выплаты уходят в конец.
            Self::SettlementAsc => match (a.settlement_date(), b.settlement_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(by_amount),
            Self::IntervalAsc => interval_key(a)
                .cmp(&interval_key(b))
                .then_with(by_amount),
        }
    }
}

/// Записи без интервала сортируются после всех остальных.
fn interval_key(record: &ProceedsRecord) -> (bool, i64) {
    (!record.has_interval(), record.interval_days())
}

/// Возвращает новый отсортированный список; сортировка устойчивая.
pub fn rank(records: &[ProceedsRecord], ranking: Ranking) -> Vec<ProceedsRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| ranking.compare(a, b));
    ranked
}

/// Первые `n` элементов, либо все, если их меньше.
#[inline]
pub fn top_n<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}
