//! Доменные типы: записи о выплатах и результаты разбора ячеек.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Значение интервала, когда одна из дат отсутствует или интервал отрицательный.
///
/// Реальные интервалы всегда меньше этого значения: более длинные
/// [`interval_between`] тоже приводит к нему.
pub const NO_INTERVAL: i64 = 9999;

/// Результат «мягкого» разбора: лучшее значение и признак успешного разбора.
///
/// Позволяет отличить настоящий ноль от ячейки, которую не удалось прочитать.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOutcome<T> {
    /// Разобранное значение или значение по умолчанию.
    pub value: T,
    /// `true`, если исходный текст удалось разобрать.
    pub valid: bool,
}

impl<T> ParseOutcome<T> {
    /// Успешно разобранное значение.
    #[inline]
    pub const fn valid(value: T) -> Self {
        Self { value, valid: true }
    }

    /// Значение по умолчанию вместо неразобранного.
    #[inline]
    pub const fn fallback(value: T) -> Self {
        Self {
            value,
            valid: false,
        }
    }
}

/// Сумма выплаты: число, строка для отображения и признак разбора.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    /// Неотрицательная сумма.
    pub value: Money,
    /// Сумма в формате «R$ 0.00».
    pub display: String,
    /// Удалось ли разобрать исходную ячейку.
    pub parsed: bool,
}

/// Разметка таблицы: порядок столбцов в строке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableLayout {
    /// Тикер, дата отсечки, дата выплаты, тип, сумма.
    StockProceeds,
    /// Тикер, тип, дата отсечки, дата выплаты, сумма.
    CategoryFirst,
    /// Тикер, дата выплаты, тип, сумма.
    FundPayout,
}

impl TableLayout {
    /// Минимальное число ячеек в строке с данными.
    #[inline]
    pub const fn min_cells(self) -> usize {
        match self {
            Self::StockProceeds | Self::CategoryFirst => 5,
            Self::FundPayout => 4,
        }
    }
}

/// Вариант записи: набор дат зависит от вида отчёта.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProceedsKind {
    /// Выплата по акциям или BDR.
    StockProceeds {
        /// Дата отсечки («data com»).
        reference_date: Option<NaiveDate>,
        /// Дата выплаты.
        settlement_date: Option<NaiveDate>,
        /// Дней между отсечкой и выплатой либо [`NO_INTERVAL`].
        interval_days: i64,
    },
    /// Выплата фонда.
    FundPayout {
        /// Дата выплаты.
        settlement_date: Option<NaiveDate>,
    },
}

/// Нормализованная строка таблицы выплат.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceedsRecord {
    /// Тикер в верхнем регистре.
    pub ticker: String,
    /// Тип выплаты (дивиденд, JCP и т.п.).
    pub category: String,
    /// Сумма на одну бумагу.
    pub amount: Amount,
    /// Даты, специфичные для вида отчёта.
    pub kind: ProceedsKind,
}

impl ProceedsRecord {
    /// Дата отсечки, у выплат фондов её нет.
    #[inline]
    pub const fn reference_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ProceedsKind::StockProceeds { reference_date, .. } => reference_date,
            ProceedsKind::FundPayout { .. } => None,
        }
    }

    /// Дата выплаты.
    #[inline]
    pub const fn settlement_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ProceedsKind::StockProceeds {
                settlement_date, ..
            }
            | ProceedsKind::FundPayout { settlement_date } => settlement_date,
        }
    }

    /// Интервал между отсечкой и выплатой в днях.
    #[inline]
    pub const fn interval_days(&self) -> i64 {
        match self.kind {
            ProceedsKind::StockProceeds { interval_days, .. } => interval_days,
            ProceedsKind::FundPayout { .. } => NO_INTERVAL,
        }
    }

    /// Есть ли у записи реальный интервал (строго меньше [`NO_INTERVAL`]).
    #[inline]
    pub const fn has_interval(&self) -> bool {
        matches!(
            self.kind,
            ProceedsKind::StockProceeds { interval_days, .. } if interval_days != NO_INTERVAL
        )
    }
}

/// Считает дни между отсечкой и выплатой.
///
/// Возвращает [`NO_INTERVAL`], если даты нет, выплата раньше отсечки или
/// интервал не меньше самого [`NO_INTERVAL`].
pub fn interval_between(reference: Option<NaiveDate>, settlement: Option<NaiveDate>) -> i64 {
    match (reference, settlement) {
        (Some(reference), Some(settlement)) if settlement >= reference => {
            (settlement - reference).num_days().min(NO_INTERVAL)
        }
        _ => NO_INTERVAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_counts_whole_days() {
        assert_eq!(
            interval_between(Some(date(2025, 8, 10)), Some(date(2025, 8, 20))),
            10
        );
        assert_eq!(
            interval_between(Some(date(2025, 8, 10)), Some(date(2025, 8, 10))),
            0
        );
    }

    #[test]
    fn interval_is_sentinel_when_negative_or_missing() {
        assert_eq!(
            interval_between(Some(date(2025, 8, 20)), Some(date(2025, 8, 10))),
            NO_INTERVAL
        );
        assert_eq!(interval_between(None, Some(date(2025, 8, 10))), NO_INTERVAL);
        assert_eq!(interval_between(Some(date(2025, 8, 10)), None), NO_INTERVAL);
    }

    #[test]
    fn overlong_interval_collapses_to_sentinel() {
        let reference = date(2000, 1, 1);
        let exact = reference + chrono::Days::new(9999);
        assert_eq!(interval_between(Some(reference), Some(exact)), NO_INTERVAL);
        let far = reference + chrono::Days::new(20_000);
        assert_eq!(interval_between(Some(reference), Some(far)), NO_INTERVAL);
        let just_below = reference + chrono::Days::new(9998);
        assert_eq!(interval_between(Some(reference), Some(just_below)), 9998);
    }

    #[test]
    fn fund_payout_has_no_reference_date() {
        let record = ProceedsRecord {
            ticker: "HGLG11".to_string(),
            category: "Rendimento".to_string(),
            amount: Amount {
                value: Money::ONE,
                display: "R$ 1.00".to_string(),
                parsed: true,
            },
            kind: ProceedsKind::FundPayout {
                settlement_date: Some(date(2025, 9, 1)),
            },
        };
        assert_eq!(record.reference_date(), None);
        assert_eq!(record.settlement_date(), Some(date(2025, 9, 1)));
        assert_eq!(record.interval_days(), NO_INTERVAL);
        assert!(!record.has_interval());
    }
}
