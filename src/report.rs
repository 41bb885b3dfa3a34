//! Конвейер отчёта: снимок → записи → отбор → ранжирование → лучшие N.

use std::path::Path;

use crate::filter::{EligibilityPolicy, SearchFilter, filter_eligible};
use crate::parser::extract_records;
use crate::ranking::{Ranking, TOP_N, rank};
use crate::raw::Snapshot;
use crate::types::{ProceedsRecord, TableLayout};
use chrono::{Local, NaiveDate};
use log::info;

/// Вид отчёта с набором настроек по умолчанию.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ReportKind {
    /// Выплаты по акциям.
    Stocks,
    /// Выплаты по BDR.
    Bdrs,
    /// Выплаты фондов недвижимости.
    Funds,
    /// Ближайшие выплаты с самым коротким интервалом отсечка–выплата.
    Opportunities,
}

impl ReportKind {
    /// Имя файла снимка по умолчанию.
    pub const fn snapshot_file(self) -> &'static str {
        match self {
            Self::Stocks => "proventos_acoes.html",
            Self::Bdrs => "proventos_bdrs.html",
            Self::Funds => "proventos_fiis.html",
            Self::Opportunities => "investidor10_dividendos.txt",
        }
    }

    /// Разметка таблицы в снимке.
    pub const fn layout(self) -> TableLayout {
        match self {
            Self::Stocks | Self::Bdrs => TableLayout::StockProceeds,
            Self::Funds => TableLayout::FundPayout,
            Self::Opportunities => TableLayout::CategoryFirst,
        }
    }

    /// Правило актуальности.
    pub const fn policy(self) -> EligibilityPolicy {
        match self {
            Self::Stocks | Self::Bdrs | Self::Opportunities => EligibilityPolicy::ReferenceDate,
            Self::Funds => EligibilityPolicy::SettlementDate,
        }
    }

    /// Ключ сортировки.
    pub const fn ranking(self) -> Ranking {
        match self {
            Self::Stocks | Self::Bdrs => Ranking::AmountDesc,
            Self::Funds => Ranking::SettlementAsc,
            Self::Opportunities => Ranking::IntervalAsc,
        }
    }
}

/// Отсортированный результат запроса.
#[derive(Debug, Clone, Default)]
pub struct RankedProceeds {
    /// Записи в порядке ранжирования.
    pub records: Vec<ProceedsRecord>,
    /// Сколько первых записей выделяется.
    pub top: usize,
}

impl RankedProceeds {
    /// Нет данных для отчёта.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Число записей.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Лучшие записи.
    #[inline]
    pub fn top_records(&self) -> &[ProceedsRecord] {
        crate::ranking::top_n(&self.records, self.top)
    }

    /// Входит ли позиция в число лучших.
    #[inline]
    pub fn is_top(&self, idx: usize) -> bool {
        idx < self.top && idx < self.records.len()
    }
}

/// Builder запроса отчёта. Каждый запуск заново читает снимок.
///
/// # Пример
///
/// ```
/// # use proceeds_report::{ProceedsQuery, ReportKind, Snapshot};
/// # use chrono::NaiveDate;
/// let snapshot = Snapshot::from_str(
///     "<table><tr><th>Ticker</th></tr>\
///      <tr><td>ABCD3</td><td>10/08/25</td><td>20/08/25</td><td>Dividendo</td><td>R$ 1,50</td></tr></table>",
/// );
/// let ranked = ProceedsQuery::new(ReportKind::Stocks)
///     .today(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
///     .run(&snapshot);
/// assert_eq!(ranked.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ProceedsQuery {
    layout: TableLayout,
    policy: EligibilityPolicy,
    ranking: Ranking,
    top: usize,
    search: SearchFilter,
    today: Option<NaiveDate>,
}

impl ProceedsQuery {
    /// Создаёт запрос с настройками вида отчёта.
    #[inline]
    pub fn new(kind: ReportKind) -> Self {
        Self {
            layout: kind.layout(),
            policy: kind.policy(),
            ranking: kind.ranking(),
            top: TOP_N,
            search: SearchFilter::default(),
            today: None,
        }
    }

    /// Переопределяет разметку таблицы.
    #[inline]
    #[must_use]
    pub const fn layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Переопределяет правило актуальности.
    #[inline]
    #[must_use]
    pub const fn policy(mut self, policy: EligibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Переопределяет ключ сортировки.
    #[inline]
    #[must_use]
    pub const fn ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    /// Сколько записей выделять как лучшие.
    #[inline]
    #[must_use]
    pub const fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Поиск по тикеру или типу выплаты.
    #[inline]
    #[must_use]
    pub fn search(mut self, query: &str) -> Self {
        self.search = SearchFilter::new(query);
        self
    }

    /// Фиксирует текущую дату; по умолчанию берётся локальная дата.
    #[inline]
    #[must_use]
    pub const fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Выполняет конвейер над снимком.
    pub fn run(&self, snapshot: &Snapshot) -> RankedProceeds {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let extracted = extract_records(snapshot, self.layout);
        let mut eligible = filter_eligible(&extracted, self.policy, today);
        eligible.retain(|record| self.search.matches(record));
        let records = rank(&eligible, self.ranking);
        info!(
            "{} rows extracted, {} eligible on {today}",
            extracted.len(),
            records.len()
        );
        RankedProceeds {
            records,
            top: self.top,
        }
    }

    /// Читает снимок из файла и выполняет конвейер; нет файла — нет данных.
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> RankedProceeds {
        self.run(&Snapshot::load_or_empty(path))
    }
}
