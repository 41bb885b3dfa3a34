//! Извлечение записей о выплатах из таблицы снимка.

use std::sync::LazyLock;

use crate::error::ProceedsError;
use crate::raw::{DomSnapshot, Snapshot};
use crate::types::{Amount, ProceedsKind, ProceedsRecord, TableLayout, interval_between};
use crate::utils::{
    extract_cell_text,
    format_amount,
    normalize_ticker,
    parse_amount,
    parse_date_strict,
};
use chrono::NaiveDate;
use log::debug;
use scraper::{ElementRef, Selector};

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static TR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static TD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));

impl DomSnapshot {
    /// Первая таблица страницы, в ней лежат выплаты.
    pub fn proceeds_table(&self) -> Result<ElementRef<'_>, ProceedsError> {
        self.doc
            .select(&TABLE_SELECTOR)
            .next()
            .ok_or(ProceedsError::TableNotFound { table: "proceeds" })
    }

    /// Превращает строки таблицы в записи согласно разметке.
    ///
    /// Первая строка считается заголовком. Строки с недостаточным числом ячеек
    /// пропускаются, отсутствие таблицы даёт пустой список.
    pub fn extract(&self, layout: TableLayout) -> Vec<ProceedsRecord> {
        let table = match self.proceeds_table() {
            Ok(table) => table,
            Err(err) => {
                debug!("{err}");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for (idx, tr) in table.select(&TR_SELECTOR).enumerate() {
            if idx == 0 {
                continue;
            }
            let cells: Vec<String> = tr.select(&TD_SELECTOR).map(extract_cell_text).collect();
            if cells.len() < layout.min_cells() {
                debug!(
                    "row {idx}: {} cells, expected at least {}",
                    cells.len(),
                    layout.min_cells()
                );
                continue;
            }
            records.push(build_record(layout, &cells, idx));
        }
        records
    }
}

/// Разбирает снимок и извлекает записи; пустой снимок даёт пустой список.
pub fn extract_records(snapshot: &Snapshot, layout: TableLayout) -> Vec<ProceedsRecord> {
    if snapshot.is_empty() {
        return Vec::new();
    }
    DomSnapshot::parse(snapshot).extract(layout)
}

/// Собирает запись из ячеек строки по позициям столбцов.
fn build_record(layout: TableLayout, cells: &[String], row: usize) -> ProceedsRecord {
    let (ticker, category, amount, kind) = match layout {
        TableLayout::StockProceeds => {
            let reference_date = date_cell(&cells[1], row);
            let settlement_date = date_cell(&cells[2], row);
            (
                &cells[0],
                &cells[3],
                &cells[4],
                stock_kind(reference_date, settlement_date),
            )
        }
        TableLayout::CategoryFirst => {
            let reference_date = date_cell(&cells[2], row);
            let settlement_date = date_cell(&cells[3], row);
            (
                &cells[0],
                &cells[1],
                &cells[4],
                stock_kind(reference_date, settlement_date),
            )
        }
        TableLayout::FundPayout => (
            &cells[0],
            &cells[2],
            &cells[3],
            ProceedsKind::FundPayout {
                settlement_date: date_cell(&cells[1], row),
            },
        ),
    };

    ProceedsRecord {
        ticker: normalize_ticker(ticker),
        category: category.clone(),
        amount: amount_cell(amount, row),
        kind,
    }
}

fn stock_kind(
    reference_date: Option<NaiveDate>,
    settlement_date: Option<NaiveDate>,
) -> ProceedsKind {
    ProceedsKind::StockProceeds {
        reference_date,
        settlement_date,
        interval_days: interval_between(reference_date, settlement_date),
    }
}

fn date_cell(value: &str, row: usize) -> Option<NaiveDate> {
    parse_date_strict(value)
        .inspect_err(|err| debug!("row {row}: {err}"))
        .ok()
}

fn amount_cell(value: &str, row: usize) -> Amount {
    let parsed = parse_amount(value);
    if !parsed.valid {
        debug!("row {row}: amount '{value}' treated as zero");
    }
    Amount {
        value: parsed.value,
        display: format_amount(parsed.value),
        parsed: parsed.valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_INTERVAL;
    use rust_decimal::Decimal;

    fn table(rows: &str) -> Snapshot {
        Snapshot::from_str(&format!(
            "<html><body><table><tr><th>Ticker</th><th>A</th><th>B</th><th>C</th><th>D</th></tr>{rows}</table></body></html>"
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stock_row_is_extracted_positionally() {
        let snapshot = table(
            "<tr><td>ABCD3</td><td>10/08/25</td><td>20/08/25</td><td>Dividendo</td><td>R$ 1,50</td></tr>",
        );
        let records = extract_records(&snapshot, TableLayout::StockProceeds);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.ticker, "ABCD3");
        assert_eq!(record.category, "Dividendo");
        assert_eq!(record.reference_date(), Some(date(2025, 8, 10)));
        assert_eq!(record.settlement_date(), Some(date(2025, 8, 20)));
        assert_eq!(record.interval_days(), 10);
        assert_eq!(record.amount.value, Decimal::new(150, 2));
        assert_eq!(record.amount.display, "R$ 1.50");
        assert!(record.amount.parsed);
    }

    #[test]
    fn category_first_layout() {
        let snapshot = table(
            "<tr><td>PETR4</td><td>JCP</td><td>01/09/2025</td><td>15/09/2025</td><td>0,45</td></tr>",
        );
        let records = extract_records(&snapshot, TableLayout::CategoryFirst);
        assert_eq!(records[0].category, "JCP");
        assert_eq!(records[0].interval_days(), 14);
    }

    #[test]
    fn fund_layout_needs_four_cells() {
        let snapshot = table(
            "<tr><td>HGLG11</td><td>14/08/25</td><td>Rendimento</td><td>1,10</td></tr>\
             <tr><td>XPML11</td><td>15/08/25</td><td>Rendimento</td></tr>",
        );
        let records = extract_records(&snapshot, TableLayout::FundPayout);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].kind,
            ProceedsKind::FundPayout {
                settlement_date: Some(date(2025, 8, 14))
            }
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let snapshot = table(
            "<tr><td>ABCD3</td><td>10/08/25</td><td>20/08/25</td><td>Dividendo</td></tr>\
             <tr><td colspan=\"5\">Sem dados</td></tr>",
        );
        assert!(extract_records(&snapshot, TableLayout::StockProceeds).is_empty());
    }

    #[test]
    fn malformed_cells_degrade_to_defaults() {
        let snapshot = table(
            "<tr><td>ABCD3</td><td>em breve</td><td>20/08/25</td><td>Dividendo</td><td>-</td></tr>",
        );
        let records = extract_records(&snapshot, TableLayout::StockProceeds);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference_date(), None);
        assert_eq!(records[0].interval_days(), NO_INTERVAL);
        assert_eq!(records[0].amount.value, Decimal::ZERO);
        assert!(!records[0].amount.parsed);
    }

    #[test]
    fn document_without_table_is_empty() {
        let snapshot = Snapshot::from_str("<html><body><p>Nada aqui</p></body></html>");
        let dom = DomSnapshot::parse(&snapshot);
        assert!(matches!(
            dom.proceeds_table(),
            Err(ProceedsError::TableNotFound { .. })
        ));
        assert!(dom.extract(TableLayout::StockProceeds).is_empty());
        assert!(extract_records(&Snapshot::default(), TableLayout::FundPayout).is_empty());
    }
}
