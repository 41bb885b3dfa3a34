//! CLI: читает сохранённый снимок страницы и выводит ранжированные выплаты.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use log::info;
use proceeds_report::{ProceedsQuery, RankedProceeds, ReportKind, TOP_N, parse_date_strict};

const NO_DATA: &str = "Нет доступных вариантов.";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Вид отчёта
    #[arg(long, value_enum, default_value = "stocks")]
    report: ReportKind,

    /// Путь к снимку; по умолчанию имя файла вида отчёта в --data-dir
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Каталог со снимками
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Сколько первых строк отметить как TOP
    #[arg(long, default_value_t = TOP_N)]
    top: usize,

    /// Поиск по тикеру или типу выплаты
    #[arg(long)]
    search: Option<String>,

    /// Текущая дата в формате dd/mm/yyyy
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    parse_date_strict(value).map_err(|err| err.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let path = args
        .snapshot
        .unwrap_or_else(|| args.data_dir.join(args.report.snapshot_file()));
    info!("report {:?} from {}", args.report, path.display());

    let mut query = ProceedsQuery::new(args.report).top(args.top);
    if let Some(search) = &args.search {
        query = query.search(search);
    }
    if let Some(today) = args.today {
        query = query.today(today);
    }
    let ranked = query.run_path(&path);

    for line in render(&ranked) {
        println!("{line}");
    }
}

/// Строки вывода: таблица с отметкой TOP или сообщение об отсутствии данных.
fn render(ranked: &RankedProceeds) -> Vec<String> {
    if ranked.is_empty() {
        return vec![NO_DATA.to_string()];
    }

    let mut lines = vec![format!(
        "{:<8} {:<12} {:<10} {:<10} {:>12}",
        "Тикер", "Тип", "Отсечка", "Выплата", "Сумма"
    )];
    for (idx, record) in ranked.records.iter().enumerate() {
        let marker = if ranked.is_top(idx) { " TOP" } else { "" };
        lines.push(format!(
            "{:<8} {:<12} {:<10} {:<10} {:>12}{marker}",
            record.ticker,
            record.category,
            format_date(record.reference_date()),
            format_date(record.settlement_date()),
            record.amount.display,
        ));
    }
    lines
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proceeds_report::Snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_snapshot_prints_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let ranked = ProceedsQuery::new(ReportKind::Stocks)
            .today(date(2025, 8, 1))
            .run_path(dir.path().join(ReportKind::Stocks.snapshot_file()));
        assert_eq!(render(&ranked), ["Нет доступных вариантов."]);
    }

    #[test]
    fn top_rows_are_marked() {
        let mut rows = String::new();
        for (idx, ticker) in ["AAAA3", "BBBB3", "CCCC3", "DDDD3", "EEEE3", "FFFF3"]
            .iter()
            .enumerate()
        {
            rows.push_str(&format!(
                "<tr><td>{ticker}</td><td>10/08/25</td><td>20/08/25</td><td>Dividendo</td><td>{},00</td></tr>",
                10 - idx
            ));
        }
        let snapshot = Snapshot::from_str(&format!("<table><tr><th>h</th></tr>{rows}</table>"));
        let ranked = ProceedsQuery::new(ReportKind::Stocks)
            .today(date(2025, 8, 1))
            .run(&snapshot);
        let lines = render(&ranked);
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("AAAA3"));
        assert!(lines[1].contains("10/08/2025"));
        assert!(lines[1].contains("R$ 10.00"));
        assert!(lines[5].ends_with(" TOP"));
        assert!(!lines[6].ends_with(" TOP"));
    }
}
