//! Вспомогательные парсеры сумм, дат, тикеров и текста ячеек.

use crate::error::ProceedsError;
use crate::types::{Money, ParseOutcome};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

/// Двузначные годы от этого значения относятся к XX веку (`69` → 1969).
const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

static HIGHLIGHT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong, b, mark").expect("valid highlight selector"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("valid date regex")
});

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z0-9]{4,7})\b").expect("valid ticker regex"));

/// Нормализует последовательность символов, схлопывая группы пробельных.
fn normalize_chars<I: IntoIterator<Item = char>>(iter: I) -> String {
    let mut output = String::new();
    let mut prev_space = false;
    for ch in iter {
        let is_space = ch.is_whitespace();
        if is_space {
            if !prev_space {
                output.push(' ');
            }
        } else {
            output.push(ch);
        }
        prev_space = is_space;
    }
    output.trim().to_string()
}

/// Собирает текст всех потомков элемента и нормализует пробелы.
pub fn collect_text(element: ElementRef) -> String {
    normalize_chars(element.text().flat_map(|s| s.chars()))
}

/// Текст ячейки: выделенный вложенный элемент, если он есть, иначе вся ячейка.
pub fn extract_cell_text(cell: ElementRef) -> String {
    cell.select(&HIGHLIGHT_SELECTOR)
        .map(collect_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| collect_text(cell))
}

/// Разбирает дату в формате `dd/mm/yy` или `dd/mm/yyyy`.
pub fn parse_date_strict(value: &str) -> Result<NaiveDate, ProceedsError> {
    let trimmed = value.trim();
    let invalid = || ProceedsError::Date {
        value: trimmed.to_string(),
    };
    let caps = DATE_RE.captures(trimmed).ok_or_else(invalid)?;
    let field = |idx: usize| caps[idx].parse::<u32>().map_err(|_| invalid());
    let (day, month) = (field(1)?, field(2)?);
    let year_text = &caps[3];
    let year = year_text.parse::<i32>().map_err(|_| invalid())?;
    let year = match year_text.len() {
        2 if year >= TWO_DIGIT_YEAR_PIVOT => 1900 + year,
        2 => 2000 + year,
        _ => year,
    };
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Разбирает дату, возвращая `None` вместо ошибки.
#[inline]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_date_strict(value).ok()
}

/// Оставляет в сумме только цифры и разделители и приводит её к виду `1234.56`.
fn normalize_amount(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(*ch, ',' | '.'))
        .collect();
    if kept.contains(',') {
        // Бразильская запись: точки разделяют тысячи, запятая отделяет дробь.
        kept.replace('.', "").replace(',', ".")
    } else if kept.matches('.').count() > 1 {
        kept.replace('.', "")
    } else {
        kept
    }
}

/// Разбирает сумму вида `R$ 1.234,56`.
pub fn parse_amount_strict(value: &str, column: &'static str) -> Result<Money, ProceedsError> {
    let normalized = normalize_amount(value);
    Decimal::from_str(&normalized).map_err(|_| ProceedsError::Number {
        value: value.trim().to_string(),
        column,
    })
}

/// Разбирает сумму, подставляя ноль для нечитаемых ячеек.
pub fn parse_amount(value: &str) -> ParseOutcome<Money> {
    parse_amount_strict(value, "amount")
        .map_or_else(|_| ParseOutcome::fallback(Decimal::ZERO), ParseOutcome::valid)
}

/// Сумма для отображения: символ валюты и два знака после точки.
pub fn format_amount(value: Money) -> String {
    format!("R$ {:.2}", value.round_dp(2))
}

/// Выделяет тикер из текста ячейки, например `PETR4` из `Petrobras PETR4`.
pub fn normalize_ticker(value: &str) -> String {
    let upper = normalize_chars(value.chars()).to_uppercase();
    TICKER_RE
        .find_iter(&upper)
        .map(|m| m.as_str())
        .find(|token| {
            token.chars().any(|ch| ch.is_ascii_alphabetic())
                && token.chars().any(|ch| ch.is_ascii_digit())
        })
        .map_or_else(|| upper.clone(), str::to_string)
}
