#![warn(missing_docs)]
//! Библиотека для извлечения дивидендов и других выплат из сохранённых
//! HTML-страниц и их ранжирования.

mod error;
mod filter;
mod parser;
mod ranking;
mod raw;
mod report;
mod types;
mod utils;

pub use crate::error::ProceedsError;
pub use crate::filter::{EligibilityPolicy, SearchFilter, filter_eligible};
pub use crate::parser::extract_records;
pub use crate::ranking::{Ranking, TOP_N, rank, top_n};
pub use crate::raw::{DomSnapshot, Snapshot, SnapshotCache};
pub use crate::report::{ProceedsQuery, RankedProceeds, ReportKind};
pub use crate::types::*;
pub use crate::utils::{
    extract_cell_text,
    format_amount,
    normalize_ticker,
    parse_amount,
    parse_amount_strict,
    parse_date,
    parse_date_strict,
};
