//! Ошибки загрузки снимков и строгого разбора полей.

/// Ошибка загрузки снимка страницы или строгого разбора ячейки.
///
/// Конвейер ранжирования эти ошибки наружу не отдаёт: они гасятся на границе
/// извлечения и попадают только в лог.
#[derive(thiserror::Error, Debug)]
pub enum ProceedsError {
    /// Ошибка ввода-вывода при чтении снимка.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// В снимке нет таблицы с данными.
    #[error("Table '{table}' not found")]
    TableNotFound {
        /// Имя таблицы.
        table: &'static str,
    },
    /// Ошибка разбора числового значения.
    #[error("Invalid number '{value}' in column '{column}'")]
    Number {
        /// Некорректное исходное значение.
        value: String,
        /// Название столбца.
        column: &'static str,
    },
    /// Ошибка разбора даты.
    #[error("Invalid date '{value}'")]
    Date {
        /// Некорректная дата.
        value: String,
    },
}
