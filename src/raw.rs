//! Работа с сохранённым HTML-снимком страницы и подготовленным DOM-деревом.

use crate::error::ProceedsError;
use log::{debug, warn};
use scraper::Html;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Исходный HTML снимка без разбора DOM.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Полный HTML страницы.
    pub html: String,
}

impl Snapshot {
    /// Читает снимок из произвольного `Read`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ProceedsError> {
        let mut html = String::new();
        reader.read_to_string(&mut html)?;
        Ok(Self { html })
    }

    /// Создаёт снимок из готовой HTML-строки.
    #[inline]
    pub fn from_str(s: &str) -> Self {
        Self {
            html: s.to_string(),
        }
    }

    /// Читает снимок из файла.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProceedsError> {
        Self::from_reader(File::open(path)?)
    }

    /// Читает снимок из файла; отсутствующий или нечитаемый файл даёт пустой снимок.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            warn!("snapshot {} unavailable: {err}", path.display());
            Self::default()
        })
    }

    /// Пустой снимок (нет данных).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

/// Разобранный DOM снимка.
#[derive(Debug, Clone)]
pub struct DomSnapshot {
    pub(crate) doc: Html,
}

impl DomSnapshot {
    /// Парсит DOM из исходного HTML.
    #[inline]
    pub fn parse(raw: &Snapshot) -> Self {
        Self {
            doc: Html::parse_document(&raw.html),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    modified: Option<SystemTime>,
    snapshot: Snapshot,
}

/// Кэш снимков по пути к файлу.
///
/// Снимок перечитывается, если у файла изменилось время модификации.
/// Исчезнувший файл удаляет запись из кэша и даёт пустой снимок.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<PathBuf, CachedSnapshot>,
}

impl SnapshotCache {
    /// Создаёт пустой кэш.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Возвращает актуальный снимок для пути.
    pub fn get<P: AsRef<Path>>(&mut self, path: P) -> Snapshot {
        let path = path.as_ref();
        let modified = match fs::metadata(path) {
            Ok(meta) => meta.modified().ok(),
            Err(err) => {
                warn!("snapshot {} unavailable: {err}", path.display());
                self.entries.remove(path);
                return Snapshot::default();
            }
        };

        if let Some(cached) = self
            .entries
            .get(path)
            .filter(|cached| cached.modified.is_some() && cached.modified == modified)
        {
            return cached.snapshot.clone();
        }

        debug!("reading snapshot {}", path.display());
        let snapshot = Snapshot::load_or_empty(path);
        self.entries.insert(
            path.to_path_buf(),
            CachedSnapshot {
                modified,
                snapshot: snapshot.clone(),
            },
        );
        snapshot
    }

    /// Число закэшированных путей.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Пуст ли кэш.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
