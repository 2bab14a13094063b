//! Name day calendar data access
//!
//! Provides the `NamedayProvider` boundary used by the tools and the embedded
//! per-locale calendars backing it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Calendar locales with embedded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Sk,
    Cz,
    Pl,
    Hu,
    At,
    Hr,
    Bg,
    Ru,
    Gr,
    Fr,
    It,
}

impl Locale {
    pub const ALL: [Locale; 11] = [
        Locale::Sk,
        Locale::Cz,
        Locale::Pl,
        Locale::Hu,
        Locale::At,
        Locale::Hr,
        Locale::Bg,
        Locale::Ru,
        Locale::Gr,
        Locale::Fr,
        Locale::It,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Sk => "sk",
            Locale::Cz => "cz",
            Locale::Pl => "pl",
            Locale::Hu => "hu",
            Locale::At => "at",
            Locale::Hr => "hr",
            Locale::Bg => "bg",
            Locale::Ru => "ru",
            Locale::Gr => "gr",
            Locale::Fr => "fr",
            Locale::It => "it",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::Sk => "Slovakia",
            Locale::Cz => "Czech Republic",
            Locale::Pl => "Poland",
            Locale::Hu => "Hungary",
            Locale::At => "Austria",
            Locale::Hr => "Croatia",
            Locale::Bg => "Bulgaria",
            Locale::Ru => "Russia",
            Locale::Gr => "Greece",
            Locale::Fr => "France",
            Locale::It => "Italy",
        }
    }

    /// The supported codes, comma separated, for error messages.
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(Locale::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|locale| locale.code() == value)
            .ok_or(())
    }
}

/// A month/day pair inside a name day calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    pub month: u32,
    pub day: u32,
}

#[async_trait]
pub trait NamedayProvider: Send + Sync {
    async fn names_for_date(
        &self,
        locale: Locale,
        month: u32,
        day: u32,
    ) -> Result<Vec<String>, AppError>;

    async fn date_for_name(
        &self,
        locale: Locale,
        name: &str,
    ) -> Result<Option<CalendarDate>, AppError>;
}

/// Fold a name for comparison: lowercase and strip the Latin diacritics used
/// in the embedded calendars.
pub fn fold_name(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' | 'ă' => 'a',
            'ć' | 'č' | 'ç' => 'c',
            'ď' | 'đ' => 'd',
            'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ę' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ĺ' | 'ľ' | 'ł' => 'l',
            'ń' | 'ň' | 'ñ' => 'n',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ő' => 'o',
            'ŕ' | 'ř' => 'r',
            'ś' | 'š' => 's',
            'ť' => 't',
            'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ű' => 'u',
            'ý' | 'ÿ' => 'y',
            'ź' | 'ż' | 'ž' => 'z',
            other => other,
        })
        .collect()
}

struct LocaleCalendar {
    by_date: HashMap<(u32, u32), Vec<String>>,
    by_name: HashMap<String, CalendarDate>,
}

impl LocaleCalendar {
    fn from_json(locale: Locale, raw: &str) -> Result<Self, AppError> {
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(raw).map_err(|err| {
            AppError::internal(format!("invalid calendar data for locale {locale}: {err}"))
        })?;

        let mut by_date = HashMap::new();
        let mut by_name = HashMap::new();
        for (key, names) in entries {
            let (month, day) = parse_date_key(&key).ok_or_else(|| {
                AppError::internal(format!(
                    "invalid calendar date key \"{key}\" for locale {locale}"
                ))
            })?;

            for name in &names {
                by_name
                    .entry(fold_name(name))
                    .or_insert(CalendarDate { month, day });
            }
            by_date.insert((month, day), names);
        }

        Ok(Self { by_date, by_name })
    }
}

/// Keys in the embedded files are `"month-day"`, e.g. `"1-14"`.
fn parse_date_key(key: &str) -> Option<(u32, u32)> {
    let (month, day) = key.split_once('-')?;
    Some((month.parse().ok()?, day.parse().ok()?))
}

/// Calendar data compiled into the binary, one JSON file per locale.
pub struct EmbeddedCalendar {
    locales: HashMap<Locale, LocaleCalendar>,
}

const EMBEDDED_DATA: [(Locale, &str); 11] = [
    (Locale::Sk, include_str!("../data/sk.json")),
    (Locale::Cz, include_str!("../data/cz.json")),
    (Locale::Pl, include_str!("../data/pl.json")),
    (Locale::Hu, include_str!("../data/hu.json")),
    (Locale::At, include_str!("../data/at.json")),
    (Locale::Hr, include_str!("../data/hr.json")),
    (Locale::Bg, include_str!("../data/bg.json")),
    (Locale::Ru, include_str!("../data/ru.json")),
    (Locale::Gr, include_str!("../data/gr.json")),
    (Locale::Fr, include_str!("../data/fr.json")),
    (Locale::It, include_str!("../data/it.json")),
];

impl EmbeddedCalendar {
    pub fn load() -> Result<Self, AppError> {
        let mut locales = HashMap::new();
        for (locale, raw) in EMBEDDED_DATA {
            locales.insert(locale, LocaleCalendar::from_json(locale, raw)?);
        }
        Ok(Self { locales })
    }

    fn locale(&self, locale: Locale) -> Result<&LocaleCalendar, AppError> {
        self.locales.get(&locale).ok_or_else(|| {
            AppError::internal(format!("calendar data not loaded for locale {locale}"))
        })
    }
}

#[async_trait]
impl NamedayProvider for EmbeddedCalendar {
    async fn names_for_date(
        &self,
        locale: Locale,
        month: u32,
        day: u32,
    ) -> Result<Vec<String>, AppError> {
        let calendar = self.locale(locale)?;
        Ok(calendar
            .by_date
            .get(&(month, day))
            .cloned()
            .unwrap_or_default())
    }

    async fn date_for_name(
        &self,
        locale: Locale,
        name: &str,
    ) -> Result<Option<CalendarDate>, AppError> {
        let calendar = self.locale(locale)?;
        Ok(calendar.by_name.get(&fold_name(name)).copied())
    }
}
