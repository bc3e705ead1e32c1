use chrono::Datelike;
use phf::phf_map;

use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_LOCALE: &str = "de-CH";

static MONTH_NAMES: phf::Map<&'static str, [&'static str; 12]> = phf_map! {
    "de-CH" => [
        "Januar", "Februar", "März", "April", "Mai", "Juni",
        "Juli", "August", "September", "Oktober", "November", "Dezember",
    ],
    "de-DE" => [
        "Januar", "Februar", "März", "April", "Mai", "Juni",
        "Juli", "August", "September", "Oktober", "November", "Dezember",
    ],
    "de-AT" => [
        "Jänner", "Februar", "März", "April", "Mai", "Juni",
        "Juli", "August", "September", "Oktober", "November", "Dezember",
    ],
    "fr-CH" => [
        "janvier", "février", "mars", "avril", "mai", "juin",
        "juillet", "août", "septembre", "octobre", "novembre", "décembre",
    ],
    "en" => [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ],
};

/// Month names of a single locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNames {
    names: &'static [&'static str; 12],
}

impl MonthNames {
    pub fn for_locale(locale: &str) -> Result<Self> {
        MONTH_NAMES
            .get(locale)
            .map(|names| MonthNames { names })
            .ok_or_else(|| {
                let mut known: Vec<_> = MONTH_NAMES.keys().copied().collect();
                known.sort_unstable();
                Error::new(
                    ErrorKind::ConfigParse,
                    &format!(
                        "unknown locale '{}' (known: {})",
                        locale,
                        known.join(", ")
                    ),
                )
            })
    }

    pub fn name_of<D: Datelike>(&self, date: &D) -> &'static str {
        self.names[date.month0() as usize]
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        MonthNames {
            names: &MONTH_NAMES[DEFAULT_LOCALE],
        }
    }
}
