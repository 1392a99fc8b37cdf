//! Plural rule families

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A plural rule family.
///
/// Each family maps a non-negative quantity to a numerus-form slot. Slot
/// order follows the order translators fill `<numerusform>` elements in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralRule {
    /// One form for every quantity (Chinese, Japanese, Turkish, ...).
    Single,
    /// `n != 1` (English, German, Spanish, ...).
    Germanic,
    /// `n > 1` (French, Brazilian Portuguese, ...).
    French,
    /// 1 / 2-4 / other (Czech, Slovak).
    Czech,
    /// East/South Slavic: one / few / many by last digits.
    Slavic,
    /// 1 / few by last digit / many.
    Polish,
    /// Lithuanian three-form rule.
    Lithuanian,
    /// Latvian three-form rule (separate zero form, stored last).
    Latvian,
    /// 1 / 0 and 1-19 by last two digits / other.
    Romanian,
    /// Last digit 1 except 11 / other.
    Icelandic,
    /// 1 / 2 / other.
    Irish,
    /// Slovenian four-form rule by last two digits.
    Slovenian,
    /// Maltese four-form rule.
    Maltese,
    /// 1 / 2 / 8 and 11 / other.
    Welsh,
    /// Arabic six-form rule.
    Arabic,
}

impl PluralRule {
    /// Every rule family.
    pub const ALL: [Self; 15] = [
        Self::Single,
        Self::Germanic,
        Self::French,
        Self::Czech,
        Self::Slavic,
        Self::Polish,
        Self::Lithuanian,
        Self::Latvian,
        Self::Romanian,
        Self::Icelandic,
        Self::Irish,
        Self::Slovenian,
        Self::Maltese,
        Self::Welsh,
        Self::Arabic,
    ];

    /// Number of numerus-form slots this rule uses
    #[must_use]
    pub fn category_count(self) -> usize {
        self.category_names().len()
    }

    /// Slot index for a quantity. Always `< category_count()`.
    #[must_use]
    pub fn select(self, n: u64) -> usize {
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::Single => 0,
            Self::Germanic => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Icelandic => usize::from(!(n10 == 1 && n100 != 11)),
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Slavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && !(10..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=10).contains(&n100) {
                    1
                } else if (11..=19).contains(&n100) {
                    2
                } else {
                    3
                }
            }
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&n100) => 3,
                _ if n100 >= 11 => 4,
                _ => 5,
            },
        }
    }

    /// CLDR-style label for each slot, in slot order
    #[must_use]
    pub fn category_names(self) -> &'static [&'static str] {
        match self {
            Self::Single => &["other"],
            Self::Germanic | Self::French | Self::Icelandic => &["one", "other"],
            Self::Czech | Self::Lithuanian | Self::Romanian => &["one", "few", "other"],
            Self::Slavic | Self::Polish => &["one", "few", "many"],
            Self::Latvian => &["one", "other", "zero"],
            Self::Irish => &["one", "two", "other"],
            Self::Slovenian => &["one", "two", "few", "other"],
            Self::Maltese => &["one", "few", "many", "other"],
            Self::Welsh => &["one", "two", "many", "other"],
            Self::Arabic => &["zero", "one", "two", "few", "many", "other"],
        }
    }

    /// Lowercase family name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Germanic => "germanic",
            Self::French => "french",
            Self::Czech => "czech",
            Self::Slavic => "slavic",
            Self::Polish => "polish",
            Self::Lithuanian => "lithuanian",
            Self::Latvian => "latvian",
            Self::Romanian => "romanian",
            Self::Icelandic => "icelandic",
            Self::Irish => "irish",
            Self::Slovenian => "slovenian",
            Self::Maltese => "maltese",
            Self::Welsh => "welsh",
            Self::Arabic => "arabic",
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PluralRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|rule| rule.name() == lower)
            .ok_or_else(|| format!("Unknown plural rule: {s}"))
    }
}
