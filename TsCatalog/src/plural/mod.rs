//! Plural rule resolution
//!
//! Maps a locale tag and a quantity to a numerus-form slot. Locale tags may
//! use `_` or `-` separators and carry encoding or modifier suffixes
//! (`cs_CZ.UTF-8`, `sr@latin`). Only the language (and for Portuguese, the
//! region) decides the rule family.
//!
//! ```
//! use tscatalog::plural::{PluralRule, category_count, select_category};
//!
//! assert_eq!(category_count("ru_RU"), 3);
//! assert_eq!(select_category("ru_RU", 21), 0);
//! assert_eq!(select_category("ru_RU", 3), 1);
//! assert_eq!(select_category("ru_RU", 11), 2);
//! assert_eq!(PluralRule::for_locale("pt-BR"), PluralRule::French);
//! ```

mod rules;

pub use rules::PluralRule;

/// Number of numerus-form slots for a locale
#[must_use]
pub fn category_count(locale: &str) -> usize {
    PluralRule::for_locale(locale).category_count()
}

/// Numerus-form slot for a quantity in a locale
#[must_use]
pub fn select_category(locale: &str, quantity: u64) -> usize {
    PluralRule::for_locale(locale).select(quantity)
}

impl PluralRule {
    /// Rule family for a locale, if the language is known.
    #[must_use]
    pub fn lookup(locale: &str) -> Option<Self> {
        let (language, region) = split_locale(locale);
        if language == "pt" && region.as_deref() == Some("br") {
            return Some(Self::French);
        }
        rule_for_language(&language)
    }

    /// Rule family for a locale, falling back to [`PluralRule::Germanic`].
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        if let Some(rule) = Self::lookup(locale) {
            return rule;
        }
        if locale.trim().is_empty() {
            tracing::debug!("No target language, using the germanic plural rule");
        } else {
            tracing::warn!("Unknown locale '{}', using the germanic plural rule", locale);
        }
        Self::Germanic
    }
}

/// Lowercased language and region subtags.
fn split_locale(locale: &str) -> (String, Option<String>) {
    let tag = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    let mut parts = tag.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_lowercase);
    (language, region)
}

fn rule_for_language(language: &str) -> Option<PluralRule> {
    let rule = match language {
        "bo" | "dz" | "fa" | "fj" | "gn" | "hu" | "id" | "ja" | "jv" | "ka" | "km" | "ko"
        | "lo" | "ms" | "my" | "na" | "om" | "su" | "th" | "tr" | "tt" | "vi" | "yo" | "za"
        | "zh" => PluralRule::Single,
        "af" | "an" | "ast" | "az" | "bg" | "bn" | "ca" | "da" | "de" | "el" | "en" | "eo"
        | "es" | "et" | "eu" | "fi" | "fo" | "fy" | "gl" | "gu" | "he" | "hi" | "hy" | "it"
        | "kk" | "kn" | "ku" | "lb" | "ml" | "mn" | "mr" | "nb" | "ne" | "nl" | "nn" | "no"
        | "pa" | "ps" | "pt" | "sq" | "sv" | "sw" | "ta" | "te" | "ur" | "uz" => {
            PluralRule::Germanic
        }
        "br" | "fil" | "fr" | "ln" | "oc" | "ti" | "tl" | "wa" => PluralRule::French,
        "cs" | "sk" => PluralRule::Czech,
        "be" | "bs" | "hr" | "ru" | "sr" | "uk" => PluralRule::Slavic,
        "pl" => PluralRule::Polish,
        "lt" => PluralRule::Lithuanian,
        "lv" => PluralRule::Latvian,
        "mo" | "ro" => PluralRule::Romanian,
        "is" => PluralRule::Icelandic,
        "ga" => PluralRule::Irish,
        "sl" => PluralRule::Slovenian,
        "mt" => PluralRule::Maltese,
        "cy" => PluralRule::Welsh,
        "ar" => PluralRule::Arabic,
        _ => return None,
    };
    Some(rule)
}
