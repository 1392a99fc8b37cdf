//! CLI commands for translation lookup and plural rules

use std::path::Path;

use crate::formats::ts::read_ts;
use crate::lookup::{LookupResult, TranslatorOptions};
use crate::plural::PluralRule;

/// Look up a single translation
pub fn lookup(
    file: &Path,
    context: &str,
    source: &str,
    comment: Option<&str>,
    count: Option<u64>,
    finished_only: bool,
) -> anyhow::Result<()> {
    let catalog = read_ts(file)?;
    let translator = catalog.translator_with(TranslatorOptions {
        accept_unfinished: !finished_only,
    });

    match translator.translate(context, source, comment, count) {
        LookupResult::Found(text) => println!("{text}"),
        LookupResult::FoundPartial(text) => {
            if finished_only {
                println!("{source}");
                eprintln!("(unfinished translation ignored)");
            } else {
                println!("{text}");
                eprintln!("(unfinished)");
            }
        }
        LookupResult::NotApplicablePlural { fallback } => {
            println!("{}", fallback.unwrap_or(source));
            eprintln!(
                "(no plural form for slot {} of the {} rule)",
                count.map_or(0, |n| translator.plural_rule().select(n)),
                translator.plural_rule()
            );
        }
        LookupResult::NotFound => {
            println!("{source}");
            eprintln!("(not found)");
        }
    }
    Ok(())
}

/// Show the plural rule for a locale and the slots for some quantities
pub fn plural(locale: &str, quantities: &[u64]) -> anyhow::Result<()> {
    let rule = PluralRule::for_locale(locale);
    let names = rule.category_names();

    println!("Locale:  {locale}");
    println!("Rule:    {rule} ({} forms)", rule.category_count());
    println!("Slots:   {}", names.join(", "));

    for &n in quantities {
        let slot = rule.select(n);
        println!("  {n:>8} -> [{slot}] {}", names[slot]);
    }
    Ok(())
}
