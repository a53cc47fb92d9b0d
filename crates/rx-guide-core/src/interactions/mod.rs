//! Drug interaction checking against a static table.
//!
//! Pipeline: raw medicine names → [`normalize_drug_name`] → [`check_interactions`] → [`render_report`]

mod checker;
mod render;
mod table;

pub use checker::*;
pub use render::*;
pub use table::*;

/// Normalize a transcribed medicine name for table lookup.
///
/// Keeps the text before the first `(` (brand names are often given in
/// parentheses), trims it and title-cases it.
pub fn normalize_drug_name(raw: &str) -> String {
    let base = raw.split('(').next().unwrap_or_default().trim();
    title_case(base)
}

/// Normalize a list of names, dropping any that end up empty.
pub fn normalize_drug_names<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|name| normalize_drug_name(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Upper-case every cased letter that follows an uncased character, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && !prev_cased {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_parenthetical() {
        assert_eq!(normalize_drug_name("AUGMENTIN (Amoxicillin + Clavulanate)"), "Augmentin");
        assert_eq!(normalize_drug_name("  eroflam  "), "Eroflam");
    }

    #[test]
    fn test_title_case_after_non_letters() {
        assert_eq!(title_case("augmentin 625mg"), "Augmentin 625Mg");
        assert_eq!(title_case("co-amoxiclav"), "Co-Amoxiclav");
    }

    #[test]
    fn test_normalize_names_drops_blanks() {
        let names = normalize_drug_names(["Augmentin", "  ", "(brand only)", "warfarin"]);
        assert_eq!(names, vec!["Augmentin", "Warfarin"]);
    }
}
