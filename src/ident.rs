//! Canonical identifier derivation.
//!
//! Configuration files and module directories use snake or kebab case on
//! disk; logical names use CamelCase. `my_thing` and `my-thing` both become
//! `MyThing`.

/// Converts a snake/kebab-cased name to its canonical CamelCase form.
///
/// Already-capitalized segments keep their capitalization, so `MyThing`
/// round-trips unchanged.
pub fn canonical(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
