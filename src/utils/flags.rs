//! Boolean flag parsing shared by configuration and data sources.

/// Parses the boolean spellings accepted in environment variables and
/// spreadsheet exports: `1`, `t`, `true` and `0`, `f`, `false` (lower,
/// upper or title case).
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
