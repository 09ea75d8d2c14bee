//! Project slug derivation.
//!
//! The slug is the project's public embed key: stable, URL-safe, and
//! resolvable without authentication. Derived once at create time and
//! re-derived when the project is renamed.

/// Derive a URL-safe slug from a project name.
///
/// Lowercases the name, maps every run of non-alphanumeric characters
/// to a single `-`, and trims leading/trailing dashes.
///
/// # Examples
///
/// ```
/// use typevault_core::slug::slugify;
///
/// assert_eq!(slugify("Acme Corp"), "acme-corp");
/// assert_eq!(slugify("  Launch -- 2024!  "), "launch-2024");
/// assert_eq!(slugify("Ünïcode Näme"), "n-code-n-me");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true; // suppress a leading dash

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("My   Font -- Project"), "my-font-project");
    }

    #[test]
    fn trims_edge_dashes() {
        assert_eq!(slugify("--edgy--"), "edgy");
    }

    #[test]
    fn empty_and_symbol_only_names_give_empty_slugs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn is_stable() {
        assert_eq!(slugify("Stable Name"), slugify("Stable Name"));
    }
}
