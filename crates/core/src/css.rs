//! `@font-face` manifest rendering.
//!
//! Turns a project's member fonts plus freshly issued signed URLs into
//! a CSS stylesheet, one `@font-face` rule per font. Rendering is pure:
//! URL issuance happens in the caller.

/// Everything needed to render one `@font-face` rule.
#[derive(Debug, Clone)]
pub struct FontFaceRule {
    /// `font-family` value: the font's full name when present,
    /// otherwise its file-derived name.
    pub family: String,
    /// Freshly issued signed URL for the served asset.
    pub src_url: String,
    /// CSS format hint for the served asset (`woff`, `truetype`, ...).
    pub format: &'static str,
    /// Stored weight; empty means `normal`.
    pub weight: String,
    /// Stored style (naming-table subfamily); mapped to a valid
    /// `font-style` value at render time.
    pub style: String,
}

/// Render a full stylesheet. A project with zero fonts renders a
/// valid, empty stylesheet -- not an error.
pub fn render_stylesheet(rules: &[FontFaceRule]) -> String {
    let mut css = String::new();
    for rule in rules {
        render_rule(&mut css, rule);
    }
    css
}

fn render_rule(css: &mut String, rule: &FontFaceRule) {
    let family = sanitize_family(&rule.family);
    let weight = font_weight_value(&rule.weight);
    let style = font_style_value(&rule.style);

    css.push_str("@font-face {\n");
    css.push_str(&format!("  font-family: '{family}';\n"));
    css.push_str(&format!(
        "  src: url('{}') format('{}');\n",
        rule.src_url, rule.format
    ));
    css.push_str(&format!("  font-weight: {weight};\n"));
    css.push_str(&format!("  font-style: {style};\n"));
    css.push_str("}\n");
}

/// Strip characters that would break out of the quoted family name.
fn sanitize_family(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\' | '\n' | '\r' | '{' | '}' | ';'))
        .collect();

    if cleaned.trim().is_empty() {
        "CustomFont".to_string()
    } else {
        cleaned.trim().to_string()
    }
}

/// Stored weights are either empty, `normal`, or a numeric string from
/// the OS/2 table; all of those are valid `font-weight` values.
fn font_weight_value(weight: &str) -> &str {
    if weight.trim().is_empty() {
        "normal"
    } else {
        weight.trim()
    }
}

/// Map a descriptive subfamily string ("Bold Italic", "Oblique", ...)
/// onto a valid `font-style` value.
fn font_style_value(style: &str) -> &'static str {
    let lower = style.to_ascii_lowercase();
    if lower.contains("italic") {
        "italic"
    } else if lower.contains("oblique") {
        "oblique"
    } else {
        "normal"
    }
}
