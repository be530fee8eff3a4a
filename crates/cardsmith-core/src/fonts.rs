//! Built-in font catalog for the font picker.

/// Broad style grouping shown next to each family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontCategory {
    Serif,
    SansSerif,
    Script,
    Display,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontEntry {
    pub family: &'static str,
    pub category: FontCategory,
}

const fn font(family: &'static str, category: FontCategory) -> FontEntry {
    FontEntry { family, category }
}

/// Families offered by the font picker, alphabetical.
pub const FONT_CATALOG: &[FontEntry] = &[
    font("Abril Fatface", FontCategory::Display),
    font("Alex Brush", FontCategory::Script),
    font("Cinzel", FontCategory::Serif),
    font("Cormorant Garamond", FontCategory::Serif),
    font("Dancing Script", FontCategory::Script),
    font("EB Garamond", FontCategory::Serif),
    font("Great Vibes", FontCategory::Script),
    font("Josefin Sans", FontCategory::SansSerif),
    font("Lato", FontCategory::SansSerif),
    font("Libre Baskerville", FontCategory::Serif),
    font("Lora", FontCategory::Serif),
    font("Montserrat", FontCategory::SansSerif),
    font("Open Sans", FontCategory::SansSerif),
    font("Parisienne", FontCategory::Script),
    font("Playfair Display", FontCategory::Serif),
    font("Poppins", FontCategory::SansSerif),
    font("Raleway", FontCategory::SansSerif),
    font("Sacramento", FontCategory::Script),
    font("Tangerine", FontCategory::Script),
    font("Yeseva One", FontCategory::Display),
];

/// Case-insensitive substring search over the catalog.
/// An empty or blank query returns every family.
pub fn search_fonts(query: &str) -> Vec<&'static FontEntry> {
    let needle = query.trim().to_lowercase();
    FONT_CATALOG
        .iter()
        .filter(|entry| needle.is_empty() || entry.family.to_lowercase().contains(&needle))
        .collect()
}
