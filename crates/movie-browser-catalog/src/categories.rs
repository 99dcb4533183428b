/// Category slugs surfaced in navigation, with their display names.
pub const KNOWN_CATEGORIES: &[(&str, &str)] = &[
    ("phim-bo", "Phim Bộ"),
    ("phim-le", "Phim Lẻ"),
    ("hoat-hinh", "Hoạt Hình"),
];

pub fn category_display_name(slug: &str) -> &'static str {
    KNOWN_CATEGORIES
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|(_, name)| *name)
        .unwrap_or("Danh mục")
}
