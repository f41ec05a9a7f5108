/// Labels the page offers, paired with the codes the web translation
/// provider understands. Lookup is an exact match on the label.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("Chinese", "zh-CN"),
    ("English", "en"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("French", "fr"),
    ("German", "de"),
    ("Spanish", "es"),
    ("Russian", "ru"),
];

pub fn code_for(label: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
}

pub fn labels() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(name, _)| *name)
}
