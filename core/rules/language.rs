// Maps dotted file extensions to the label placed after a code fence.
// Lookup is case-insensitive; unknown extensions get no label.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        ".py" | ".pyx" => Some("python"),
        ".js" | ".jsx" | ".mjs" | ".cjs" => Some("javascript"),
        ".ts" | ".tsx" => Some("typescript"),
        ".cpp" | ".cc" | ".cxx" | ".hpp" | ".hxx" => Some("cpp"),
        ".c" | ".h" => Some("c"),
        ".rs" => Some("rust"),
        ".css" => Some("css"),
        ".scss" => Some("scss"),
        ".less" => Some("less"),
        ".html" | ".htm" => Some("html"),
        ".xml" => Some("xml"),
        ".json" => Some("json"),
        ".yaml" | ".yml" => Some("yaml"),
        ".toml" => Some("toml"),
        ".md" => Some("markdown"),
        ".sql" => Some("sql"),
        ".sh" => Some("bash"),
        ".bat" => Some("batch"),
        ".qml" => Some("qml"),
        ".cmake" => Some("cmake"),
        _ => None,
    }
}
