//! File names for the code block download button.

/// File extension for code written in `language`.
///
/// Known language names map to their conventional extension; anything else
/// is used as the extension verbatim.
#[must_use]
pub fn download_extension(language: &str) -> &str {
    match language {
        "javascript" => "js",
        "typescript" => "ts",
        "python" => "py",
        "csharp" => "cs",
        "rust" => "rs",
        "ruby" => "rb",
        "kotlin" => "kt",
        "markdown" => "md",
        "bash" | "shell" => "sh",
        "powershell" => "ps1",
        "objectivec" => "mm",
        "text" | "" => "txt",
        other => other,
    }
}

/// Download file name for a code block: `aichat-{stamp}.{ext}`.
#[must_use]
pub fn download_file_name(language: &str, stamp: &str) -> String {
    format!("aichat-{stamp}.{}", download_extension(language))
}
