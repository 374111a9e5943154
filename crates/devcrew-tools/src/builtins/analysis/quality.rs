//! Line statistics

use super::Language;

pub(super) fn analyze(content: &str, language: &Language, file_name: &str) -> String {
    let prefix = language.comment_prefix();

    // split, not lines: a trailing newline counts as a final empty line
    let lines: Vec<&str> = content.split('\n').collect();
    let total = lines.len();
    let blank = lines.iter().filter(|l| l.trim().is_empty()).count();
    let comments = lines
        .iter()
        .filter(|l| l.trim_start().starts_with(prefix))
        .count();
    let ratio = comments as f64 / total as f64 * 100.0;

    format!(
        "Code Quality Analysis for {}:\nTotal lines: {}\nBlank lines: {}\nComment lines: {}\nCode lines: {}\nComment ratio: {:.1}%",
        file_name,
        total,
        blank,
        comments,
        total - blank - comments,
        ratio
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_quality() {
        let text = analyze("# header\nimport os\n\nx = 1\n", &Language::Python, "m.py");
        assert_eq!(
            text,
            "Code Quality Analysis for m.py:\n\
             Total lines: 5\n\
             Blank lines: 2\n\
             Comment lines: 1\n\
             Code lines: 2\n\
             Comment ratio: 20.0%"
        );
    }

    #[test]
    fn test_rust_comment_prefix() {
        let text = analyze("// a\n/// b\nfn main() {}", &Language::Rust, "main.rs");
        assert!(text.contains("Comment lines: 2"));
        assert!(text.contains("Comment ratio: 66.7%"));
    }

    #[test]
    fn test_empty_content() {
        let text = analyze("", &Language::Python, "empty.py");
        assert!(text.contains("Total lines: 1"));
        assert!(text.contains("Comment ratio: 0.0%"));
    }
}
