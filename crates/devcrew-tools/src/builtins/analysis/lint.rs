//! Rule-based style checks

use super::Language;

#[derive(Debug)]
struct Finding {
    line: usize,
    code: &'static str,
    message: String,
}

fn check(content: &str, language: &Language) -> Vec<Finding> {
    let max = language.max_line_length();
    let mut findings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        let width = line.chars().count();
        if width > max {
            findings.push(Finding {
                line: line_no,
                code: "E501",
                message: format!("line too long ({} > {} characters)", width, max),
            });
        }

        if line != line.trim_end() {
            findings.push(Finding {
                line: line_no,
                code: "W291",
                message: "trailing whitespace".to_string(),
            });
        }

        let indent = &line[..line.len() - line.trim_start().len()];
        if indent.contains('\t') {
            findings.push(Finding {
                line: line_no,
                code: "W191",
                message: "indentation contains tabs".to_string(),
            });
        }
    }

    if !content.is_empty() && !content.ends_with('\n') {
        findings.push(Finding {
            line: content.lines().count(),
            code: "W292",
            message: "no newline at end of file".to_string(),
        });
    }

    findings
}

pub(super) fn analyze(content: &str, language: &Language, file_name: &str) -> String {
    let findings = check(content, language);
    if findings.is_empty() {
        return "No linting issues found".to_string();
    }

    let lines: Vec<String> = findings
        .iter()
        .map(|f| format!("{}:{}: {} {}", file_name, f.line, f.code, f.message))
        .collect();
    format!("Linting Issues:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_file() {
        assert_eq!(
            analyze("x = 1\n", &Language::Python, "a.py"),
            "No linting issues found"
        );
        assert_eq!(analyze("", &Language::Python, "a.py"), "No linting issues found");
    }

    #[test]
    fn test_findings() {
        let long = "y".repeat(80);
        let source = format!("x = 1 \n\tz = 2\n{}", long);
        let text = analyze(&source, &Language::Python, "bad.py");
        assert_eq!(
            text,
            "Linting Issues:\n\
             bad.py:1: W291 trailing whitespace\n\
             bad.py:2: W191 indentation contains tabs\n\
             bad.py:3: E501 line too long (80 > 79 characters)\n\
             bad.py:3: W292 no newline at end of file"
        );
    }

    #[test]
    fn test_limit_depends_on_language() {
        let line = format!("{}\n", "a".repeat(90));
        assert_eq!(analyze(&line, &Language::Rust, "lib.rs"), "No linting issues found");
        assert!(analyze(&line, &Language::Python, "lib.py").contains("E501"));
    }
}
