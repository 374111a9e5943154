//! McCabe-style complexity estimate
//!
//! Complexity is one plus the number of decision points in a function body.
//! Python bodies end at the first non-blank line indented no deeper than the
//! `def`; brace languages end at the matching closing brace.

use super::structure::{JS_ARROW, JS_FUNCTION, RS_FN};
use super::Language;
use regex::Regex;
use std::sync::LazyLock;

/// Reported threshold, inclusive
const THRESHOLD: usize = 5;

static PY_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)").expect("PY_DEF is a compile-time constant")
});
static PY_DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|elif|for|while|except|and|or|case)\b")
        .expect("PY_DECISION is a compile-time constant")
});
static RS_DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|for|while)\b|=>|&&|\|\|").expect("RS_DECISION is a compile-time constant")
});
static JS_DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|for|while|case|catch)\b|&&|\|\||\?\?")
        .expect("JS_DECISION is a compile-time constant")
});

#[derive(Debug, PartialEq, Eq)]
struct FunctionComplexity {
    name: String,
    line: usize,
    complexity: usize,
}

fn strip_comment<'a>(line: &'a str, prefix: &str) -> &'a str {
    line.find(prefix).map_or(line, |idx| &line[..idx])
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn name_of(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn python_functions(lines: &[&str]) -> Vec<FunctionComplexity> {
    let mut found = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(name) = name_of(&PY_DEF, line) else {
            continue;
        };
        let indent = indent_of(line);

        let mut decisions = 0;
        for body in &lines[idx + 1..] {
            let trimmed = body.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if indent_of(body) <= indent {
                break;
            }
            decisions += PY_DECISION.find_iter(strip_comment(body, "#")).count();
        }

        found.push(FunctionComplexity {
            name,
            line: idx + 1,
            complexity: 1 + decisions,
        });
    }

    found
}

/// Text from the signature line through the matching closing brace, or
/// `None` for a declaration without a block body
fn braced_body(lines: &[&str]) -> Option<String> {
    let mut depth = 0usize;
    let mut started = false;
    let mut body = String::new();

    for line in lines {
        let code = strip_comment(line, "//");
        for ch in code.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    started = true;
                }
                '}' if started => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        body.push_str(code);
                        return Some(body);
                    }
                }
                ';' if !started => return None,
                _ => {}
            }
        }
        body.push_str(code);
        body.push('\n');
    }

    started.then_some(body)
}

fn braced_functions(lines: &[&str], language: &Language) -> Vec<FunctionComplexity> {
    let decision: &Regex = match language {
        Language::Rust => &RS_DECISION,
        _ => &JS_DECISION,
    };

    let mut found = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let name = match language {
            Language::Rust => name_of(&RS_FN, line),
            _ => name_of(&JS_FUNCTION, line).or_else(|| name_of(&JS_ARROW, line)),
        };
        let Some(name) = name else {
            continue;
        };
        let Some(body) = braced_body(&lines[idx..]) else {
            continue;
        };

        found.push(FunctionComplexity {
            name,
            line: idx + 1,
            complexity: 1 + decision.find_iter(&body).count(),
        });
    }

    found
}

fn functions(content: &str, language: &Language) -> Vec<FunctionComplexity> {
    let lines: Vec<&str> = content.lines().collect();
    if language.is_indented() {
        python_functions(&lines)
    } else {
        braced_functions(&lines, language)
    }
}

pub(super) fn analyze(content: &str, language: &Language, file_name: &str) -> String {
    let complex: Vec<String> = functions(content, language)
        .into_iter()
        .filter(|f| f.complexity >= THRESHOLD)
        .map(|f| {
            format!(
                "{}:{}:1: C901 '{}' is too complex ({})",
                file_name, f.line, f.name, f.complexity
            )
        })
        .collect();

    if complex.is_empty() {
        "No complex functions found (complexity < 5)".to_string()
    } else {
        format!("Complexity Analysis:\n{}", complex.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCHY_PY: &str = "\
def simple(x):
    return x + 1

def classify(value):
    # dispatch on shape
    if value is None:
        return 'none'
    elif isinstance(value, list):
        for item in value:
            if item and item > 0:
                return 'positive'
    while False:
        pass
    return 'other'

def after():
    return 2
";

    #[test]
    fn test_python_complexity() {
        let lines: Vec<&str> = BRANCHY_PY.lines().collect();
        let found = python_functions(&lines);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].complexity, 1);
        // if, elif, for, if, and, while
        assert_eq!(found[1].complexity, 7);
        assert_eq!(found[1].line, 4);
        assert_eq!(found[2].complexity, 1);

        let text = analyze(BRANCHY_PY, &Language::Python, "shapes.py");
        assert_eq!(
            text,
            "Complexity Analysis:\nshapes.py:4:1: C901 'classify' is too complex (7)"
        );
    }

    #[test]
    fn test_nothing_complex() {
        let text = analyze("def f():\n    return 1\n", &Language::Python, "f.py");
        assert_eq!(text, "No complex functions found (complexity < 5)");
        let text = analyze("", &Language::Rust, "empty.rs");
        assert_eq!(text, "No complex functions found (complexity < 5)");
    }

    #[test]
    fn test_rust_complexity() {
        let source = "\
trait Shape {
    fn area(&self) -> f64;
}

fn describe(n: i32) -> &'static str {
    if n < 0 && n > -10 {
        return \"small negative\";
    }
    match n {
        0 => \"zero\",
        1 => \"one\",
        _ => \"many\",
    }
}

fn id(x: i32) -> i32 { x }
";
        let lines: Vec<&str> = source.lines().collect();
        let found = braced_functions(&lines, &Language::Rust);
        let names: Vec<&str> = found.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["describe", "id"]);
        // if, &&, three match arms
        assert_eq!(found[0].complexity, 6);
        assert_eq!(found[1].complexity, 1);
    }

    #[test]
    fn test_javascript_complexity() {
        let source = "\
function route(req) {
  switch (req.method) {
    case 'GET': return list();
    case 'POST': return create();
  }
  try {
    if (req.user || req.token) { return ok(); }
  } catch (e) {}
}
const tiny = (a) => { return a ?? 0; };
";
        let text = analyze(source, &Language::JavaScript, "routes.js");
        // case, case, if, ||, catch
        assert_eq!(
            text,
            "Complexity Analysis:\nroutes.js:1:1: C901 'route' is too complex (6)"
        );
    }
}
