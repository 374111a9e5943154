//! Declarations: classes/types, functions and imports

use super::Language;
use regex::Regex;
use std::sync::LazyLock;

static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*class\s+([A-Za-z_]\w*)").expect("PY_CLASS is a compile-time constant")
});
static PY_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)").expect("PY_DEF is a compile-time constant")
});
static PY_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\s+(.+)$").expect("PY_IMPORT is a compile-time constant")
});
static PY_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*from\s+([\w.]+)\s+import\b").expect("PY_FROM is a compile-time constant")
});

static RS_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|union|type)\s+([A-Za-z_]\w*)")
        .expect("RS_TYPE is a compile-time constant")
});
pub(super) static RS_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:default\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+([A-Za-z_]\w*)"#,
    )
    .expect("RS_FN is a compile-time constant")
});
static RS_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([^;]+);")
        .expect("RS_USE is a compile-time constant")
});

static JS_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:class|interface)\s+([A-Za-z_$][\w$]*)")
        .expect("JS_CLASS is a compile-time constant")
});
pub(super) static JS_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
        .expect("JS_FUNCTION is a compile-time constant")
});
pub(super) static JS_ARROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s*)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::[^=]+)?=>",
    )
    .expect("JS_ARROW is a compile-time constant")
});
static JS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+(?:[^'"]*\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("JS_IMPORT is a compile-time constant")
});
static JS_REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).expect("JS_REQUIRE is a compile-time constant")
});

#[derive(Debug, Default)]
struct Declarations {
    types: Vec<String>,
    functions: Vec<String>,
    imports: Vec<String>,
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn collect(content: &str, language: &Language) -> Declarations {
    let mut decls = Declarations::default();

    for line in content.lines() {
        match language {
            Language::Python => {
                if let Some(name) = capture(&PY_CLASS, line) {
                    decls.types.push(name);
                } else if let Some(name) = capture(&PY_DEF, line) {
                    decls.functions.push(name);
                } else if let Some(module) = capture(&PY_FROM, line) {
                    decls.imports.push(module);
                } else if let Some(list) = capture(&PY_IMPORT, line) {
                    decls.imports.extend(
                        list.split(',')
                            .filter_map(|item| item.split_whitespace().next())
                            .map(str::to_string),
                    );
                }
            }
            Language::Rust => {
                if let Some(name) = capture(&RS_TYPE, line) {
                    decls.types.push(name);
                } else if let Some(name) = capture(&RS_FN, line) {
                    decls.functions.push(name);
                } else if let Some(path) = capture(&RS_USE, line) {
                    decls.imports.push(path);
                }
            }
            Language::JavaScript | Language::TypeScript => {
                if let Some(name) = capture(&JS_CLASS, line) {
                    decls.types.push(name);
                } else if let Some(name) =
                    capture(&JS_FUNCTION, line).or_else(|| capture(&JS_ARROW, line))
                {
                    decls.functions.push(name);
                } else if let Some(module) =
                    capture(&JS_IMPORT, line).or_else(|| capture(&JS_REQUIRE, line))
                {
                    decls.imports.push(module);
                }
            }
            Language::Other(_) => {}
        }
    }

    decls
}

pub(super) fn analyze(content: &str, language: &Language, file_name: &str) -> String {
    let decls = collect(content, language);
    let type_label = match language {
        Language::Rust => "Types",
        _ => "Classes",
    };

    format!(
        "{} Structure Analysis for {}:\n{} ({}): {}\nFunctions ({}): {}\nImports ({}): {}",
        language.display_name(),
        file_name,
        type_label,
        decls.types.len(),
        decls.types.join(", "),
        decls.functions.len(),
        decls.functions.join(", "),
        decls.imports.len(),
        decls.imports.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_structure() {
        let source = "\
import os, sys as system
from pathlib import Path

class Repo:
    def __init__(self):
        pass

    async def fetch(self):
        pass

def main():
    pass
";
        let text = analyze(source, &Language::Python, "repo.py");
        assert_eq!(
            text,
            "Python Structure Analysis for repo.py:\n\
             Classes (1): Repo\n\
             Functions (3): __init__, fetch, main\n\
             Imports (3): os, sys, pathlib"
        );
    }

    #[test]
    fn test_rust_structure() {
        let source = "\
use std::collections::HashMap;
pub use crate::error::Error;

pub struct Store {
    items: HashMap<String, u32>,
}

pub(crate) enum Mode { Fast, Slow }

impl Store {
    pub async fn load() -> Self { todo!() }
    fn helper(&self) {}
}
";
        let text = analyze(source, &Language::Rust, "store.rs");
        assert!(text.starts_with("Rust Structure Analysis for store.rs:"));
        assert!(text.contains("Types (2): Store, Mode"));
        assert!(text.contains("Functions (2): load, helper"));
        assert!(text.contains("Imports (2): std::collections::HashMap, crate::error::Error"));
    }

    #[test]
    fn test_javascript_structure() {
        let source = "\
import express from 'express';
const db = require('./db');

export class Server {}

export async function start(port) {}
const handler = async (req, res) => {};
";
        let text = analyze(source, &Language::JavaScript, "server.js");
        assert!(text.contains("Classes (1): Server"));
        assert!(text.contains("Functions (2): start, handler"));
        assert!(text.contains("Imports (2): express, ./db"));
    }

    #[test]
    fn test_empty_file() {
        let text = analyze("", &Language::Python, "empty.py");
        assert!(text.contains("Classes (0): \n"));
        assert!(text.ends_with("Imports (0): "));
    }
}
