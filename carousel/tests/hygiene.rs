//! Hygiene checks for the carousel sources, enforced at test time.
//!
//! Scans the carousel crate's production sources for patterns the engine must
//! not contain. Each rule has a budget (ideally zero); budgets only ever go down.
//!
//! Beyond the usual panic and silent-discard rules, the engine is kept free of
//! clocks, stdout, and I/O: time and delivery belong to the host.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct Rule {
    name: &'static str,
    pattern: &'static str,
    budget: usize,
}

const RULES: &[Rule] = &[
    // Panics crash the host.
    Rule { name: "unwrap", pattern: ".unwrap()", budget: 0 },
    Rule { name: "expect", pattern: ".expect(", budget: 0 },
    Rule { name: "panic", pattern: "panic!(", budget: 0 },
    Rule { name: "unreachable", pattern: "unreachable!(", budget: 0 },
    Rule { name: "todo", pattern: "todo!(", budget: 0 },
    Rule { name: "unimplemented", pattern: "unimplemented!(", budget: 0 },
    // Silent loss: results discarded without inspection.
    Rule { name: "let underscore", pattern: "let _ =", budget: 0 },
    Rule { name: "dot ok", pattern: ".ok()", budget: 0 },
    Rule { name: "allow dead code", pattern: "#[allow(dead_code)]", budget: 0 },
    // Engine purity. Logging goes through tracing; time and I/O belong to the host.
    Rule { name: "println", pattern: "println!(", budget: 0 },
    Rule { name: "eprintln", pattern: "eprintln!(", budget: 0 },
    Rule { name: "clock", pattern: "Instant::now", budget: 0 },
    Rule { name: "system time", pattern: "SystemTime", budget: 0 },
    Rule { name: "thread sleep", pattern: "thread::sleep", budget: 0 },
    Rule { name: "std io", pattern: "std::io", budget: 0 },
    Rule { name: "std net", pattern: "std::net", budget: 0 },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`; `*_test.rs` files are skipped.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the carousel crate root");
}

#[test]
fn every_rule_within_budget() {
    let files = source_files();
    let mut failures = Vec::new();
    for rule in RULES {
        let found = hits(&files, rule.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > rule.budget {
            let detail = found
                .iter()
                .map(|(path, c)| format!("    {path}: {c}"))
                .collect::<Vec<_>>()
                .join("\n");
            failures.push(format!("  {} ({:?}): found {count}, max {}\n{detail}", rule.name, rule.pattern, rule.budget));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn test_modules_live_beside_their_source() {
    for file in source_files() {
        if file.path.ends_with("lib.rs") || file.path.ends_with("consts.rs") {
            continue;
        }
        assert!(
            file.content.contains("#[cfg(test)]"),
            "{} has no sibling test module",
            file.path
        );
    }
}
