use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use compiler::{legacy, CompileFailure, DiagnosticError};
use sxt::command::CommandRegistry;
use sxt::template::TemplateRegistry;

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected legacy escape string (trailing newlines ignored).
    #[serde(default)]
    pub expect_legacy: Option<String>,

    /// Expected preview buffer text, without the cursor marker
    /// (trimmed comparison).
    #[serde(default)]
    pub expect_preview: Option<String>,

    /// Expected compile error — the error's Display string must
    /// contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If true, the test expects parsing to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// Expected warnings. If present (even empty), warning count and
    /// content are checked. Each entry checks message substring and
    /// optionally the source line.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

/// Parse a `.test.sxt` file into its TOML config and script source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn fail(path: &Path, description: Option<String>, reason: String) -> TestResult {
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(path, None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(path, None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();

    let commands = CommandRegistry::builtin();
    let templates = TemplateRegistry::builtin();
    let result = compiler::compile(source, 0, &commands, &templates);

    if config.expect_parse_error {
        return match result {
            Err(CompileFailure::Parse(_)) => TestResult {
                path: path.to_path_buf(),
                description,
                outcome: TestOutcome::Pass,
            },
            Err(CompileFailure::Compile(e)) => fail(
                path,
                description,
                format!("expected parse error, got compile error: {}", e),
            ),
            Ok(_) => fail(
                path,
                description,
                "expected parse error, but compilation succeeded".into(),
            ),
        };
    }

    let compiled = match result {
        Ok(compiled) => Some(compiled),
        Err(CompileFailure::Parse(errors)) => {
            let msgs: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
            return fail(
                path,
                description,
                format!("unexpected parse error: {}", msgs.join("; ")),
            );
        }
        Err(CompileFailure::Compile(error)) => match &config.expect_error {
            Some(expected) if error.to_string().contains(expected.as_str()) => None,
            Some(expected) => {
                return fail(
                    path,
                    description,
                    format!(
                        "expected error containing \"{}\", got: {}",
                        expected, error
                    ),
                );
            }
            None => {
                return fail(
                    path,
                    description,
                    format!("unexpected compile error: {}", error),
                );
            }
        },
    };

    let Some(compiled) = compiled else {
        // expect_error matched.
        return TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        };
    };

    if let Some(expected) = &config.expect_error {
        return fail(
            path,
            description,
            format!(
                "expected error containing \"{}\", but compilation succeeded",
                expected
            ),
        );
    }

    if let Some(expected) = &config.expect_legacy {
        let actual = legacy::encode(&compiled.events);
        let actual = actual.trim_end_matches('\n');
        let expected = expected.trim_end_matches('\n');
        if actual != expected {
            return fail(
                path,
                description,
                format!(
                    "legacy string mismatch\n  expected: {:?}\n  actual:   {:?}",
                    expected, actual
                ),
            );
        }
    }

    if let Some(expected) = &config.expect_preview {
        let actual = compiler::render(&compiled.events, None).text();
        if actual.trim_end() != expected.trim_end() {
            return fail(
                path,
                description,
                format!(
                    "preview mismatch\n  expected: {:?}\n  actual:   {:?}",
                    expected.trim_end(),
                    actual.trim_end()
                ),
            );
        }
    }

    if let Some(expected_warnings) = &config.expect_warnings {
        if let Some(reason) = check_warnings(source, &compiled.warnings, expected_warnings) {
            return fail(path, description, reason);
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    diagnostics: &[DiagnosticError],
    expected: &[ExpectedWarning],
) -> Option<String> {
    let actual_warnings: Vec<&DiagnosticError> =
        diagnostics.iter().filter(|d| d.is_warning).collect();

    if actual_warnings.len() != expected.len() {
        let actual_msgs: Vec<String> = actual_warnings
            .iter()
            .map(|w| format!("  - {}", w))
            .collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            actual_warnings.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in actual_warnings.iter().zip(expected.iter()).enumerate() {
        let msg = actual.to_string();

        if !msg.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }

        if let Some(expected_line) = expected.line {
            if let Some(span) = &actual.span {
                let actual_line = byte_offset_to_line(source, span.start);
                if actual_line != expected_line {
                    return Some(format!(
                        "warning[{}]: expected on line {}, but span is on line {}",
                        i, expected_line, actual_line
                    ));
                }
            } else {
                return Some(format!(
                    "warning[{}]: expected on line {}, but warning has no span",
                    i, expected_line
                ));
            }
        }
    }

    None
}

/// Discover `.test.sxt` files grouped by category (subfolder relative
/// to root). Files directly in `root` get category "" (uncategorized).
/// Returns a BTreeMap so categories are sorted alphabetically.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.sxt") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.sxt files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn result_label<'a>(result: &'a TestResult, path: &'a Path) -> &'a str {
    result.description.as_deref().unwrap_or_else(|| {
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("?")
    })
}

fn print_failure(result: &TestResult) {
    eprintln!();
    eprintln!("  --- {} ---", result.path.display());
    if let TestOutcome::Fail(reason) = &result.outcome {
        for line in reason.lines() {
            eprintln!("  {}", line);
        }
    }
}

fn print_summary(passed: usize, failed: usize, no_color: bool) -> i32 {
    eprintln!();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let label = if no_color {
            "FAILED"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed
        );
        1
    }
}

/// Run all `.test.sxt` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    // Single file mode — ignore categories
    if path.is_file() {
        let result = run_single_test(path);
        let label = result_label(&result, path);
        return match &result.outcome {
            TestOutcome::Pass => {
                eprintln!("  {}  {}", pass_label(no_color), label);
                print_summary(1, 0, no_color)
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), label);
                eprintln!();
                eprintln!("failures:");
                print_failure(&result);
                print_summary(0, 1, no_color)
            }
        };
    }

    let all_categories = discover_categorized(path);

    if all_categories.is_empty() {
        eprintln!("no .test.sxt files found in {}", path.display());
        return 1;
    }

    // Filter categories if specified
    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let mut found = false;
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&format!("{}/", req)) {
                    filtered.insert(cat.as_str(), files);
                    found = true;
                }
            }
            if !found {
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    all_categories
                        .keys()
                        .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        let header = if cat.is_empty() {
            "(root)".to_string()
        } else {
            cat.to_string()
        };
        eprintln!();
        eprintln!("{}", bold(&header, no_color));

        for file in *files {
            let result = run_single_test(file);
            let label = result_label(&result, file);

            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label);
                }
                TestOutcome::Fail(_) => {
                    failed += 1;
                    eprintln!("  {}  {}", fail_label(no_color), label);
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            print_failure(f);
        }
    }

    print_summary(passed, failed, no_color)
}
