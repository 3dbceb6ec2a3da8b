/*!
A small harness for running whole-input pattern tests written in TOML.

Each TOML file holds a list of `[[tests]]`. A test names a pattern, an
input, and whether the pattern is expected to match the entire input:

```toml
[[tests]]
name = "mississippi"
pattern = "mis*is*ip*."
input = "mississippi"
match = true

[[tests]]
name = "leading-star"
pattern = "*a"
input = "a"
compiles = false
```

When `unescape` is set, both the pattern and the input may use `\xNN`, `\n`,
`\r`, `\t` and `\\` escapes, which permits testing arbitrary bytes.

A [`TestRunner`] runs a collection of tests against an implementation and
reports every failure at once.
*/

pub extern crate bstr;

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bstr::{BStr, BString, ByteSlice, ByteVec};
use serde::Deserialize;

mod escape;

const ENV_REGEX_TEST: &str = "REGEX_TEST";

/// A collection of pattern tests.
#[derive(Clone, Debug, Deserialize)]
pub struct RegexTests {
    tests: Vec<RegexTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// A regex test describes a pattern, an input and the expected outcome of
/// matching the pattern against the whole input.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    pattern: BString,
    #[serde(default)]
    input: BString,
    #[serde(rename = "match")]
    is_match: Option<bool>,
    #[serde(default = "default_true")]
    compiles: bool,
    #[serde(default)]
    unescape: bool,
}

impl RegexTests {
    /// Create a new empty collection of tests.
    pub fn new() -> RegexTests {
        RegexTests { tests: vec![], seen: HashSet::new() }
    }

    /// Loads all of the tests in the given TOML file. The group name assigned
    /// to each test is the stem of the file name. For example, if one loads
    /// `foo/bar.toml`, then the group name for each test will be `bar`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let group_name = path
            .file_stem()
            .with_context(|| {
                format!("failed to get file name of {}", path.display())
            })?
            .to_str()
            .with_context(|| {
                format!("invalid UTF-8 found in {}", path.display())
            })?;
        self.load_slice(&group_name, &data)
            .with_context(|| format!("error loading {}", path.display()))?;
        Ok(())
    }

    /// Load all of the TOML encoded tests in `data` into this collection.
    /// The given group name is assigned to all loaded tests.
    pub fn load_slice(&mut self, group_name: &str, data: &[u8]) -> Result<()> {
        let mut index = 1;
        let mut tests: RegexTests =
            toml::from_slice(&data).context("error decoding TOML")?;
        for t in &mut tests.tests {
            t.group = group_name.to_string();
            if t.name.is_empty() {
                t.name = format!("{}", index);
                index += 1;
            }
            t.full_name = format!("{}/{}", t.group, t.name);
            if t.unescape {
                t.pattern = BString::from(escape::unescape(&t.pattern));
                t.input = BString::from(escape::unescape(&t.input));
            }
            t.validate().with_context(|| {
                format!("error loading test '{}'", t.full_name())
            })?;
            if self.seen.contains(t.full_name()) {
                bail!("found duplicate tests for name '{}'", t.full_name());
            }
            self.seen.insert(t.full_name().to_string());
        }
        self.tests.extend(tests.tests);
        Ok(())
    }

    /// Return an iterator over all tests that have been loaded. The order of
    /// the iterator corresponds to the order in which the tests were loaded.
    pub fn iter(&self) -> RegexTestsIter {
        RegexTestsIter { it: self.tests.iter() }
    }

    /// Returns the number of tests loaded so far.
    pub fn len(&self) -> usize {
        self.tests.len()
    }
}

impl RegexTest {
    fn test(&self, regex: &CompiledRegex) -> Vec<TestResult> {
        match regex.match_regex {
            None => vec![TestResult::skip()],
            Some(ref match_regex) => match_regex(self),
        }
    }

    fn validate(&self) -> Result<()> {
        match (self.compiles, self.is_match) {
            (true, None) => {
                bail!("'match' must be present when the pattern compiles")
            }
            (false, Some(_)) => {
                bail!("'match' cannot be present when 'compiles = false'")
            }
            _ => Ok(()),
        }
    }

    /// Return the group name of this test.
    ///
    /// Usually the group name corresponds to a collection of related tests.
    /// More specifically, when using `RegexTests::load`, the group name
    /// corresponds to the file stem (the file name without the `.toml`
    /// suffix).
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The name of this test.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full name of this test, which is formed by joining the group name
    /// and the test name with a `/`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The pattern under test, with escapes already resolved.
    pub fn pattern(&self) -> &BStr {
        self.pattern.as_bstr()
    }

    /// The input that the pattern is matched against, with escapes already
    /// resolved.
    pub fn input(&self) -> &BStr {
        self.input.as_bstr()
    }

    /// Returns true if and only if this test expects a match.
    pub fn is_match(&self) -> bool {
        self.is_match.unwrap_or(false)
    }

    /// Returns true if the pattern is expected to be accepted.
    pub fn compiles(&self) -> bool {
        self.compiles
    }
}

/// In many implementations, the act of matching a pattern can be separated
/// from the act of compiling it. A `CompiledRegex` represents a pattern that
/// has been compiled and is ready to be used for matching.
pub struct CompiledRegex {
    match_regex: Option<Box<dyn Fn(&RegexTest) -> Vec<TestResult>>>,
}

impl CompiledRegex {
    /// Provide a closure that represents the compiled pattern and executes a
    /// match on any `RegexTest`. The `RegexTest` given to the closure is the
    /// exact same `RegexTest` that was used to compile this pattern.
    pub fn compiled<F: Fn(&RegexTest) -> Vec<TestResult> + 'static>(
        match_regex: F,
    ) -> CompiledRegex {
        CompiledRegex { match_regex: Some(Box::new(match_regex)) }
    }

    /// Indicate that tests on this pattern should be skipped.
    pub fn skip() -> CompiledRegex {
        CompiledRegex { match_regex: None }
    }
}

impl std::fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = match self.match_regex {
            None => "Skip",
            Some(_) => "Run(...)",
        };
        f.debug_struct("CompiledRegex").field("match_regex", &status).finish()
    }
}

/// The result of executing a single match.
///
/// Implementations may report several results for one test, for example one
/// for each engine. Naming each result makes failures easy to attribute.
#[derive(Debug, Clone)]
pub struct TestResult {
    name: String,
    kind: TestResultKind,
}

#[derive(Debug, Clone)]
enum TestResultKind {
    Matched(bool),
    Skip,
    /// Occurs when no test result is available. e.g., A pattern failed to
    /// compile or something panicked.
    None,
}

impl TestResult {
    /// Create a test result that indicates a match.
    pub fn matched() -> TestResult {
        TestResult::is_match(true)
    }

    /// Create a test result that indicates the pattern did not match.
    pub fn no_match() -> TestResult {
        TestResult::is_match(false)
    }

    /// Create a test result from a yes/no answer.
    pub fn is_match(yes: bool) -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::Matched(yes) }
    }

    /// Indicate that this test should be skipped. It will not be counted as
    /// a failure.
    pub fn skip() -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::Skip }
    }

    /// Indicate that this test has no results.
    pub fn none() -> TestResult {
        TestResult { name: "".to_string(), kind: TestResultKind::None }
    }

    /// Give a name to this test result. This will be included in the output
    /// if the test fails.
    pub fn name(mut self, name: &str) -> TestResult {
        self.name = name.to_string();
        self
    }
}

/// A runner for executing pattern tests.
///
/// This runner is intended to be used within a Rust unit test, marked with
/// the `#[test]` attribute.
///
/// A test runner is responsible for running tests against an implementation.
/// It contains logic for skipping tests and collects test results. Typical
/// usage corresponds to calling `test_iter` on an iterator of `RegexTest`s,
/// and then calling `assert` once done. If any tests failed, then `assert`
/// will panic with an error message containing all test failures. `assert`
/// must be called before the test completes.
///
/// ### Skipping tests
///
/// If the `REGEX_TEST` environment variable is set, then it may contain
/// a comma separated list of substrings. Each substring corresponds to a
/// whitelisted item, unless it starts with a `-`, in which case it
/// corresponds to a blacklisted item.
///
/// If there are any whitelist substrings, then a test's full name must
/// contain at least one of them in order to be run. If there are no
/// whitelist substrings, then a test is run only when it does not match any
/// blacklist substrings.
///
/// The last substring that a test name matches takes precedent.
#[derive(Debug)]
pub struct TestRunner {
    include: Vec<IncludePattern>,
    results: RegexTestResults,
}

#[derive(Debug)]
struct IncludePattern {
    blacklist: bool,
    substring: BString,
}

impl TestRunner {
    /// Create a new runner for executing tests.
    ///
    /// If there was a problem reading the `REGEX_TEST` environment variable,
    /// then an error is returned.
    pub fn new() -> Result<TestRunner> {
        let mut runner =
            TestRunner { include: vec![], results: RegexTestResults::new() };
        for mut substring in read_env(ENV_REGEX_TEST)?.split(",") {
            substring = substring.trim();
            if substring.is_empty() {
                continue;
            }
            if substring.starts_with("-") {
                runner.blacklist(&substring[1..]);
            } else {
                runner.whitelist(substring);
            }
        }
        Ok(runner)
    }

    /// Assert that all tests run have either passed or have been skipped.
    ///
    /// If any tests have failed, then a panic occurs with a report of all
    /// failures.
    ///
    /// If `REGEX_TEST_VERBOSE` is set to `1`, then a longer report of tests
    /// that passed, failed or skipped is printed.
    pub fn assert(&mut self) {
        self.results.assert();
    }

    /// Whitelist the given substring.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: false,
            substring: BString::from(substring),
        });
        self
    }

    /// Blacklist the given substring.
    ///
    /// A blacklisted test is never run, unless a whitelisted substring added
    /// after the blacklisted substring matches it.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: true,
            substring: BString::from(substring),
        });
        self
    }

    /// Run all of the given tests.
    pub fn test_iter<I, T>(
        &mut self,
        it: I,
        mut compile: impl FnMut(
            &RegexTest,
            &BStr,
        ) -> Result<
            CompiledRegex,
            Box<dyn std::error::Error>,
        >,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<RegexTest>,
    {
        for test in it {
            let test = test.borrow();
            if self.should_skip(test) {
                self.results.skip(test, &TestResult::none());
                continue;
            }
            self.test(test, |pattern| compile(test, pattern));
        }
        self
    }

    /// Run a single test.
    ///
    /// This records the result of running the test in this runner. This does
    /// not fail the test immediately if the given test fails. Instead, this
    /// is only done when the `assert` method is called.
    ///
    /// Note that using this method bypasses any whitelisted substring applied
    /// to this runner.
    pub fn test(
        &mut self,
        test: &RegexTest,
        mut compile: impl FnMut(
            &BStr,
        ) -> Result<
            CompiledRegex,
            Box<dyn std::error::Error>,
        >,
    ) -> &mut TestRunner {
        let compiled = match safe(|| compile(test.pattern())) {
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    RegexTestFailureKind::UnexpectedPanicCompile(msg),
                );
                return self;
            }
            Ok(Ok(compiled)) => compiled,
            Ok(Err(err)) => {
                if !test.compiles() {
                    self.results.pass(test, &TestResult::none());
                } else {
                    self.results.fail(
                        test,
                        &TestResult::skip(),
                        RegexTestFailureKind::CompileError { err },
                    );
                }
                return self;
            }
        };
        if !test.compiles() {
            self.results.fail(
                test,
                &TestResult::skip(),
                RegexTestFailureKind::NoCompileError,
            );
            return self;
        }
        let results = match safe(|| test.test(&compiled)) {
            Ok(results) => results,
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    RegexTestFailureKind::UnexpectedPanicSearch(msg),
                );
                return self;
            }
        };
        for result in results.iter() {
            match result.kind {
                TestResultKind::None => {}
                TestResultKind::Skip => {
                    self.results.skip(test, result);
                }
                TestResultKind::Matched(yes) => {
                    if yes != test.is_match() {
                        self.results.fail(
                            test,
                            result,
                            RegexTestFailureKind::IsMatch,
                        );
                    } else {
                        self.results.pass(test, result);
                    }
                }
            }
        }
        self
    }

    /// Return true if and only if the given test should be skipped.
    fn should_skip(&self, test: &RegexTest) -> bool {
        if self.include.is_empty() {
            return false;
        }

        // If we don't have any whitelist patterns, then the test will be run
        // unless it is blacklisted. Otherwise, if there are whitelist
        // patterns, then the test must match at least one of them.
        let mut skip = self.include.iter().any(|pat| !pat.blacklist);
        for pat in &self.include {
            if test.full_name().as_bytes().contains_str(&pat.substring) {
                skip = pat.blacklist;
            }
        }
        skip
    }
}

/// A collection of test results, corresponding to passed, skipped and failed
/// tests.
#[derive(Debug)]
struct RegexTestResults {
    pass: Vec<RegexTestResult>,
    fail: Vec<RegexTestFailure>,
    skip: Vec<RegexTestResult>,
}

/// A test that passed or skipped, along with its specific result.
#[derive(Debug)]
struct RegexTestResult {
    test: RegexTest,
    result: TestResult,
}

/// A test that failed along with the reason why.
#[derive(Debug)]
struct RegexTestFailure {
    test: RegexTest,
    result: TestResult,
    kind: RegexTestFailureKind,
}

/// Describes the nature of the failed test.
#[derive(Debug)]
enum RegexTestFailureKind {
    /// The test expected a match (or didn't expect a match), but the
    /// implementation didn't match (or did match).
    IsMatch,
    /// The test expected the pattern to be rejected, but it was accepted.
    NoCompileError,
    /// The test expected the pattern to be accepted, but it was rejected.
    CompileError { err: Box<dyn std::error::Error> },
    /// While compiling, a panic occurred. If possible, the panic message
    /// is captured.
    UnexpectedPanicCompile(String),
    /// While matching, a panic occurred. If possible, the panic message
    /// is captured.
    UnexpectedPanicSearch(String),
}

impl RegexTestResults {
    fn new() -> RegexTestResults {
        RegexTestResults { pass: vec![], fail: vec![], skip: vec![] }
    }

    fn pass(&mut self, test: &RegexTest, result: &TestResult) {
        self.pass.push(RegexTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn fail(
        &mut self,
        test: &RegexTest,
        result: &TestResult,
        kind: RegexTestFailureKind,
    ) {
        self.fail.push(RegexTestFailure {
            test: test.clone(),
            result: result.clone(),
            kind,
        });
    }

    fn skip(&mut self, test: &RegexTest, result: &TestResult) {
        self.skip.push(RegexTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn assert(&self) {
        if read_env("REGEX_TEST_VERBOSE").map_or(false, |s| s == "1") {
            self.verbose();
        }
        if self.fail.is_empty() {
            return;
        }
        let failures = self
            .fail
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<String>>()
            .join("\n\n");
        panic!(
            "found {} failures:\n{}\n{}\n{}\n\n\
             Set the REGEX_TEST environment variable to filter tests, \n\
             e.g., REGEX_TEST=foo,-foo2 runs every test whose name contains \n\
             foo but not foo2\n\n",
            self.fail.len(),
            "~".repeat(79),
            failures.trim(),
            "~".repeat(79),
        )
    }

    fn verbose(&self) {
        println!("{}", "~".repeat(79));
        for t in &self.skip {
            println!("skip: {}", t.full_name());
        }
        for t in &self.pass {
            println!("pass: {}", t.full_name());
        }
        for t in &self.fail {
            println!("FAIL: {}", t.full_name());
        }
        println!(
            "\npassed: {}, skipped: {}, failed: {}",
            self.pass.len(),
            self.skip.len(),
            self.fail.len()
        );
        println!("{}", "~".repeat(79));
    }
}

impl RegexTestResult {
    fn full_name(&self) -> String {
        full_name(&self.test, &self.result)
    }
}

impl RegexTestFailure {
    fn full_name(&self) -> String {
        full_name(&self.test, &self.result)
    }
}

fn full_name(test: &RegexTest, result: &TestResult) -> String {
    if result.name.is_empty() {
        test.full_name().to_string()
    } else {
        format!("{} ({})", test.full_name(), result.name)
    }
}

impl std::fmt::Display for RegexTestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {}\n\
             pattern:     {}\n\
             input:       {}",
            self.full_name(),
            self.kind.fmt(&self.test)?,
            escape::escape(self.test.pattern()),
            escape::escape(self.test.input()),
        )?;
        Ok(())
    }
}

impl RegexTestFailureKind {
    fn fmt(&self, test: &RegexTest) -> Result<String, std::fmt::Error> {
        use std::fmt::Write;

        let mut buf = String::new();
        match *self {
            RegexTestFailureKind::IsMatch => {
                if test.is_match() {
                    write!(buf, "expected match, but none found")?;
                } else {
                    write!(buf, "expected no match, but found a match")?;
                }
            }
            RegexTestFailureKind::NoCompileError => {
                write!(buf, "expected pattern to NOT compile, but it did")?;
            }
            RegexTestFailureKind::CompileError { ref err } => {
                write!(buf, "expected pattern to compile, failed: {}", err)?;
            }
            RegexTestFailureKind::UnexpectedPanicCompile(ref msg) => {
                write!(buf, "got unexpected panic while compiling:\n{}", msg)?;
            }
            RegexTestFailureKind::UnexpectedPanicSearch(ref msg) => {
                write!(buf, "got unexpected panic while matching:\n{}", msg)?;
            }
        }
        Ok(buf)
    }
}

/// An iterator over pattern tests.
#[derive(Debug)]
pub struct RegexTestsIter<'a> {
    it: std::slice::Iter<'a, RegexTest>,
}

impl<'a> Iterator for RegexTestsIter<'a> {
    type Item = &'a RegexTest;

    fn next(&mut self) -> Option<&'a RegexTest> {
        self.it.next()
    }
}

/// Read the environment variable given. If it doesn't exist, then return an
/// empty string. Otherwise, check that it is valid UTF-8. If it isn't, return
/// a useful error message.
fn read_env(var: &str) -> Result<String> {
    let val = match std::env::var_os(var) {
        None => return Ok("".to_string()),
        Some(val) => val,
    };
    let val = val.into_string().map_err(|os| {
        anyhow::anyhow!(
            "invalid UTF-8 in env var {}={:?}",
            var,
            Vec::from_os_str_lossy(&os)
        )
    })?;
    Ok(val)
}

fn safe<T, F>(fun: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    use std::panic;

    panic::catch_unwind(panic::AssertUnwindSafe(fun)).map_err(|any_err| {
        // Extract common types of panic payload:
        // panic and assert produce &str or String
        if let Some(&s) = any_err.downcast_ref::<&str>() {
            s.to_owned()
        } else if let Some(s) = any_err.downcast_ref::<String>() {
            s.to_owned()
        } else {
            "UNABLE TO SHOW RESULT OF PANIC.".to_owned()
        }
    })
}

/// A function to set some boolean fields to a default of 'true'. We use a
/// function so that we can hand a path to it to Serde.
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_name() {
        let data = br#"
[[tests]]
pattern = "a*"
input = "aaa"
match = true

[[tests]]
name = "nul"
pattern = '\x00.'
input = '\x00\xFF'
match = true
unescape = true

[[tests]]
pattern = "*"
compiles = false
"#;
        let mut tests = RegexTests::new();
        tests.load_slice("group", data).unwrap();
        let all: Vec<&RegexTest> = tests.iter().collect();
        assert_eq!(3, all.len());
        assert_eq!("group/1", all[0].full_name());
        assert_eq!("group/nul", all[1].full_name());
        assert_eq!("group/2", all[2].full_name());
        assert_eq!(b"\x00.", all[1].pattern().as_bytes());
        assert_eq!(b"\x00\xFF", all[1].input().as_bytes());
        assert!(!all[2].compiles());
        assert_eq!(b"", all[2].input().as_bytes());
    }

    #[test]
    fn invalid_tests() {
        let missing_match = b"[[tests]]\npattern = \"a\"\ninput = \"a\"\n";
        assert!(RegexTests::new().load_slice("g", missing_match).is_err());

        let conflicting =
            b"[[tests]]\npattern = \"*\"\ncompiles = false\nmatch = true\n";
        assert!(RegexTests::new().load_slice("g", conflicting).is_err());

        let dupe = b"[[tests]]\nname = \"x\"\npattern = \"a\"\nmatch = true\n\
                     [[tests]]\nname = \"x\"\npattern = \"b\"\nmatch = true\n";
        assert!(RegexTests::new().load_slice("g", dupe).is_err());
    }
}
