use std::cell::RefCell;

use regex_dotstar::backtrack::{self, Backtracker};

use regex_test::{
    bstr::{BStr, ByteSlice},
    CompiledRegex, RegexTest, TestResult, TestRunner,
};

use crate::{suite, Result};

/// Tests the default configuration of the backtracker over bytes.
#[test]
fn default() -> Result<()> {
    let builder = backtrack::Builder::new();
    let mut runner = TestRunner::new()?;
    runner.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Tests the backtracker over `char`s instead of bytes. A wildcard then
/// matches a whole codepoint, so the byte oriented tests are skipped.
#[test]
fn chars() -> Result<()> {
    let mut runner = TestRunner::new()?;
    runner.blacklist("bytes/");
    runner
        .test_iter(suite()?.iter(), |_, pattern| {
            let pattern = match pattern.to_str() {
                Ok(pattern) => pattern,
                Err(_) => return Ok(CompiledRegex::skip()),
            };
            let re = backtrack::Builder::new().build_str(pattern)?;
            Ok(CompiledRegex::compiled(move |test| -> Vec<TestResult> {
                let input = match test.input().to_str() {
                    Ok(input) => input.chars().collect::<Vec<char>>(),
                    Err(_) => return vec![TestResult::skip()],
                };
                vec![TestResult::is_match(re.is_match(&input))]
            }))
        })
        .assert();
    Ok(())
}

fn compiler(
    builder: backtrack::Builder,
) -> impl FnMut(&RegexTest, &BStr) -> Result<CompiledRegex> {
    move |_, pattern| {
        let re = builder.build_bytes(pattern)?;
        let cache = RefCell::new(re.create_cache());
        Ok(CompiledRegex::compiled(move |test| -> Vec<TestResult> {
            run_test(&re, &mut cache.borrow_mut(), test)
        }))
    }
}

fn run_test(
    re: &Backtracker<u8>,
    cache: &mut backtrack::Cache,
    test: &RegexTest,
) -> Vec<TestResult> {
    let got = match re.try_is_match(cache, test.input()) {
        Ok(got) => got,
        Err(err) => panic!("unexpected search error: {}", err),
    };
    vec![TestResult::is_match(got)]
}
