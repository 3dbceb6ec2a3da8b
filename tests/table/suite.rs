use regex_dotstar::table::{self, TableMatcher};

use regex_test::{bstr::BStr, CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{suite, Result};

/// Tests the default configuration of the table matcher.
#[test]
fn default() -> Result<()> {
    let builder = table::Builder::new();
    let mut runner = TestRunner::new()?;
    runner.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Tests the table matcher with a limit small enough that some searches
/// fail. Those are skipped rather than counted as failures, but every
/// search that fits the limit must still be correct.
#[test]
fn table_size_limit() -> Result<()> {
    let mut builder = table::Builder::new();
    builder.configure(table::Config::new().table_size_limit(Some(64)));
    let mut runner = TestRunner::new()?;
    runner.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

fn compiler(
    builder: table::Builder,
) -> impl FnMut(&RegexTest, &BStr) -> Result<CompiledRegex> {
    move |_, pattern| {
        let re = builder.build_bytes(pattern)?;
        Ok(CompiledRegex::compiled(move |test| run_test(&re, test)))
    }
}

fn run_test(re: &TableMatcher<u8>, test: &RegexTest) -> Vec<TestResult> {
    let mut cache = re.create_cache();
    match re.try_is_match(&mut cache, test.input()) {
        Ok(got) => vec![TestResult::is_match(got)],
        Err(_) => vec![TestResult::skip()],
    }
}
