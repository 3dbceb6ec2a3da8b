use std::cell::RefCell;

use regex_dotstar::meta::{self, Engine, Regex};

use regex_test::{bstr::BStr, CompiledRegex, RegexTest, TestResult, TestRunner};

use crate::{suite, Result};

/// Tests the default configuration of the meta regex.
#[test]
fn default() -> Result<()> {
    let builder = Regex::builder();
    let mut runner = TestRunner::new()?;
    runner.test_iter(suite()?.iter(), compiler(builder)).assert();
    Ok(())
}

/// Tests every engine with and without the prefilter, reporting one named
/// result per combination.
#[test]
fn engines() -> Result<()> {
    let mut runner = TestRunner::new()?;
    runner
        .test_iter(suite()?.iter(), |_, pattern| {
            let mut regexes = vec![];
            for &engine in &[Engine::Auto, Engine::Backtrack, Engine::Table] {
                for &prefilter in &[true, false] {
                    let config = Regex::config()
                        .engine(engine)
                        .prefilter(prefilter)
                        .table_size_limit(None);
                    let re = Regex::builder()
                        .configure(config)
                        .build_bytes(pattern)?;
                    let name = format!("{:?}/prefilter={}", engine, prefilter);
                    regexes.push((name, re));
                }
            }
            Ok(CompiledRegex::compiled(move |test| -> Vec<TestResult> {
                let mut cache = meta::Cache::new();
                regexes
                    .iter()
                    .map(|&(ref name, ref re)| {
                        let got =
                            re.try_is_match(&mut cache, test.input()).unwrap();
                        TestResult::is_match(got).name(name)
                    })
                    .collect()
            }))
        })
        .assert();
    Ok(())
}

fn compiler(
    builder: meta::Builder,
) -> impl FnMut(&RegexTest, &BStr) -> Result<CompiledRegex> {
    move |_, pattern| {
        let re = builder.build_bytes(pattern)?;
        let cache = RefCell::new(re.create_cache());
        Ok(CompiledRegex::compiled(move |test| -> Vec<TestResult> {
            let mut cache = cache.borrow_mut();
            let got = re.try_is_match(&mut cache, test.input()).unwrap();
            vec![TestResult::is_match(got)]
        }))
    }
}
