use std::{sync::Arc, thread};

use regex_dotstar::{
    backtrack::Backtracker,
    meta::{Engine, Regex},
    table::TableMatcher,
    util::{pattern::Pattern, syntax},
    MatchError,
};

// A regex is built once and then shared by several threads, each with its
// own cache.
#[test]
fn shared_between_threads() {
    let re = Arc::new(Regex::new("a*b*.c").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = Arc::clone(&re);
            thread::spawn(move || {
                let mut cache = re.create_cache();
                for n in 0..200 {
                    let prefix = format!("{}{}", "a".repeat(n), "b".repeat(i));
                    let yes = format!("{}xc", prefix);
                    let no = format!("{}xd", prefix);
                    let got = re.try_is_match(&mut cache, yes.as_bytes());
                    assert_eq!(Ok(true), got);
                    let got = re.try_is_match(&mut cache, no.as_bytes());
                    assert_eq!(Ok(false), got);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

// The same question always gets the same answer, whatever the cache saw
// before.
#[test]
fn deterministic() {
    let re = Regex::builder()
        .configure(Regex::config().engine(Engine::Backtrack))
        .build("mis*is*ip*.")
        .unwrap();
    let mut cache = re.create_cache();
    let haystacks: &[&[u8]] = &[b"mississippi", b"mississippiz", b"", b"mi"];
    let first: Vec<bool> = haystacks
        .iter()
        .map(|h| re.try_is_match(&mut cache, h).unwrap())
        .collect();
    assert_eq!(vec![true, false, false, false], first);
    for _ in 0..3 {
        for (h, &expected) in haystacks.iter().rev().zip(first.iter().rev()) {
            assert_eq!(Ok(expected), re.try_is_match(&mut cache, h));
        }
    }
}

#[test]
fn one_cache_many_regexes() {
    let mut cache = regex_dotstar::meta::Cache::new();
    let table = Regex::builder()
        .configure(Regex::config().engine(Engine::Table))
        .build("x.*")
        .unwrap();
    let backtrack = Regex::new("x.*").unwrap();
    for re in &[table, backtrack] {
        assert_eq!(Ok(true), re.try_is_match(&mut cache, b"xyz"));
        assert_eq!(Ok(false), re.try_is_match(&mut cache, b"yz"));
    }
}

#[test]
fn table_too_big_is_reported() {
    let re = Regex::builder()
        .configure(Regex::config().table_size_limit(Some(100)))
        .build(".*")
        .unwrap();
    let mut cache = re.create_cache();
    assert_eq!(Ok(true), re.try_is_match(&mut cache, &[b'z'; 32][..]));
    let err = re.try_is_match(&mut cache, &[b'z'; 33][..]).unwrap_err();
    assert_eq!(MatchError::TableTooBig { cells: 102, limit: 100 }, err);
    assert!(err.to_string().contains("102"));
}

// The default configuration has no table size limit, so even haystacks
// needing far more than 16 Mi cells match.
#[test]
fn long_haystacks_with_default_config() {
    let haystack = vec![b'a'; 6_000_000];
    for pattern in &[".*", "a*"] {
        let re = Regex::new(pattern).unwrap();
        assert_eq!(None, re.get_config().get_table_size_limit());
        assert!(re.is_match(&haystack), "pattern {:?}", pattern);
    }
    let re = Regex::new("a*b").unwrap();
    assert!(!re.is_match(&haystack));
}

#[test]
#[should_panic]
fn is_match_panics_past_limit() {
    let re = Regex::builder()
        .configure(Regex::config().table_size_limit(Some(1)))
        .build("a*")
        .unwrap();
    re.is_match("a");
}

#[test]
fn generic_engines_from_the_same_pattern() {
    let pattern: Pattern<char> = syntax::parse("ü*.ß").unwrap();
    let haystack: Vec<char> = "üüüxß".chars().collect();
    assert!(Backtracker::new(pattern.clone()).is_match(&haystack));
    assert!(TableMatcher::new(pattern).is_match(&haystack));
}

#[test]
fn convenience_function() {
    assert_eq!(Ok(true), regex_dotstar::is_match("aa", "a*"));
    assert_eq!(Ok(false), regex_dotstar::is_match("aa", "a"));
    let err = regex_dotstar::is_match("", "**").unwrap_err();
    assert_eq!(Some(0), err.offset());
}
