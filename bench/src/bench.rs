use criterion::{
    criterion_group, criterion_main, Bencher, Criterion, Throughput,
};
use regex_dotstar::{
    backtrack::Backtracker,
    meta::{Engine, Regex},
    table::TableMatcher,
    util::syntax,
};

/// 'a*' repeated followed by a 'b' that never appears. A naive backtracker
/// takes exponential time on this.
fn stars(count: usize) -> String {
    let mut pattern = "a*".repeat(count);
    pattern.push('b');
    pattern
}

fn is_match(c: &mut Criterion) {
    let haystack = vec![b'a'; 1_000];
    for &count in &[4, 16] {
        let pattern = stars(count);
        let group = format!("is-match/stars-{}", count);

        let pat = syntax::parse_bytes(pattern.as_bytes()).unwrap();
        let re = Backtracker::new(pat.clone());
        let mut cache = re.create_cache();
        let h = haystack.clone();
        define(c, &group, "backtrack", &haystack, move |b| {
            b.iter(|| {
                assert_eq!(Ok(false), re.try_is_match(&mut cache, &h));
            });
        });

        let re = TableMatcher::new(pat);
        let mut cache = re.create_cache();
        let h = haystack.clone();
        define(c, &group, "table", &haystack, move |b| {
            b.iter(|| {
                assert_eq!(Ok(false), re.try_is_match(&mut cache, &h));
            });
        });

        // The prefilter rejects this haystack without running an engine.
        let re = Regex::new(&pattern).unwrap();
        let mut cache = re.create_cache();
        let h = haystack.clone();
        define(c, &group, "meta", &haystack, move |b| {
            b.iter(|| {
                assert_eq!(Ok(false), re.try_is_match(&mut cache, &h));
            });
        });
    }
}

fn dot_star(c: &mut Criterion) {
    let mut haystack = b"x".repeat(10_000);
    haystack.push(b'y');
    for &engine in &[Engine::Backtrack, Engine::Table] {
        let re = Regex::builder()
            .configure(Regex::config().engine(engine).table_size_limit(None))
            .build("x.*y")
            .unwrap();
        let mut cache = re.create_cache();
        let h = haystack.clone();
        let name = format!("{:?}", engine).to_lowercase();
        define(c, "is-match/dot-star", &name, &haystack, move |b| {
            b.iter(|| {
                assert_eq!(Ok(true), re.try_is_match(&mut cache, &h));
            });
        });
    }
}

fn short(c: &mut Criterion) {
    let cases: &[(&str, &str, bool)] = &[
        ("mississippi", "mis*is*ip*.", true),
        ("mississippi", "mis*is*p*.", false),
        ("aab", "c*a*b", true),
        ("ab", ".*c", false),
    ];
    for &(haystack, pattern, expected) in cases {
        let re = Regex::new(pattern).unwrap();
        let mut cache = re.create_cache();
        let name = format!("{}/{}", pattern, haystack);
        define(c, "is-match/short", &name, haystack.as_bytes(), move |b| {
            b.iter(|| {
                let got = re.try_is_match(&mut cache, haystack.as_bytes());
                assert_eq!(Ok(expected), got);
            });
        });
    }
}

fn compile(c: &mut Criterion) {
    let pattern = stars(64);
    let p = pattern.clone();
    define(c, "compile", "stars-64", pattern.as_bytes(), move |b| {
        b.iter(|| {
            assert!(Regex::new(&p).is_ok());
        });
    });
}

fn define(
    c: &mut Criterion,
    group_name: &str,
    bench_name: &str,
    corpus: &[u8],
    bench: impl FnMut(&mut Bencher),
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Bytes(corpus.len() as u64));
    group.bench_function(bench_name, bench);
    group.finish();
}

criterion_group!(g1, is_match, dot_star, short);
criterion_group!(g2, compile);
criterion_main!(g1, g2);
