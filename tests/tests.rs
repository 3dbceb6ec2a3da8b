mod backtrack;
mod meta;
mod table;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn suite() -> Result<regex_test::RegexTests> {
    let mut tests = regex_test::RegexTests::new();
    macro_rules! load {
        ($name:expr) => {{
            const DATA: &[u8] =
                include_bytes!(concat!("data/", $name, ".toml"));
            tests.load_slice($name, DATA)?;
        }};
    }

    load!("basic");
    load!("bytes");
    load!("empty");
    load!("expensive");
    load!("invalid");
    load!("repetition");
    load!("wildcard");

    Ok(tests)
}
