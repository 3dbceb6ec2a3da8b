// Benchmarks live in src/bench.rs.
