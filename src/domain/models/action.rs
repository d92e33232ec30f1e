use super::BenchmarkRequest;

pub enum Action {
    BackendQuery(String),
    BackendBenchmark(BenchmarkRequest),
}
