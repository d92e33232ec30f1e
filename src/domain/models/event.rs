use tui_textarea::Input;

use super::BenchmarkResult;
use super::HealthStatus;
use super::QueryResponse;
use super::Technique;

pub enum Event {
    BackendQueryResponse(QueryResponse),
    BackendQueryError(String),
    BenchmarkCompleted(Technique, BenchmarkResult),
    BenchmarkFailed(Technique, String),
    HealthChecked(HealthStatus),
    KeyboardCharInput(Input),
    KeyboardCTRLB(),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    KeyboardTab(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
