pub fn query_response_fixture() -> &'static str {
    return r#"
{
  "answer": "Autism is a neurodevelopmental condition.",
  "sources": [
    {
      "content": "Autism spectrum disorder is a developmental disability caused by differences in the brain.",
      "score": 0.12,
      "metadata": { "source": "a.pdf", "page": 2 }
    }
  ]
}
"#
    .trim();
}

pub fn baseline_response_fixture() -> &'static str {
    return r#"
{
  "technique": "baseline",
  "model_name": "mistral",
  "metrics": {
    "response_time": 2.5,
    "memory_usage_mb": 1200.0,
    "cpu_usage_percent": 80.0,
    "tokens_per_second": 20.0,
    "model_size_mb": 4100.0,
    "latency_p50": 2400.0,
    "latency_p95": 3100.0,
    "latency_p99": 3500.0
  }
}
"#
    .trim();
}

pub fn quantization_response_fixture() -> &'static str {
    return r#"
{
  "technique": "quantization",
  "quantization_level": "q4_0",
  "model_name": "mistral-q4_0",
  "metrics": {
    "response_time": 1.5,
    "memory_usage_mb": 600.0,
    "cpu_usage_percent": 56.0,
    "tokens_per_second": 30.0,
    "model_size_mb": 1640.0,
    "latency_p50": 1440.0,
    "latency_p95": 2015.0,
    "latency_p99": 2450.0
  },
  "baseline_metrics": {
    "response_time": 2.5,
    "memory_usage_mb": 1200.0,
    "cpu_usage_percent": 80.0,
    "tokens_per_second": 20.0,
    "model_size_mb": 4100.0,
    "latency_p50": 2400.0,
    "latency_p95": 3100.0,
    "latency_p99": 3500.0
  },
  "improvements": {
    "response_time": 40.0,
    "memory": 50.0,
    "cpu": 30.0,
    "throughput": 50.0,
    "model_size": 60.0
  }
}
"#
    .trim();
}

pub fn history_response_fixture() -> &'static str {
    return r#"
{
  "baseline": {
    "response_time": 2.5,
    "memory_usage_mb": 1200.0,
    "cpu_usage_percent": 80.0,
    "tokens_per_second": 20.0,
    "model_size_mb": null
  },
  "history": [
    {
      "technique": "baseline",
      "model_name": "mistral",
      "metrics": {
        "response_time": 2.5,
        "memory_usage_mb": 1200.0,
        "cpu_usage_percent": 80.0,
        "tokens_per_second": 20.0,
        "model_size_mb": null,
        "latency_p50": null,
        "latency_p95": null,
        "latency_p99": null
      },
      "before_metrics": null,
      "improvement_percent": null
    }
  ]
}
"#
    .trim();
}
