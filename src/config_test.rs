use super::*;
use std::collections::HashMap;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    AppConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_when_environment_is_empty() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert!(cfg.vllm.is_none());
    assert_eq!(cfg.rag_search_url, DEFAULT_RAG_SEARCH_URL);
    assert_eq!(cfg.ran_services_url, DEFAULT_RAN_SERVICES_URL);
    assert!(cfg.ran_agent_live);
    assert_eq!(cfg.ipex_service_url, DEFAULT_IPEX_SERVICE_URL);
    assert_eq!(cfg.rag_service_url, DEFAULT_RAG_SERVICE_URL);
    assert!(cfg.gateway_vllm_insecure_tls);
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
}

#[test]
fn vllm_url_enables_vllm_with_default_model() {
    let cfg = config_from(&[("VLLM_API_URL", "https://vllm.example/v1/completions")]).unwrap();
    assert_eq!(
        cfg.vllm,
        Some(VllmConfig { url: "https://vllm.example/v1/completions".into(), model: DEFAULT_VLLM_MODEL.into() })
    );
}

#[test]
fn blank_vllm_url_counts_as_unset() {
    let cfg = config_from(&[("VLLM_API_URL", "   ")]).unwrap();
    assert!(cfg.vllm.is_none());
}

#[test]
fn overrides_are_parsed_and_trimmed() {
    let cfg = config_from(&[
        ("PORT", "8088"),
        ("VLLM_API_URL", "http://vllm:8000/v1/completions"),
        ("VLLM_MODEL", "granite"),
        ("RAN_SERVICES_URL", "http://ran:5000/"),
        ("RAN_AGENT_LIVE", "false"),
        ("IPEX_SERVICE_URL", "ipex:50051"),
        ("GATEWAY_VLLM_INSECURE_TLS", "0"),
        ("HTTP_REQUEST_TIMEOUT_SECS", "30"),
        ("HTTP_CONNECT_TIMEOUT_SECS", "2"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8088);
    assert_eq!(cfg.vllm.as_ref().map(|v| v.model.as_str()), Some("granite"));
    assert_eq!(cfg.ran_services_url, "http://ran:5000");
    assert!(!cfg.ran_agent_live);
    assert_eq!(cfg.ipex_service_url, "http://ipex:50051");
    assert!(!cfg.gateway_vllm_insecure_tls);
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 30, connect_secs: 2 });
}

#[test]
fn invalid_port_is_rejected() {
    let err = config_from(&[("PORT", "eighty")]).unwrap_err();
    assert_eq!(err, ConfigError::InvalidValue { var: "PORT", value: "eighty".into() });
}

#[test]
fn invalid_bool_is_rejected() {
    let err = config_from(&[("RAN_AGENT_LIVE", "maybe")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { var: "RAN_AGENT_LIVE", .. }));
}
