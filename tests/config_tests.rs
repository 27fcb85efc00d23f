//! Integration tests for configuration loading and merging

use hypermedia::prelude::*;
use serde_json::json;
use std::io::Write;

const ORDERS_YAML: &str = r#"
max_body_size: 65536
endpoints:
  - name: list_orders
    links:
      - rel: self
        href: /orders
      - rel: detail
        href: /orders/{OrderNo}
        path: [Results, "[]"]
  - name: get_order
    links:
      - rel: self
        href: /orders/{OrderNo}
"#;

const CUSTOMERS_YAML: &str = r#"
pretty: true
endpoints:
  - name: list_orders
    links:
      - rel: customer
        href: /customers/{Customer.Id}
        path: [Results, "[]"]
        status: 200
  - name: list_customers
    links:
      - rel: detail
        href: /customers/{Id}
        path: ["[]"]
"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ORDERS_YAML.as_bytes()).unwrap();

    let config = HypermediaConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.endpoints.len(), 2);
    assert_eq!(config.max_body_size, 65536);
    assert_eq!(config.endpoint("get_order").unwrap().links[0].rel, "self");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = HypermediaConfig::from_yaml_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_merge_empty_configs() {
    let merged = HypermediaConfig::merge(vec![]);

    assert!(merged.endpoints.is_empty());
    assert_eq!(merged, HypermediaConfig::default());
}

#[test]
fn test_merge_appends_links_for_same_endpoint() {
    let orders = HypermediaConfig::from_yaml_str(ORDERS_YAML).unwrap();
    let customers = HypermediaConfig::from_yaml_str(CUSTOMERS_YAML).unwrap();

    let merged = HypermediaConfig::merge(vec![orders, customers]);

    let names: Vec<&str> = merged.endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["list_orders", "get_order", "list_customers"]);

    let rels: Vec<&str> = merged
        .endpoint("list_orders")
        .unwrap()
        .links
        .iter()
        .map(|l| l.rel.as_str())
        .collect();
    assert_eq!(rels, vec!["self", "detail", "customer"]);

    assert!(merged.pretty);
    assert_eq!(merged.max_body_size, hypermedia::config::DEFAULT_MAX_BODY_SIZE);
}

#[test]
fn test_configured_injector_applies_links() {
    let config = HypermediaConfig::merge(vec![
        HypermediaConfig::from_yaml_str(ORDERS_YAML).unwrap(),
        HypermediaConfig::from_yaml_str(CUSTOMERS_YAML).unwrap(),
    ]);
    let injector = config.injector_for("list_orders").unwrap();
    let mut doc = json!({
        "Results": [
            {"OrderNo": 1, "Customer": {"Id": "c1"}},
            {"OrderNo": 2}
        ]
    });

    let report = injector.inject(&mut doc, 200);

    assert_eq!(report.specs_applied, 3);
    assert_eq!(doc["links"], json!([{"rel": "self", "href": "/orders"}]));
    assert_eq!(
        doc["Results"][0]["links"],
        json!([
            {"rel": "detail", "href": "/orders/1"},
            {"rel": "customer", "href": "/customers/c1"}
        ])
    );
    assert_eq!(
        doc["Results"][1]["links"],
        json!([{"rel": "detail", "href": "/orders/2"}])
    );
}

#[test]
fn test_status_gate_parsed_from_yaml() {
    let config = HypermediaConfig::from_yaml_str(CUSTOMERS_YAML).unwrap();
    let links = &config.endpoint("list_orders").unwrap().links;

    assert_eq!(links[0].status, StatusGate::Exact(200));
    assert_eq!(
        config.endpoint("list_customers").unwrap().links[0].status,
        StatusGate::Success
    );
}

#[test]
fn test_invalid_specs_fail_fast() {
    let cases = [
        "endpoints: [{name: x, links: [{rel: '', href: /a}]}]",
        "endpoints: [{name: x, links: [{rel: self, href: '/{a..b}'}]}]",
        "endpoints: [{name: x, links: [{rel: self, href: /a, path: [Results, '']}]}]",
        "endpoints: [{name: x, links: [{rel: self, href: /a, status: 99}]}]",
        "endpoints: [{name: x, links: [{rel: self}]}]",
        "endpoints: [{name: x, links: [{rel: self, href: /a, path: null}]}]",
    ];

    for yaml in cases {
        let result = HypermediaConfig::from_yaml_str(yaml);
        assert!(
            matches!(result, Err(ConfigError::Parse(_))),
            "expected parse error for: {}",
            yaml
        );
    }
}
