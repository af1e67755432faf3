//! Verify URL resolution and status classification against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each URL case supplies an environment, a config object in the same JSON
//! shape host applications pass in, and an endpoint. Each status case
//! supplies a simulated response and the expected parse outcome.

use roomping_core::{ApiClient, ClientConfig, Error, HttpMethod, HttpResponse, RequestSpec};

fn client(environment: &str, config: ClientConfig) -> ApiClient {
    ApiClient::new(environment, config).unwrap()
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let environment = case["environment"].as_str().unwrap();
        let config: ClientConfig = serde_json::from_value(case["config"].clone()).unwrap();
        let endpoint = case["endpoint"].as_str().unwrap();
        let expected = case["expected_url"].as_str().unwrap();

        let c = client(environment, config);
        assert_eq!(c.build_api_url(endpoint), expected, "{name}: build_api_url");

        let req = c.build_request(RequestSpec::new(HttpMethod::Get, endpoint)).unwrap();
        assert_eq!(req.url, expected, "{name}: request url");
    }
}

// ---------------------------------------------------------------------------
// Status classification
// ---------------------------------------------------------------------------

#[test]
fn status_test_vectors() {
    let raw = include_str!("../../test-vectors/status.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client("production", ClientConfig::default().with_api_key("k"));
    let req = c.build_request(RequestSpec::new(HttpMethod::Get, "/users/42")).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_response(&req, response);

        if let Some(expected_error) = case.get("expected_error") {
            let Err(Error::Api(api)) = result else {
                panic!("{name}: expected api error");
            };
            assert_eq!(api.code as u64, expected_error["code"].as_u64().unwrap(), "{name}: code");
            assert_eq!(api.meta, expected_error["meta"], "{name}: meta");
            assert_eq!(api.url, "https://api.roomping.com/v1/users/42", "{name}: url");
        } else {
            let body = result.unwrap();
            assert_eq!(body, case["expected_result"], "{name}: parsed result");
        }
    }
}
