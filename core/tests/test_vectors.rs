//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use blog_core::{
    ApiError, HttpBody, HttpMethod, HttpRequest, HttpResponse, ListPostsQuery, Post, PostClient,
    PostCreate, PostPublishRequest, PostUpdate,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

fn client() -> PostClient {
    PostClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, case: &Value) {
    let expected = &case["expected_request"];
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(expected_body) => {
            let Some(HttpBody::Json(body)) = &req.body else {
                panic!("{name}: expected JSON body");
            };
            let body: Value = serde_json::from_str(body).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_result<T>(name: &str, result: Result<T, ApiError>, case: &Value)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        let status = expected_error["status"].as_u64().unwrap() as u16;
        let body = expected_error["body"].as_str().unwrap();
        match err {
            ApiError::Http { status: s, body: b } => {
                assert_eq!(s, status, "{name}: status");
                assert_eq!(b, body, "{name}: body");
            }
            other => panic!("{name}: unexpected error {other:?}"),
        }
    } else {
        let parsed = result.unwrap();
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(parsed, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let query = ListPostsQuery {
            limit: input["limit"].as_u64().map(|v| v as u32),
            offset: input["offset"].as_u64().map(|v| v as u32),
            tag: input["tag"].as_str().map(str::to_string),
            author_id: input["author_id"].as_i64(),
        };

        let req = c.build_list_published_posts(&query);
        check_request(name, &req, &case);

        let result = c.parse_list_published_posts(simulated_response(&case));
        check_result::<Vec<Post>>(name, result, &case);
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let slug = case["input_slug"].as_str().unwrap();

        let req = c.build_get_post_by_slug(slug);
        check_request(name, &req, &case);

        let result = c.parse_get_post_by_slug(simulated_response(&case));
        check_result::<Post>(name, result, &case);
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: PostCreate = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_post(&input).unwrap();
        check_request(name, &req, &case);

        let result = c.parse_create_post(simulated_response(&case));
        check_result::<Post>(name, result, &case);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let input: PostUpdate = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_post(id, &input).unwrap();
        check_request(name, &req, &case);

        let result = c.parse_update_post(simulated_response(&case));
        check_result::<Post>(name, result, &case);
    }
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

#[test]
fn publish_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/publish.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let input: PostPublishRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_publish_post(id, &input).unwrap();
        check_request(name, &req, &case);

        let result = c.parse_publish_post(simulated_response(&case));
        check_result::<Post>(name, result, &case);
    }
}
