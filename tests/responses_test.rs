//! Integration tests for the API response envelopes
//!
//! The field names asserted here are wire contract with the web client and
//! must not drift: `success` discriminates the envelope, pagination keys are
//! camelCase.

use cuaderno::api::responses::{ApiResponse, PaginatedResponse, Pagination};
use cuaderno::errors::{ErrorBody, ErrorEnvelope};
use serde_json::json;

#[test]
fn test_success_envelope_shape() {
    let value = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["id"], 1);
    assert!(
        value.get("error").is_none(),
        "success envelope must not carry an error block"
    );
    assert!(value.get("message").is_none());
}

#[test]
fn test_error_envelope_shape() {
    let envelope = ErrorEnvelope {
        success: false,
        error: ErrorBody {
            code: "X",
            message: "m".to_string(),
            details: None,
        },
    };
    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["code"], "X");
    assert_eq!(value["error"]["message"], "m");
    assert!(
        value.get("data").is_none(),
        "error envelope must not carry a data block"
    );
    assert!(value["error"].get("details").is_none());
}

#[test]
fn test_exactly_one_of_data_or_error_is_present() {
    let success = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).unwrap();
    let failure = serde_json::to_value(ErrorEnvelope {
        success: false,
        error: ErrorBody {
            code: "NOT_FOUND",
            message: "Not found: Prompt 7".to_string(),
            details: None,
        },
    })
    .unwrap();

    for (value, data_expected) in [(success, true), (failure, false)] {
        let has_data = value.get("data").is_some();
        let has_error = value.get("error").is_some();
        assert_eq!(value["success"], data_expected);
        assert_eq!(has_data, data_expected);
        assert_eq!(has_error, !data_expected);
    }
}

#[test]
fn test_pagination_block_keys_and_invariant() {
    let cases = vec![
        // (page, limit, total, expected_total_pages)
        (1, 20, 0, 0),
        (1, 20, 1, 1),
        (1, 20, 20, 1),
        (2, 20, 21, 2),
        (3, 7, 50, 8),
    ];

    for (page, limit, total, expected) in cases {
        let block = serde_json::to_value(Pagination::new(page, limit, total)).unwrap();
        assert_eq!(block["page"], page);
        assert_eq!(block["limit"], limit);
        assert_eq!(block["total"], total);
        assert_eq!(
            block["totalPages"], expected,
            "totalPages must be ceil({}/{})",
            total, limit
        );
    }
}

#[test]
fn test_paginated_envelope_wraps_data_and_pagination() {
    let value =
        serde_json::to_value(PaginatedResponse::new(vec!["a", "b"], 1, 2, 5)).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["data"], json!(["a", "b"]));
    assert_eq!(value["pagination"]["totalPages"], 3);
}
