//! End-to-end behaviour of the public message API
//!
//! Messages built through the validating constructors are encoded, fed back
//! through `classify`, and compared with the original.

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;

use turul_json_rpc_message::prelude::*;
use turul_json_rpc_message::{InvalidMessage, ParamsShape, classify_value};

#[derive(Serialize)]
struct Subtract {
    minuend: i64,
    subtrahend: i64,
}

fn round_trip(message: JsonRpcMessage) -> JsonRpcMessage {
    let wire = encode(&message).unwrap();
    classify(&wire).unwrap()
}

#[test]
fn test_notification_round_trip() {
    let mut params = HashMap::new();
    params.insert("key1", json!("value1"));
    params.insert("key2", json!(2));
    params.insert("key3", json!(false));

    let notification = JsonRpcNotification::with_params("test", &params).unwrap();
    let parsed = round_trip(notification.clone().into());

    let parsed = parsed.as_notification().expect("should classify as notification");
    assert_eq!(parsed, &notification);
    assert_eq!(parsed.get_param("key3"), Some(&json!(false)));
}

#[test]
fn test_notification_without_params_round_trip() {
    let notification = JsonRpcNotification::new("heartbeat");
    let parsed = round_trip(notification.clone().into());
    assert_eq!(parsed, JsonRpcMessage::Notification(notification));
}

#[test]
fn test_request_round_trip_with_struct_params() {
    let request = JsonRpcRequest::with_params(
        "subtract",
        &Subtract { minuend: 42, subtrahend: 23 },
        12u64,
    )
    .unwrap();

    let parsed = round_trip(request.clone().into());
    let parsed = parsed.as_request().expect("should classify as request");

    assert_eq!(parsed.method(), "subtract");
    assert_eq!(parsed.id(), RequestId::new(12));
    assert_eq!(parsed.get_param("minuend"), Some(&json!(42)));
    assert_eq!(parsed, &request);
}

#[test]
fn test_request_round_trip_with_array_params() {
    let request = JsonRpcRequest::with_params("sum", &[1, 2, 4], 0u64).unwrap();
    let wire = encode(&request.clone().into()).unwrap();
    assert_eq!(wire, r#"{"jsonrpc":"2.0","method":"sum","params":[1,2,4],"id":0}"#);
    assert_eq!(classify(&wire).unwrap(), JsonRpcMessage::Request(request));
}

#[test]
fn test_result_response_round_trip() {
    let response = JsonRpcResponse::with_result(json!({"total": 7, "items": ["a", "b"]}), 99u64);
    let parsed = round_trip(response.clone().into());
    let parsed = parsed.as_response().unwrap();

    assert!(parsed.is_result());
    assert!(!parsed.is_error());
    assert_eq!(parsed.result(), response.result());
}

#[test]
fn test_null_result_response_round_trip() {
    let response = JsonRpcResponse::with_result(Value::Null, 1u64);
    let parsed = round_trip(response.into());
    let parsed = parsed.as_response().unwrap();

    assert!(parsed.is_result(), "null result must not be reclassified");
    assert_eq!(parsed.result(), Some(&Value::Null));
}

#[test]
fn test_error_response_round_trip() {
    let error = JsonRpcErrorObject::new(-32001, "quota exceeded", Some(json!({"retry_in": 30})));
    let response = JsonRpcResponse::with_error(error.clone(), 5u64).unwrap();

    let wire = encode(&response.clone().into()).unwrap();
    assert_eq!(
        wire,
        r#"{"jsonrpc":"2.0","error":{"code":-32001,"message":"quota exceeded","data":{"retry_in":30}},"id":5}"#
    );

    let parsed = classify(&wire).unwrap();
    let parsed = parsed.as_response().unwrap();
    assert!(parsed.is_error());
    assert_eq!(parsed.error(), Some(&error));
}

#[test]
fn test_both_result_and_error_rejected() {
    let err = classify(
        r#"{"jsonrpc":"2.0","error":{"code":1,"message":"m"},"result":"x","id":1}"#,
    )
    .unwrap_err();
    assert!(matches!(err.parse_error(), Some(ParseError::InvalidMessage(_))));
}

#[test]
fn test_neither_result_nor_error_rejected() {
    let err = classify(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
    assert!(matches!(err.parse_error(), Some(ParseError::InvalidMessage(_))));
}

#[test]
fn test_wrong_version_rejected() {
    let err = classify(r#"{"jsonrpc":"1.0","method":"m"}"#).unwrap_err();
    assert!(matches!(
        err.parse_error(),
        Some(ParseError::InvalidVersion { found }) if found == "1.0"
    ));
}

#[test]
fn test_scalar_params_rejected_on_decode() {
    let err = classify(r#"{"jsonrpc":"2.0","method":"m","params":"not-array-or-object"}"#)
        .unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::InvalidMessage(InvalidMessage::InvalidParams(ParamsShape::Scalar)))
    );
}

#[test]
fn test_integer_keyed_params_rejected_on_construction() {
    let mut params = HashMap::new();
    params.insert(1, json!("test"));
    params.insert(2, json!(true));

    assert_eq!(
        JsonRpcNotification::with_params("m", &params),
        Err(ConstructionError::InvalidNotificationParams { found: ParamsShape::NonStringKeys })
    );
    assert_eq!(
        JsonRpcRequest::with_params("m", &params, 1u64),
        Err(ConstructionError::InvalidRequestParams { found: ParamsShape::NonStringKeys })
    );
}

#[test]
fn test_nil_response_error() {
    assert_eq!(
        JsonRpcResponse::with_error(None::<JsonRpcErrorObject>, 1u64),
        Err(ConstructionError::NilResponseError)
    );
}

#[test]
fn test_batch_array_is_a_decode_error() {
    let err = classify(r#"[{"jsonrpc":"2.0","method":"m"}]"#).unwrap_err();
    assert!(err.is_json());
    assert!(err.parse_error().is_none());
}

#[test]
fn test_rejection_closes_the_loop_as_error_response() {
    let err = classify(r#"{"jsonrpc":"2.0","method":"m","id":1,"bogus":1}"#).unwrap_err();
    let reply = JsonRpcResponse::for_rejected(1u64, &err);

    let parsed = classify(&encode(&reply.into()).unwrap()).unwrap();
    let error = parsed.as_response().and_then(|r| r.error()).unwrap();
    assert_eq!(error.code(), INVALID_REQUEST);
    assert_eq!(error.reserved_code(), Some(JsonRpcErrorCode::InvalidRequest));

    let err = classify("{not json").unwrap_err();
    let reply = JsonRpcResponse::for_rejected(1u64, &err);
    assert_eq!(reply.error().map(|e| e.code()), Some(PARSE_ERROR));
}

#[test]
fn test_classify_value_matches_classify() {
    let document = json!({"jsonrpc": "2.0", "result": [true], "id": 3});
    assert_eq!(
        classify_value(document.clone()).unwrap(),
        classify(&document.to_string()).unwrap()
    );
}

#[test]
fn test_lenient_classifier_drops_extra_error_members() {
    let document = r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"x","trace":"..."},"id":2}"#;
    assert!(classify(document).is_err());

    let lenient =
        Classifier::new(ClassifierConfig::new().with_error_object_policy(ErrorObjectPolicy::Lenient));
    let message = lenient.classify(document).unwrap();
    assert_eq!(
        encode(&message).unwrap(),
        r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"x"},"id":2}"#
    );
}
