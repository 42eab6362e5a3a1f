use super::service;
use crate::adapter::{Scripted, StubLlm};
use crate::domain::ApiErrorKind;
use crate::ports::inbound::Conversation;
use crate::usecase::conversation::{
    EMPTY_INPUT_MESSAGE, EXTRACTION_ERROR_MESSAGE, NO_RESPONSE_MESSAGE, RESET_CONFIRMATION,
};
use common::adapter::{MemoryLog, NoopLog};
use common::error::Error;
use common::llm::GenerateResponse;
use common::msg::{Role, Turn};
use common::ports::outbound::LogLevel;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_converse_appends_pair_and_returns_reply() {
    let stub = Arc::new(StubLlm::replies(&["Hello! How can I help?"]));
    let mut svc = service(stub.clone(), Arc::new(NoopLog), 20);

    let reply = svc.converse("Hi");
    assert_eq!(reply, "Hello! How can I help?");
    assert_eq!(
        svc.history().snapshot(),
        vec![Turn::user("Hi"), Turn::assistant("Hello! How can I help?")]
    );
    assert_eq!(stub.calls(), 1);
}

#[test]
fn test_request_carries_full_history_model_and_safety() {
    let stub = Arc::new(StubLlm::replies(&["a1", "a2"]));
    let mut svc = service(stub.clone(), Arc::new(NoopLog), 20);

    svc.converse("q1");
    svc.converse("q2");

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    let second = &requests[1];
    assert_eq!(
        second.contents,
        vec![Turn::user("q1"), Turn::assistant("a1"), Turn::user("q2")]
    );
    assert_eq!(&*second.model, "gemini-2.5-flash");
    assert_eq!(second.safety_settings.len(), 4);
}

#[test]
fn test_quota_error_rolls_back_user_turn() {
    let stub = Arc::new(StubLlm::new(vec![
        Scripted::Reply(GenerateResponse::from_text("first")),
        Scripted::Fail(Error::http("Gemini API error: Quota exceeded for this project")),
    ]));
    let mut svc = service(stub, Arc::new(NoopLog), 20);
    svc.converse("before");
    let len_before = svc.history().len();

    let reply = svc.converse("hi");

    assert_eq!(reply, ApiErrorKind::Quota.user_message(""));
    assert_eq!(svc.history().len(), len_before);
    assert!(!svc
        .history()
        .snapshot()
        .iter()
        .any(|t| t.role() == Role::User && t.text() == "hi"));
}

#[test]
fn test_each_error_category_message() {
    let cases = [
        ("Gemini API error: API key not valid", ApiErrorKind::Authentication),
        ("request timeout: operation timed out", ApiErrorKind::Connectivity),
        ("connection failed: dns error", ApiErrorKind::Connectivity),
        ("Gemini API error: rate limit", ApiErrorKind::Quota),
    ];
    for (raw, kind) in cases {
        let stub = Arc::new(StubLlm::new(vec![Scripted::Fail(Error::http(raw))]));
        let mut svc = service(stub, Arc::new(NoopLog), 20);
        assert_eq!(svc.converse("hi"), kind.user_message(raw), "{}", raw);
        assert!(svc.history().is_empty());
    }
}

#[test]
fn test_unclassified_error_includes_raw_text_and_logs_error() {
    let log = Arc::new(MemoryLog::new());
    let stub = Arc::new(StubLlm::new(vec![Scripted::Fail(Error::http(
        "Gemini API error: Internal error encountered.",
    ))]));
    let mut svc = service(stub, log.clone(), 20);

    let reply = svc.converse("hi");
    assert_eq!(
        reply,
        "An error occurred while communicating with the AI service: Gemini API error: Internal error encountered."
    );

    let records = log.records();
    let err = records
        .iter()
        .find(|r| r.level == LogLevel::Error)
        .expect("error record");
    assert!(err.message.starts_with("API Error - "));
    assert_eq!(err.kind.as_deref(), Some("api_error"));
    assert!(records.iter().any(|r| r.level == LogLevel::Debug));
}

#[test]
fn test_classified_error_logged_as_warning_with_category() {
    let log = Arc::new(MemoryLog::new());
    let stub = Arc::new(StubLlm::new(vec![Scripted::Fail(Error::http("quota exceeded"))]));
    let mut svc = service(stub, log.clone(), 20);
    svc.converse("hi");

    let records = log.records();
    let warn = records
        .iter()
        .find(|r| r.kind.as_deref() == Some("api_error"))
        .expect("api_error record");
    assert_eq!(warn.level, LogLevel::Warn);
    assert_eq!(warn.fields.as_ref().unwrap()["category"], "quota");
}

#[test]
fn test_empty_candidates_keeps_both_turns() {
    let log = Arc::new(MemoryLog::new());
    let stub = Arc::new(StubLlm::new(vec![Scripted::Reply(GenerateResponse::empty())]));
    let mut svc = service(stub, log.clone(), 20);

    let reply = svc.converse("hi");

    assert_eq!(reply, NO_RESPONSE_MESSAGE);
    assert_eq!(
        svc.history().snapshot(),
        vec![Turn::user("hi"), Turn::assistant(NO_RESPONSE_MESSAGE)]
    );
    assert!(log.records().iter().any(|r| r.level == LogLevel::Warn));
}

#[test]
fn test_blocked_prompt_without_candidates_is_no_response() {
    let stub = Arc::new(StubLlm::new(vec![Scripted::Reply(GenerateResponse::new(json!({
        "promptFeedback": { "blockReason": "SAFETY" }
    })))]));
    let mut svc = service(stub, Arc::new(NoopLog), 20);

    assert_eq!(svc.converse("something"), NO_RESPONSE_MESSAGE);
    assert_eq!(svc.history().len(), 2);
}

#[test]
fn test_extraction_anomaly_is_not_rolled_back() {
    let stub = Arc::new(StubLlm::new(vec![
        Scripted::Reply(GenerateResponse::new(json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "mimeType": "image/png" } }] } }]
        }))),
        Scripted::Reply(GenerateResponse::new(json!({ "candidates": "not-a-list" }))),
    ]));
    let mut svc = service(stub, Arc::new(NoopLog), 20);

    assert_eq!(svc.converse("draw"), EXTRACTION_ERROR_MESSAGE);
    assert_eq!(svc.converse("again"), EXTRACTION_ERROR_MESSAGE);
    assert_eq!(
        svc.history().snapshot(),
        vec![
            Turn::user("draw"),
            Turn::assistant(EXTRACTION_ERROR_MESSAGE),
            Turn::user("again"),
            Turn::assistant(EXTRACTION_ERROR_MESSAGE),
        ]
    );
}

#[test]
fn test_provider_panic_is_unclassified_and_rolled_back() {
    let stub = Arc::new(StubLlm::new(vec![Scripted::Panic("boom")]));
    let mut svc = service(stub, Arc::new(NoopLog), 20);

    let reply = svc.converse("hi");
    assert!(reply.starts_with("An error occurred while communicating with the AI service:"));
    assert!(reply.contains("boom"));
    assert!(svc.history().is_empty());
}

#[test]
fn test_blank_input_does_not_call_provider() {
    let stub = Arc::new(StubLlm::replies(&["unused"]));
    let mut svc = service(stub.clone(), Arc::new(NoopLog), 20);

    assert_eq!(svc.converse(""), EMPTY_INPUT_MESSAGE);
    assert_eq!(svc.converse("   "), EMPTY_INPUT_MESSAGE);
    assert_eq!(svc.converse("\n\t"), EMPTY_INPUT_MESSAGE);
    assert_eq!(svc.history().len(), 0);
    assert_eq!(stub.calls(), 0);
}

#[test]
fn test_reset_always_empties() {
    let log = Arc::new(MemoryLog::new());
    let stub = Arc::new(StubLlm::new(vec![]));
    let mut svc = service(stub, log.clone(), 20);
    for i in 0..5 {
        svc.converse(&format!("q{}", i));
    }
    assert_eq!(svc.history().len(), 10);

    assert_eq!(svc.reset(), RESET_CONFIRMATION);
    assert_eq!(svc.history().len(), 0);
    assert_eq!(svc.reset(), RESET_CONFIRMATION);
    assert_eq!(svc.history().len(), 0);
    assert!(log
        .records()
        .iter()
        .any(|r| r.message == "Chat history cleared"));
}

#[test]
fn test_fifo_eviction_through_service() {
    let max_pairs = 3;
    let log = Arc::new(MemoryLog::new());
    let replies: Vec<String> = (0..=max_pairs).map(|i| format!("a{}", i)).collect();
    let reply_refs: Vec<&str> = replies.iter().map(|s| s.as_str()).collect();
    let stub = Arc::new(StubLlm::replies(&reply_refs));
    let mut svc = service(stub.clone(), log.clone(), max_pairs);

    for i in 0..=max_pairs {
        svc.converse(&format!("q{}", i));
    }

    let snap = svc.history().snapshot();
    assert_eq!(snap.len(), 2 * max_pairs);
    assert_eq!(snap[0], Turn::user("q1"));
    assert_eq!(snap[1], Turn::assistant("a1"));
    assert_eq!(snap.last(), Some(&Turn::assistant(format!("a{}", max_pairs))));

    // 上限に達した後の送信には最古のペアが含まれない
    let last_request = stub.requests().pop().unwrap();
    assert_eq!(last_request.contents[0], Turn::user("q1"));
    let records = log.records();
    let trimmed = records
        .iter()
        .find(|r| r.message.starts_with("Trimmed chat history"))
        .expect("trim record");
    assert_eq!(trimmed.fields.as_ref().unwrap()["max_pairs"], max_pairs);
}

#[test]
fn test_failure_at_capacity_keeps_buffer_within_bounds() {
    let stub = Arc::new(StubLlm::new(vec![
        Scripted::Reply(GenerateResponse::from_text("a0")),
        Scripted::Fail(Error::http("connection failed: refused")),
    ]));
    let mut svc = service(stub, Arc::new(NoopLog), 1);

    svc.converse("q0");
    svc.converse("q1");

    // 追加前の切り詰めで q0/a0 は消え、失敗した q1 は取り消される
    assert!(svc.history().is_empty());
    assert!(svc.history().len() <= 2);
}

#[test]
fn test_failure_at_capacity_does_not_restore_evicted_pair() {
    let stub = Arc::new(StubLlm::new(vec![
        Scripted::Reply(GenerateResponse::from_text("a0")),
        Scripted::Reply(GenerateResponse::from_text("a1")),
        Scripted::Fail(Error::http("request timeout: deadline has elapsed")),
    ]));
    let mut svc = service(stub, Arc::new(NoopLog), 2);

    svc.converse("q0");
    svc.converse("q1");
    assert_eq!(svc.history().len(), 4);

    svc.converse("q2");
    assert_eq!(
        svc.history().snapshot(),
        vec![Turn::user("q1"), Turn::assistant("a1")]
    );
}

#[test]
fn test_refused_connection_through_gemini_is_connectivity() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let provider = common::llm::GeminiProvider::with_base_url(
        common::domain::ApiKey::parse("test-key").unwrap(),
        format!("http://{}/v1beta", addr),
    )
    .unwrap();
    let mut svc = service(Arc::new(provider), Arc::new(NoopLog), 20);

    let reply = svc.converse("Hello?");
    assert_eq!(reply, ApiErrorKind::Connectivity.user_message(""));
    assert!(svc.history().is_empty());
}
