use gallery::application::submit_comment::dto::AddCommentRequest;
use gallery::domain::social::{
    CommentId, EntityId, GatewayError, LikeSnapshot, Rejection, UserId,
};
use validator::Validate;

#[test]
fn ids_serialize_as_plain_strings() {
    let id = EntityId::new("prompt-42");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"prompt-42\"");
    let back: CommentId = serde_json::from_str("\"c-1\"").unwrap();
    assert_eq!(back.as_str(), "c-1");
    assert_eq!(UserId::from("alice").to_string(), "alice");
}

#[test]
fn like_snapshot_wire_shape() {
    let snapshot: LikeSnapshot = serde_json::from_str(r#"{"liked":true,"count":12}"#).unwrap();
    assert_eq!(snapshot, LikeSnapshot::new(true, 12));
    assert_eq!(LikeSnapshot::default(), LikeSnapshot::new(false, 0));
}

#[test]
fn only_transient_gateway_failures_are_retryable() {
    assert!(GatewayError::Timeout.is_retryable());
    assert!(GatewayError::Transport("reset".into()).is_retryable());
    assert!(
        GatewayError::Status {
            status: 503,
            message: "busy".into()
        }
        .is_retryable()
    );
    assert!(
        !GatewayError::Status {
            status: 403,
            message: "Access denied".into()
        }
        .is_retryable()
    );
    assert!(!GatewayError::Unauthorized.is_retryable());
}

#[test]
fn rejection_messages_are_user_facing() {
    assert_eq!(Rejection::EmptyContent.to_string(), "Comment cannot be empty");
    assert_eq!(
        Rejection::SubmissionInProgress.to_string(),
        "Please wait for the previous comment to be submitted"
    );
}

#[test]
fn comment_request_enforces_length_bounds() {
    let request = |content: String| AddCommentRequest {
        entity_id: EntityId::new("prompt-1"),
        content,
    };
    assert!(request("ok".into()).validate().is_ok());
    assert!(request(String::new()).validate().is_err());
    assert!(request("é".repeat(500)).validate().is_ok());
    assert!(request("a".repeat(501)).validate().is_err());
}
