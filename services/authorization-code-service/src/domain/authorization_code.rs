use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

use super::validation::{collect_violations, ValidationFailure, Violation, REQUIRED_CODE};

/// 識別子種別として受け付ける文字列（大文字・完全一致）
pub const IDENTIFIER_TYPES: [&str; 3] = ["USERID", "EMAILADDRESS", "PHONENUMBER"];

pub const AUTHORIZATION_CODE_SENT_MESSAGE: &str = "Authorization code sent successfully";

pub const USER_IDENTIFIER_REQUIRED: &str = "User identifier is required.";
pub const IDENTIFIER_TYPE_REQUIRED: &str = "Identifier type is required.";
pub const IDENTIFIER_TYPE_INVALID: &str =
    "Identifier type must be USERID, EMAILADDRESS or PHONENUMBER";
pub const DELIVERY_MODE_INVALID: &str = "Delivery mode must be a valid value.";

/// 認証コードの配信手段。ワイヤ上は名前（"SMS" など）で表現する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryMode {
    Sms,
    Email,
    Voice,
}

impl DeliveryMode {
    pub const ALL: [DeliveryMode; 3] = [DeliveryMode::Sms, DeliveryMode::Email, DeliveryMode::Voice];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Sms => "SMS",
            DeliveryMode::Email => "EMAIL",
            DeliveryMode::Voice => "VOICE",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// デコード済みの delivery_mode。
///
/// 未知の名前・数値・null・欠落はエラーにせず `Unrecognized` として保持し、
/// バリデーションで違反として報告する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryModeField {
    Valid(DeliveryMode),
    Unrecognized(serde_json::Value),
}

impl DeliveryModeField {
    pub fn mode(&self) -> Option<DeliveryMode> {
        match self {
            DeliveryModeField::Valid(mode) => Some(*mode),
            DeliveryModeField::Unrecognized(_) => None,
        }
    }
}

impl Default for DeliveryModeField {
    fn default() -> Self {
        DeliveryModeField::Unrecognized(serde_json::Value::Null)
    }
}

impl From<DeliveryMode> for DeliveryModeField {
    fn from(mode: DeliveryMode) -> Self {
        DeliveryModeField::Valid(mode)
    }
}

/// 認証コード送信リクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SendAuthorizationCodeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "validate_user_identifier_present"))]
    pub user_identifier: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(custom(function = "validate_identifier_type_present"))]
    #[validate(custom(function = "validate_identifier_type"))]
    pub identifier_type: String,

    #[serde(default)]
    #[validate(custom(function = "validate_delivery_mode"))]
    pub delivery_mode: DeliveryModeField,
}

impl SendAuthorizationCodeRequest {
    /// 違反の並び順（宣言順）
    pub const FIELDS: [&'static str; 3] = ["user_identifier", "identifier_type", "delivery_mode"];

    pub fn new(
        user_identifier: impl Into<String>,
        identifier_type: impl Into<String>,
        delivery_mode: impl Into<DeliveryModeField>,
    ) -> Self {
        Self {
            user_identifier: user_identifier.into(),
            identifier_type: identifier_type.into(),
            delivery_mode: delivery_mode.into(),
        }
    }

    /// 全ルールを評価し、違反をフィールド宣言順・ルール順で返す
    pub fn violations(&self) -> Vec<Violation> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => collect_violations(&errors, &Self::FIELDS),
        }
    }

    /// 検証に通れば確認レスポンスを返す
    pub fn confirm(self) -> Result<SendAuthorizationCodeResponse, ValidationFailure> {
        match ValidationFailure::from_violations(self.violations()) {
            Some(failure) => Err(failure),
            None => Ok(SendAuthorizationCodeResponse::new(self.user_identifier)),
        }
    }
}

/// 空文字・空白のみは未入力とみなす
fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() {
        return Ok(());
    }
    let mut error = ValidationError::new(REQUIRED_CODE);
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}

fn validate_user_identifier_present(value: &str) -> Result<(), ValidationError> {
    required(value, USER_IDENTIFIER_REQUIRED)
}

fn validate_identifier_type_present(value: &str) -> Result<(), ValidationError> {
    required(value, IDENTIFIER_TYPE_REQUIRED)
}

fn validate_identifier_type(value: &str) -> Result<(), ValidationError> {
    if IDENTIFIER_TYPES.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new("identifier_type");
    error.message = Some(Cow::Borrowed(IDENTIFIER_TYPE_INVALID));
    Err(error)
}

fn validate_delivery_mode(value: &DeliveryModeField) -> Result<(), ValidationError> {
    if value.mode().is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("delivery_mode");
    error.message = Some(Cow::Borrowed(DELIVERY_MODE_INVALID));
    Err(error)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 認証コード送信レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAuthorizationCodeResponse {
    pub user_identifier: String,
    pub response_message: String,
}

impl SendAuthorizationCodeResponse {
    pub fn new(user_identifier: impl Into<String>) -> Self {
        Self {
            user_identifier: user_identifier.into(),
            response_message: AUTHORIZATION_CODE_SENT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages_for(violations: &[Violation], field: &str) -> Vec<String> {
        violations
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.message.clone())
            .collect()
    }

    #[test]
    fn test_delivery_mode_serializes_as_name() {
        assert_eq!(serde_json::to_value(DeliveryMode::Sms).unwrap(), json!("SMS"));
        assert_eq!(serde_json::to_value(DeliveryMode::Email).unwrap(), json!("EMAIL"));
        assert_eq!(serde_json::to_value(DeliveryMode::Voice).unwrap(), json!("VOICE"));

        for mode in DeliveryMode::ALL {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn test_delivery_mode_field_decodes_known_name() {
        let field: DeliveryModeField = serde_json::from_value(json!("VOICE")).unwrap();
        assert_eq!(field, DeliveryModeField::Valid(DeliveryMode::Voice));
    }

    #[test]
    fn test_delivery_mode_field_keeps_unrecognized_values() {
        for raw in [json!("FAX"), json!("sms"), json!(1), json!(null)] {
            let field: DeliveryModeField = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(field, DeliveryModeField::Unrecognized(raw));
            assert_eq!(field.mode(), None);
        }
    }

    #[test]
    fn test_request_decodes_missing_and_null_fields_as_empty() {
        let request: SendAuthorizationCodeRequest =
            serde_json::from_value(json!({ "identifier_type": null })).unwrap();

        assert_eq!(request.user_identifier, "");
        assert_eq!(request.identifier_type, "");
        assert_eq!(request.delivery_mode, DeliveryModeField::default());
    }

    #[test]
    fn test_valid_request_has_no_violations() {
        for identifier_type in IDENTIFIER_TYPES {
            for mode in DeliveryMode::ALL {
                let request = SendAuthorizationCodeRequest::new("abc123", identifier_type, mode);
                assert!(request.violations().is_empty());
            }
        }
    }

    #[test]
    fn test_empty_user_identifier() {
        let request = SendAuthorizationCodeRequest::new("", "USERID", DeliveryMode::Sms);

        let violations = request.violations();

        assert_eq!(violations.len(), 1);
        assert_eq!(
            messages_for(&violations, "user_identifier"),
            vec![USER_IDENTIFIER_REQUIRED]
        );
    }

    #[test]
    fn test_whitespace_only_user_identifier_is_required() {
        for user_identifier in ["   ", "\t", " \n "] {
            let request = SendAuthorizationCodeRequest::new(user_identifier, "USERID", DeliveryMode::Sms);

            let violations = request.violations();

            assert_eq!(
                messages_for(&violations, "user_identifier"),
                vec![USER_IDENTIFIER_REQUIRED]
            );
        }
    }

    #[test]
    fn test_whitespace_only_identifier_type_reports_both_rules_in_order() {
        let request = SendAuthorizationCodeRequest::new("abc123", "  ", DeliveryMode::Sms);

        let violations = request.violations();

        assert_eq!(
            messages_for(&violations, "identifier_type"),
            vec![IDENTIFIER_TYPE_REQUIRED, IDENTIFIER_TYPE_INVALID]
        );
    }

    #[test]
    fn test_padded_user_identifier_is_present() {
        let request = SendAuthorizationCodeRequest::new(" abc123 ", "USERID", DeliveryMode::Sms);

        assert!(request.violations().is_empty());
    }

    #[test]
    fn test_identifier_type_outside_closed_set() {
        for identifier_type in ["emailaddress", "EMAIL", "USER ID"] {
            let request =
                SendAuthorizationCodeRequest::new("abc123", identifier_type, DeliveryMode::Email);

            let violations = request.violations();

            assert_eq!(
                messages_for(&violations, "identifier_type"),
                vec![IDENTIFIER_TYPE_INVALID]
            );
        }
    }

    #[test]
    fn test_empty_identifier_type_reports_both_rules_in_order() {
        let request = SendAuthorizationCodeRequest::new("abc123", "", DeliveryMode::Email);

        let violations = request.violations();

        assert_eq!(
            messages_for(&violations, "identifier_type"),
            vec![IDENTIFIER_TYPE_REQUIRED, IDENTIFIER_TYPE_INVALID]
        );
    }

    #[test]
    fn test_unrecognized_delivery_mode() {
        let request = SendAuthorizationCodeRequest::new(
            "abc123",
            "PHONENUMBER",
            DeliveryModeField::Unrecognized(json!("PIGEON")),
        );

        let violations = request.violations();

        assert_eq!(
            messages_for(&violations, "delivery_mode"),
            vec![DELIVERY_MODE_INVALID]
        );
    }

    #[test]
    fn test_violations_follow_field_order() {
        let request = SendAuthorizationCodeRequest::new("", "", DeliveryModeField::default());

        let fields: Vec<String> = request
            .violations()
            .into_iter()
            .map(|v| v.field)
            .collect();

        assert_eq!(
            fields,
            vec![
                "user_identifier",
                "identifier_type",
                "identifier_type",
                "delivery_mode"
            ]
        );
    }

    #[test]
    fn test_confirm_echoes_user_identifier() {
        let request = SendAuthorizationCodeRequest::new("abc123", "EMAILADDRESS", DeliveryMode::Sms);

        let response = request.confirm().unwrap();

        assert_eq!(response.user_identifier, "abc123");
        assert_eq!(response.response_message, AUTHORIZATION_CODE_SENT_MESSAGE);
    }

    #[test]
    fn test_confirm_returns_failure_for_invalid_request() {
        let request = SendAuthorizationCodeRequest::new("", "USERID", DeliveryMode::Sms);

        let failure = request.confirm().unwrap_err();

        assert_eq!(
            failure.errors().get("user_identifier").map(String::as_str),
            Some(USER_IDENTIFIER_REQUIRED)
        );
    }
}
