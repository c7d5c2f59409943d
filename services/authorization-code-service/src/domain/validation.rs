use common::ProblemDetails;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

pub const VALIDATION_FAILED_TITLE: &str = "One or more validations failed.";
pub const BAD_REQUEST_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.1";

/// 必須ルールのエラーコード。同一フィールド内で常に先頭に並べる
pub const REQUIRED_CODE: &str = "required";

/// 同一フィールドの複数メッセージの区切り
pub const MESSAGE_SEPARATOR: &str = " | ";

/// 違反（フィールド名とメッセージの組）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `validator` のエラーを違反リストに平坦化する。
///
/// `field_order` に含まれるフィールドはその順、含まれないものは末尾に名前順。
/// 同一フィールド内では必須ルールを先頭に、それ以外は宣言順を保つ。
pub fn collect_violations(errors: &ValidationErrors, field_order: &[&str]) -> Vec<Violation> {
    let mut ranked: Vec<(bool, Violation)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.code.to_string());
                (error.code != REQUIRED_CODE, Violation::new(field.clone(), message))
            })
        })
        .collect();

    ranked.sort_by_key(|(not_required, v)| {
        let position = field_order
            .iter()
            .position(|name| *name == v.field)
            .unwrap_or(usize::MAX);
        (position, v.field.clone(), *not_required)
    });
    ranked.into_iter().map(|(_, v)| v).collect()
}

/// バリデーション失敗。フィールドごとにメッセージを `" | "` で連結して保持する
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for: {}", join_fields(.errors))]
pub struct ValidationFailure {
    errors: BTreeMap<String, String>,
}

impl ValidationFailure {
    /// 違反が無ければ `None`
    pub fn from_violations(violations: impl IntoIterator<Item = Violation>) -> Option<Self> {
        let mut errors: BTreeMap<String, String> = BTreeMap::new();
        for violation in violations {
            errors
                .entry(violation.field)
                .and_modify(|joined| {
                    joined.push_str(MESSAGE_SEPARATOR);
                    joined.push_str(&violation.message);
                })
                .or_insert(violation.message);
        }

        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn to_problem_details(&self) -> ProblemDetails {
        self.errors.iter().fold(
            ProblemDetails::new(BAD_REQUEST_TYPE, VALIDATION_FAILED_TITLE, 400),
            |problem, (field, message)| problem.with_error(field.as_str(), message.as_str()),
        )
    }
}

fn join_fields(errors: &BTreeMap<String, String>) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
