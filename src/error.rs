use thiserror::Error;

use crate::strategy::expr::EvalError;

pub const EMPTY_EXPRESSION_REPLY: &str =
    "عبارت ریاضی معتبری پیدا نکردم. لطفاً یک عبارت ریاضی وارد کنید.";
pub const EVALUATION_REPLY: &str =
    "نتوانستم مسئله ریاضی را حل کنم. لطفاً یک عبارت معتبر وارد کنید.";
pub const EMPTY_QUERY_REPLY: &str = "لطفاً موضوعی برای جستجو مشخص کنید.";
pub const SEARCH_ERROR_REPLY: &str = "خطا در انجام جستجو. لطفاً دوباره تلاش کنید.";
pub const GENERIC_ERROR_REPLY: &str = "خطا در پردازش درخواست. لطفا دوباره تلاش کنید.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no arithmetic expression found in message")]
    EmptyExpression,

    #[error("failed to evaluate expression: {0}")]
    Evaluation(#[from] EvalError),

    #[error("search query is empty after removing trigger words")]
    EmptyQuery,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("remote chat endpoint error: {0}")]
    Remote(String),
}

impl ChatError {
    /// The reply shown in the conversation when this error ends a turn.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::EmptyExpression => EMPTY_EXPRESSION_REPLY,
            ChatError::Evaluation(_) => EVALUATION_REPLY,
            ChatError::EmptyQuery => EMPTY_QUERY_REPLY,
            ChatError::Http(_) | ChatError::Parse(_) => SEARCH_ERROR_REPLY,
            ChatError::Remote(_) => GENERIC_ERROR_REPLY,
        }
    }
}
