use async_trait::async_trait;
use log::{ debug, warn };

use super::expr::{ evaluate, format_number };
use super::Strategy;
use crate::classifier::{ fold_digits, Intent };
use crate::error::ChatError;

#[derive(Debug, Default, Clone)]
pub struct ArithmeticStrategy;

impl ArithmeticStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Keeps only digits, the four operators, parentheses and the decimal point.
    pub fn extract_expression(message: &str) -> String {
        fold_digits(message)
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.'))
            .collect()
    }

    pub fn solve(&self, message: &str) -> Result<String, ChatError> {
        let expression = Self::extract_expression(message);
        if expression.is_empty() {
            return Err(ChatError::EmptyExpression);
        }
        debug!("Evaluating expression '{}'", expression);
        let value = evaluate(&expression)?;
        Ok(format!("نتیجه محاسبه {} = {}", expression, format_number(value)))
    }
}

#[async_trait]
impl Strategy for ArithmeticStrategy {
    fn intent(&self) -> Intent {
        Intent::Arithmetic
    }

    async fn respond(&self, message: &str) -> String {
        match self.solve(message) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Arithmetic strategy could not answer '{}': {}", message, e);
                e.user_message().to_string()
            }
        }
    }
}
