//! Four-function calculator state machine.
//!
//! One machine lives in each visitor's session; the API applies a single key
//! per request. The behavior matches a plain desk calculator with two quirks
//! that are kept on purpose:
//!
//! - Division by zero yields `0` instead of an error.
//! - Chaining operators (`2 + 3 *`) applies the pending operation
//!   immediately, so `2 + 3 * 4 =` evaluates to `20`, not `14`.

use serde::{Deserialize, Serialize};

/// A pending arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Apply the operation. Division by zero yields `0`.
    #[must_use]
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => {
                if rhs == 0.0 {
                    0.0
                } else {
                    lhs / rhs
                }
            }
        }
    }

    /// The display symbol for the expression line.
    #[must_use]
    const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

/// One key press, as delivered by buttons or keyboard bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operation),
    Equals,
    Clear,
    Backspace,
    Percent,
    ToggleSign,
}

impl Key {
    /// Parse a key token as sent by the client.
    ///
    /// Keyboard aliases match the browser bindings: `Enter` for `=`,
    /// `Escape`/`c` for clear, `Backspace` for delete.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                token.bytes().next().map(|b| Self::Digit(b - b'0'))
            }
            "." => Some(Self::Decimal),
            "+" => Some(Self::Operator(Operation::Add)),
            "-" => Some(Self::Operator(Operation::Subtract)),
            "*" => Some(Self::Operator(Operation::Multiply)),
            "/" => Some(Self::Operator(Operation::Divide)),
            "=" | "Enter" => Some(Self::Equals),
            "Escape" | "c" | "C" => Some(Self::Clear),
            "Backspace" => Some(Self::Backspace),
            "%" => Some(Self::Percent),
            "±" | "+/-" => Some(Self::ToggleSign),
            _ => None,
        }
    }
}

/// The calculator state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calculator {
    display: String,
    previous_value: Option<f64>,
    operation: Option<Operation>,
    waiting_for_operand: bool,
    expression: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_owned(),
            previous_value: None,
            operation: None,
            waiting_for_operand: false,
            expression: String::new(),
        }
    }
}

impl Calculator {
    /// A fresh machine showing `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The main display line.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The secondary expression line (e.g. `5 + 3 =`).
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Operator(op) => self.apply_operator(op),
            Key::Equals => self.equals(),
            Key::Clear => self.clear(),
            Key::Backspace => self.delete_last(),
            Key::Percent => self.percent(),
            Key::ToggleSign => self.toggle_sign(),
        }
    }

    fn current_value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    fn input_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));
        if self.waiting_for_operand {
            self.display = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    fn input_decimal(&mut self) {
        if self.waiting_for_operand {
            self.display = "0.".to_owned();
            self.waiting_for_operand = false;
            return;
        }
        if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Record an operator, applying any pending one first (the chain rule).
    fn apply_operator(&mut self, next: Operation) {
        let input = self.current_value();

        match (self.previous_value, self.operation) {
            (None, _) => {
                self.previous_value = Some(input);
                self.expression = format!("{} {}", format_number(input), next.symbol());
            }
            (Some(previous), Some(pending)) => {
                let result = pending.apply(previous, input);
                self.display = format_number(result);
                self.previous_value = Some(result);
                self.expression = format!("{} {}", format_number(result), next.symbol());
            }
            (Some(_), None) => {}
        }

        self.waiting_for_operand = true;
        self.operation = Some(next);
    }

    fn equals(&mut self) {
        let (Some(previous), Some(operation)) = (self.previous_value, self.operation) else {
            return;
        };

        let input = self.current_value();
        let result = operation.apply(previous, input);

        self.display = format_number(result);
        self.expression = format!(
            "{} {} {} =",
            format_number(previous),
            operation.symbol(),
            format_number(input)
        );
        self.previous_value = None;
        self.operation = None;
        self.waiting_for_operand = true;
    }

    /// Reset everything back to `0`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn delete_last(&mut self) {
        let negative_single = self.display.len() == 2 && self.display.starts_with('-');
        if self.display.len() == 1 || negative_single {
            self.display = "0".to_owned();
        } else {
            self.display.pop();
        }
    }

    fn toggle_sign(&mut self) {
        self.display = format_number(self.current_value() * -1.0);
    }

    fn percent(&mut self) {
        self.display = format_number(self.current_value() / 100.0);
    }
}

/// Render a value without a trailing `.0` for whole numbers.
#[allow(clippy::cast_possible_truncation)]
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn press_all(calc: &mut Calculator, tokens: &[&str]) {
        for token in tokens {
            calc.press(Key::parse(token).unwrap());
        }
    }

    #[test]
    fn test_simple_addition() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["1", "2", "+", "3", "="]);
        assert_eq!(calc.display(), "15");
        assert_eq!(calc.expression(), "12 + 3 =");
    }

    #[test]
    fn test_chained_operator_applies_immediately() {
        // 2 + 3 * 4 = applies the + as soon as * is pressed: (2 + 3) * 4.
        let mut calc = Calculator::new();
        press_all(&mut calc, &["2", "+", "3", "*", "4", "="]);
        assert_eq!(calc.display(), "20");
    }

    #[test]
    fn test_divide_by_zero_yields_zero() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["5", "/", "0", "="]);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_decimal_entry() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["1", ".", "5", "+", "2", ".", "5", "="]);
        assert_eq!(calc.display(), "4");
    }

    #[test]
    fn test_second_decimal_point_ignored() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["1", ".", ".", "5"]);
        assert_eq!(calc.display(), "1.5");
    }

    #[test]
    fn test_decimal_after_operator_starts_fresh_operand() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["7", "+", "."]);
        assert_eq!(calc.display(), "0.");
    }

    #[test]
    fn test_backspace() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["1", "2", "3", "Backspace"]);
        assert_eq!(calc.display(), "12");
        press_all(&mut calc, &["Backspace", "Backspace"]);
        assert_eq!(calc.display(), "0");
        press_all(&mut calc, &["Backspace"]);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_toggle_sign_and_percent() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["5", "0"]);
        calc.press(Key::ToggleSign);
        assert_eq!(calc.display(), "-50");
        calc.press(Key::ToggleSign);
        calc.press(Key::Percent);
        assert_eq!(calc.display(), "0.5");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["9", "+", "1"]);
        calc.press(Key::Clear);
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.expression(), "");
        // Equals after clear is a no-op.
        calc.press(Key::Equals);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_digits_replace_display_after_equals() {
        let mut calc = Calculator::new();
        press_all(&mut calc, &["2", "+", "2", "=", "7"]);
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_keyboard_aliases() {
        assert_eq!(Key::parse("Enter"), Some(Key::Equals));
        assert_eq!(Key::parse("Escape"), Some(Key::Clear));
        assert_eq!(Key::parse("C"), Some(Key::Clear));
        assert_eq!(Key::parse("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::parse("x"), None);
    }
}
