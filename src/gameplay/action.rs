use crate::Chips;
use colored::Colorize;
use serde::Deserialize;
use serde::Serialize;

/// One betting decision. Raise carries the total pip the raiser is moving
/// to for the current street, not the increment. The serde form is the
/// wire form: `{"action":"FOLD"}`, `{"action":"RAISE","amount":n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise { amount: Chips },
}

impl Action {
    /// same tag, ignoring any Raise amount
    pub fn matches(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "{}", "FOLD".red()),
            Action::Check => write!(f, "{}", "CHECK".cyan()),
            Action::Call => write!(f, "{}", "CALL".yellow()),
            Action::Raise { amount } => {
                write!(f, "{}", format!("RAISE {}", amount).green())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        assert_eq!(
            serde_json::to_string(&Action::Fold).unwrap(),
            r#"{"action":"FOLD"}"#
        );
        assert_eq!(
            serde_json::to_string(&Action::Raise { amount: 12 }).unwrap(),
            r#"{"action":"RAISE","amount":12}"#
        );
        assert_eq!(
            serde_json::from_str::<Action>(r#"{"action":"CALL"}"#).unwrap(),
            Action::Call
        );
        assert_eq!(
            serde_json::from_str::<Action>(r#"{"action":"RAISE","amount":7}"#).unwrap(),
            Action::Raise { amount: 7 }
        );
    }

    #[test]
    fn tags_match_across_amounts() {
        assert!(Action::Raise { amount: 1 }.matches(&Action::Raise { amount: 99 }));
        assert!(!Action::Call.matches(&Action::Check));
    }
}
