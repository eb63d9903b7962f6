use super::action::Action;
use super::round::RoundState;

/// Engine-side guard between the wire and the state machine. Whatever an
/// agent returns is coerced into a legal action before it is applied, so
/// the engine stays authoritative against a buggy or hostile bot. A
/// downgrade is reported and the match continues; it is never fatal.
pub fn validate(action: Action, state: &RoundState, name: &str) -> Action {
    match action {
        Action::Raise { amount } => {
            let (min, max) = state.raise_bounds();
            if state.may_raise() && min <= amount && amount <= max {
                return action;
            }
            log::warn!("{} attempted illegal raise to {}", name, amount);
            if state.may_call() && amount >= state.continue_cost() {
                return Action::Call;
            }
        }
        Action::Fold if state.may_fold() => return action,
        Action::Check if state.may_check() => return action,
        Action::Call if state.may_call() => return action,
        other => log::warn!("{} attempted illegal {}", name, other),
    }
    if state.may_check() {
        Action::Check
    } else {
        Action::Fold
    }
}
