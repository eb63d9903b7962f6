use crate::Chips;
use crate::cards::card::Card;
use crate::gameplay::action::Action;
use serde::Deserialize;
use serde::Serialize;

/// One engine-to-agent message. Externally tagged, so the frame is a
/// single-key object naming the operation:
/// `{"request_action":{"game_clock":..,"player_hand":[..],..}}`.
///
/// `new_actions` is the delta-replication payload: every action taken by
/// either seat since the last message this agent saw, in order. The
/// agent replays them through its own copy of the state machine instead
/// of ever receiving a full state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    ReadyCheck {
        player_names: Vec<String>,
    },
    RequestAction {
        game_clock: f64,
        player_hand: Vec<Card>,
        board_cards: Vec<Card>,
        new_actions: Vec<Action>,
    },
    EndRound {
        player_hand: Vec<Card>,
        opponent_hand: Vec<Card>,
        board_cards: Vec<Card>,
        new_actions: Vec<Action>,
        delta: Chips,
        is_match_over: bool,
    },
}

/// Agent reply to a readiness handshake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ready {
    pub ready: bool,
}

/// Agent reply to an end-of-round notice: debug lines for its own
/// byte-capped log buffer on the engine side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_single_key_objects() {
        let request = Request::ReadyCheck {
            player_names: vec!["alpha".into(), "beta".into()],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"ready_check":{"player_names":["alpha","beta"]}}"#
        );
    }

    #[test]
    fn action_request_carries_the_delta_list() {
        let request = Request::RequestAction {
            game_clock: 30.0,
            player_hand: vec![
                Card::try_from("As").unwrap(),
                Card::try_from("Kd").unwrap(),
            ],
            board_cards: vec![],
            new_actions: vec![Action::Call, Action::Raise { amount: 8 }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.starts_with(r#"{"request_action":"#));
        assert!(json.contains(r#""player_hand":["As","Kd"]"#));
        assert!(json.contains(r#""new_actions":[{"action":"CALL"},{"action":"RAISE","amount":8}]"#));
        let back: Request = serde_json::from_str(&json).unwrap();
        match back {
            Request::RequestAction { new_actions, .. } => {
                assert_eq!(new_actions, vec![Action::Call, Action::Raise { amount: 8 }])
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn logs_default_when_missing() {
        let logs: Logs = serde_json::from_str("{}").unwrap();
        assert!(logs.logs.is_empty());
    }
}
