use crate::gameplay::action::Action;
use crate::protocol::mirror::Bot;
use crate::protocol::mirror::Observation;
use crate::protocol::mirror::Outcome;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Example bot that chooses uniformly from its legal actions, sizing
/// any raise uniformly within bounds. Useful as an opponent and as a
/// protocol exerciser: over enough hands it wanders into every corner
/// of the state machine.
pub struct Fish;

#[async_trait::async_trait]
impl Bot for Fish {
    async fn decide(&mut self, observation: &Observation) -> Action {
        let ref mut rng = rand::rng();
        let chosen = observation
            .legal
            .choose(rng)
            .copied()
            .expect("non empty legal actions conditional on being asked to move");
        match chosen {
            Action::Raise { .. } => Action::Raise {
                amount: rng.random_range(observation.min_raise..=observation.max_raise),
            },
            other => other,
        }
    }

    async fn review(&mut self, outcome: &Outcome) -> Vec<String> {
        vec![format!("hand settled {:+}", outcome.delta)]
    }
}
