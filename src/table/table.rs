use super::audit::Row;
use super::audit::Sink;
use super::config::Config;
use crate::B_BLIND;
use crate::Chips;
use crate::N;
use crate::Position;
use crate::S_BLIND;
use crate::gameplay::action::Action;
use crate::gameplay::round::Round;
use crate::gameplay::round::RoundState;
use crate::gameplay::round::TerminalState;
use crate::gameplay::validator::validate;
use crate::protocol::client::Client;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::VecDeque;

/// Match orchestrator. Owns both client connections, both bankrolls,
/// and the audit sink; everything else it delegates to the round state
/// machine and the validator.
///
/// Clients and bankrolls are held in physical order. Seating alternates
/// every hand so each player posts each blind equally often; the two
/// orders are related by hand-number parity.
pub struct Table {
    config: Config,
    clients: [Client; N],
    pending: [VecDeque<Action>; N],
    bankrolls: [Chips; N],
    sink: Box<dyn Sink>,
    rng: SmallRng,
    round: usize,
}

impl Table {
    /// Connect to both players. Either endpoint failing to come up at
    /// all is fatal; the match never starts.
    pub async fn host(config: Config, sink: Box<dyn Sink>) -> Result<Self> {
        let first = Client::connect(&config.name_1, &config.addr_1, &config).await?;
        let second = Client::connect(&config.name_2, &config.addr_2, &config).await?;
        Ok(Self {
            config,
            clients: [first, second],
            pending: [VecDeque::new(), VecDeque::new()],
            bankrolls: [0; N],
            sink,
            rng: SmallRng::from_os_rng(),
            round: 0,
        })
    }

    /// Play the whole match and return final bankrolls in physical
    /// order. An unready player forfeits up front; everything after the
    /// ready check always runs to a settlement.
    pub async fn run(mut self) -> Result<[Chips; N]> {
        let names = [self.clients[0].name.clone(), self.clients[1].name.clone()];
        log::info!("{} vs {}, {} hands", names[0], names[1], self.config.rounds);
        let ready = [
            self.clients[0].check_ready(&names).await,
            self.clients[1].check_ready(&names).await,
        ];
        if ready.iter().all(|r| *r) {
            for round in 1..=self.config.rounds {
                self.round = round;
                if round % 50 == 0 {
                    log::info!("starting round {}", round);
                    for client in &self.clients {
                        log::info!("{} has {:.2}s remaining", client.name, client.clock());
                    }
                }
                log::debug!("round #{}", round);
                self.play(round == self.config.rounds).await;
            }
        } else {
            self.forfeit(ready);
        }
        for client in &mut self.clients {
            client.close().await;
            let transcript = client.transcript().join("\n");
            if let Err(e) = std::fs::write(format!("logs/{}.txt", client.name), transcript) {
                log::warn!("could not save {} transcript: {}", client.name, e);
            }
        }
        for (client, bankroll) in self.clients.iter().zip(self.bankrolls) {
            log::info!("{} finishes at {:+}", client.name, bankroll);
        }
        Ok(self.bankrolls)
    }

    /// The worst case for the unready side is folding every blind for
    /// the full schedule. Score that and skip the match.
    fn forfeit(&mut self, ready: [bool; N]) {
        match ready {
            [false, false] => log::warn!("both players forfeited the match"),
            [first, _] => {
                let loser = if first { 1 } else { 0 };
                log::warn!("{} forfeited the match", self.clients[loser].name);
                let penalty = (self.config.rounds / 2) as Chips * (S_BLIND + B_BLIND);
                self.bankrolls[loser] -= penalty;
                self.bankrolls[1 - loser] += penalty;
            }
        }
    }

    /// physical index of the player in the given seat this hand.
    /// parity makes the mapping its own inverse.
    fn seat(&self, seat: Position) -> usize {
        (seat + self.round + 1) % N
    }

    /// One hand, deal to settlement. A spent clock or an unresponsive
    /// agent folds; whatever comes back over the wire passes through
    /// the validator before it touches the state machine.
    async fn play(&mut self, last: bool) {
        let mut state = RoundState::deal(&mut self.rng);
        self.pending = [VecDeque::new(), VecDeque::new()];
        loop {
            self.narrate(&state);
            let active = state.active();
            let player = self.seat(active);
            let action = if self.clients[player].exhausted() {
                log::debug!("{} ran out of time", self.clients[player].name);
                Action::Fold
            } else {
                let hand = state.hands[active].expect("engine deals both hands");
                match self.clients[player]
                    .request_action(&hand, &state.board, &mut self.pending[active])
                    .await
                {
                    Some(action) => action,
                    None => {
                        log::debug!("{} folds by default", self.clients[player].name);
                        Action::Fold
                    }
                }
            };
            let action = validate(action, &state, &self.clients[player].name);
            self.record(&state, player, action);
            self.pending[1 - active].push_back(action);
            match state.proceed(action) {
                Round::Live(next) => state = next,
                Round::Done(terminal) => {
                    self.settle(terminal, last).await;
                    break;
                }
            }
        }
    }

    /// Deliver the reveal and the authoritative delta to both sides,
    /// then apply it to the books.
    async fn settle(&mut self, terminal: TerminalState, last: bool) {
        let previous = &terminal.previous;
        for seat in 0..N {
            let player = self.seat(seat);
            let hand = previous.hands[seat].expect("engine deals both hands");
            let shown = previous.hands[1 - seat].expect("engine deals both hands");
            let delta = terminal.deltas[seat];
            self.clients[player]
                .end_round(
                    &hand,
                    &shown,
                    &previous.board,
                    &mut self.pending[seat],
                    delta,
                    last,
                )
                .await;
            self.bankrolls[player] += delta;
        }
        if !previous.may_fold() {
            // betting was closed, so the hand went to showdown
            for seat in 0..N {
                log::debug!(
                    "{} shows {}{}",
                    self.clients[self.seat(seat)].name,
                    previous.hands[seat].expect("engine deals both hands")[0],
                    previous.hands[seat].expect("engine deals both hands")[1],
                );
            }
        }
        for seat in 0..N {
            let player = self.seat(seat);
            log::debug!(
                "{} awarded {:+}, bankroll {:+}",
                self.clients[player].name,
                terminal.deltas[seat],
                self.bankrolls[player],
            );
        }
    }

    /// Hand narration: blinds and hole cards when the hand opens, the
    /// pot when a street does.
    fn narrate(&mut self, state: &RoundState) {
        use crate::cards::street::Street;
        if state.street == Street::Pref && state.button == 0 {
            let blinds = [S_BLIND, B_BLIND];
            for seat in 0..N {
                let name = &self.clients[self.seat(seat)].name;
                let hand = state.hands[seat].expect("engine deals both hands");
                log::debug!("{} posts the blind of {}", name, blinds[seat]);
                log::debug!("{} dealt {}{}", name, hand[0], hand[1]);
            }
            for seat in 0..N {
                self.audit(state, seat, "posts blind".into(), Some(blinds[seat]));
            }
        } else if state.street != Street::Pref && state.button == 1 {
            let board = state
                .board
                .iter()
                .map(|c| c.to_string())
                .collect::<String>();
            log::debug!("{} board [{}] pot {}", state.street, board, state.pot());
        }
    }

    /// Record one accepted action in the debug log and the audit trail.
    fn record(&mut self, state: &RoundState, player: usize, action: Action) {
        let name = &self.clients[player].name;
        log::debug!("{} {}", name, action);
        let (verb, amount) = match action {
            Action::Fold => ("fold", None),
            Action::Check => ("check", None),
            Action::Call => ("call", None),
            Action::Raise { amount } => ("bets", Some(amount)),
        };
        let seat = self.seat(player);
        self.audit(state, seat, verb.into(), amount);
    }

    fn audit(&mut self, state: &RoundState, seat: Position, action: String, amount: Option<Chips>) {
        self.sink.append(Row {
            round: self.round,
            street: state.street,
            team: self.clients[self.seat(seat)].name.clone(),
            action,
            amount,
            cards_1: state.hands[self.seat(0)],
            cards_2: state.hands[self.seat(1)],
            board: state.board.clone(),
            bankroll: self.bankrolls[0],
        })
    }
}
