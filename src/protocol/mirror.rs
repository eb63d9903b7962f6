use super::message::Logs;
use super::message::Ready;
use super::message::Request;
use crate::Chips;
use crate::cards::Hole;
use crate::cards::card::Card;
use crate::cards::street::Street;
use crate::gameplay::action::Action;
use crate::gameplay::round::Round;
use crate::gameplay::round::RoundState;
use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::net::TcpStream;

/// What the acting bot can see when asked for a decision. Derived from
/// the mirrored state, never from anything the opponent could not
/// already infer at the table.
#[derive(Debug, Clone)]
pub struct Observation {
    pub street: Street,
    pub hole: Hole,
    pub board: Vec<Card>,
    pub my_pip: Chips,
    pub opp_pip: Chips,
    pub my_stack: Chips,
    pub opp_stack: Chips,
    pub continue_cost: Chips,
    pub legal: Vec<Action>,
    pub min_raise: Chips,
    pub max_raise: Chips,
    pub game_clock: f64,
    pub bankroll: Chips,
}

/// End-of-round reveal: the settlement delta the engine scored, both
/// hands, and the final board. Bankroll here is as of the start of the
/// hand; the delta has not been applied yet.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub delta: Chips,
    pub hole: Hole,
    pub opponent: Option<Hole>,
    pub board: Vec<Card>,
    pub bankroll: Chips,
    pub is_match_over: bool,
}

/// Decision logic plugged into a [`Mirror`]. Implementations make the
/// calls; the mirror does all the bookkeeping.
#[async_trait]
pub trait Bot: Send {
    async fn decide(&mut self, observation: &Observation) -> Action;
    /// debug lines to ship back to the engine's capped transcript
    async fn review(&mut self, _outcome: &Outcome) -> Vec<String> {
        Vec::new()
    }
    async fn ready(&mut self, _names: &[String]) -> bool {
        true
    }
}

/// Agent-side replica of the engine's round state machine.
///
/// The engine never ships state. Each request carries the authoritative
/// board plus every action either seat has taken since the last message,
/// and the mirror replays those deltas through the same transition
/// function the engine runs. Own hand sits at index 0 regardless of
/// which physical seat we occupy; hand indices only matter at local
/// showdown, and settlement always comes from the wire anyway.
pub struct Mirror<B: Bot> {
    bot: B,
    bankroll: Chips,
    clock: f64,
    round: Option<Round>,
    fresh: bool,
}

impl<B: Bot> Mirror<B> {
    pub fn new(bot: B) -> Self {
        Self {
            bot,
            bankroll: 0,
            clock: 0.0,
            round: None,
            fresh: true,
        }
    }

    /// Accept engine connections forever, one session at a time. The
    /// engine only ever holds one connection; a dropped session just
    /// puts us back in accept.
    pub async fn run(mut self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            log::info!("engine connected from {}", peer);
            if let Err(e) = self.session(stream).await {
                log::warn!("session ended: {:#}", e);
            }
            self.fresh = true;
            self.round = None;
        }
    }

    /// One request-per-line, one response-per-line exchange until EOF.
    async fn session(&mut self, stream: TcpStream) -> Result<()> {
        let (rx, mut tx) = stream.into_split();
        let mut lines = BufReader::new(rx).lines();
        while let Some(line) = lines.next_line().await? {
            let request = serde_json::from_str::<Request>(&line).context("bad frame")?;
            let mut response = self.handle(request).await?;
            response.push('\n');
            tx.write_all(response.as_bytes()).await?;
        }
        Ok(())
    }

    async fn handle(&mut self, request: Request) -> Result<String> {
        match request {
            Request::ReadyCheck { player_names } => {
                let ready = self.bot.ready(&player_names).await;
                Ok(serde_json::to_string(&Ready { ready })?)
            }
            Request::RequestAction {
                game_clock,
                player_hand,
                board_cards,
                new_actions,
            } => {
                self.clock = game_clock;
                self.sync(player_hand, board_cards, &new_actions)?;
                let state = match self.round.as_ref() {
                    Some(Round::Live(state)) => state,
                    _ => return Err(anyhow!("asked to act on a settled hand")),
                };
                let observation = self.observe(state);
                let action = self.bot.decide(&observation).await;
                if let Some(Round::Live(state)) = self.round.take() {
                    self.round = Some(state.proceed(action));
                }
                Ok(serde_json::to_string(&action)?)
            }
            Request::EndRound {
                player_hand,
                opponent_hand,
                board_cards,
                new_actions,
                delta,
                is_match_over,
            } => {
                let board = board_cards.clone();
                self.sync(player_hand, board_cards, &new_actions)?;
                let mut last = match self.round.take() {
                    Some(Round::Live(state)) => state,
                    Some(Round::Done(terminal)) => terminal.previous,
                    None => return Err(anyhow!("round ended before it began")),
                };
                last.hands[1] = Hole::try_from(opponent_hand).ok();
                let outcome = Outcome {
                    delta,
                    hole: last.hands[0].ok_or_else(|| anyhow!("own hand lost"))?,
                    opponent: last.hands[1],
                    board,
                    bankroll: self.bankroll,
                    is_match_over,
                };
                let logs = self.bot.review(&outcome).await;
                self.bankroll += delta;
                self.fresh = true;
                self.round = None;
                Ok(serde_json::to_string(&Logs { logs })?)
            }
        }
    }

    /// Bring the replica up to the engine's present: start the hand if
    /// this is first contact, adopt the authoritative board, replay the
    /// delta list through the shared transition function.
    fn sync(&mut self, hand: Vec<Card>, board: Vec<Card>, deltas: &[Action]) -> Result<()> {
        if self.fresh {
            let hole = Hole::try_from(hand)
                .map_err(|cards| anyhow!("expected two hole cards, got {}", cards.len()))?;
            self.round = Some(Round::Live(RoundState::mirrored(hole, board)));
            self.fresh = false;
        } else if let Some(Round::Live(state)) = self.round.as_mut() {
            state.board = board;
        }
        for action in deltas {
            self.round = Some(match self.round.take() {
                Some(Round::Live(state)) => state.proceed(*action),
                other => return Err(anyhow!("delta after settlement: {:?} on {:?}", action, other)),
            });
        }
        Ok(())
    }

    fn observe(&self, state: &RoundState) -> Observation {
        let active = state.active();
        let (min_raise, max_raise) = state.raise_bounds();
        Observation {
            street: state.street,
            hole: state.hands[0].expect("mirror always knows its own hand"),
            board: state.board.clone(),
            my_pip: state.pips[active],
            opp_pip: state.pips[1 - active],
            my_stack: state.stacks[active],
            opp_stack: state.stacks[1 - active],
            continue_cost: state.continue_cost(),
            legal: state.legal(),
            min_raise,
            max_raise,
            game_clock: self.clock,
            bankroll: self.bankroll,
        }
    }
}
