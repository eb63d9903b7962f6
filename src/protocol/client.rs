use super::message::Logs;
use super::message::Ready;
use super::message::Request;
use crate::Chips;
use crate::cards::card::Card;
use crate::gameplay::action::Action;
use crate::table::config::Config;
use anyhow::Context;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;
use std::time::Instant;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::tcp::OwnedWriteHalf;

/// Appended exactly once to a player's transcript when its byte cap fills.
const SENTINEL: &str = "Log size limit reached. No further entries will be added.";

/// Newline-delimited JSON framing over one TCP connection.
struct Wire {
    tx: OwnedWriteHalf,
    rx: Lines<BufReader<OwnedReadHalf>>,
}

impl Wire {
    async fn send(&mut self, request: &Request) -> Result<()> {
        let mut frame = serde_json::to_string(request)?;
        frame.push('\n');
        self.tx.write_all(frame.as_bytes()).await?;
        Ok(())
    }
    async fn recv<T: DeserializeOwned>(&mut self, budget: f64) -> Result<T> {
        let line = tokio::time::timeout(Duration::from_secs_f64(budget), self.rx.next_line())
            .await
            .context("response deadline")??
            .context("connection closed")?;
        Ok(serde_json::from_str(&line)?)
    }
}

/// Engine-side handle to one remote agent.
///
/// Owns the connection, the player's remaining decision budget, and its
/// byte-capped debug transcript. The clock is debited by wall time
/// measured around each action round-trip rather than trusted from
/// anything the agent reports.
pub struct Client {
    pub name: String,
    wire: Wire,
    clock: f64,
    log: Vec<String>,
    log_size: usize,
    config: Config,
}

impl Client {
    /// Dial the agent, retrying on a fixed schedule. A malformed address
    /// is fatal; a slow-to-listen agent is not.
    pub async fn connect(name: &str, addr: &str, config: &Config) -> Result<Self> {
        let addr = addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid address for {}: {}", name, addr))?;
        let budget = Duration::from_secs_f64(config.connect_timeout);
        let mut last = None;
        for attempt in 1..=config.connect_retries {
            match tokio::time::timeout(budget, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    stream.set_nodelay(true)?;
                    let (rx, tx) = stream.into_split();
                    log::info!("{} connected on attempt {}", name, attempt);
                    return Ok(Self {
                        name: name.to_string(),
                        wire: Wire {
                            tx,
                            rx: BufReader::new(rx).lines(),
                        },
                        clock: config.game_clock,
                        log: Vec::new(),
                        log_size: 0,
                        config: config.clone(),
                    });
                }
                Ok(Err(e)) => last = Some(anyhow::Error::from(e)),
                Err(_) => last = Some(anyhow::anyhow!("connect timed out")),
            }
            log::warn!("{} unreachable at {} (attempt {})", name, addr, attempt);
            tokio::time::sleep(budget).await;
        }
        Err(last.unwrap_or_else(|| anyhow::anyhow!("no attempts made")))
            .with_context(|| format!("{} never came up at {}", name, addr))
    }

    /// Readiness handshake. Any failure to produce `{"ready": true}`
    /// within the retry schedule is a forfeit, reported as `false`.
    pub async fn check_ready(&mut self, names: &[String; crate::N]) -> bool {
        let request = Request::ReadyCheck {
            player_names: names.to_vec(),
        };
        for _ in 0..self.config.ready_retries.max(1) {
            if self.wire.send(&request).await.is_err() {
                continue;
            }
            match self.wire.recv::<Ready>(self.config.ready_timeout).await {
                Ok(Ready { ready: true }) => return true,
                Ok(Ready { ready: false }) => log::warn!("{} reports not ready", self.name),
                Err(e) => log::warn!("{} failed ready check: {:#}", self.name, e),
            }
        }
        false
    }

    /// Ask the agent for its next action, draining the pending delta
    /// queue into the request. Wall time for the full round-trip is
    /// debited from the clock. `None` means the agent gave no usable
    /// answer within the retry schedule; the caller folds for it.
    pub async fn request_action(
        &mut self,
        hand: &[Card],
        board: &[Card],
        pending: &mut VecDeque<Action>,
    ) -> Option<Action> {
        let request = Request::RequestAction {
            game_clock: self.clock,
            player_hand: hand.to_vec(),
            board_cards: board.to_vec(),
            new_actions: pending.drain(..).collect(),
        };
        for _ in 0..self.config.action_retries.max(1) {
            let start = Instant::now();
            if let Err(e) = self.wire.send(&request).await {
                log::warn!("{} send failed: {:#}", self.name, e);
                continue;
            }
            let response = self.wire.recv::<Action>(self.config.action_timeout).await;
            self.debit(start.elapsed().as_secs_f64());
            match response {
                Ok(action) => return Some(action),
                Err(e) => log::warn!("{} gave no action: {:#}", self.name, e),
            }
        }
        None
    }

    /// Settle the round with the agent and absorb whatever debug lines
    /// it sends back. Best effort: a silent or dead agent costs us one
    /// action timeout, never the match.
    pub async fn end_round(
        &mut self,
        hand: &[Card],
        opponent: &[Card],
        board: &[Card],
        pending: &mut VecDeque<Action>,
        delta: Chips,
        is_match_over: bool,
    ) {
        let request = Request::EndRound {
            player_hand: hand.to_vec(),
            opponent_hand: opponent.to_vec(),
            board_cards: board.to_vec(),
            new_actions: pending.drain(..).collect(),
            delta,
            is_match_over,
        };
        if let Err(e) = self.wire.send(&request).await {
            log::warn!("{} unreachable at round end: {:#}", self.name, e);
            return;
        }
        match self.wire.recv::<Logs>(self.config.action_timeout).await {
            Ok(Logs { logs }) => self.absorb(logs),
            Err(e) => log::warn!("{} sent no round logs: {:#}", self.name, e),
        }
    }

    /// Half-close our side so the agent's read loop sees EOF.
    pub async fn close(&mut self) {
        let _ = self.wire.tx.shutdown().await;
    }

    /// charge wall-clock seconds against the decision budget
    pub fn debit(&mut self, elapsed: f64) {
        self.clock -= elapsed;
    }

    /// remaining decision budget, in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// whether the budget is spent and the config says that matters
    pub fn exhausted(&self) -> bool {
        self.config.enforce_clock && self.clock <= 0.0
    }

    /// the byte-capped transcript accumulated so far
    pub fn transcript(&self) -> &[String] {
        &self.log
    }

    /// Append player debug lines up to the byte cap. The first line that
    /// would overflow pins the counter at the cap and leaves a single
    /// sentinel entry in its place; everything after is dropped.
    fn absorb(&mut self, lines: Vec<String>) {
        for line in lines {
            if self.log_size + line.len() <= self.config.log_limit {
                self.log_size += line.len();
                self.log.push(line);
            } else {
                if self.log.last().map(String::as_str) != Some(SENTINEL) {
                    self.log.push(SENTINEL.to_string());
                }
                self.log_size = self.config.log_limit;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a connected client we never speak over; absorb and the clock are
    /// pure bookkeeping
    async fn hollow(config: Config) -> Client {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dialed = TcpStream::connect(addr).await.unwrap();
        let _accepted = listener.accept().await.unwrap();
        let (rx, tx) = dialed.into_split();
        Client {
            name: "test".into(),
            wire: Wire {
                tx,
                rx: BufReader::new(rx).lines(),
            },
            clock: config.game_clock,
            log: Vec::new(),
            log_size: 0,
            config,
        }
    }

    #[tokio::test]
    async fn transcript_caps_with_sentinel() {
        let mut config = Config::default();
        config.log_limit = 100;
        let mut client = hollow(config).await;
        client.absorb(vec!["x".repeat(60), "y".repeat(60)]);
        assert_eq!(client.transcript().len(), 2);
        assert_eq!(client.transcript()[1], SENTINEL);
        assert_eq!(client.log_size, 100);
        // pinned: later lines never fit and the sentinel never repeats
        client.absorb(vec!["z".repeat(10)]);
        assert_eq!(client.transcript().len(), 2);
    }

    #[tokio::test]
    async fn exact_fit_is_not_truncation() {
        let mut config = Config::default();
        config.log_limit = 10;
        let mut client = hollow(config).await;
        client.absorb(vec!["a".repeat(4), "b".repeat(6)]);
        assert_eq!(client.transcript().len(), 2);
        assert_eq!(client.log_size, 10);
    }

    #[tokio::test]
    async fn clock_exhausts_only_when_enforced() {
        let mut config = Config::default();
        config.game_clock = 5.0;
        let mut client = hollow(config.clone()).await;
        client.debit(6.0);
        assert!(client.exhausted());
        assert!(client.clock() <= 0.0);
        config.enforce_clock = false;
        let mut client = hollow(config).await;
        client.debit(6.0);
        assert!(!client.exhausted());
    }
}
