use crate::Chips;
use crate::cards::Hole;
use crate::cards::card::Card;
use crate::cards::street::Street;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// One audit-trail entry: a single logged table event. Hands are in
/// physical player order, not seat order, so a row reads the same way
/// across rounds as the button alternates.
#[derive(Debug, Clone)]
pub struct Row {
    pub round: usize,
    pub street: Street,
    pub team: String,
    pub action: String,
    pub amount: Option<Chips>,
    pub cards_1: Option<Hole>,
    pub cards_2: Option<Hole>,
    pub board: Vec<Card>,
    pub bankroll: Chips,
}

/// Where the audit trail goes. Injected into the orchestrator so the
/// core never touches file handles or global logger state itself.
pub trait Sink: Send {
    fn append(&mut self, row: Row);
}

/// Comma-separated audit trail, one row per table event. A write error
/// costs the row, never the match.
pub struct Csv<W: Write> {
    out: W,
}

impl Csv<std::io::BufWriter<std::fs::File>> {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        Self::new(std::io::BufWriter::new(file))
    }
}

impl<W: Write> Csv<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(
            out,
            "Round,Street,Team,Action,ActionAmt,Team1Cards,Team2Cards,AllCards,Bankroll"
        )?;
        Ok(Self { out })
    }

    fn hole(hole: &Option<Hole>) -> String {
        match hole {
            Some([a, b]) => format!("{} {}", a, b),
            None => String::new(),
        }
    }
}

impl<W: Write + Send> Sink for Csv<W> {
    fn append(&mut self, row: Row) {
        let amount = row.amount.map(|a| a.to_string()).unwrap_or_default();
        let board = row
            .board
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let written = writeln!(
            self.out,
            "{},{},{},{},{},{},{},{},{}",
            row.round,
            row.street,
            row.team,
            row.action,
            amount,
            Self::hole(&row.cards_1),
            Self::hole(&row.cards_2),
            board,
            row.bankroll,
        )
        .and_then(|_| self.out.flush());
        if let Err(e) = written {
            log::error!("audit trail write failed: {}", e);
        }
    }
}

/// Discards everything. For tests and headless matches.
pub struct Null;

impl Sink for Null {
    fn append(&mut self, _row: Row) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(s: &str) -> Option<Hole> {
        let cards = s
            .split_whitespace()
            .map(|c| Card::try_from(c).unwrap())
            .collect::<Vec<_>>();
        Hole::try_from(cards).ok()
    }

    #[test]
    fn rows_serialize_with_stable_columns() {
        let mut csv = Csv::new(Vec::new()).unwrap();
        csv.append(Row {
            round: 3,
            street: Street::Flop,
            team: "alpha".into(),
            action: "bets".into(),
            amount: Some(12),
            cards_1: hole("As Ah"),
            cards_2: hole("Kd Kc"),
            board: "2s 7d 9h"
                .split_whitespace()
                .map(|c| Card::try_from(c).unwrap())
                .collect(),
            bankroll: -4,
        });
        csv.append(Row {
            round: 3,
            street: Street::Flop,
            team: "beta".into(),
            action: "fold".into(),
            amount: None,
            cards_1: hole("As Ah"),
            cards_2: hole("Kd Kc"),
            board: Vec::new(),
            bankroll: -4,
        });
        let text = String::from_utf8(csv.out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Round,Street,Team,Action,ActionAmt,Team1Cards,Team2Cards,AllCards,Bankroll"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,flop,alpha,bets,12,As Ah,Kd Kc,2s 7d 9h,-4"
        );
        // no amount and no board leave their cells empty
        assert_eq!(lines.next().unwrap(), "3,flop,beta,fold,,As Ah,Kd Kc,,-4");
    }
}
