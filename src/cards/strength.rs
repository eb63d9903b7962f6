use super::card::Card;
use super::card::Rank;

const WHEEL: u16 = 0b_1000000001111;

/// A hand category. Variants are declared in ascending order of strength
/// so the derived Ord is the poker total order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOAK(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOAK(Rank),
    StraightFlush(Rank),
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "HighCard      {} ", r),
            Ranking::OnePair(r) => write!(f, "OnePair       {} ", r),
            Ranking::TwoPair(r1, r2) => write!(f, "TwoPair       {}{}", r1, r2),
            Ranking::ThreeOAK(r) => write!(f, "ThreeOfAKind  {} ", r),
            Ranking::Straight(r) => write!(f, "Straight      {} ", r),
            Ranking::Flush(r) => write!(f, "Flush         {} ", r),
            Ranking::FullHouse(r1, r2) => write!(f, "FullHouse     {}{}", r1, r2),
            Ranking::FourOAK(r) => write!(f, "FourOfAKind   {} ", r),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {} ", r),
        }
    }
}

/// Tie-breaking side cards as a 13-bit rank mask. Comparing masks
/// numerically compares kickers highest-first.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Kickers(u16);

impl From<u16> for Kickers {
    fn from(mask: u16) -> Self {
        Self(mask)
    }
}
impl From<Vec<Rank>> for Kickers {
    fn from(ranks: Vec<Rank>) -> Self {
        Self(ranks.iter().fold(0u16, |a, r| a | 1 << u8::from(*r)))
    }
}

impl std::fmt::Display for Kickers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for i in (0..13u8).rev().filter(|i| self.0 & (1 << i) != 0) {
            write!(f, "{} ", Rank::from(i))?;
        }
        Ok(())
    }
}

/// Total order over seven-card hands: category first, kickers second.
/// This is the opaque "rank two hands given a shared board" interface
/// the settlement logic consumes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength {
    ranking: Ranking,
    kicks: Kickers,
}

impl Strength {
    pub fn evaluate(hole: &[Card], board: &[Card]) -> Self {
        let mut counts = [0u8; 13];
        let mut suits = [0u16; 4];
        for card in hole.iter().chain(board.iter()) {
            counts[u8::from(card.rank()) as usize] += 1;
            suits[u8::from(card.suit()) as usize] |= 1 << u8::from(card.rank());
        }
        let ranks = suits.iter().fold(0u16, |a, m| a | m);
        let ranking = Self::categorize(&counts, &suits, ranks);
        let kicks = Self::kickers(ranking, &suits, ranks);
        Self { ranking, kicks }
    }

    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    fn categorize(counts: &[u8; 13], suits: &[u16; 4], ranks: u16) -> Ranking {
        let flush = suits.iter().position(|m| m.count_ones() >= 5);
        if let Some(suit) = flush {
            if let Some(rank) = Self::straight(suits[suit]) {
                return Ranking::StraightFlush(rank);
            }
        }
        let mut trips = (0..13u8).rev().filter(|r| counts[*r as usize] == 3);
        let mut pairs = (0..13u8).rev().filter(|r| counts[*r as usize] == 2);
        if let Some(quad) = (0..13u8).rev().find(|r| counts[*r as usize] == 4) {
            return Ranking::FourOAK(Rank::from(quad));
        }
        let trip = trips.next();
        if let Some(hi) = trip {
            if let Some(lo) = trips.next().or_else(|| pairs.next()) {
                return Ranking::FullHouse(Rank::from(hi), Rank::from(lo));
            }
        }
        if let Some(suit) = flush {
            return Ranking::Flush(Self::high(suits[suit]));
        }
        if let Some(rank) = Self::straight(ranks) {
            return Ranking::Straight(rank);
        }
        if let Some(hi) = trip {
            return Ranking::ThreeOAK(Rank::from(hi));
        }
        match (pairs.next(), pairs.next()) {
            (Some(hi), Some(lo)) => Ranking::TwoPair(Rank::from(hi), Rank::from(lo)),
            (Some(hi), None) => Ranking::OnePair(Rank::from(hi)),
            _ => Ranking::HighCard(Self::high(ranks)),
        }
    }

    fn kickers(ranking: Ranking, suits: &[u16; 4], ranks: u16) -> Kickers {
        let (mask, n) = match ranking {
            Ranking::HighCard(r) => (ranks & !(1 << u8::from(r)), 4),
            Ranking::OnePair(r) => (ranks & !(1 << u8::from(r)), 3),
            Ranking::ThreeOAK(r) => (ranks & !(1 << u8::from(r)), 2),
            Ranking::FourOAK(r) => (ranks & !(1 << u8::from(r)), 1),
            Ranking::TwoPair(hi, lo) => {
                (ranks & !(1 << u8::from(hi)) & !(1 << u8::from(lo)), 1)
            }
            Ranking::Flush(r) => {
                let suit = suits
                    .iter()
                    .position(|m| m.count_ones() >= 5)
                    .expect("flush ranking implies flush suit");
                (suits[suit] & !(1 << u8::from(r)), 4)
            }
            _ => (0, 0),
        };
        Kickers::from(Self::top(mask, n))
    }

    /// highest 5-long run in a rank mask, wheel included
    fn straight(mask: u16) -> Option<Rank> {
        let mut bits = mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Self::high(bits))
        } else if WHEEL & mask == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }

    fn high(mask: u16) -> Rank {
        assert!(mask > 0);
        Rank::from((15 - mask.leading_zeros()) as u8)
    }

    /// keep only the n highest bits of a rank mask
    fn top(mask: u16, n: usize) -> u16 {
        let mut mask = mask;
        while mask.count_ones() as usize > n {
            mask &= mask - 1;
        }
        mask
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<18}", self.ranking)
    }
}
