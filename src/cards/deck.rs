use super::card::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// An ordered card source. The engine deals from a freshly shuffled deck
/// each hand; the agent-side mirror carries an empty one, since its board
/// arrives authoritatively over the wire.
#[derive(Debug, Clone, Default)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// all 52 cards in a random order
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut cards = (0..52u8).map(Card::from).collect::<Vec<Card>>();
        cards.shuffle(rng);
        Self(cards)
    }

    /// a deck with nothing to deal
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// remove and return up to n cards
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.0.len());
        self.0.drain(..n).collect()
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn full_and_distinct() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut deck = Deck::shuffled(rng);
        let mut seen = std::collections::HashSet::new();
        for card in deck.deal(52) {
            assert!(seen.insert(card));
        }
        assert_eq!(seen.len(), 52);
        assert_eq!(deck.size(), 0);
    }

    #[test]
    fn deal_is_bounded() {
        let mut deck = Deck::empty();
        assert!(deck.deal(5).is_empty());
    }

    #[test]
    fn same_seed_same_order() {
        let ref mut a = SmallRng::seed_from_u64(42);
        let ref mut b = SmallRng::seed_from_u64(42);
        assert_eq!(Deck::shuffled(a).deal(52), Deck::shuffled(b).deal(52));
    }
}
