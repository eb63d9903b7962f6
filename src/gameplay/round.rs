use super::action::Action;
use crate::B_BLIND;
use crate::Chips;
use crate::N;
use crate::Position;
use crate::S_BLIND;
use crate::STACK;
use crate::cards::Hole;
use crate::cards::card::Card;
use crate::cards::deck::Deck;
use crate::cards::street::Street;
use crate::cards::strength::Strength;
use rand::Rng;

/// One in-progress hand of heads-up no-limit.
///
/// `button` counts accepted actions within the hand; `button % 2` is the
/// acting seat. Seat 0 posts the small blind and acts first preflop; the
/// other seat acts first on every later street. Transitions are pure:
/// `proceed` builds a new state and never mutates the old one, so the
/// engine and the agent-side mirror run the same deterministic automaton
/// on the same inputs.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub button: Position,
    pub street: Street,
    pub pips: [Chips; N],
    pub stacks: [Chips; N],
    pub hands: [Option<Hole>; N],
    pub board: Vec<Card>,
    pub deck: Deck,
}

/// A finished hand. Absorbing: no further transitions. The final live
/// state is retained to recover hands and board for settlement logging
/// and showdown reveal.
#[derive(Debug, Clone)]
pub struct TerminalState {
    pub deltas: [Chips; N],
    pub previous: RoundState,
}

/// Result of one transition, matched exhaustively at every consumer.
#[derive(Debug, Clone)]
pub enum Round {
    Live(RoundState),
    Done(TerminalState),
}

impl RoundState {
    /// fresh hand with blinds posted and hole cards as given
    pub fn new(hands: [Option<Hole>; N], deck: Deck) -> Self {
        Self {
            button: 0,
            street: Street::Pref,
            pips: [S_BLIND, B_BLIND],
            stacks: [STACK - S_BLIND, STACK - B_BLIND],
            hands,
            board: Vec::new(),
            deck,
        }
    }

    /// engine-side: shuffle, deal both holes, post blinds
    pub fn deal<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Deck::shuffled(rng);
        let a = Hole::try_from(deck.deal(2)).expect("full deck");
        let b = Hole::try_from(deck.deal(2)).expect("full deck");
        Self::new([Some(a), Some(b)], deck)
    }

    /// agent-side: own hole only, no deck; the board arrives over the wire
    pub fn mirrored(hole: Hole, board: Vec<Card>) -> Self {
        let mut state = Self::new([Some(hole), None], Deck::empty());
        state.board = board;
        state
    }

    //
    pub fn active(&self) -> Position {
        self.button % 2
    }
    /// additional chips the actor must put in to match the opponent
    pub fn continue_cost(&self) -> Chips {
        self.pips[1 - self.active()] - self.pips[self.active()]
    }
    /// chips this seat has committed over the whole hand
    pub fn contribution(&self, seat: Position) -> Chips {
        STACK - self.stacks[seat]
    }
    pub fn pot(&self) -> Chips {
        self.contribution(0) + self.contribution(1)
    }

    //
    pub fn may_fold(&self) -> bool {
        self.continue_cost() > 0
    }
    pub fn may_check(&self) -> bool {
        self.continue_cost() == 0
    }
    pub fn may_call(&self) -> bool {
        self.continue_cost() > 0 && self.stacks[self.active()] > 0
    }
    pub fn may_raise(&self) -> bool {
        self.stacks[1 - self.active()] > 0 && self.stacks[self.active()] > self.continue_cost()
    }

    /// legal actions for the acting seat. the Raise carries the minimum
    /// amount as a placeholder; any amount within bounds is accepted.
    pub fn legal(&self) -> Vec<Action> {
        let mut options = Vec::with_capacity(3);
        if self.may_fold() {
            options.push(Action::Fold);
        }
        if self.may_check() {
            options.push(Action::Check);
        }
        if self.may_call() {
            options.push(Action::Call);
        }
        if self.may_raise() {
            options.push(Action::Raise {
                amount: self.raise_bounds().0,
            });
        }
        assert!(!options.is_empty());
        options
    }

    /// inclusive (min, max) total pip the actor may raise to. max is an
    /// all-in sized bet capped by what the opponent can still match; min
    /// is one full raise increment or a big blind, whichever is larger,
    /// clamped so the range is never empty when raising is legal.
    pub fn raise_bounds(&self) -> (Chips, Chips) {
        let active = self.active();
        let cost = self.continue_cost();
        let most = Chips::min(self.stacks[active], self.stacks[1 - active] + cost);
        let least = Chips::min(most, cost + Chips::max(cost, B_BLIND));
        (self.pips[active] + least, self.pips[active] + most)
    }

    //
    pub fn proceed(&self, action: Action) -> Round {
        let active = self.active();
        match action {
            Action::Fold => {
                let lost = self.contribution(active);
                let mut deltas = [0; N];
                deltas[active] = -lost;
                deltas[1 - active] = lost;
                Round::Done(TerminalState {
                    deltas,
                    previous: self.clone(),
                })
            }
            Action::Call if self.button == 0 => {
                // small blind limps; the big blind still owes a decision
                let mut next = self.clone();
                next.button = 1;
                next.pips = [B_BLIND; N];
                next.stacks = [STACK - B_BLIND; N];
                Round::Live(next)
            }
            Action::Call => {
                let cost = self.continue_cost();
                let mut next = self.clone();
                next.stacks[active] -= cost;
                next.pips[active] += cost;
                next.button += 1;
                next.advance()
            }
            Action::Check => {
                let closed = (self.street == Street::Pref && self.button > 0) || self.button > 1;
                if closed {
                    self.clone().advance()
                } else {
                    let mut next = self.clone();
                    next.button += 1;
                    Round::Live(next)
                }
            }
            Action::Raise { amount } => {
                let mut next = self.clone();
                next.stacks[active] -= amount - self.pips[active];
                next.pips[active] = amount;
                next.button += 1;
                Round::Live(next)
            }
        }
    }

    /// betting on this street is closed: open the next one, or settle.
    /// with both stacks empty there is no betting left, so the remaining
    /// streets are run out immediately.
    fn advance(self) -> Round {
        if self.street == Street::Rive {
            return Round::Done(self.showdown());
        }
        let mut next = self;
        next.street = next.street.next();
        let owed = next.street.n_observed().saturating_sub(next.board.len());
        let dealt = next.deck.deal(owed);
        next.board.extend(dealt);
        next.pips = [0; N];
        next.button = 1;
        if next.stacks == [0; N] {
            next.advance()
        } else {
            Round::Live(next)
        }
    }

    /// compare hands at the river. the winner takes the loser's
    /// contribution; a chopped pot splits evenly with the odd chip going
    /// to seat 0, deterministically. the mirror reaches this with the
    /// opponent hand unknown and zeroed deltas; it never trusts local
    /// settlement over the authoritative one anyway.
    fn showdown(self) -> TerminalState {
        let deltas = match (self.hands[0], self.hands[1]) {
            (Some(a), Some(b)) => {
                let hero = Strength::evaluate(&a, &self.board);
                let vill = Strength::evaluate(&b, &self.board);
                let (c0, c1) = (self.contribution(0), self.contribution(1));
                match hero.cmp(&vill) {
                    std::cmp::Ordering::Greater => [c1, -c1],
                    std::cmp::Ordering::Less => [-c0, c0],
                    std::cmp::Ordering::Equal => {
                        let pot = c0 + c1;
                        let half = pot / 2;
                        [half + pot % 2 - c0, half - c1]
                    }
                }
            }
            _ => [0; N],
        };
        TerminalState {
            deltas,
            previous: self,
        }
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use colored::Colorize;
        for seat in 0..N {
            write!(f, "{:>4}({:>3}) ", self.stacks[seat], self.pips[seat])?;
        }
        let board = self
            .board
            .iter()
            .map(|c| c.to_string())
            .collect::<String>();
        write!(
            f,
            "{}",
            format!("@ {:>4} [{}] {}", self.pot(), board, self.street).bright_green()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::Card;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace()
            .map(|c| Card::try_from(c).unwrap())
            .collect()
    }
    fn hole(s: &str) -> Hole {
        Hole::try_from(cards(s)).unwrap()
    }
    /// aces for seat 0, kings for seat 1, dry board in deal order
    fn rigged() -> RoundState {
        RoundState::new(
            [Some(hole("As Ah")), Some(hole("Kd Kc"))],
            Deck::from(cards("2s 7d 9h 3c 4d")),
        )
    }
    fn live(round: Round) -> RoundState {
        match round {
            Round::Live(state) => state,
            Round::Done(_) => panic!("expected live state"),
        }
    }
    fn done(round: Round) -> TerminalState {
        match round {
            Round::Done(terminal) => terminal,
            Round::Live(_) => panic!("expected terminal state"),
        }
    }

    #[test]
    fn blinds_posted_at_deal() {
        let state = rigged();
        assert_eq!(state.pips, [S_BLIND, B_BLIND]);
        assert_eq!(state.stacks, [STACK - S_BLIND, STACK - B_BLIND]);
        assert_eq!(state.active(), 0);
        assert_eq!(state.continue_cost(), 1);
    }

    #[test]
    fn fold_never_free_check_never_owed() {
        let state = rigged();
        assert!(state.may_fold() && !state.may_check());
        let state = live(state.proceed(Action::Call));
        assert!(state.may_check() && !state.may_fold());
        assert!(!state.legal().contains(&Action::Fold));
    }

    #[test]
    fn limp_keeps_big_blind_option() {
        let state = live(rigged().proceed(Action::Call));
        assert_eq!(state.street, Street::Pref);
        assert_eq!(state.pips, [B_BLIND, B_BLIND]);
        assert_eq!(state.active(), 1);
    }

    #[test]
    fn fold_preflop_loses_the_blind() {
        let terminal = done(rigged().proceed(Action::Fold));
        assert_eq!(terminal.deltas, [-S_BLIND, S_BLIND]);
        assert_eq!(terminal.deltas.iter().sum::<Chips>(), 0);
    }

    #[test]
    fn checks_through_to_showdown() {
        let mut state = rigged();
        state = live(state.proceed(Action::Call));
        state = live(state.proceed(Action::Check));
        assert_eq!(state.street, Street::Flop);
        assert_eq!(state.board.len(), 3);
        assert_eq!(state.active(), 1);
        state = live(state.proceed(Action::Check));
        state = live(state.proceed(Action::Check));
        assert_eq!(state.street, Street::Turn);
        assert_eq!(state.board.len(), 4);
        state = live(state.proceed(Action::Check));
        state = live(state.proceed(Action::Check));
        assert_eq!(state.street, Street::Rive);
        assert_eq!(state.board.len(), 5);
        state = live(state.proceed(Action::Check));
        let terminal = done(state.proceed(Action::Check));
        // each seat put in one big blind; the aces take the pot of 4
        assert_eq!(terminal.deltas, [B_BLIND, -B_BLIND]);
        assert_eq!(terminal.deltas.iter().sum::<Chips>(), 0);
        assert_eq!(terminal.previous.pot(), 2 * B_BLIND);
    }

    #[test]
    fn raise_keeps_the_street_open() {
        let state = live(rigged().proceed(Action::Raise { amount: 6 }));
        assert_eq!(state.street, Street::Pref);
        assert_eq!(state.pips, [6, B_BLIND]);
        assert_eq!(state.stacks, [STACK - 6, STACK - B_BLIND]);
        assert_eq!(state.active(), 1);
        assert_eq!(state.continue_cost(), 4);
    }

    #[test]
    fn raise_bounds_stay_in_reach() {
        let state = rigged();
        let (min, max) = state.raise_bounds();
        assert!(min <= max);
        assert_eq!(min, 4); // call 1 then raise a full increment of 2
        assert_eq!(max, STACK);
        let state = live(state.proceed(Action::Raise { amount: 6 }));
        let (min, max) = state.raise_bounds();
        assert_eq!(min, 10); // match 6 and raise by the increment of 4
        assert_eq!(max, STACK);
    }

    #[test]
    fn reraise_increment_beats_big_blind() {
        let mut state = rigged();
        state = live(state.proceed(Action::Raise { amount: 10 }));
        let (min, _) = state.raise_bounds();
        // last increment was 8 over the big blind, so min reraise is 18
        assert_eq!(min, 18);
    }

    #[test]
    fn all_in_call_runs_out_the_board() {
        let mut state = rigged();
        state = live(state.proceed(Action::Raise { amount: STACK }));
        assert!(!state.may_raise());
        assert!(state.may_call() && state.may_fold());
        let terminal = done(state.proceed(Action::Call));
        assert_eq!(terminal.previous.board.len(), 5);
        assert_eq!(terminal.previous.stacks, [0, 0]);
        // aces hold on the dry runout for the full stacks
        assert_eq!(terminal.deltas, [STACK, -STACK]);
    }

    #[test]
    fn shove_caps_at_shorter_stack() {
        let mut state = rigged();
        state = live(state.proceed(Action::Raise { amount: STACK }));
        let (_, max) = state.raise_bounds();
        assert_eq!(max, STACK);
        assert!(state.raise_bounds().0 <= max);
    }

    #[test]
    fn fold_after_raise_forfeits_the_pip() {
        let mut state = rigged();
        state = live(state.proceed(Action::Raise { amount: 10 }));
        state = live(state.proceed(Action::Raise { amount: 30 }));
        let terminal = done(state.proceed(Action::Fold));
        // seat 0 had 10 in; the uncontested 20 on top returns to seat 1
        assert_eq!(terminal.deltas, [-10, 10]);
    }

    #[test]
    fn chopped_pot_gives_odd_chip_to_seat_zero() {
        let mut state = RoundState::new(
            [Some(hole("2h 3d")), Some(hole("4c 5h"))],
            Deck::empty(),
        );
        state.street = Street::Rive;
        state.board = cards("Ts Js Qs Ks As");
        state.pips = [0, 0];
        state.stacks = [STACK - 1, STACK - 2];
        state.button = 2;
        let terminal = done(state.proceed(Action::Check));
        assert_eq!(terminal.deltas, [1, -1]);
        assert_eq!(terminal.deltas.iter().sum::<Chips>(), 0);
    }

    #[test]
    fn deltas_net_zero_over_random_play() {
        use rand::seq::IndexedRandom;
        let ref mut rng = rand::rng();
        for _ in 0..256 {
            let mut round = Round::Live(RoundState::deal(rng));
            loop {
                match round {
                    Round::Live(state) => {
                        let action = *state.legal().choose(rng).unwrap();
                        round = state.proceed(action);
                    }
                    Round::Done(terminal) => {
                        assert_eq!(terminal.deltas.iter().sum::<Chips>(), 0);
                        assert_eq!(
                            terminal.deltas[0],
                            terminal.previous.contribution(1).min(terminal.deltas[0].abs())
                                * terminal.deltas[0].signum()
                        );
                        break;
                    }
                }
            }
        }
    }
}
