use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    ConcurrencyError, Continuation, ContinuationId, DelayTier, Effects, ManualScheduler,
    MatchError, MatchState, Notice, Outcome, Parity, Phase, RandomSource, Role, Scheduled,
    Scheduler, Side, StateError, Timings, ValidationError, validate_number,
};

struct PendingContinuation<H> {
    continuation: Continuation,
    handle: H,
}

/// Owns one match and every delayed continuation it has outstanding.
pub struct MatchEngine<R, S: Scheduler> {
    match_id: u32,
    state: MatchState,
    rng: R,
    scheduler: S,
    timings: Timings,
    pending: HashMap<ContinuationId, PendingContinuation<S::Handle>>,
    // Never rewound, so an id issued before a reset cannot match one issued after it.
    next_continuation: u64,
}

impl<R: RandomSource, S: Scheduler> MatchEngine<R, S> {
    pub fn new(match_id: u32, rng: R, scheduler: S, timings: Timings) -> Self {
        MatchEngine {
            match_id,
            state: MatchState::default(),
            rng,
            scheduler,
            timings,
            pending: HashMap::new(),
            next_continuation: 0,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn pending_continuations(&self) -> usize {
        self.pending.len()
    }

    pub fn start_game(&mut self) -> Result<Effects, MatchError> {
        self.ensure_phase(Phase::Welcome)?;
        self.state.phase = Phase::TossPending;
        debug!("match {}: waiting for toss", self.match_id);
        Ok(Effects::notice(Notice::MatchStarted))
    }

    /// Record the odd/even call ahead of the toss.
    pub fn select_parity(&mut self, choice: Parity) -> Result<(), MatchError> {
        self.ensure_unlocked()?;
        self.ensure_phase(Phase::TossPending)?;
        self.state.toss.choice = Some(choice);
        Ok(())
    }

    pub fn submit_toss(
        &mut self,
        choice: Option<Parity>,
        human_guess: i64,
    ) -> Result<Effects, MatchError> {
        self.ensure_unlocked()?;
        self.ensure_phase(Phase::TossPending)?;
        let choice = choice.ok_or(ValidationError::MissingChoice)?;
        let human_guess = validate_number(human_guess)?;

        let opponent_guess = self.rng.next_number();
        let total = human_guess as u32 + opponent_guess as u32;
        let parity = Parity::of(total);
        let winner = if choice == parity { Side::Human } else { Side::Opponent };

        self.state.toss.choice = Some(choice);
        self.state.toss.human_guess = Some(human_guess);
        self.state.toss.opponent_guess = Some(opponent_guess);
        self.state.toss.winner = Some(winner);
        self.state.turn_lock = true;

        info!(
            "match {}: toss {} + {} = {} ({:?}), called {:?}, {} wins",
            self.match_id, human_guess, opponent_guess, total, parity, choice, winner
        );

        let scheduled = self.schedule(Continuation::RevealTossOutcome, DelayTier::Fast);
        Ok(Effects::notice(Notice::TossRevealed {
            human_guess,
            opponent_guess,
            total,
            parity,
            winner,
        })
        .then(scheduled))
    }

    /// Bat/bowl decision of a human who won the toss.
    pub fn choose_role(&mut self, role: Role) -> Result<Effects, MatchError> {
        self.ensure_unlocked()?;
        self.ensure_phase(Phase::ChoicePending)?;
        Ok(self.assign_roles(role, Side::Human))
    }

    pub fn select_number(&mut self, number: i64) -> Result<(), MatchError> {
        self.ensure_unlocked()?;
        self.ensure_phase(Phase::Innings)?;
        self.state.selected_number = Some(validate_number(number)?);
        Ok(())
    }

    pub fn play_turn(&mut self) -> Result<Effects, MatchError> {
        let Some(human_number) = self.state.selected_number else {
            return Err(self.refuse_turn("no number selected"));
        };
        if self.state.phase != Phase::Innings {
            return Err(self.refuse_turn("not in an innings"));
        }
        if self.state.turn_lock {
            return Err(self.refuse_turn("turn already in flight"));
        }
        let Some(batsman) = self.state.batting_side() else {
            return Err(self.refuse_turn("nobody is batting"));
        };

        let opponent_number = self.rng.next_number();
        self.state.selected_number = None;

        if human_number == opponent_number {
            self.state.turn_lock = true;
            debug!(
                "match {}: {} dismissed in innings {} ({} vs {})",
                self.match_id, batsman, self.state.innings_number, human_number, opponent_number
            );
            let scheduled = self.schedule(Continuation::EndInnings, DelayTier::Fast);
            return Ok(Effects::notice(Notice::Dismissal {
                human_number,
                opponent_number,
                batsman,
            })
            .then(scheduled));
        }

        // The batting side's own number is what it scores.
        let runs = u32::from(match batsman {
            Side::Human => human_number,
            Side::Opponent => opponent_number,
        });
        self.state.player_mut(batsman).score += runs;

        let effects = Effects::notice(Notice::Safe {
            human_number,
            opponent_number,
            batsman,
            runs,
        });

        if self.state.innings_number == 2 && self.state.score(batsman) > self.state.target {
            self.state.turn_lock = true;
            debug!(
                "match {}: {} passed target {} with {}",
                self.match_id,
                batsman,
                self.state.target,
                self.state.score(batsman)
            );
            let scheduled = self.schedule(Continuation::FinishChase, DelayTier::Fast);
            return Ok(effects.then(scheduled));
        }

        Ok(effects)
    }

    pub fn declare_innings(&mut self) -> Result<Effects, MatchError> {
        if self.state.game_over {
            return Err(StateError::MatchOver.into());
        }
        if !self.state.can_declare() {
            warn!("match {}: declaration refused", self.match_id);
            return Err(StateError::DeclareNotAllowed.into());
        }

        let score = self.state.score(Side::Human);
        self.state.turn_lock = true;
        self.state.selected_number = None;
        debug!("match {}: human declared at {}", self.match_id, score);

        let scheduled = self.schedule(Continuation::EndInnings, DelayTier::Fast);
        Ok(Effects::notice(Notice::Declared { score }).then(scheduled))
    }

    /// Cancel every outstanding continuation, then start over from the welcome phase.
    pub fn reset(&mut self) {
        let cancelled = self.pending.len();
        for (_, pending) in self.pending.drain() {
            self.scheduler.cancel(pending.handle);
        }
        self.state = MatchState::default();
        info!(
            "match {}: reset, cancelled {} pending continuation(s)",
            self.match_id, cancelled
        );
    }

    /// Called by the scheduler's owner once the delay for `id` has elapsed.
    /// Unknown ids (cancelled by a reset, or already resumed) are ignored.
    pub fn resume(&mut self, id: ContinuationId) -> Result<Effects, MatchError> {
        let Some(pending) = self.pending.remove(&id) else {
            warn!("match {}: ignoring stale continuation {}", self.match_id, id);
            return Ok(Effects::none());
        };
        debug!(
            "match {}: resuming {} {:?}",
            self.match_id, id, pending.continuation
        );

        match pending.continuation {
            Continuation::RevealTossOutcome => self.reveal_toss_outcome(),
            Continuation::ApplyOpponentRole(role) => Ok(self.assign_roles(role, Side::Opponent)),
            Continuation::EndInnings => Ok(self.end_innings()),
            Continuation::FinishChase => Ok(self.finish_match()),
        }
    }

    fn reveal_toss_outcome(&mut self) -> Result<Effects, MatchError> {
        let Some(winner) = self.state.toss.winner else {
            self.state.turn_lock = false;
            return Err(StateError::UnexpectedPhase {
                expected: Phase::TossPending,
                actual: self.state.phase,
            }
            .into());
        };

        match winner {
            Side::Human => {
                self.state.phase = Phase::ChoicePending;
                self.state.turn_lock = false;
                Ok(Effects::notice(Notice::TossWonChooseRole))
            }
            Side::Opponent => {
                let role = self.rng.next_role();
                info!("match {}: opponent chose to {:?}", self.match_id, role);
                let scheduled =
                    self.schedule(Continuation::ApplyOpponentRole(role), DelayTier::Decision);
                Ok(Effects::notice(Notice::OpponentChoseRole { role }).then(scheduled))
            }
        }
    }

    fn assign_roles(&mut self, role: Role, chooser: Side) -> Effects {
        let chooser_bats = role == Role::Bat;
        self.state.player_mut(chooser).is_batting = chooser_bats;
        self.state.player_mut(chooser.other()).is_batting = !chooser_bats;

        let batting = if chooser_bats { chooser } else { chooser.other() };
        self.state.first_innings_batsman = Some(batting);
        self.state.phase = Phase::Innings;
        self.state.innings_number = 1;
        self.state.turn_lock = false;

        debug!(
            "match {}: {} chose {:?}, {} bats first",
            self.match_id, chooser, role, batting
        );
        Effects::notice(Notice::InningsStarted {
            innings: 1,
            batting,
            target: None,
        })
    }

    fn end_innings(&mut self) -> Effects {
        if self.state.innings_number != 1 {
            return self.finish_match();
        }

        let first = self
            .state
            .first_innings_batsman
            .or_else(|| self.state.batting_side())
            .unwrap_or(Side::Human);
        self.state.target = self.state.score(first);
        self.state.innings_number = 2;
        for side in Side::ALL {
            let player = self.state.player_mut(side);
            player.is_batting = !player.is_batting;
        }
        self.state.turn_lock = false;
        self.state.selected_number = None;

        let batting = first.other();
        info!(
            "match {}: innings 1 closed at {}, {} chasing",
            self.match_id, self.state.target, batting
        );
        Effects::notice(Notice::InningsStarted {
            innings: 2,
            batting,
            target: Some(self.state.target),
        })
    }

    fn finish_match(&mut self) -> Effects {
        self.state.phase = Phase::Result;
        self.state.game_over = true;
        self.state.turn_lock = false;
        self.state.selected_number = None;

        let human_score = self.state.score(Side::Human);
        let opponent_score = self.state.score(Side::Opponent);
        let outcome = self.state.outcome().unwrap_or(Outcome::Tie);
        info!(
            "match {}: {} ({})",
            self.match_id,
            outcome,
            self.state.score_line()
        );
        Effects::notice(Notice::MatchFinished {
            outcome,
            human_score,
            opponent_score,
        })
    }

    fn schedule(&mut self, continuation: Continuation, tier: DelayTier) -> Scheduled {
        let id = ContinuationId(self.next_continuation);
        self.next_continuation += 1;

        let handle = self.scheduler.schedule(id, self.timings.delay(tier));
        self.pending.insert(
            id,
            PendingContinuation {
                continuation,
                handle,
            },
        );
        Scheduled { id, tier }
    }

    fn ensure_unlocked(&self) -> Result<(), MatchError> {
        if self.state.turn_lock {
            debug!("match {}: intent dropped, resolution in flight", self.match_id);
            return Err(ConcurrencyError::Locked.into());
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), MatchError> {
        if self.state.game_over {
            return Err(StateError::MatchOver.into());
        }
        if self.state.phase != expected {
            return Err(StateError::UnexpectedPhase {
                expected,
                actual: self.state.phase,
            }
            .into());
        }
        Ok(())
    }

    fn refuse_turn(&self, reason: &str) -> MatchError {
        warn!("match {}: turn refused: {}", self.match_id, reason);
        StateError::InvalidTurn.into()
    }
}

impl<R: RandomSource> MatchEngine<R, ManualScheduler> {
    /// Move the virtual clock forward, resuming everything that falls due,
    /// including continuations scheduled along the way.
    pub fn advance(&mut self, by: Duration) -> Result<Vec<Effects>, MatchError> {
        let until = self.scheduler.now() + by;
        let mut out = Vec::new();
        while let Some(id) = self.scheduler.pop_due(until) {
            out.push(self.resume(id)?);
        }
        self.scheduler.advance_to(until);
        Ok(out)
    }

    /// Resume continuations until none are outstanding.
    pub fn settle(&mut self) -> Result<Vec<Effects>, MatchError> {
        let mut out = Vec::new();
        while let Some(id) = self.scheduler.pop_next() {
            out.push(self.resume(id)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRandom;

    fn engine(numbers: impl IntoIterator<Item = u8>) -> MatchEngine<ScriptedRandom, ManualScheduler> {
        MatchEngine::new(
            1,
            ScriptedRandom::new(numbers),
            ManualScheduler::new(),
            Timings::default(),
        )
    }

    fn human_batting(numbers: impl IntoIterator<Item = u8>) -> MatchEngine<ScriptedRandom, ManualScheduler> {
        // Opponent guesses 4 against our 3: odd, human wins the toss.
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        engine.settle().unwrap();
        engine.choose_role(Role::Bat).unwrap();
        engine.rng_mut().push_numbers(numbers);
        engine
    }

    #[test]
    fn toss_winner_follows_parity() {
        for human in 1..=10u8 {
            for opponent in 1..=10u8 {
                for choice in [Parity::Odd, Parity::Even] {
                    let mut engine = engine([opponent]);
                    engine.start_game().unwrap();
                    engine.submit_toss(Some(choice), human as i64).unwrap();

                    let expected = if Parity::of((human + opponent) as u32) == choice {
                        Side::Human
                    } else {
                        Side::Opponent
                    };
                    assert_eq!(engine.state().toss.winner, Some(expected));
                    assert!(engine.state().turn_lock);
                }
            }
        }
    }

    #[test]
    fn toss_validation_leaves_state_unchanged() {
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        let before = engine.state().clone();

        assert_eq!(
            engine.submit_toss(None, 3),
            Err(MatchError::Validation(ValidationError::MissingChoice))
        );
        assert_eq!(
            engine.submit_toss(Some(Parity::Even), 11),
            Err(MatchError::Validation(ValidationError::OutOfRange { value: 11 }))
        );
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.pending_continuations(), 0);
    }

    #[test]
    fn second_toss_while_locked_is_refused() {
        let mut engine = engine([4, 5]);
        engine.start_game().unwrap();
        engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        let before = engine.state().clone();

        assert_eq!(
            engine.submit_toss(Some(Parity::Odd), 2),
            Err(MatchError::Concurrency(ConcurrencyError::Locked))
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn human_toss_win_waits_for_choice() {
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        let effects = engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        assert_eq!(effects.scheduled.map(|s| s.tier), Some(DelayTier::Fast));

        assert!(engine.advance(Duration::from_millis(999)).unwrap().is_empty());
        let fired = engine.advance(Duration::from_millis(1)).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].notices, vec![Notice::TossWonChooseRole]);
        assert_eq!(engine.state().phase, Phase::ChoicePending);
        assert!(!engine.state().turn_lock);
    }

    #[test]
    fn opponent_toss_win_applies_its_role_after_decision_delay() {
        // 3 + 3 = 6, even, human called odd.
        let mut engine = MatchEngine::new(
            1,
            ScriptedRandom::new([3]).with_roles([Role::Bowl]),
            ManualScheduler::new(),
            Timings::default(),
        );
        engine.start_game().unwrap();
        engine.submit_toss(Some(Parity::Odd), 3).unwrap();

        let fired = engine.advance(Duration::from_millis(1000)).unwrap();
        assert_eq!(fired[0].notices, vec![Notice::OpponentChoseRole { role: Role::Bowl }]);
        assert_eq!(fired[0].scheduled.map(|s| s.tier), Some(DelayTier::Decision));
        assert!(engine.state().turn_lock);
        assert_eq!(engine.choose_role(Role::Bat), Err(ConcurrencyError::Locked.into()));

        engine.advance(Duration::from_millis(3000)).unwrap();
        let state = engine.state();
        assert_eq!(state.phase, Phase::Innings);
        assert!(!state.turn_lock);
        assert_eq!(state.batting_side(), Some(Side::Human));
        assert_eq!(state.first_innings_batsman, Some(Side::Human));
    }

    #[test]
    fn choosing_bowl_puts_opponent_in() {
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        engine.settle().unwrap();

        let effects = engine.choose_role(Role::Bowl).unwrap();
        assert_eq!(
            effects.notices,
            vec![Notice::InningsStarted { innings: 1, batting: Side::Opponent, target: None }]
        );
        assert!(engine.state().player(Side::Opponent).is_batting);
        assert!(!engine.state().player(Side::Human).is_batting);
    }

    #[test]
    fn safe_turn_scores_batting_sides_number() {
        let mut engine = human_batting([2]);
        engine.select_number(7).unwrap();
        let effects = engine.play_turn().unwrap();

        assert_eq!(engine.state().score(Side::Human), 7);
        assert_eq!(engine.state().selected_number, None);
        assert!(!engine.state().turn_lock);
        assert!(effects.scheduled.is_none());
    }

    #[test]
    fn opponent_scores_its_own_draw() {
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        engine.settle().unwrap();
        engine.choose_role(Role::Bowl).unwrap();
        engine.rng_mut().push_numbers([9]);

        engine.select_number(2).unwrap();
        engine.play_turn().unwrap();
        assert_eq!(engine.state().score(Side::Opponent), 9);
        assert_eq!(engine.state().score(Side::Human), 0);
    }

    #[test]
    fn dismissal_keeps_score_and_ends_innings() {
        let mut engine = human_batting([5, 5]);
        engine.select_number(3).unwrap();
        engine.play_turn().unwrap();
        engine.select_number(5).unwrap();
        let effects = engine.play_turn().unwrap();

        assert!(matches!(effects.notices[0], Notice::Dismissal { batsman: Side::Human, .. }));
        assert_eq!(engine.state().score(Side::Human), 3);
        assert!(engine.state().turn_lock);

        engine.settle().unwrap();
        let state = engine.state();
        assert_eq!(state.innings_number, 2);
        assert_eq!(state.target, 3);
        assert_eq!(state.batting_side(), Some(Side::Opponent));
        assert!(!state.turn_lock);
    }

    #[test]
    fn play_turn_refusal_is_idempotent() {
        let mut engine = human_batting([6]);
        engine.select_number(6).unwrap();
        engine.play_turn().unwrap();
        let before = engine.state().clone();

        assert_eq!(engine.play_turn(), Err(StateError::InvalidTurn.into()));
        assert_eq!(engine.play_turn(), Err(StateError::InvalidTurn.into()));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn selection_refused_while_locked() {
        let mut engine = human_batting([6]);
        engine.select_number(6).unwrap();
        engine.play_turn().unwrap();
        assert_eq!(engine.select_number(2), Err(ConcurrencyError::Locked.into()));
        assert_eq!(engine.state().selected_number, None);
    }

    #[test]
    fn declare_rules() {
        let mut engine = human_batting([1]);
        assert_eq!(engine.declare_innings(), Err(StateError::DeclareNotAllowed.into()));

        engine.select_number(4).unwrap();
        engine.play_turn().unwrap();
        let effects = engine.declare_innings().unwrap();
        assert_eq!(effects.notices, vec![Notice::Declared { score: 4 }]);
        assert_eq!(engine.declare_innings(), Err(StateError::DeclareNotAllowed.into()));

        engine.settle().unwrap();
        assert_eq!(engine.state().target, 4);
        assert_eq!(engine.state().innings_number, 2);
        assert_eq!(engine.declare_innings(), Err(StateError::DeclareNotAllowed.into()));
    }

    #[test]
    fn stale_continuation_is_ignored() {
        let mut engine = engine([4]);
        engine.start_game().unwrap();
        let effects = engine.submit_toss(Some(Parity::Odd), 3).unwrap();
        let id = effects.scheduled.unwrap().id;

        engine.reset();
        assert_eq!(engine.scheduler().pending(), 0);
        assert_eq!(engine.resume(id), Ok(Effects::none()));
        assert_eq!(engine.state(), &MatchState::default());
    }

    #[test]
    fn operations_after_result_are_refused() {
        let mut engine = human_batting([2, 2]);
        engine.select_number(2).unwrap();
        engine.play_turn().unwrap();
        engine.settle().unwrap();
        engine.select_number(1).unwrap();
        engine.play_turn().unwrap();
        engine.settle().unwrap();

        assert_eq!(engine.state().phase, Phase::Result);
        assert!(engine.state().game_over);
        assert_eq!(engine.select_number(3), Err(StateError::MatchOver.into()));
        assert_eq!(engine.start_game(), Err(StateError::MatchOver.into()));
        assert_eq!(engine.declare_innings(), Err(StateError::MatchOver.into()));
        assert_eq!(engine.choose_role(Role::Bowl), Err(StateError::MatchOver.into()));
        assert_eq!(engine.play_turn(), Err(StateError::InvalidTurn.into()));
    }
}
