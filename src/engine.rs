use serde::Serialize;

use crate::odds::{self, FairOdds, MarketImplied, Outcome, Recommendation};
use crate::rates::{self, RateParameters, STEPS, StepOutcome};
use crate::snapshot::{LiveOdds, MatchSnapshot};
use crate::win_prob::{OutcomeProbabilities, ScoreGrid, Scoreline};

pub const DEFAULT_TOP_SCORES: usize = 3;

/// Everything one calculation produces. Built from scratch on every call;
/// nothing carries over between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvaluation {
    pub rates: RateParameters,
    pub steps: Vec<StepOutcome>,
    pub probabilities: OutcomeProbabilities,
    pub fair_odds: [FairOdds; 3],
    pub live_odds: LiveOdds,
    pub recommendations: [Recommendation; 3],
    pub market: Option<MarketImplied>,
    pub top_scorelines: Vec<Scoreline>,
}

impl MatchEvaluation {
    pub fn recommendation(&self, outcome: Outcome) -> &Recommendation {
        match outcome {
            Outcome::Home => &self.recommendations[0],
            Outcome::Draw => &self.recommendations[1],
            Outcome::Away => &self.recommendations[2],
        }
    }
}

pub fn evaluate(snapshot: &MatchSnapshot) -> MatchEvaluation {
    evaluate_with(snapshot, DEFAULT_TOP_SCORES)
}

pub fn evaluate_with(snapshot: &MatchSnapshot, top_scores: usize) -> MatchEvaluation {
    let steps = rates::estimate_rates_traced(snapshot);
    let rates = steps[STEPS.len() - 1].rates;

    let grid = ScoreGrid::new(snapshot.home_goals, snapshot.away_goals, rates);
    let probabilities = grid.outcomes();
    let live_odds = snapshot.live_odds();

    MatchEvaluation {
        rates,
        steps,
        probabilities,
        fair_odds: odds::fair_odds(&probabilities),
        live_odds,
        recommendations: odds::evaluate_market(&probabilities, &live_odds, snapshot.profit),
        market: odds::market_implied(&live_odds),
        top_scorelines: grid.top_scorelines(top_scores),
    }
}
