use std::fmt;

use serde::Serialize;

use crate::snapshot::LiveOdds;
use crate::win_prob::OutcomeProbabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Home => "Home",
            Outcome::Draw => "Draw",
            Outcome::Away => "Away",
        }
    }

    pub fn probability(self, probs: &OutcomeProbabilities) -> f64 {
        match self {
            Outcome::Home => probs.home,
            Outcome::Draw => probs.draw,
            Outcome::Away => probs.away,
        }
    }

    pub fn live_odds(self, live: &LiveOdds) -> f64 {
        match self {
            Outcome::Home => live.home,
            Outcome::Draw => live.draw,
            Outcome::Away => live.away,
        }
    }
}

/// Break-even decimal price. A zero-probability outcome has no finite price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FairOdds {
    Finite(f64),
    Unbounded,
}

impl FairOdds {
    pub fn from_probability(p: f64) -> Self {
        if p > 0.0 {
            FairOdds::Finite(1.0 / p)
        } else {
            FairOdds::Unbounded
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            FairOdds::Finite(v) => v,
            FairOdds::Unbounded => f64::INFINITY,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, FairOdds::Unbounded)
    }
}

impl fmt::Display for FairOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FairOdds::Finite(v) => write!(f, "{v:.2}"),
            FairOdds::Unbounded => f.write_str("∞"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationKind {
    Lay,
    Back,
    NoEdge,
}

impl RecommendationKind {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationKind::Lay => "lay",
            RecommendationKind::Back => "back",
            RecommendationKind::NoEdge => "none",
        }
    }

    /// Named display color; "default" is the terminal's own foreground.
    pub fn suggested_color(self) -> &'static str {
        match self {
            RecommendationKind::Lay => "red",
            RecommendationKind::Back => "blue",
            RecommendationKind::NoEdge => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub outcome: Outcome,
    pub kind: RecommendationKind,
    pub fair_odds: FairOdds,
    pub live_odds: f64,
    /// Signed fraction, 0 when there is no edge.
    pub edge: f64,
    /// Lay stake for `Lay`, back profit for `Back`, 0 otherwise.
    pub amount: f64,
}

impl Recommendation {
    pub fn edge_percent(&self) -> f64 {
        self.edge * 100.0
    }
}

/// Compares one fair price to the market price.
///
/// Fair above live is a lay: the stake treats `profit` as the liability
/// budget and is 0 when the live price is not above 1.0. Fair below live is a
/// back, paying `profit * (live - 1)`. Anything else (equal prices, NaN) is
/// no edge.
pub fn evaluate_outcome(
    outcome: Outcome,
    fair: FairOdds,
    live: f64,
    profit: f64,
) -> Recommendation {
    let fair_v = fair.as_f64();
    let (kind, edge, amount) = if fair_v > live {
        let edge = match fair {
            FairOdds::Finite(f) => (f - live) / f,
            // Limit of (fair - live) / fair as fair grows.
            FairOdds::Unbounded => 1.0,
        };
        let stake = if live > 1.0 { profit / (live - 1.0) } else { 0.0 };
        (RecommendationKind::Lay, edge, stake)
    } else if fair_v < live {
        let edge = (live - fair_v) / fair_v;
        (RecommendationKind::Back, edge, profit * (live - 1.0))
    } else {
        (RecommendationKind::NoEdge, 0.0, 0.0)
    };

    Recommendation {
        outcome,
        kind,
        fair_odds: fair,
        live_odds: live,
        edge,
        amount,
    }
}

pub fn fair_odds(probs: &OutcomeProbabilities) -> [FairOdds; 3] {
    Outcome::ALL.map(|o| FairOdds::from_probability(o.probability(probs)))
}

/// One recommendation per outcome, in home/draw/away order.
pub fn evaluate_market(
    probs: &OutcomeProbabilities,
    live: &LiveOdds,
    profit: f64,
) -> [Recommendation; 3] {
    let fair = fair_odds(probs);
    std::array::from_fn(|i| {
        let o = Outcome::ALL[i];
        evaluate_outcome(o, fair[i], o.live_odds(live), profit)
    })
}

/// Market probabilities with the bookmaker margin removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketImplied {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    /// Sum of raw implied probabilities minus one.
    pub overround: f64,
}

pub fn market_implied(live: &LiveOdds) -> Option<MarketImplied> {
    if !(live.home > 1.0 && live.draw > 1.0 && live.away > 1.0) {
        return None;
    }
    let ih = 1.0 / live.home;
    let id = 1.0 / live.draw;
    let ia = 1.0 / live.away;
    let sum = ih + id + ia;
    if !(sum > 0.0 && sum.is_finite()) {
        return None;
    }
    Some(MarketImplied {
        home: ih / sum,
        draw: id / sum,
        away: ia / sum,
        overround: sum - 1.0,
    })
}
