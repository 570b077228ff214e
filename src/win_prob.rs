use serde::Serialize;

use crate::rates::RateParameters;

/// Extra probability mass placed on "no more goals" for each side.
pub const P_ZERO: f64 = 0.06;
/// Additional goals per side enumerated by the score grid (0..=MAX_GOALS).
pub const MAX_GOALS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scoreline {
    pub home: i32,
    pub away: i32,
    pub probability: f64,
}

/// Joint probabilities of the remaining goals for each side, laid on top of
/// the current score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    goals_home: i32,
    goals_away: i32,
    // cells[i][j] = P(home adds i, away adds j); not normalised.
    cells: [[f64; MAX_GOALS + 1]; MAX_GOALS + 1],
}

pub fn zero_inflated_poisson(lambda: f64, k: u32, p_zero: f64) -> f64 {
    let e = (-lambda).exp();
    if k == 0 {
        return p_zero + (1.0 - p_zero) * e;
    }
    (1.0 - p_zero) * lambda.powi(k as i32) * e / factorial(k)
}

fn factorial(k: u32) -> f64 {
    (1..=k).map(f64::from).product()
}

fn zip_pmf(lambda: f64) -> [f64; MAX_GOALS + 1] {
    let mut out = [0.0; MAX_GOALS + 1];
    for (k, p) in out.iter_mut().enumerate() {
        *p = zero_inflated_poisson(lambda, k as u32, P_ZERO);
    }
    out
}

impl ScoreGrid {
    pub fn new(goals_home: i32, goals_away: i32, rates: RateParameters) -> Self {
        let pmf_h = zip_pmf(rates.lambda_home);
        let pmf_a = zip_pmf(rates.lambda_away);

        let mut cells = [[0.0; MAX_GOALS + 1]; MAX_GOALS + 1];
        for (i, p_i) in pmf_h.iter().enumerate() {
            for (j, p_j) in pmf_a.iter().enumerate() {
                cells[i][j] = p_i * p_j;
            }
        }
        Self {
            goals_home,
            goals_away,
            cells,
        }
    }

    /// Sum of every cell. Below 1.0 because the grid is truncated.
    pub fn mass(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    fn final_score(&self, i: usize, j: usize) -> (i32, i32) {
        (
            self.goals_home.saturating_add(i as i32),
            self.goals_away.saturating_add(j as i32),
        )
    }

    /// Home/draw/away normalised over the grid. All zero when the grid holds
    /// no usable mass.
    pub fn outcomes(&self) -> OutcomeProbabilities {
        let mut p_home = 0.0;
        let mut p_draw = 0.0;
        let mut p_away = 0.0;

        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                let (fh, fa) = self.final_score(i, j);
                if fh > fa {
                    p_home += p;
                } else if fh < fa {
                    p_away += p;
                } else {
                    p_draw += p;
                }
            }
        }

        let sum = p_home + p_draw + p_away;
        if sum > 0.0 && sum.is_finite() {
            OutcomeProbabilities {
                home: p_home / sum,
                draw: p_draw / sum,
                away: p_away / sum,
            }
        } else {
            OutcomeProbabilities::default()
        }
    }

    /// Most likely final scores, best first. Probabilities share the
    /// grid normalisation used by [`ScoreGrid::outcomes`].
    pub fn top_scorelines(&self, n: usize) -> Vec<Scoreline> {
        let mass = self.mass();
        if !(mass > 0.0 && mass.is_finite()) {
            return Vec::new();
        }
        let mut all = Vec::with_capacity((MAX_GOALS + 1) * (MAX_GOALS + 1));
        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                let (home, away) = self.final_score(i, j);
                all.push(Scoreline {
                    home,
                    away,
                    probability: p / mass,
                });
            }
        }
        all.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        all.truncate(n);
        all
    }
}

pub fn outcome_probabilities(
    goals_home: i32,
    goals_away: i32,
    rates: RateParameters,
) -> OutcomeProbabilities {
    ScoreGrid::new(goals_home, goals_away, rates).outcomes()
}
