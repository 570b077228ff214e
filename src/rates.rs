//! Scoring-rate estimation: turns a [`MatchSnapshot`] into the expected
//! number of additional goals for each side.
//!
//! The estimate is an ordered chain of named steps. Each step reads the
//! previous step's rates, so order matters. Outputs are clamped at zero after
//! every step and the last step floors both rates at [`RATE_FLOOR`].

use serde::Serialize;

use crate::snapshot::{MatchSnapshot, Side, SideInputs};

pub const RATE_FLOOR: f64 = 0.1;

const DECAY_PER_MINUTE: f64 = 0.01;
const DECAY_MIN: f64 = 0.6;
const HOT_XG_FOR_DECAY: f64 = 1.5;
const HOT_DECAY_MULT: f64 = 1.15;
const CLOSING_MINUTES: f64 = 10.0;
const CLOSING_DECAY_MULT: f64 = 0.65;

const LATE_GAME_MINUTE: f64 = 75.0;

const IN_PLAY_WEIGHT: f64 = 0.85;
const PRE_MATCH_WEIGHT: f64 = 0.15;
const CONCEDED_FLOOR: f64 = 0.75;

const HIGH_THREAT_XG: f64 = 1.2;
const HIGH_THREAT_MULT: f64 = 1.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RateParameters {
    pub lambda_home: f64,
    pub lambda_away: f64,
}

impl RateParameters {
    pub fn new(lambda_home: f64, lambda_away: f64) -> Self {
        Self {
            lambda_home,
            lambda_away,
        }
    }

    fn scale(self, home: f64, away: f64) -> Self {
        Self::new(self.lambda_home * home, self.lambda_away * away)
    }

    fn clamp_non_negative(self) -> Self {
        // f64::max drops NaN, so a NaN rate collapses to zero here.
        Self::new(self.lambda_home.max(0.0), self.lambda_away.max(0.0))
    }
}

/// One named adjustment in the chain.
#[derive(Clone, Copy)]
pub struct RateStep {
    pub name: &'static str,
    pub apply: fn(&MatchSnapshot, RateParameters) -> RateParameters,
}

impl std::fmt::Debug for RateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateStep").field("name", &self.name).finish()
    }
}

pub const STEPS: [RateStep; 11] = [
    RateStep {
        name: "base rate",
        apply: base_rate,
    },
    RateStep {
        name: "time decay",
        apply: time_decay,
    },
    RateStep {
        name: "scoreline",
        apply: scoreline,
    },
    RateStep {
        name: "late chase",
        apply: late_chase,
    },
    RateStep {
        name: "pre-match blend",
        apply: pre_match_blend,
    },
    RateStep {
        name: "possession",
        apply: possession,
    },
    RateStep {
        name: "high threat",
        apply: high_threat,
    },
    RateStep {
        name: "shots on target",
        apply: shots_on_target,
    },
    RateStep {
        name: "box touches",
        apply: box_touches,
    },
    RateStep {
        name: "corners",
        apply: corners,
    },
    RateStep {
        name: "rate floor",
        apply: rate_floor,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepOutcome {
    pub name: &'static str,
    pub rates: RateParameters,
}

pub fn estimate_rates(snapshot: &MatchSnapshot) -> RateParameters {
    STEPS.iter().fold(RateParameters::default(), |rates, step| {
        (step.apply)(snapshot, rates).clamp_non_negative()
    })
}

/// Same chain as [`estimate_rates`], keeping the rates after every step.
pub fn estimate_rates_traced(snapshot: &MatchSnapshot) -> Vec<StepOutcome> {
    let mut rates = RateParameters::default();
    let mut out = Vec::with_capacity(STEPS.len());
    for step in &STEPS {
        rates = (step.apply)(snapshot, rates).clamp_non_negative();
        out.push(StepOutcome {
            name: step.name,
            rates,
        });
    }
    out
}

fn per_side(
    snapshot: &MatchSnapshot,
    rates: RateParameters,
    f: impl Fn(f64, &SideInputs) -> f64,
) -> RateParameters {
    RateParameters::new(
        f(rates.lambda_home, &snapshot.side(Side::Home)),
        f(rates.lambda_away, &snapshot.side(Side::Away)),
    )
}

// In-game xG so far plus the pre-match xG prorated over what's left.
fn base_rate(snapshot: &MatchSnapshot, _rates: RateParameters) -> RateParameters {
    let remaining = snapshot.remaining_minutes();
    let base = |s: &SideInputs| s.in_game_xg + s.pre_match_xg * remaining / 90.0;
    RateParameters::new(
        base(&snapshot.side(Side::Home)),
        base(&snapshot.side(Side::Away)),
    )
}

fn time_decay(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    let elapsed = snapshot.elapsed_minutes;
    let remaining = snapshot.remaining_minutes();
    per_side(snapshot, rates, |rate, s| {
        let mut decay = (-DECAY_PER_MINUTE * elapsed).exp().max(DECAY_MIN);
        if s.in_game_xg > HOT_XG_FOR_DECAY {
            decay *= HOT_DECAY_MULT;
        } else if remaining < CLOSING_MINUTES {
            decay *= CLOSING_DECAY_MULT;
        }
        (rate * decay).max(RATE_FLOOR)
    })
}

// A two-goal margin damps home either way; only away's multiplier depends on
// who leads.
fn scoreline(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    let diff = snapshot.goal_diff();
    match diff {
        1 => rates.scale(0.9, 1.2),
        -1 => rates.scale(1.2, 0.9),
        0 => rates.scale(1.05, 1.05),
        _ => rates.scale(0.8, if diff > 0 { 1.3 } else { 0.8 }),
    }
}

fn late_chase(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    let diff = snapshot.goal_diff();
    if snapshot.elapsed_minutes > LATE_GAME_MINUTE && diff != 0 {
        rates.scale(0.85, if diff > 0 { 1.15 } else { 0.85 })
    } else {
        rates
    }
}

fn pre_match_blend(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        let strength = s.avg_scored / s.opp_avg_conceded.max(CONCEDED_FLOOR);
        rate * IN_PLAY_WEIGHT + strength * PRE_MATCH_WEIGHT
    })
}

fn possession(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        rate * (1.0 + (s.possession - 50.0) / 200.0)
    })
}

fn high_threat(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        if s.in_game_xg > HIGH_THREAT_XG {
            rate * HIGH_THREAT_MULT
        } else {
            rate
        }
    })
}

fn shots_on_target(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        rate * (1.0 + s.shots_on_target as f64 / 20.0)
    })
}

fn box_touches(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        rate * (1.0 + (s.box_touches - 20.0) / 200.0)
    })
}

fn corners(snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    per_side(snapshot, rates, |rate, s| {
        rate * (1.0 + (s.corners - 4.0) / 50.0)
    })
}

fn rate_floor(_snapshot: &MatchSnapshot, rates: RateParameters) -> RateParameters {
    RateParameters::new(
        rates.lambda_home.max(RATE_FLOOR),
        rates.lambda_away.max(RATE_FLOOR),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> MatchSnapshot {
        // Inputs that leave every tilt step at x1.
        MatchSnapshot {
            home_possession: 50.0,
            away_possession: 50.0,
            home_box_touches: 20.0,
            away_box_touches: 20.0,
            home_corners: 4.0,
            away_corners: 4.0,
            ..MatchSnapshot::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn kickoff_rate_is_pre_match_xg_with_open_game_bump() {
        let snap = MatchSnapshot {
            home_xg: 1.6,
            away_xg: 1.0,
            ..neutral()
        };
        let r = estimate_rates(&snap);
        // base 1.6, decay 1.0, level x1.05, blend x0.85 (no averages).
        assert!(close(r.lambda_home, 1.6 * 1.05 * 0.85));
        assert!(close(r.lambda_away, 1.0 * 1.05 * 0.85));
    }

    #[test]
    fn decay_is_floored_at_sixty_percent() {
        let snap = MatchSnapshot {
            in_game_home_xg: 1.0,
            elapsed_minutes: 80.0,
            ..neutral()
        };
        let r = time_decay(&snap, RateParameters::new(1.0, 1.0));
        // exp(-0.8) < 0.6, remaining 10 is not < 10 so no closing multiplier.
        assert!(close(r.lambda_home, 0.6));
    }

    #[test]
    fn hot_xg_beats_closing_minutes_branch() {
        let snap = MatchSnapshot {
            in_game_home_xg: 1.6,
            in_game_away_xg: 0.4,
            elapsed_minutes: 85.0,
            ..neutral()
        };
        let r = time_decay(&snap, RateParameters::new(1.0, 1.0));
        assert!(close(r.lambda_home, 0.6 * 1.15));
        assert!(close(r.lambda_away, 0.6 * 0.65));
    }

    #[test]
    fn decay_step_floors_small_rates() {
        let r = time_decay(&neutral(), RateParameters::new(0.01, 0.0));
        assert_eq!(r, RateParameters::new(RATE_FLOOR, RATE_FLOOR));
    }

    #[test]
    fn scoreline_two_goal_margin_is_asymmetric() {
        let one = RateParameters::new(1.0, 1.0);
        let home_up = MatchSnapshot {
            home_goals: 3,
            away_goals: 1,
            ..neutral()
        };
        let away_up = MatchSnapshot {
            home_goals: 0,
            away_goals: 2,
            ..neutral()
        };
        assert_eq!(scoreline(&home_up, one), RateParameters::new(0.8, 1.3));
        assert_eq!(scoreline(&away_up, one), RateParameters::new(0.8, 0.8));
    }

    #[test]
    fn scoreline_one_goal_and_level() {
        let one = RateParameters::new(1.0, 1.0);
        let lead = MatchSnapshot {
            home_goals: 1,
            ..neutral()
        };
        let trail = MatchSnapshot {
            away_goals: 1,
            ..neutral()
        };
        assert_eq!(scoreline(&lead, one), RateParameters::new(0.9, 1.2));
        assert_eq!(scoreline(&trail, one), RateParameters::new(1.2, 0.9));
        assert_eq!(scoreline(&neutral(), one), RateParameters::new(1.05, 1.05));
    }

    #[test]
    fn late_chase_needs_minute_75_and_a_lead() {
        let one = RateParameters::new(1.0, 1.0);
        let late_lead = MatchSnapshot {
            home_goals: 1,
            elapsed_minutes: 76.0,
            ..neutral()
        };
        let late_level = MatchSnapshot {
            elapsed_minutes: 80.0,
            ..neutral()
        };
        let early_lead = MatchSnapshot {
            home_goals: 1,
            elapsed_minutes: 75.0,
            ..neutral()
        };
        assert_eq!(late_chase(&late_lead, one), RateParameters::new(0.85, 1.15));
        assert_eq!(late_chase(&late_level, one), one);
        assert_eq!(late_chase(&early_lead, one), one);
    }

    #[test]
    fn late_chase_damps_both_sides_when_away_leads() {
        let one = RateParameters::new(1.0, 1.0);
        let late_trail = MatchSnapshot {
            away_goals: 1,
            elapsed_minutes: 80.0,
            ..neutral()
        };
        assert_eq!(late_chase(&late_trail, one), RateParameters::new(0.85, 0.85));

        let late_two_down = MatchSnapshot {
            away_goals: 2,
            elapsed_minutes: 80.0,
            ..neutral()
        };
        let r = late_chase(&late_two_down, scoreline(&late_two_down, one));
        assert!(close(r.lambda_home, 0.8 * 0.85));
        assert!(close(r.lambda_away, 0.8 * 0.85));
    }

    #[test]
    fn blend_floors_conceded_denominator() {
        let snap = MatchSnapshot {
            home_avg_scored: 1.5,
            away_avg_conceded: 0.3,
            away_avg_scored: 1.2,
            home_avg_conceded: 1.2,
            ..neutral()
        };
        let r = pre_match_blend(&snap, RateParameters::new(1.0, 1.0));
        assert!(close(r.lambda_home, 0.85 + (1.5 / 0.75) * 0.15));
        assert!(close(r.lambda_away, 0.85 + 1.0 * 0.15));
    }

    #[test]
    fn tilts_move_in_expected_directions() {
        let snap = MatchSnapshot {
            home_possession: 100.0,
            away_possession: 0.0,
            home_sot: 4,
            home_box_touches: 40.0,
            away_box_touches: 0.0,
            home_corners: 9.0,
            away_corners: 0.0,
            ..MatchSnapshot::default()
        };
        let one = RateParameters::new(1.0, 1.0);
        let p = possession(&snap, one);
        assert!(close(p.lambda_home, 1.25) && close(p.lambda_away, 0.75));
        assert!(close(shots_on_target(&snap, one).lambda_home, 1.2));
        let b = box_touches(&snap, one);
        assert!(close(b.lambda_home, 1.1) && close(b.lambda_away, 0.9));
        assert!(close(corners(&snap, one).lambda_home, 1.1));
        assert!(close(corners(&snap, one).lambda_away, 0.92));
    }

    #[test]
    fn high_threat_steps_up_across_threshold() {
        let below = MatchSnapshot {
            in_game_home_xg: 1.19,
            ..neutral()
        };
        let above = MatchSnapshot {
            in_game_home_xg: 1.21,
            ..neutral()
        };
        let lo = estimate_rates(&below).lambda_home;
        let hi = estimate_rates(&above).lambda_home;
        assert!(hi > lo * 1.14);
    }

    #[test]
    fn trace_ends_with_estimate() {
        let snap = MatchSnapshot {
            home_xg: 1.3,
            away_xg: 0.9,
            elapsed_minutes: 30.0,
            in_game_home_xg: 0.7,
            home_goals: 1,
            ..neutral()
        };
        let trace = estimate_rates_traced(&snap);
        assert_eq!(trace.len(), STEPS.len());
        assert_eq!(trace[0].name, "base rate");
        assert_eq!(trace.last().unwrap().rates, estimate_rates(&snap));
    }

    #[test]
    fn extreme_inputs_stay_above_floor() {
        let snap = MatchSnapshot {
            elapsed_minutes: 200.0,
            home_xg: 5.0,
            home_possession: -400.0,
            away_possession: 500.0,
            away_sot: -40,
            home_box_touches: -1000.0,
            away_corners: f64::NAN,
            ..MatchSnapshot::default()
        };
        let r = estimate_rates(&snap);
        assert!(r.lambda_home >= RATE_FLOOR);
        assert!(r.lambda_away >= RATE_FLOOR);
    }
}
