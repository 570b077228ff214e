use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Current match state as typed into the form. Built fresh for every
/// calculation; every field defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSnapshot {
    pub home_avg_scored: f64,
    pub home_avg_conceded: f64,
    pub away_avg_scored: f64,
    pub away_avg_conceded: f64,
    pub home_xg: f64,
    pub away_xg: f64,
    pub elapsed_minutes: f64,
    pub home_goals: i32,
    pub away_goals: i32,
    pub in_game_home_xg: f64,
    pub in_game_away_xg: f64,
    pub home_possession: f64,
    pub away_possession: f64,
    pub home_sot: i32,
    pub away_sot: i32,
    pub home_box_touches: f64,
    pub away_box_touches: f64,
    pub home_corners: f64,
    pub away_corners: f64,
    pub live_odds_home: f64,
    pub live_odds_draw: f64,
    pub live_odds_away: f64,
    // Liability budget for lays, stake for backs.
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

/// Everything one side's rate depends on, with the opponent's conceded
/// average already paired in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideInputs {
    pub pre_match_xg: f64,
    pub in_game_xg: f64,
    pub avg_scored: f64,
    pub opp_avg_conceded: f64,
    pub possession: f64,
    pub shots_on_target: i32,
    pub box_touches: f64,
    pub corners: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl MatchSnapshot {
    pub fn side(&self, side: Side) -> SideInputs {
        match side {
            Side::Home => SideInputs {
                pre_match_xg: self.home_xg,
                in_game_xg: self.in_game_home_xg,
                avg_scored: self.home_avg_scored,
                opp_avg_conceded: self.away_avg_conceded,
                possession: self.home_possession,
                shots_on_target: self.home_sot,
                box_touches: self.home_box_touches,
                corners: self.home_corners,
            },
            Side::Away => SideInputs {
                pre_match_xg: self.away_xg,
                in_game_xg: self.in_game_away_xg,
                avg_scored: self.away_avg_scored,
                opp_avg_conceded: self.home_avg_conceded,
                possession: self.away_possession,
                shots_on_target: self.away_sot,
                box_touches: self.away_box_touches,
                corners: self.away_corners,
            },
        }
    }

    pub fn goal_diff(&self) -> i32 {
        self.home_goals.saturating_sub(self.away_goals)
    }

    pub fn remaining_minutes(&self) -> f64 {
        // Not clamped: stoppage time past 90 goes negative.
        90.0 - self.elapsed_minutes
    }

    pub fn live_odds(&self) -> LiveOdds {
        LiveOdds {
            home: self.live_odds_home,
            draw: self.live_odds_draw,
            away: self.live_odds_away,
        }
    }

    pub fn value(&self, field: FieldId) -> f64 {
        match field {
            FieldId::HomeAvgScored => self.home_avg_scored,
            FieldId::HomeAvgConceded => self.home_avg_conceded,
            FieldId::AwayAvgScored => self.away_avg_scored,
            FieldId::AwayAvgConceded => self.away_avg_conceded,
            FieldId::HomeXg => self.home_xg,
            FieldId::AwayXg => self.away_xg,
            FieldId::ElapsedMinutes => self.elapsed_minutes,
            FieldId::HomeGoals => self.home_goals as f64,
            FieldId::AwayGoals => self.away_goals as f64,
            FieldId::InGameHomeXg => self.in_game_home_xg,
            FieldId::InGameAwayXg => self.in_game_away_xg,
            FieldId::HomePossession => self.home_possession,
            FieldId::AwayPossession => self.away_possession,
            FieldId::HomeSot => self.home_sot as f64,
            FieldId::AwaySot => self.away_sot as f64,
            FieldId::HomeBoxTouches => self.home_box_touches,
            FieldId::AwayBoxTouches => self.away_box_touches,
            FieldId::HomeCorners => self.home_corners,
            FieldId::AwayCorners => self.away_corners,
            FieldId::LiveOddsHome => self.live_odds_home,
            FieldId::LiveOddsDraw => self.live_odds_draw,
            FieldId::LiveOddsAway => self.live_odds_away,
            FieldId::Profit => self.profit,
        }
    }

    /// Whole-number fields truncate (saturating) toward zero.
    pub fn set_value(&mut self, field: FieldId, value: f64) {
        let whole = value as i32;
        match field {
            FieldId::HomeAvgScored => self.home_avg_scored = value,
            FieldId::HomeAvgConceded => self.home_avg_conceded = value,
            FieldId::AwayAvgScored => self.away_avg_scored = value,
            FieldId::AwayAvgConceded => self.away_avg_conceded = value,
            FieldId::HomeXg => self.home_xg = value,
            FieldId::AwayXg => self.away_xg = value,
            FieldId::ElapsedMinutes => self.elapsed_minutes = value,
            FieldId::HomeGoals => self.home_goals = whole,
            FieldId::AwayGoals => self.away_goals = whole,
            FieldId::InGameHomeXg => self.in_game_home_xg = value,
            FieldId::InGameAwayXg => self.in_game_away_xg = value,
            FieldId::HomePossession => self.home_possession = value,
            FieldId::AwayPossession => self.away_possession = value,
            FieldId::HomeSot => self.home_sot = whole,
            FieldId::AwaySot => self.away_sot = whole,
            FieldId::HomeBoxTouches => self.home_box_touches = value,
            FieldId::AwayBoxTouches => self.away_box_touches = value,
            FieldId::HomeCorners => self.home_corners = value,
            FieldId::AwayCorners => self.away_corners = value,
            FieldId::LiveOddsHome => self.live_odds_home = value,
            FieldId::LiveOddsDraw => self.live_odds_draw = value,
            FieldId::LiveOddsAway => self.live_odds_away = value,
            FieldId::Profit => self.profit = value,
        }
    }
}

/// Reads a JSON snapshot. Missing fields default to zero.
pub fn load_snapshot(path: &Path) -> Result<MatchSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse snapshot {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Real,
    Whole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    HomeAvgScored,
    HomeAvgConceded,
    AwayAvgScored,
    AwayAvgConceded,
    HomeXg,
    AwayXg,
    ElapsedMinutes,
    HomeGoals,
    AwayGoals,
    InGameHomeXg,
    InGameAwayXg,
    HomePossession,
    AwayPossession,
    HomeSot,
    AwaySot,
    HomeBoxTouches,
    AwayBoxTouches,
    HomeCorners,
    AwayCorners,
    LiveOddsHome,
    LiveOddsDraw,
    LiveOddsAway,
    Profit,
}

impl FieldId {
    /// Form order.
    pub const ALL: [FieldId; 23] = [
        FieldId::HomeAvgScored,
        FieldId::HomeAvgConceded,
        FieldId::AwayAvgScored,
        FieldId::AwayAvgConceded,
        FieldId::HomeXg,
        FieldId::AwayXg,
        FieldId::ElapsedMinutes,
        FieldId::HomeGoals,
        FieldId::AwayGoals,
        FieldId::InGameHomeXg,
        FieldId::InGameAwayXg,
        FieldId::HomePossession,
        FieldId::AwayPossession,
        FieldId::HomeSot,
        FieldId::AwaySot,
        FieldId::HomeBoxTouches,
        FieldId::AwayBoxTouches,
        FieldId::HomeCorners,
        FieldId::AwayCorners,
        FieldId::LiveOddsHome,
        FieldId::LiveOddsDraw,
        FieldId::LiveOddsAway,
        FieldId::Profit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::HomeAvgScored => "Home Avg Goals Scored",
            FieldId::HomeAvgConceded => "Home Avg Goals Conceded",
            FieldId::AwayAvgScored => "Away Avg Goals Scored",
            FieldId::AwayAvgConceded => "Away Avg Goals Conceded",
            FieldId::HomeXg => "Home Xg",
            FieldId::AwayXg => "Away Xg",
            FieldId::ElapsedMinutes => "Elapsed Minutes",
            FieldId::HomeGoals => "Home Goals",
            FieldId::AwayGoals => "Away Goals",
            FieldId::InGameHomeXg => "In-Game Home Xg",
            FieldId::InGameAwayXg => "In-Game Away Xg",
            FieldId::HomePossession => "Home Possession %",
            FieldId::AwayPossession => "Away Possession %",
            FieldId::HomeSot => "Home Shots on Target",
            FieldId::AwaySot => "Away Shots on Target",
            FieldId::HomeBoxTouches => "Home Opp Box Touches",
            FieldId::AwayBoxTouches => "Away Opp Box Touches",
            FieldId::HomeCorners => "Home Corners",
            FieldId::AwayCorners => "Away Corners",
            FieldId::LiveOddsHome => "Live Odds Home",
            FieldId::LiveOddsDraw => "Live Odds Draw",
            FieldId::LiveOddsAway => "Live Odds Away",
            FieldId::Profit => "Profit",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::HomeGoals | FieldId::AwayGoals | FieldId::HomeSot | FieldId::AwaySot => {
                FieldKind::Whole
            }
            _ => FieldKind::Real,
        }
    }

    /// Parses form text for this field. Blank text means zero.
    pub fn parse(self, raw: &str) -> Result<f64> {
        let s = raw.trim();
        if s.is_empty() {
            return Ok(0.0);
        }
        match self.kind() {
            FieldKind::Whole => {
                let v = s
                    .parse::<i32>()
                    .with_context(|| format!("{}: expected a whole number, got {s:?}", self.label()))?;
                Ok(v as f64)
            }
            FieldKind::Real => {
                let v = s
                    .parse::<f64>()
                    .with_context(|| format!("{}: expected a number, got {s:?}", self.label()))?;
                if !v.is_finite() {
                    bail!("{}: value must be finite", self.label());
                }
                Ok(v)
            }
        }
    }

    /// Renders a value the way the form shows it.
    pub fn format(self, value: f64) -> String {
        match self.kind() {
            FieldKind::Whole => format!("{}", value as i32),
            FieldKind::Real => {
                if value.fract() == 0.0 {
                    format!("{value:.1}")
                } else {
                    format!("{value}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_round_trips_through_set_value() {
        let mut snap = MatchSnapshot::default();
        for (i, field) in FieldId::ALL.iter().enumerate() {
            snap.set_value(*field, (i + 1) as f64);
        }
        for (i, field) in FieldId::ALL.iter().enumerate() {
            assert_eq!(snap.value(*field), (i + 1) as f64, "{}", field.label());
        }
    }

    #[test]
    fn parse_blank_is_zero_and_whole_fields_reject_fractions() {
        assert_eq!(FieldId::HomeXg.parse("  ").unwrap(), 0.0);
        assert_eq!(FieldId::HomeXg.parse("1.35").unwrap(), 1.35);
        assert_eq!(FieldId::HomeGoals.parse("2").unwrap(), 2.0);
        assert!(FieldId::HomeGoals.parse("1.5").is_err());
        assert!(FieldId::LiveOddsHome.parse("abc").is_err());
        assert!(FieldId::LiveOddsHome.parse("inf").is_err());
    }

    #[test]
    fn negative_input_is_accepted() {
        assert_eq!(FieldId::AwayGoals.parse("-1").unwrap(), -1.0);
        assert_eq!(FieldId::HomePossession.parse("120").unwrap(), 120.0);
    }

    #[test]
    fn side_pairs_opponent_conceded_average() {
        let snap = MatchSnapshot {
            home_avg_conceded: 0.9,
            away_avg_conceded: 1.4,
            ..MatchSnapshot::default()
        };
        assert_eq!(snap.side(Side::Home).opp_avg_conceded, 1.4);
        assert_eq!(snap.side(Side::Away).opp_avg_conceded, 0.9);
    }

    #[test]
    fn partial_json_defaults_missing_fields() {
        let snap: MatchSnapshot =
            serde_json::from_str(r#"{"home_xg": 1.2, "home_goals": 1}"#).unwrap();
        assert_eq!(snap.home_xg, 1.2);
        assert_eq!(snap.home_goals, 1);
        assert_eq!(snap.profit, 0.0);
    }
}
