use crate::engine::MatchEvaluation;
use crate::odds::{Outcome, Recommendation, RecommendationKind};

pub fn summary_lines(eval: &MatchEvaluation) -> [String; 2] {
    let [fh, fd, fa] = eval.fair_odds;
    let live = eval.live_odds;
    [
        format!("Fair Odds - Home: {fh}, Draw: {fd}, Away: {fa}"),
        format!(
            "Live Odds - Home: {:.2}, Draw: {:.2}, Away: {:.2}",
            live.home, live.draw, live.away
        ),
    ]
}

pub fn recommendation_line(rec: &Recommendation) -> String {
    let name = rec.outcome.label();
    match rec.kind {
        RecommendationKind::Lay => {
            let stake_label = if rec.outcome == Outcome::Home {
                "Stake (using Profit as liability)"
            } else {
                "Stake"
            };
            format!(
                "Lay {name}: Edge: {:.2}%, {stake_label}: {:.2}",
                rec.edge_percent(),
                rec.amount
            )
        }
        RecommendationKind::Back => format!(
            "Back {name}: Edge: {:.2}%, Profit: {:.2}",
            rec.edge_percent(),
            rec.amount
        ),
        RecommendationKind::NoEdge => format!("{name}: No clear edge."),
    }
}

/// Full text report: summary, blank line, one line per outcome.
pub fn render(eval: &MatchEvaluation) -> String {
    let mut out = String::new();
    for line in summary_lines(eval) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
    for rec in &eval.recommendations {
        out.push_str(&recommendation_line(rec));
        out.push('\n');
    }
    out
}

pub fn rates_line(eval: &MatchEvaluation) -> String {
    format!(
        "Rates - Home: {:.3}, Away: {:.3}",
        eval.rates.lambda_home, eval.rates.lambda_away
    )
}

pub fn probabilities_line(eval: &MatchEvaluation) -> String {
    let p = eval.probabilities;
    format!(
        "Model - Home: {:.1}%, Draw: {:.1}%, Away: {:.1}%",
        p.home * 100.0,
        p.draw * 100.0,
        p.away * 100.0
    )
}

pub fn market_line(eval: &MatchEvaluation) -> String {
    match eval.market {
        Some(m) => format!(
            "Market - Home: {:.1}%, Draw: {:.1}%, Away: {:.1}% (overround {:.2}%)",
            m.home * 100.0,
            m.draw * 100.0,
            m.away * 100.0,
            m.overround * 100.0
        ),
        None => "Market - n/a (live odds must all be above 1.00)".to_string(),
    }
}

pub fn scorelines_line(eval: &MatchEvaluation) -> String {
    if eval.top_scorelines.is_empty() {
        return "Likely scores - n/a".to_string();
    }
    let parts = eval
        .top_scorelines
        .iter()
        .map(|s| format!("{}-{} {:.1}%", s.home, s.away, s.probability * 100.0))
        .collect::<Vec<_>>();
    format!("Likely scores - {}", parts.join(", "))
}
