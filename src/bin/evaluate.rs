use std::path::PathBuf;

use odds_apex::{engine, report, snapshot};

fn main() -> anyhow::Result<()> {
    let mut json = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            path = Some(PathBuf::from(arg));
        }
    }
    let path = path.unwrap_or_else(|| PathBuf::from("tests/fixtures/snapshot_level_ht.json"));

    // One snapshot in, one evaluation out; no network, for quick manual checks of the model.
    let snap = snapshot::load_snapshot(&path)?;
    let eval = engine::evaluate(&snap);

    if json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
        return Ok(());
    }

    print!("{}", report::render(&eval));
    println!();
    println!("{}", report::probabilities_line(&eval));
    println!("{}", report::market_line(&eval));
    println!("{}", report::rates_line(&eval));
    println!("{}", report::scorelines_line(&eval));
    Ok(())
}
