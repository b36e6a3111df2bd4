//! Headless soak runner: drive a seeded simulation for N ticks with an
//! optional scripted input trace, then print the event tally and the final
//! snapshot hash. Useful for determinism checks across machines.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thornvale_core::{Game, GameEvent, PlayerInput};

const DT_MS: u64 = 16;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// JSON input trace: [{"tick": 0, "input": {"dx": 1, "dy": 0, "attack": false, "interact": false}}, ...].
    /// A record's input is held until the next record's tick.
    #[arg(long)]
    trace: Option<String>,

    /// Print every simulation event as it happens
    #[arg(long)]
    print_events: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TraceRecord {
    tick: u64,
    input: PlayerInput,
}

struct RunReport {
    final_hash: u64,
    events: Vec<(u64, GameEvent)>,
}

fn parse_trace(data: &str) -> Result<Vec<TraceRecord>> {
    serde_json::from_str(data).context("Failed to deserialize trace JSON")
}

fn run_headless(seed: u64, ticks: u64, trace: &[TraceRecord]) -> RunReport {
    let script: BTreeMap<u64, PlayerInput> =
        trace.iter().map(|record| (record.tick, record.input)).collect();

    let mut game = Game::new(seed);
    let mut events = Vec::new();
    let mut held = PlayerInput::default();
    for tick in 0..ticks {
        if let Some(input) = script.get(&tick) {
            held = *input;
        }
        game.update(held, DT_MS);
        for event in game.drain_events() {
            events.push((tick, event));
        }
    }
    RunReport { final_hash: game.snapshot_hash(), events }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let trace = match &args.trace {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read trace file: {path}"))?;
            parse_trace(&data)?
        }
        None => Vec::new(),
    };

    let report = run_headless(args.seed, args.ticks, &trace);

    if args.print_events {
        for (tick, event) in &report.events {
            println!("[{tick:>6}] {event:?}");
        }
    }
    println!("Simulated {} ticks with seed {}.", args.ticks, args.seed);
    println!("Events: {}", report.events.len());
    println!("Snapshot Hash: 0x{:016x}", report.final_hash);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn trace_files_round_trip() {
        let records = vec![
            TraceRecord { tick: 0, input: PlayerInput { dx: 1, ..PlayerInput::default() } },
            TraceRecord {
                tick: 10,
                input: PlayerInput { attack: true, ..PlayerInput::default() },
            },
        ];
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let json = serde_json::to_string(&records).expect("serialize trace");
        file.write_all(json.as_bytes()).expect("write trace");

        let data = fs::read_to_string(file.path()).expect("read trace");
        let parsed = parse_trace(&data).expect("parse trace");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].tick, 10);
        assert!(parsed[1].input.attack);
    }

    #[test]
    fn headless_runs_are_reproducible() {
        let trace =
            vec![TraceRecord { tick: 0, input: PlayerInput { dx: 1, ..PlayerInput::default() } }];
        let first = run_headless(42, 300, &trace);
        let second = run_headless(42, 300, &trace);
        assert_eq!(first.final_hash, second.final_hash);
        assert_eq!(first.events.len(), second.events.len());
    }

    #[test]
    fn malformed_trace_is_rejected_with_context() {
        assert!(parse_trace("not json").is_err());
    }
}
