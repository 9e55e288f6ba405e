//! JADE Trader CLI - Run a simulated tuning session from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use jade_trader::{compute::run_session_with_callback, schema::SessionConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let mut steps: u64 = 10_000;
    let mut trace_path: Option<PathBuf> = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--trace" {
            match rest.next() {
                Some(path) => trace_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--trace needs a path");
                    std::process::exit(1);
                }
            }
        } else if let Ok(n) = arg.parse() {
            steps = n;
        } else {
            eprintln!("Unrecognized argument: {}", arg);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SessionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    println!("JADE Trader Session");
    println!("===================");
    println!(
        "Population: {} (F={}, c={}, p={}, muF={})",
        config.de.k, config.de.f, config.de.c, config.de.p, config.de.mu_f
    );
    println!("Wait time: {}", config.de.wait_time);
    println!(
        "Market: optimum={}, scale={}, noise={}",
        config.market.optimum, config.market.scale, config.market.noise
    );
    println!("Steps: {} (dt={})", steps, config.dt);
    println!();

    println!("Running session...");
    let start = Instant::now();
    let report_every = (steps / 10).max(1);

    let result = run_session_with_callback(&config, steps, |progress| {
        if progress.step % report_every == 0 {
            println!(
                "  Step {}/{}: t={:.0}, live stratval={:.4}, generations={}, muF={:.4}",
                progress.step,
                steps,
                progress.time,
                progress.stratval,
                progress.generation,
                progress.mu_f
            );
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("FAIL: {}", e);
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    println!();
    println!("Final population:");
    for (i, slot) in summary.slots.iter().enumerate() {
        let marker = if i == summary.best_index { "*" } else { " " };
        println!(
            "  {} slot {}: stratval={:+.6}, pps={:.6}",
            marker, i, slot.stratval(), slot.pps
        );
    }
    println!();
    println!("Generations: {}", summary.history.generations());
    println!(
        "Challenger success rate: {:.1}%",
        summary.history.success_rate() * 100.0
    );
    println!("Best stratval: {:+.6}", summary.best_stratval());
    println!("Mean stratval: {:+.6}", summary.mean_stratval());
    println!("Total profit: {:.3}", summary.total_profit);
    println!("Time: {:.2}s", elapsed.as_secs_f32());

    if let Some(path) = trace_path {
        if let Err(e) = summary.history.save_json(&path) {
            eprintln!("Error writing trace: {}", e);
            std::process::exit(1);
        }
        println!("Trace written to {}", path.display());
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> [steps] [--trace <history.json>]", program);
    eprintln!();
    eprintln!("Run an adaptive DE tuning session against a simulated market.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to session configuration file");
    eprintln!("  steps        Number of market steps (default: 10000)");
    eprintln!("  --trace      Write the per-generation history as JSON");
    eprintln!();
    eprintln!("Print an example configuration with --example.");
}

fn print_example_config() {
    let config = SessionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
