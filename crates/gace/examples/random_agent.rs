//! Random-search agent over a built-in task.
//!
//! Demonstrates: standard resolver → create with overrides → reset →
//! sample actions → step → read performance from the step info.
//!
//! Usage: `cargo run -p gace --example random_agent -- [task-id]`

use gace::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let task = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "op1-xh035-v0".to_string());
    println!("=== GACE random agent: {task} ===\n");

    let resolver = gace::standard_resolver();
    let overrides = Overrides::new().with("max_steps", 200).with("seed", 7);
    let mut env = match resolver.create(&task, &overrides) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    env.reset(Some(7)).unwrap();

    let mut best: Option<Transition> = None;
    for step in 1.. {
        let action = env.action_space().sample(&mut rng);
        let t = env.step(&action).unwrap();
        if best.as_ref().is_none_or(|b| t.reward > b.reward) {
            println!(
                "  step {step:>3}: reward={:>8.3}, targets_met={}",
                t.reward, t.info["targets_met"]
            );
            best = Some(t.clone());
        }
        if t.done() {
            println!(
                "\nepisode ended after {step} steps ({})",
                if t.terminal { "all targets met" } else { "step limit" }
            );
            break;
        }
    }

    if let Some(best) = best {
        println!("\nbest design:");
        for (name, value) in &best.info {
            println!("  {name:>12} = {value:.4e}");
        }
    }
}
