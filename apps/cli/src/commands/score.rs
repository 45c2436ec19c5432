//! `dojo score`: run reward functions over a batch file.

use anyhow::{Context, Result};
use colored::Colorize;
use dojo_rewards::{
    AnswerDistribution, Delimiters, ParticleScorer, RewardBatch, RewardFunction, format_reward_functions,
    particle_reward_functions_with,
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct FunctionScores {
    name: &'static str,
    scores: Vec<f64>,
    mean: f64,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    batch_size: usize,
    functions: Vec<FunctionScores>,
    totals: Vec<f64>,
    distribution: AnswerDistribution,
}

pub fn execute(
    batch_path: &Path,
    delimiters: Delimiters,
    scorer: ParticleScorer,
    with_format: bool,
    json_output: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(batch_path)
        .with_context(|| format!("Failed to read batch file {}", batch_path.display()))?;
    let batch = RewardBatch::from_json(&content)
        .with_context(|| format!("Failed to parse batch file {}", batch_path.display()))?;

    let mut functions = particle_reward_functions_with(delimiters.clone(), scorer).context("Invalid delimiters")?;
    if with_format {
        functions.extend(format_reward_functions(delimiters).context("Invalid delimiters")?);
    }

    let report = run(&functions, &batch);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn run(functions: &[Box<dyn RewardFunction>], batch: &RewardBatch) -> ScoreReport {
    let mut distribution = AnswerDistribution::new();
    let mut totals: Vec<f64> = vec![0.0; batch.len()];

    let functions: Vec<FunctionScores> = functions
        .iter()
        .map(|f| {
            let scores = f.score(batch, &mut distribution);
            for (total, score) in totals.iter_mut().zip(&scores) {
                *total += score;
            }
            FunctionScores { name: f.name(), mean: mean(&scores), scores }
        })
        .collect();

    ScoreReport { batch_size: batch.len(), functions, totals, distribution }
}

fn print_report(report: &ScoreReport) {
    println!();
    println!("{}", format!("Scored {} completion(s)", report.batch_size).bold().cyan());
    println!();

    print!("{:>4}", "#");
    for f in &report.functions {
        print!(" {:>18}", f.name);
    }
    println!(" {:>8}", "total");
    println!("{}", "─".repeat(4 + 19 * report.functions.len() + 9));

    for (i, total) in report.totals.iter().enumerate() {
        print!("{:>4}", i);
        for f in &report.functions {
            print!(" {:>18.2}", f.scores[i]);
        }
        let total_str = format!("{:>8.2}", total);
        println!(" {}", if *total >= 0.0 { total_str.green() } else { total_str.red() });
    }

    print!("{:>4}", "mean");
    for f in &report.functions {
        print!(" {:>18.2}", f.mean);
    }
    println!();

    let common = report.distribution.most_common();
    if !common.is_empty() {
        println!();
        println!("{}", "Reference answers".bold());
        for (answer, count) in common {
            let share = report.distribution.share(answer) * 100.0;
            println!("  {:<8} {:>5} {:>6.1}%", answer, count, share);
        }
    }
    println!();
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
