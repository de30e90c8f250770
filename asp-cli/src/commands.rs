use anyhow::Context;
use asp_catalog::{Estimate, MatchTier, PriceResult, PricingEngine, NOT_FOUND_MESSAGE};
use asp_core::{Query, Selections};
use asp_shared::{Grade, Memory, Storage};
use std::fmt::Write;

use crate::cli::Commands;

/// Runs one command against a loaded engine and returns what to print.
pub fn run(engine: &PricingEngine, command: &Commands) -> anyhow::Result<String> {
    let output = match command {
        Commands::Types => engine.list_types().join("\n"),
        Commands::Makes => engine.list_makes().join("\n"),
        Commands::Models { make, device_type } => engine.list_models(make, device_type).join("\n"),
        Commands::Cpus { make, model } => engine
            .list_cpu_buckets(make, model)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        Commands::Options => render_options(),
        Commands::Estimate {
            device_type,
            make,
            model,
            cpu,
            ram,
            hdd,
            grade,
            explain,
            json,
        } => {
            let query = Query::from_selections(&Selections {
                device_type: device_type.clone(),
                make: make.clone(),
                model: model.clone(),
                cpu: cpu.clone(),
                ram: ram.clone(),
                hdd: hdd.clone(),
                grade: grade.clone(),
            });

            if *json {
                let rendered = match engine.estimate_detailed(&query) {
                    Some(estimate) => serde_json::to_string_pretty(&estimate),
                    None => serde_json::to_string_pretty(&PriceResult::NotFound),
                };
                rendered.context("failed to serialize estimate")?
            } else if *explain {
                match engine.estimate_detailed(&query) {
                    Some(estimate) => render_breakdown(&estimate)?,
                    None => NOT_FOUND_MESSAGE.to_string(),
                }
            } else {
                engine.estimate(&query).to_string()
            }
        }
    };

    Ok(output)
}

fn render_options() -> String {
    let labels = |labels: Vec<&str>| labels.join(", ");
    format!(
        "ram:   {}\nhdd:   {}\ngrade: {}",
        labels(Memory::ALL.iter().map(|m| m.label()).collect()),
        labels(Storage::ALL.iter().map(|s| s.label()).collect()),
        labels(Grade::ALL.iter().map(|g| g.label()).collect()),
    )
}

fn render_breakdown(estimate: &Estimate) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "cpu bucket:      {}", estimate.query_bucket)?;

    match &estimate.baseline {
        Some(baseline) => {
            let tier = match baseline.tier {
                MatchTier::Exact => "exact",
                MatchTier::ModelFallback => "model fallback",
            };
            writeln!(
                out,
                "baseline:        {} {} ({}, {}) at {}",
                baseline.record.make, baseline.record.model, baseline.cpu_bucket, tier, baseline.record.asp
            )?;
            let record = &baseline.record;
            let specs: Vec<&str> = [&record.ram, &record.hdd, &record.grade]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            if !specs.is_empty() {
                writeln!(out, "baseline specs:  {}", specs.join(" / "))?;
            }
        }
        None => writeln!(out, "baseline:        none")?,
    }

    if estimate.salvage {
        writeln!(out, "salvage price:   {}", estimate.base_price)?;
    } else {
        writeln!(out, "memory:          {:+}", estimate.memory_adjustment)?;
        writeln!(out, "storage:         {:+}", estimate.storage_adjustment)?;
        writeln!(out, "upgrade premium: {:+}", estimate.upgrade_premium)?;
        writeln!(out, "grade multiplier: x{}", estimate.grade_multiplier)?;
    }
    write!(out, "estimate:        {}", estimate.price)?;

    Ok(out)
}
