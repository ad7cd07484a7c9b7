// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Meal commands for calippo-cli
// ABOUTME: Scanning, manual records, history, daily totals, progression, and goals

use std::path::Path;

use anyhow::{bail, Context, Result};
use calippo::context::AppContext;
use calippo::llm::ImagePayload;
use calippo::models::{ComparedMacro, DailyProgress, NutritionRecord, StreakTier, BADGES};
use calippo::progression::{evolution_progress, ScanOutcome};
use calippo::scanner::ScanResolution;
use chrono::Utc;

use super::current_user;

/// Analyse a photo and record the result
pub async fn scan(ctx: &AppContext, image: &Path) -> Result<()> {
    let user = current_user(ctx).await?;
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    println!("Analysing {}...", image.display());
    match ctx
        .scanner
        .scan(&user.id, ImagePayload::from_bytes(&bytes), Utc::now())
        .await?
    {
        ScanResolution::Completed(outcome) => print_outcome(&outcome),
        ScanResolution::Failed(e) => bail!("{}", e.message),
        ScanResolution::Discarded => println!("Scan was abandoned"),
    }
    Ok(())
}

/// Record a meal with known values
pub async fn record(ctx: &AppContext, record: NutritionRecord) -> Result<()> {
    let user = current_user(ctx).await?;
    let outcome = ctx
        .ledger
        .record_scan(&user.id, record, None, Utc::now())
        .await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ScanOutcome) {
    let data = &outcome.entry.data;
    println!(
        "{}: {:.0} kcal, {:.1}g protein, {:.1}g carbs, {:.1}g fat (health {:.0})",
        data.food_name, data.calories, data.protein, data.carbs, data.fat, data.health_score
    );
    println!("  {}", data.description);
    println!("  entry {}  streak {}", outcome.entry.id, outcome.streak);
    if let Some(level) = outcome.level_up {
        println!("  Evolved to level {level}!");
    }
    for badge in &outcome.unlocked {
        println!("  Badge unlocked: {} (+{} XP)", badge.name, badge.xp);
    }
}

/// List recorded meals, most recent first
pub async fn history(ctx: &AppContext, limit: usize) -> Result<()> {
    let user = current_user(ctx).await?;
    let entries = ctx.history.list(&user.id).await?;
    if entries.is_empty() {
        println!("No meals recorded");
    }
    for entry in entries.iter().take(limit) {
        println!(
            "{}  {}  {}  {:.0} kcal  P{:.1} C{:.1} F{:.1}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.data.food_name,
            entry.data.calories,
            entry.data.protein,
            entry.data.carbs,
            entry.data.fat
        );
    }
    Ok(())
}

/// Today's totals against the calorie goal
pub async fn today(ctx: &AppContext) -> Result<()> {
    let user = current_user(ctx).await?;
    let day = Utc::now().date_naive();
    let progress = DailyProgress {
        day,
        totals: ctx.history.daily_totals(&user.id, day).await?,
        calorie_goal: ctx.preferences.daily_goal().await?,
    };
    println!(
        "{}: {:.0} / {} kcal over {} meals",
        progress.day, progress.totals.calories, progress.calorie_goal, progress.totals.entries
    );
    println!(
        "  protein {:.1}g  carbs {:.1}g  fat {:.1}g",
        progress.totals.protein, progress.totals.carbs, progress.totals.fats
    );
    if progress.goal_reached() {
        println!("  Goal reached");
    } else {
        println!("  {:.0} kcal remaining", progress.calories_remaining());
    }
    Ok(())
}

/// Compare macros of several entries
pub async fn compare(ctx: &AppContext, ids: &[String]) -> Result<()> {
    let user = current_user(ctx).await?;
    let comparison = ctx.history.compare(&user.id, ids).await?;
    for row in comparison.rows {
        let label = match row.metric {
            ComparedMacro::Protein => "Protein",
            ComparedMacro::Carbs => "Carbs",
            ComparedMacro::Fat => "Fat",
        };
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|(food, grams)| format!("{food} {grams:.1}g"))
            .collect();
        println!("{label:8} {}", cells.join(" | "));
    }
    Ok(())
}

/// Delete one entry
pub async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    let user = current_user(ctx).await?;
    match ctx.ledger.delete_entry(&user.id, id).await? {
        Some(unlocked) => {
            println!("Deleted {id}");
            for badge in unlocked {
                println!("  Badge unlocked: {} (+{} XP)", badge.name, badge.xp);
            }
        }
        None => println!("No entry {id}"),
    }
    Ok(())
}

/// Delete every entry
pub async fn clear(ctx: &AppContext) -> Result<()> {
    let user = current_user(ctx).await?;
    let removed = ctx.ledger.clear_history(&user.id).await?;
    println!("Deleted {removed} entries");
    Ok(())
}

/// Streak, level, evolution progress, and badges
pub async fn stats(ctx: &AppContext) -> Result<()> {
    let user = current_user(ctx).await?;
    let state = ctx.ledger.state(&user.id).await?;
    let streak = ctx
        .ledger
        .current_streak(&user.id, Utc::now().date_naive())
        .await?;

    println!(
        "Streak: {streak} days ({})  freezes: {}",
        StreakTier::for_days(streak).label(),
        state.freeze_count
    );
    println!("XP: {}  scans: {}", state.xp, state.total_scans);
    println!(
        "Lifetime: protein {:.1}g  carbs {:.1}g  fat {:.1}g",
        state.total_protein, state.total_carbs, state.total_fats
    );

    if let Some(progress) = evolution_progress(&state) {
        println!(
            "Level {}: {} ({})",
            progress.current.level, progress.current.name, progress.current.rarity
        );
        match progress.next {
            Some(next) => println!(
                "  next {}: protein {:.0}% of {}g, scans {:.0}% of {}",
                next.name,
                progress.protein_fraction * 100.0,
                progress.protein_required,
                progress.scans_fraction * 100.0,
                progress.scans_required
            ),
            None => println!("  Final form reached"),
        }
        if let Some(gate) = progress.gate {
            println!("  {}", gate.requirement_text());
        }
    }

    println!("Badges:");
    for badge in BADGES {
        let mark = if state.celebrated_badge_names.contains(badge.name) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {} ({}) {}", badge.name, badge.tier.label(), badge.requirement());
    }
    Ok(())
}

/// Show or set the daily calorie goal
pub async fn goal(ctx: &AppContext, calories: Option<u32>) -> Result<()> {
    if let Some(calories) = calories {
        ctx.preferences.set_daily_goal(calories).await?;
    }
    println!("Daily goal: {} kcal", ctx.preferences.daily_goal().await?);
    Ok(())
}
