use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::load_tables;

pub fn run(
    tables: Option<&Path>,
    min_rank: Option<u32>,
    creature: Option<&str>,
) -> Result<(), String> {
    let tables = load_tables(tables)?;
    let creatures: Vec<_> = match creature {
        Some(name) => {
            let found = tables
                .bestiary
                .by_name(name)
                .ok_or_else(|| format!("no creature named \"{name}\""))?;
            vec![found]
        }
        None => tables.bestiary.archetypes().iter().collect(),
    };
    let creatures: Vec<_> = creatures
        .into_iter()
        .filter(|a| min_rank.is_none_or(|min| a.rank >= min))
        .collect();

    if creatures.is_empty() {
        println!("  {}", "No creatures found.".dimmed());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Material", "Creature", "Rank", "HP", "Speed"]);
    for creature in &creatures {
        let name = if creature.is_special() {
            creature.name.magenta().to_string()
        } else {
            creature.name.clone()
        };
        table.add_row(vec![
            creature.material.clone(),
            name,
            creature.rank.to_string(),
            creature.base_hp.to_string(),
            format!("{:.0}", creature.base_speed),
        ]);
    }

    println!("{table}");
    println!("  {}", format!("{} creature(s)", creatures.len()).dimmed());

    let prefixes = tables.prefixes.prefixes();
    if !prefixes.is_empty() {
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Prefix", "Weight", "HP ×", "Reward ×", "Speed ×"]);
        for prefix in prefixes {
            table.add_row(vec![
                prefix.name.clone(),
                prefix.weight.to_string(),
                prefix.hp_multiplier.to_string(),
                prefix.reward_multiplier.to_string(),
                prefix.speed_multiplier.to_string(),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}
