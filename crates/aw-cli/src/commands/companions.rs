use std::path::Path;

use aw_core::AbilityEffect;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::load_tables;

pub fn run(tables: Option<&Path>, level: u32) -> Result<(), String> {
    let tables = load_tables(tables)?;
    let roster = tables.companions.companions();
    if roster.is_empty() {
        println!("  {}", "No companions found.".dimmed());
        return Ok(());
    }

    println!(
        "  {}",
        format!("Companions at level {}", level.max(1)).bold().underline()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "HP", "Attack", "Speed", "Ability"]);
    for template in roster {
        let stats = template.stats_at(level);
        let ability = match &template.ability {
            Some(ability) => format!("{} ({})", ability.name, describe(&ability.effect)),
            None => "-".dimmed().to_string(),
        };
        table.add_row(vec![
            template.id.to_string(),
            stats.max_hp.to_string(),
            stats.attack.to_string(),
            format!("{:.1}", stats.speed),
            ability,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn describe(effect: &AbilityEffect) -> String {
    match effect {
        AbilityEffect::Strike { damage_multiplier } => format!("{damage_multiplier}× strike"),
        AbilityEffect::Empower {
            buff,
            magnitude,
            duration,
            ..
        } => format!("+{:.0}% {buff} for {duration} rounds", magnitude * 100.0),
        AbilityEffect::Mend { heal_multiplier } => format!("heals {heal_multiplier}× attack"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::BuffKind;

    #[test]
    fn describes_effects() {
        assert_eq!(
            describe(&AbilityEffect::Strike {
                damage_multiplier: 1.5
            }),
            "1.5× strike"
        );
        assert_eq!(
            describe(&AbilityEffect::Empower {
                buff: BuffKind::Critical,
                magnitude: 0.2,
                duration: 3,
                damage_multiplier: 1.0,
            }),
            "+20% critical for 3 rounds"
        );
    }
}
