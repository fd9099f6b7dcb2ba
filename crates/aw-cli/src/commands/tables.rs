use std::path::Path;

use aw_core::GameTables;
use colored::Colorize;

pub fn run(output: Option<&Path>) -> Result<(), String> {
    let json = GameTables::standard()
        .to_json()
        .map_err(|e| e.to_string())?;
    match output {
        Some(path) => {
            std::fs::write(path, &json).map_err(|e| format!("failed to write output: {e}"))?;
            println!(
                "  {} {}",
                "Wrote".green(),
                path.display().to_string().dimmed()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
