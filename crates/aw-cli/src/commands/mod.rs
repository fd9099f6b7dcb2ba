pub mod bestiary;
pub mod companions;
pub mod simulate;
pub mod tables;

use std::path::Path;

use aw_core::{GameTables, PartyMember};

/// Load tables from `path`, or the built-in set when no path is given.
fn load_tables(path: Option<&Path>) -> Result<GameTables, String> {
    match path {
        Some(path) => GameTables::from_path(path).map_err(|e| e.to_string()),
        None => Ok(GameTables::standard()),
    }
}

/// Parse `NAME` or `NAME:LEVEL` into a party member. Level defaults to 1.
fn parse_companion(arg: &str) -> Result<PartyMember, String> {
    match arg.rsplit_once(':') {
        Some((name, level)) => {
            let level: u32 = level
                .trim()
                .parse()
                .map_err(|_| format!("invalid companion level in \"{arg}\""))?;
            if level == 0 {
                return Err(format!("companion level must be at least 1 in \"{arg}\""));
            }
            Ok(PartyMember::new(name.trim(), level))
        }
        None => Ok(PartyMember::new(arg.trim(), 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::CompanionId;

    #[test]
    fn companion_with_level() {
        let member = parse_companion("Sil:5").unwrap();
        assert_eq!(member.id, CompanionId::new("Sil"));
        assert_eq!(member.level, 5);
    }

    #[test]
    fn companion_defaults_to_level_one() {
        assert_eq!(parse_companion("Chloe").unwrap().level, 1);
    }

    #[test]
    fn names_may_contain_spaces() {
        let member = parse_companion("Rims & Berry:2").unwrap();
        assert_eq!(member.id, CompanionId::new("Rims & Berry"));
    }

    #[test]
    fn bad_levels_are_rejected() {
        assert!(parse_companion("Sil:x").is_err());
        assert!(parse_companion("Sil:0").is_err());
    }
}
