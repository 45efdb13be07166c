//! Short narration lines attached to exploration and dungeon results.
//!
//! Lines are cosmetic: they never influence outcomes, and every line is
//! clamped to a single chat-friendly length so the transport layer never has
//! to wrap them.

use rand::seq::SliceRandom;

/// Upper bound on a narration line, in characters.
pub const LINE_LIMIT: usize = 80;

/// Where the narration is being spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlavorContext {
    Exploration,
    DungeonBattle { floor: u32 },
    DungeonLoot { floor: u32 },
}

/// Source of narration lines. The engine only ever asks for one line at a
/// time; implementations may be random or scripted.
pub trait FlavorText {
    fn line(&mut self, context: FlavorContext) -> String;
}

const EXPLORATION_LINES: &[&str] = &[
    "You follow a half-buried trail through the tall grass.",
    "A crow watches you turn over stones by the roadside.",
    "The wind shifts and carries a faint smell of old copper.",
    "You wade a shallow creek and check the gravel bed.",
    "An abandoned cart yields to a little careful prying.",
    "You sweep the ruins of a watchtower, floor by floor.",
];

const DUNGEON_BATTLE_LINES: &[&str] = &[
    "Something big moves in the dark ahead.",
    "Claws scrape stone just beyond your torchlight.",
    "A shape peels itself off the wall and lunges.",
    "Two eyes catch the light, then rush you.",
];

const DUNGEON_LOOT_LINES: &[&str] = &[
    "A rotted chest splits open at a kick.",
    "You pry a glinting vein out of the wall.",
    "Bones of a less lucky crawler still clutch a pouch.",
    "A forgotten shrine holds offerings nobody will miss.",
];

/// Random narrator backed by the built-in line pools.
#[derive(Debug, Default)]
pub struct StaticFlavor;

impl FlavorText for StaticFlavor {
    fn line(&mut self, context: FlavorContext) -> String {
        let pool = match context {
            FlavorContext::Exploration => EXPLORATION_LINES,
            FlavorContext::DungeonBattle { .. } => DUNGEON_BATTLE_LINES,
            FlavorContext::DungeonLoot { .. } => DUNGEON_LOOT_LINES,
        };
        let line = pool
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        clamp_line(line)
    }
}

/// Fixed narrator for tests.
#[derive(Debug, Default)]
pub struct SilentFlavor;

impl FlavorText for SilentFlavor {
    fn line(&mut self, _context: FlavorContext) -> String {
        String::new()
    }
}

fn clamp_line(line: &str) -> String {
    if line.chars().count() <= LINE_LIMIT {
        return line.to_string();
    }
    line.chars().take(LINE_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_lines_fit_the_limit() {
        for pool in [EXPLORATION_LINES, DUNGEON_BATTLE_LINES, DUNGEON_LOOT_LINES] {
            for line in pool {
                assert!(line.chars().count() <= LINE_LIMIT, "too long: {line}");
            }
        }
    }

    #[test]
    fn clamp_truncates_by_characters() {
        let long: String = "글".repeat(100);
        assert_eq!(clamp_line(&long).chars().count(), LINE_LIMIT);
        assert_eq!(clamp_line("short"), "short");
    }

    #[test]
    fn static_flavor_draws_from_the_right_pool() {
        let mut flavor = StaticFlavor;
        let line = flavor.line(FlavorContext::Exploration);
        assert!(EXPLORATION_LINES.contains(&line.as_str()));
        let line = flavor.line(FlavorContext::DungeonBattle { floor: 3 });
        assert!(DUNGEON_BATTLE_LINES.contains(&line.as_str()));
    }
}
