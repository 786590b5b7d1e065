//! Experience and leveling
//!
//! XP curve for the demo session. Every level gained becomes one
//! level-up request for the draft scheduler.

/// Calculate XP needed to go from `level - 1` to `level`
pub fn xp_for_level(level: u32) -> u32 {
    if level <= 1 {
        0
    } else {
        // Base 100 XP for level 2, +50 per level after
        100 + (level - 2) * 50
    }
}

/// Calculate total XP needed from level 1 to reach a given level
pub fn total_xp_for_level(level: u32) -> u32 {
    (1..level).map(|l| xp_for_level(l + 1)).sum()
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=2 => "Novice",
        3..=4 => "Apprentice",
        5..=7 => "Journeyman",
        8..=10 => "Adept",
        11..=14 => "Expert",
        15..=18 => "Master",
        19..=24 => "Grandmaster",
        _ => "Legend",
    }
}

/// Level and progress toward the next one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    pub level: u32,
    /// Fractional so per-frame gains accumulate
    pub current_xp: f32,
}

impl Experience {
    pub fn new() -> Self {
        Self { level: 1, current_xp: 0.0 }
    }

    pub fn xp_to_next(&self) -> u32 {
        xp_for_level(self.level + 1)
    }

    /// Progress toward the next level, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        (f64::from(self.current_xp) / f64::from(self.xp_to_next().max(1))).clamp(0.0, 1.0)
    }

    /// Add XP and return how many levels were gained
    pub fn add_xp(&mut self, amount: f32) -> u32 {
        self.current_xp += amount.max(0.0);
        let mut gained = 0;
        loop {
            let needed = self.xp_to_next() as f32;
            if self.current_xp < needed {
                break;
            }
            self.current_xp -= needed;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100); // Need 100 to go from 1 -> 2
        assert_eq!(xp_for_level(3), 150); // Need 150 to go from 2 -> 3
        assert_eq!(xp_for_level(4), 200);
        assert_eq!(total_xp_for_level(4), 450);
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Novice");
        assert_eq!(level_title(5), "Journeyman");
        assert_eq!(level_title(25), "Legend");
    }

    #[test]
    fn test_add_xp_counts_every_level() {
        let mut xp = Experience::new();
        assert_eq!(xp.add_xp(50.0), 0);
        assert_eq!(xp.add_xp(50.0), 1);
        assert_eq!(xp.level, 2);

        // 150 + 200 in one grant
        assert_eq!(xp.add_xp(360.0), 2);
        assert_eq!(xp.level, 4);
        assert_eq!(xp.current_xp, 10.0);
        assert!(xp.progress() > 0.0 && xp.progress() < 0.1);
    }
}
