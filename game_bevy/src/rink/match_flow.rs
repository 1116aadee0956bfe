//! Pure match bookkeeping: score, countdown clock and result resolution.

use minerink_shared::team::Team;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub blue: u32,
    pub red: u32,
}

impl Scoreboard {
    pub fn add(&mut self, team: Team) {
        match team {
            Team::Blue => self.blue += 1,
            Team::Red => self.red += 1,
        }
    }

    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Winner(Team),
    Draw,
}

pub fn compute_result(score: Scoreboard) -> MatchResult {
    if score.blue > score.red {
        MatchResult::Winner(Team::Blue)
    } else if score.red > score.blue {
        MatchResult::Winner(Team::Red)
    } else {
        MatchResult::Draw
    }
}

pub fn result_text(result: MatchResult) -> String {
    match result {
        MatchResult::Winner(team) => format!("{} Wins!", team.name()),
        MatchResult::Draw => "Draw!".to_string(),
    }
}

/// Countdown clock, never negative.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    remaining: f32,
}

impl Clock {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance the clock. Returns true once the clock sits at zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    /// MM:SS, floored, for the HUD.
    pub fn format(&self) -> String {
        let total = self.remaining.max(0.0) as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_increments_per_team() {
        let mut score = Scoreboard::default();
        score.add(Team::Blue);
        score.add(Team::Blue);
        score.add(Team::Red);
        assert_eq!(score.get(Team::Blue), 2);
        assert_eq!(score.get(Team::Red), 1);
    }

    #[test]
    fn higher_score_wins() {
        let score = Scoreboard { blue: 3, red: 1 };
        assert_eq!(compute_result(score), MatchResult::Winner(Team::Blue));
        assert_eq!(result_text(compute_result(score)), "Blue Wins!");

        let score = Scoreboard { blue: 0, red: 2 };
        assert_eq!(compute_result(score), MatchResult::Winner(Team::Red));
        assert_eq!(result_text(compute_result(score)), "Red Wins!");
    }

    #[test]
    fn equal_scores_draw() {
        let score = Scoreboard { blue: 2, red: 2 };
        assert_eq!(compute_result(score), MatchResult::Draw);
        assert_eq!(result_text(compute_result(score)), "Draw!");
    }

    #[test]
    fn clock_counts_down_and_stops_at_zero() {
        let mut clock = Clock::new(120.0);
        assert!(!clock.tick(1.0));
        assert!((clock.remaining() - 119.0).abs() < 1e-4);

        assert!(clock.tick(1000.0));
        assert_eq!(clock.remaining(), 0.0);
        // Stays expired on further ticks.
        assert!(clock.tick(0.016));
    }

    #[test]
    fn clock_survives_a_full_match_of_fixed_steps() {
        let mut clock = Clock::new(120.0);
        let mut expired = false;
        for _ in 0..(121 * 60) {
            expired = clock.tick(1.0 / 60.0);
        }
        assert!(expired);
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let clock = Clock::new(-5.0);
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.format(), "00:00");
    }

    #[test]
    fn format_is_mm_ss() {
        assert_eq!(Clock::new(120.0).format(), "02:00");
        assert_eq!(Clock::new(119.4).format(), "01:59");
        assert_eq!(Clock::new(61.0).format(), "01:01");
        assert_eq!(Clock::new(9.99).format(), "00:09");
        assert_eq!(Clock::new(0.0).format(), "00:00");
    }
}
