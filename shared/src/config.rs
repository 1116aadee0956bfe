use serde::{Deserialize, Serialize};

use crate::team::Team;

/// Match rules and orchestration timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    /// Match length in seconds.
    pub match_duration: f32,
    /// Pause after a goal before play resumes (seconds).
    pub post_goal_delay: f32,
    /// Extra margin added to `post_goal_delay` before a fired goal trigger
    /// re-enables itself. Must stay positive so the trigger cannot race the
    /// orchestrator's unlock.
    pub goal_retrigger_margin: f32,
    pub mines_per_team: u32,
    pub disks_per_team: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_duration: 120.0,
            post_goal_delay: 0.8,
            goal_retrigger_margin: 0.1,
            mines_per_team: 2,
            disks_per_team: 3,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.match_duration.is_finite() || self.match_duration <= 0.0 {
            return Err("matchDuration must be finite and > 0".to_string());
        }
        if !self.post_goal_delay.is_finite() || self.post_goal_delay < 0.0 {
            return Err("postGoalDelay must be finite and >= 0".to_string());
        }
        if !self.goal_retrigger_margin.is_finite() || self.goal_retrigger_margin <= 0.0 {
            return Err("goalRetriggerMargin must be finite and > 0".to_string());
        }
        if self.mines_per_team == 0 {
            return Err("minesPerTeam must be >= 1".to_string());
        }
        if self.disks_per_team == 0 || self.disks_per_team > 3 {
            return Err("disksPerTeam must be in 1..=3".to_string());
        }
        Ok(())
    }

    /// Full window a fired goal trigger stays disabled on its own.
    pub fn goal_reenable_delay(&self) -> f32 {
        self.post_goal_delay + self.goal_retrigger_margin
    }
}

/// Disk movement tuning. Forces and speeds are in world units (pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementConfig {
    /// Steering acceleration applied along the input direction (px/s^2,
    /// mass-scaled so collider density does not change handling).
    pub move_force: f32,
    /// Hard cap on disk speed (px/s).
    pub max_speed: f32,
    /// Extra impulse fed to the puck on contact with the active disk,
    /// as a fraction of the disk's current speed. 0 disables hit feel.
    pub hit_boost: f32,
    /// Clamp each disk into its own half of the rink after the physics step.
    pub clamp_to_half: bool,
    /// Grace delay between elimination and despawn (seconds).
    pub despawn_grace: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_force: 2000.0,
            max_speed: 600.0,
            hit_boost: 0.8,
            clamp_to_half: true,
            despawn_grace: 0.05,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.move_force.is_finite() || self.move_force <= 0.0 {
            return Err("moveForce must be finite and > 0".to_string());
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("maxSpeed must be finite and > 0".to_string());
        }
        if !self.hit_boost.is_finite() || self.hit_boost < 0.0 {
            return Err("hitBoost must be finite and >= 0".to_string());
        }
        if !self.despawn_grace.is_finite() || self.despawn_grace < 0.0 {
            return Err("despawnGrace must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Mine behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineConfig {
    /// Knockback impulse applied to the struck disk (px/s, mass-scaled).
    pub knockback: f32,
    /// Delay between triggering and self-removal (seconds).
    pub destroy_delay: f32,
    /// When true the puck also sets mines off (knockback only, no
    /// elimination).
    pub affect_puck: bool,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            knockback: 500.0,
            destroy_delay: 0.05,
            affect_puck: false,
        }
    }
}

impl MineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.knockback.is_finite() || self.knockback < 0.0 {
            return Err("knockback must be finite and >= 0".to_string());
        }
        if !self.destroy_delay.is_finite() || self.destroy_delay < 0.0 {
            return Err("destroyDelay must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Puck service tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuckConfig {
    /// Hard cap on puck speed (px/s).
    pub max_speed: f32,
    /// Below this speed the puck is gently re-energized (px/s).
    pub min_keep_alive_speed: f32,
    /// Force used to keep the puck from dying out (px/s^2, mass-scaled).
    pub keep_alive_force: f32,
    /// Below this speed the puck counts as stuck (px/s).
    pub unstuck_min_speed: f32,
    /// How long the puck must stay stuck before it is nudged (seconds).
    pub unstuck_check_time: f32,
    /// Nudge impulse away from the wall (px/s, mass-scaled).
    pub unstuck_nudge: f32,
}

impl Default for PuckConfig {
    fn default() -> Self {
        Self {
            max_speed: 900.0,
            min_keep_alive_speed: 125.0,
            keep_alive_force: 100.0,
            unstuck_min_speed: 10.0,
            unstuck_check_time: 0.25,
            unstuck_nudge: 25.0,
        }
    }
}

impl PuckConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("puck maxSpeed must be finite and > 0".to_string());
        }
        if !self.min_keep_alive_speed.is_finite() || self.min_keep_alive_speed < 0.0 {
            return Err("minKeepAliveSpeed must be finite and >= 0".to_string());
        }
        if self.min_keep_alive_speed > self.max_speed {
            return Err("minKeepAliveSpeed must be <= maxSpeed".to_string());
        }
        if !self.keep_alive_force.is_finite() || self.keep_alive_force < 0.0 {
            return Err("keepAliveForce must be finite and >= 0".to_string());
        }
        if !self.unstuck_check_time.is_finite() || self.unstuck_check_time <= 0.0 {
            return Err("unstuckCheckTime must be finite and > 0".to_string());
        }
        Ok(())
    }
}

/// Which team scores when a goal mouth is breached. The side-to-scorer
/// mapping is configuration, not a hardcoded pairing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalConfig {
    pub left_breach_scores: Team,
    pub right_breach_scores: Team,
}

impl Default for GoalConfig {
    fn default() -> Self {
        // Blue attacks right, Red attacks left.
        Self {
            left_breach_scores: Team::Red,
            right_breach_scores: Team::Blue,
        }
    }
}

impl GoalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.left_breach_scores == self.right_breach_scores {
            return Err("both goal mouths credit the same team".to_string());
        }
        Ok(())
    }
}

/// Key bindings for one team, by key name. Unknown names fall back to the
/// team's defaults at bind time (with a logged warning), never a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamKeys {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub cycle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsConfig {
    pub blue: TeamKeys,
    pub red: TeamKeys,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            blue: TeamKeys {
                up: "W".to_string(),
                down: "S".to_string(),
                left: "A".to_string(),
                right: "D".to_string(),
                cycle: "Q".to_string(),
            },
            red: TeamKeys {
                up: "Up".to_string(),
                down: "Down".to_string(),
                left: "Left".to_string(),
                right: "Right".to_string(),
                cycle: "RightCtrl".to_string(),
            },
        }
    }
}

impl ControlsConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (team, keys) in [("blue", &self.blue), ("red", &self.red)] {
            for (field, name) in [
                ("up", &keys.up),
                ("down", &keys.down),
                ("left", &keys.left),
                ("right", &keys.right),
                ("cycle", &keys.cycle),
            ] {
                if name.trim().is_empty() {
                    return Err(format!("controls.{team}.{field} is empty"));
                }
            }
        }
        Ok(())
    }
}

/// Root configuration, loaded once at startup and injected; never mutated by
/// the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub match_rules: MatchConfig,
    pub movement: MovementConfig,
    pub mines: MineConfig,
    pub puck: PuckConfig,
    pub goals: GoalConfig,
    pub controls: ControlsConfig,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.match_rules.validate()?;
        self.movement.validate()?;
        self.mines.validate()?;
        self.puck.validate()?;
        self.goals.validate()?;
        self.controls.validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: GameConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_match_duration_invalid() {
        let mut config = GameConfig::default();
        config.match_rules.match_duration = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retrigger_margin_invalid() {
        let mut config = GameConfig::default();
        config.match_rules.goal_retrigger_margin = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn goal_reenable_delay_exceeds_reset_delay() {
        let config = MatchConfig::default();
        assert!(config.goal_reenable_delay() > config.post_goal_delay);
    }

    #[test]
    fn four_disks_per_team_invalid() {
        let mut config = GameConfig::default();
        config.match_rules.disks_per_team = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn keep_alive_above_max_speed_invalid() {
        let mut config = GameConfig::default();
        config.puck.min_keep_alive_speed = config.puck.max_speed + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn both_goals_crediting_one_team_invalid() {
        let mut config = GameConfig::default();
        config.goals.right_breach_scores = Team::Red;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_key_name_invalid() {
        let mut config = GameConfig::default();
        config.controls.blue.cycle = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{"matchRules": {"matchDuration": 60.0}}"#);
        // `default` on the struct only covers missing sections, not missing
        // fields within a present section.
        assert!(config.is_err());

        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config.match_rules.mines_per_team, 2);
    }

    #[test]
    fn full_roundtrip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = GameConfig::from_json(&json).unwrap();
        assert_eq!(back.match_rules.match_duration, 120.0);
        assert_eq!(back.goals.left_breach_scores, Team::Red);
        assert_eq!(back.controls.red.cycle, "RightCtrl");
    }
}
