use bevy::prelude::Vec2;

use minerink_shared::team::{GoalSide, Team};

use crate::constants::{
    DISK_RADIUS, GOAL_DEPTH, GOAL_MOUTH_HALF, RINK_HALF_HEIGHT, RINK_HALF_WIDTH,
};

#[derive(Clone, Copy)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }
}

pub const WALL_COLLIDER_THICKNESS: f32 = 5.0;

/// Spacing between roster spawn slots along the Y axis.
const SLOT_SPACING: f32 = 120.0;
/// How far from the centerline each team's spawn column sits.
const SPAWN_COLUMN_X: f32 = RINK_HALF_WIDTH * 0.5;

pub fn field_bounds() -> Bounds {
    Bounds {
        min: Vec2::new(-RINK_HALF_WIDTH, -RINK_HALF_HEIGHT),
        max: Vec2::new(RINK_HALF_WIDTH, RINK_HALF_HEIGHT),
    }
}

pub fn field_contains(p: Vec2) -> bool {
    field_bounds().contains(p)
}

/// Which half of the field a point belongs to. The centerline itself counts
/// as Red's half (fixed tie-break).
pub fn half_owner(p: Vec2) -> Team {
    if p.x >= 0.0 {
        Team::Red
    } else {
        Team::Blue
    }
}

pub fn team_half_contains(team: Team, p: Vec2) -> bool {
    field_contains(p) && half_owner(p) == team
}

/// Rect a disk of the given team may occupy when half-clamping is on,
/// inset by the disk radius so the collider stays inside.
pub fn disk_bounds(team: Team) -> Bounds {
    let r = DISK_RADIUS;
    let (min_x, max_x) = match team {
        Team::Blue => (-RINK_HALF_WIDTH + r, -r),
        Team::Red => (r, RINK_HALF_WIDTH - r),
    };
    Bounds {
        min: Vec2::new(min_x, -RINK_HALF_HEIGHT + r),
        max: Vec2::new(max_x, RINK_HALF_HEIGHT - r),
    }
}

/// Perimeter wall segments, leaving each goal mouth open.
pub fn rink_wall_segments() -> Vec<Segment> {
    let hw = RINK_HALF_WIDTH;
    let hh = RINK_HALF_HEIGHT;
    let gm = GOAL_MOUTH_HALF;

    vec![
        // Top and bottom boards
        Segment {
            from: Vec2::new(-hw, hh),
            to: Vec2::new(hw, hh),
        },
        Segment {
            from: Vec2::new(-hw, -hh),
            to: Vec2::new(hw, -hh),
        },
        // Left end, split around the goal mouth
        Segment {
            from: Vec2::new(-hw, -hh),
            to: Vec2::new(-hw, -gm),
        },
        Segment {
            from: Vec2::new(-hw, gm),
            to: Vec2::new(-hw, hh),
        },
        // Right end, split around the goal mouth
        Segment {
            from: Vec2::new(hw, -hh),
            to: Vec2::new(hw, -gm),
        },
        Segment {
            from: Vec2::new(hw, gm),
            to: Vec2::new(hw, hh),
        },
    ]
}

/// The three walls of one goal pocket (top, back, bottom).
pub fn goal_pocket_segments(side: GoalSide) -> [Segment; 3] {
    let hw = RINK_HALF_WIDTH;
    let gm = GOAL_MOUTH_HALF;
    let dir = match side {
        GoalSide::Left => -1.0,
        GoalSide::Right => 1.0,
    };
    let mouth_x = dir * hw;
    let back_x = dir * (hw + GOAL_DEPTH);

    [
        Segment {
            from: Vec2::new(mouth_x, gm),
            to: Vec2::new(back_x, gm),
        },
        Segment {
            from: Vec2::new(back_x, gm),
            to: Vec2::new(back_x, -gm),
        },
        Segment {
            from: Vec2::new(back_x, -gm),
            to: Vec2::new(mouth_x, -gm),
        },
    ]
}

/// Center of the scoring sensor inside a goal pocket.
pub fn goal_sensor_center(side: GoalSide) -> Vec2 {
    let dir = match side {
        GoalSide::Left => -1.0,
        GoalSide::Right => 1.0,
    };
    Vec2::new(dir * (RINK_HALF_WIDTH + GOAL_DEPTH * 0.5), 0.0)
}

pub fn goal_sensor_half_extents() -> Vec2 {
    Vec2::new(GOAL_DEPTH * 0.4, GOAL_MOUTH_HALF)
}

pub fn center_line() -> Segment {
    Segment {
        from: Vec2::new(0.0, -RINK_HALF_HEIGHT),
        to: Vec2::new(0.0, RINK_HALF_HEIGHT),
    }
}

pub fn puck_spawn() -> Vec2 {
    Vec2::ZERO
}

/// Spawn slots for one team's roster, insertion order = cycle order.
pub fn spawn_slots(team: Team, count: u32) -> Vec<Vec2> {
    let x = match team {
        Team::Blue => -SPAWN_COLUMN_X,
        Team::Red => SPAWN_COLUMN_X,
    };
    (0..count)
        .map(|i| {
            let offset = i as f32 - (count.saturating_sub(1)) as f32 * 0.5;
            Vec2::new(x, offset * SLOT_SPACING)
        })
        .collect()
}

/// Direction to free a circular body resting against the boards, or None
/// when it is not touching any. Open goal mouths produce no push.
pub fn unstuck_push(p: Vec2, radius: f32) -> Option<Vec2> {
    let hw = RINK_HALF_WIDTH;
    let hh = RINK_HALF_HEIGHT;
    let gm = GOAL_MOUTH_HALF;
    let reach = radius + 1.0;
    let mut push = Vec2::ZERO;

    if p.y >= hh - reach {
        push.y -= 1.0;
    }
    if p.y <= -hh + reach {
        push.y += 1.0;
    }

    if p.x.abs() <= hw {
        // In the playfield: the end boards only exist outside the mouths.
        if p.x <= -hw + reach && p.y.abs() >= gm {
            push.x += 1.0;
        }
        if p.x >= hw - reach && p.y.abs() >= gm {
            push.x -= 1.0;
        }
    } else {
        // Inside a pocket: back wall and pocket lips.
        let depth_limit = hw + GOAL_DEPTH;
        if p.x <= -depth_limit + reach {
            push.x += 1.0;
        }
        if p.x >= depth_limit - reach {
            push.x -= 1.0;
        }
        if p.y >= gm - reach {
            push.y -= 1.0;
        }
        if p.y <= -gm + reach {
            push.y += 1.0;
        }
    }

    (push != Vec2::ZERO).then(|| push.normalize())
}
