//! Canonical resource and configuration keys.
//!
//! Every lookup into the [`ResourceManager`](crate::resources::ResourceManager)
//! or [`ConfigManager`](crate::config::ConfigManager) goes through one of
//! these constants so that a typo is a compile error rather than a silently
//! missing asset.

/// Font keys.
pub mod fonts {
    pub const MAIN_FONT: &str = "MainFont";
    pub const SCORE_FONT: &str = "ScoreFont";
}

/// Texture keys.
pub mod textures {
    pub const BUTTON_RED_X: &str = "ButtonRedX";
    pub const BUTTON_LEFT_ARROW: &str = "ButtonLeftArrow";
    pub const BUTTON_RIGHT_ARROW: &str = "ButtonRightArrow";
    pub const BUTTON_BACKGROUND: &str = "ButtonBackground";

    pub const ALL: [&str; 4] = [
        BUTTON_RED_X,
        BUTTON_LEFT_ARROW,
        BUTTON_RIGHT_ARROW,
        BUTTON_BACKGROUND,
    ];
}

/// Sound effect keys.
pub mod sounds {
    pub const BRICK_HIT: &str = "BrickHit";
    pub const PADDLE_HIT: &str = "PaddleHit";
    pub const WALL_HIT: &str = "WallHit";
    pub const NORM_BRICK_BREAK: &str = "NormBrickBreak";
    pub const GOLD_BRICK_BREAK: &str = "GoldBrickBreak";
    pub const STRONG_BRICK_BREAK: &str = "StrongBrickBreak";

    pub const ALL: [&str; 6] = [
        BRICK_HIT,
        PADDLE_HIT,
        WALL_HIT,
        NORM_BRICK_BREAK,
        GOLD_BRICK_BREAK,
        STRONG_BRICK_BREAK,
    ];
}

/// Music stream keys.
pub mod music {
    pub const MAIN_SONG: &str = "MainSong";
}

/// Configuration table ids. Each table is read from `<id>.toml` under the
/// config root.
pub mod configs {
    pub const WINDOW: &str = "WindowConfig";
    pub const PLAYER: &str = "Player";
    pub const BALL: &str = "Ball";
    pub const BRICKS: &str = "Bricks";
    pub const LEVELS: &str = "Levels";

    pub const ALL: [&str; 5] = [WINDOW, PLAYER, BALL, BRICKS, LEVELS];
}
