pub mod notices;
pub mod scoreboard;

pub use notices::{describe, message_banner, notice_log, notice_style};
pub use scoreboard::{controls, header, scoreboard, side_label};
