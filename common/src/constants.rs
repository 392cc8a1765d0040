/// Smallest number a side may show for the toss or a turn
pub const MIN_NUMBER: u8 = 1;

/// Largest number a side may show for the toss or a turn
pub const MAX_NUMBER: u8 = 10;

/// Default delay for the quick reveals: toss result, dismissal, declaration and chase won
pub const DEFAULT_FAST_DELAY_MS: u64 = 1000;

/// Default delay between the opponent announcing its bat/bowl decision and the innings starting
pub const DEFAULT_DECISION_DELAY_MS: u64 = 3000;

/// Default time a validation message stays visible before the UI hides it
pub const DEFAULT_ERROR_DISPLAY_MS: u64 = 4000;
