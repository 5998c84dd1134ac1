mod time_utils;

pub use time_utils::{TimeUtils, epoch_ms_to_human};
