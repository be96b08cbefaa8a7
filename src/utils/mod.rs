pub mod memoizer;
pub mod presence_loader;
pub mod time_math;
pub mod user_directory;
pub mod weekday;
