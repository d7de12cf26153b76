//! Seekio common constants

/// Capacity reserved for the cache buffer when no hint is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4 * 1024;

/// Largest single pull from the source while draining towards a target offset.
/// Matches the buffer size `std::io` uses for its own copy loops.
pub const DEFAULT_DRAIN_CHUNK: usize = 8 * 1024;
