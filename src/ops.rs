pub mod debounce;
pub mod delay;
pub mod distinct_until_changed;
pub mod filter;
pub mod group_by;
pub mod merge;
pub mod observe_on;
pub mod ref_count;
pub mod scan;
pub mod skip;
pub mod skip_until;
pub mod subscribe_on;
pub mod take;
pub mod take_until;
pub mod throttle_time;
