pub mod distinct_until_changed;
pub mod map;
pub mod observe_on;
pub mod switch_on_next;
pub mod throttle;
