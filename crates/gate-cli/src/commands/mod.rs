pub mod dispatch;
pub mod guard;
pub mod logs;
pub mod pass;
pub mod schema;
pub mod shared;
