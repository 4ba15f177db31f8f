pub mod origin_guard;

pub use origin_guard::{origin_guard_middleware, OriginPolicy};
