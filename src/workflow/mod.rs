pub mod navigation;
pub mod task_ctx;

pub use navigation::{NavStep, PageNavigator};
pub use task_ctx::TaskCtx;
