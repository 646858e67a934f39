pub mod navigator;
pub mod route;

pub use navigator::Navigator;
pub use route::Route;
