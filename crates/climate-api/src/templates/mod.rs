pub mod home;
pub mod layouts;

pub use home::{home_page, ROUTES};
pub use layouts::{base, PageConfig};
