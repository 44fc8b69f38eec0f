//! 公共菜单
//!
//! - [`view`] - 读模型聚合 (settings + active categories + grouped items)
//! - [`render`] - HTML 渲染

pub mod render;
pub mod view;

pub use render::MenuRenderer;
pub use view::{MenuSection, MenuView, build_menu_view};
