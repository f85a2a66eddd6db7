pub mod theme;
pub mod timeline;
