pub mod format;
pub mod page;
pub mod series;
pub mod svg;

pub use page::render_page;
