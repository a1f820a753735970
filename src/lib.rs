pub mod config;
pub mod error;
pub mod logger;
pub mod metadata;
pub mod page;
pub mod page_loader;
pub mod page_renderer;
pub mod site_builder;
pub mod site_index;
pub mod snippet;
mod test_data;
mod text_utils;
