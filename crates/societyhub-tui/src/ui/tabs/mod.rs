pub mod gallery;
pub mod list;
