//! Storage module for uploaded report images
//!
//! Images live in a local directory that is also served statically.

mod image_store;

pub use image_store::ImageStore;
