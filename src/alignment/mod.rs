pub mod dictionary;
pub mod reading;
pub mod reconstruction;
pub mod report;
pub mod resolution;
pub mod segmentation;
pub mod transcript;
