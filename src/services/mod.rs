pub mod analytics;
pub mod monthly;
pub mod upstream;
pub mod weekly;
