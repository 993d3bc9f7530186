pub mod applications;
pub mod leasing;
pub mod listings;
pub mod records;
pub mod uploads;
