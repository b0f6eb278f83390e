pub mod bounds;
pub mod scan_box;
