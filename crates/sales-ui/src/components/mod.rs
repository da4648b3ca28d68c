pub mod header;
pub mod legend;
