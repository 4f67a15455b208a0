pub mod degressive;
pub mod document;
pub mod line_item;
pub mod period;
pub mod tax;
