pub mod movie;
pub mod source_row;
