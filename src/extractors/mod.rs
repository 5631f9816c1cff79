pub mod release_date;
pub mod title_reader;
