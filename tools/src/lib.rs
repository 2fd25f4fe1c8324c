pub mod bigram_db;
pub mod convert_interpolation;
pub mod convert_table;
