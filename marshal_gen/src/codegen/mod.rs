pub mod c;
pub mod c_gen;
