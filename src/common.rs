pub mod value_compare;
