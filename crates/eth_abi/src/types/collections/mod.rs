pub mod array_dynamic;
pub mod array_static;
pub mod tuple;
