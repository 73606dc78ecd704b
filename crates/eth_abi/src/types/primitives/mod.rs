pub mod address;
pub mod boolean;
pub mod bytes;
pub mod fixed;
pub mod integer;
pub mod string;
