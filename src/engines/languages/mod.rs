pub mod csharp;
pub mod go;
pub mod java;
pub mod lua;
pub mod node;
pub mod python;
pub mod ruby;
