// Library interface for sumlens modules
// This allows tests and other binaries to import modules

pub mod store;
pub mod summarize;
