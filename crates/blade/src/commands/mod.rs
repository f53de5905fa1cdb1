pub mod completion;
pub mod experiment;
pub mod list;
