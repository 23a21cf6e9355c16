pub mod candidate;
pub mod comparison;
pub mod document;
pub mod run;
