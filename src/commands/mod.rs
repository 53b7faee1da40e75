pub mod preflight;
pub mod run;
