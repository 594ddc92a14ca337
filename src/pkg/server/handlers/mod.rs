pub mod analyses;
pub mod probes;
